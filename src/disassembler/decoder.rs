//! Instruction decoder for the Z80 disassembler
//!
//! Decodes straight out of a byte slice through the same fetch path the CPU
//! uses, so listings and live traces agree on lengths and operand values.

use crate::fetch::{self, Cursor, Fetched};
use crate::memory::{BusError, MemoryBus};
use crate::opcodes::decode_tables;
use crate::registers::Registers;
use crate::ExecutionError;

/// Read-only view of a byte slice placed at `base` in the address space.
pub(crate) struct Window<'a> {
    bytes: &'a [u8],
    base: u16,
}

impl<'a> Window<'a> {
    pub(crate) fn new(bytes: &'a [u8], base: u16) -> Self {
        Self { bytes, base }
    }

    fn error(&self, address: u16) -> BusError {
        BusError::AddressOutOfRange {
            address,
            base: self.base,
            size: self.bytes.len(),
        }
    }
}

impl MemoryBus for Window<'_> {
    fn read(&self, address: u16) -> Result<u8, BusError> {
        let offset = address.wrapping_sub(self.base) as usize;
        self.bytes
            .get(offset)
            .copied()
            .ok_or_else(|| self.error(address))
    }

    fn write(&mut self, address: u16, _value: u8) -> Result<(), BusError> {
        Err(BusError::ReadOnlyViolation {
            address,
            base: self.base,
            size: self.bytes.len(),
        })
    }
}

/// Decode the instruction at `address` inside `window`.
///
/// Register-relative operands resolve against power-on registers; the
/// formatter only prints the register names for those.
pub(crate) fn decode_instruction(window: &Window<'_>, address: u16) -> Result<Fetched, ExecutionError> {
    let registers = Registers::new();
    let mut cursor = Cursor::new(window, address);
    fetch::fetch(decode_tables(), &registers, &mut cursor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::Operand;
    use crate::opcodes::Operation;

    #[test]
    fn test_decode_ld_immediate() {
        let bytes = [0x3E, 0x42];
        let window = Window::new(&bytes, 0x8000);
        let fetched = decode_instruction(&window, 0x8000).unwrap();

        assert_eq!(fetched.address, 0x8000);
        assert_eq!(fetched.instruction.operation, Operation::Ld);
        assert_eq!(fetched.src, Operand::Immediate(0x42));
        assert_eq!(fetched.length, 2);
    }

    #[test]
    fn test_decode_truncated() {
        let bytes = [0xC3, 0x00];
        let window = Window::new(&bytes, 0x0000);

        assert!(matches!(
            decode_instruction(&window, 0x0000),
            Err(ExecutionError::Bus(BusError::AddressOutOfRange { address: 0x0002, .. }))
        ));
    }

    #[test]
    fn test_window_is_read_only() {
        let bytes = [0x00];
        let mut window = Window::new(&bytes, 0x4000);

        assert_eq!(window.read(0x4000), Ok(0x00));
        assert!(window.read(0x3FFF).is_err());
        assert!(window.write(0x4000, 0x01).is_err());
    }
}
