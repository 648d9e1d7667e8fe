//! # Memory Bus Abstraction
//!
//! This module defines the `MemoryBus` trait the Z80 core reads and writes
//! through, the `BusError` kinds every memory-like component reports, and a
//! flat 64 KB implementation used by tests and simple hosts.
//!
//! Unlike a floating data bus on real hardware, every access here is
//! checked: an access that no component answers is an error, not a silent
//! 0xFF. Callers propagate the error out of the current instruction.
//!
//! ## Word Access
//!
//! The Z80 is little-endian. `read_word` and `write_word` are provided
//! methods composed from two byte accesses (low byte first), wrapping at
//! 0xFFFF.

/// Errors raised by memory-like components and the address space.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BusError {
    /// Access outside the bounds of the component that owns the address.
    ///
    /// For an access to an unbound slot, `base` is the slot's first address
    /// and `size` is zero.
    #[error("address 0x{address:04X} is outside region 0x{base:04X} (size 0x{size:X})")]
    AddressOutOfRange { address: u16, base: u16, size: usize },

    /// Write to a read-only region.
    #[error("write to read-only region 0x{base:04X} (size 0x{size:X}) at 0x{address:04X}")]
    ReadOnlyViolation { address: u16, base: u16, size: usize },

    /// A component's range overlaps a slot that is already bound.
    #[error("component at 0x{base:04X} (size 0x{size:X}) overlaps bound slot {slot}")]
    DuplicateBinding { base: u16, size: usize, slot: usize },
}

/// Byte-addressable memory as seen by the processor.
///
/// # Examples
///
/// ```rust
/// use libz80::{FlatMemory, MemoryBus};
///
/// let mut memory = FlatMemory::new();
/// memory.write_word(0x8000, 0xBEEF).unwrap();
///
/// assert_eq!(memory.read(0x8000).unwrap(), 0xEF);
/// assert_eq!(memory.read(0x8001).unwrap(), 0xBE);
/// assert_eq!(memory.read_word(0x8000).unwrap(), 0xBEEF);
/// ```
pub trait MemoryBus {
    /// Read one byte.
    fn read(&self, address: u16) -> Result<u8, BusError>;

    /// Write one byte.
    fn write(&mut self, address: u16, value: u8) -> Result<(), BusError>;

    /// Read a little-endian word.
    fn read_word(&self, address: u16) -> Result<u16, BusError> {
        let low = self.read(address)? as u16;
        let high = self.read(address.wrapping_add(1))? as u16;
        Ok((high << 8) | low)
    }

    /// Write a little-endian word.
    fn write_word(&mut self, address: u16, value: u16) -> Result<(), BusError> {
        self.write(address, value as u8)?;
        self.write(address.wrapping_add(1), (value >> 8) as u8)
    }
}

/// Simple 64KB flat memory.
///
/// Every address is readable and writable, so accesses never fail. Useful for
/// exercising the processor without wiring up an `AddressSpace`.
///
/// # Examples
///
/// ```rust
/// use libz80::{FlatMemory, MemoryBus};
///
/// let mut memory = FlatMemory::new();
/// memory.load(0x0000, &[0x3E, 0x42]); // LD A,0x42
///
/// assert_eq!(memory.read(0x0001).unwrap(), 0x42);
/// ```
pub struct FlatMemory {
    data: Box<[u8]>,
}

impl FlatMemory {
    /// Creates zero-filled 64KB memory.
    pub fn new() -> Self {
        Self {
            data: vec![0; 0x10000].into_boxed_slice(),
        }
    }

    /// Copies `bytes` in starting at `address`, wrapping past 0xFFFF.
    pub fn load(&mut self, address: u16, bytes: &[u8]) {
        for (i, &byte) in bytes.iter().enumerate() {
            let target = address.wrapping_add(i as u16);
            self.data[target as usize] = byte;
        }
    }
}

impl Default for FlatMemory {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryBus for FlatMemory {
    fn read(&self, address: u16) -> Result<u8, BusError> {
        Ok(self.data[address as usize])
    }

    fn write(&mut self, address: u16, value: u8) -> Result<(), BusError> {
        self.data[address as usize] = value;
        Ok(())
    }
}
