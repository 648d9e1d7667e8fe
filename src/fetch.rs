//! Instruction fetch: prefix decoding and operand resolution.
//!
//! Decoding walks at most four bytes:
//!
//! ```text
//! op                 unprefixed
//! CB op              bit operations
//! ED op              extended
//! DD op / FD op      index register forms
//! DD CB d op         indexed bit operations: the displacement comes
//! FD CB d op         before the opcode and is reused, not re-read
//! ```
//!
//! Operands are then resolved in stream order, write side first. Both the
//! live fetch and the diagnostic preview go through `fetch`, so the values a
//! preview renders are the ones execution will use.

use crate::addressing::{AddressingMode, Reg16, Reg8};
use crate::memory::{BusError, MemoryBus};
use crate::opcodes::{DecodeTables, Instruction, Prefix};
use crate::registers::Registers;
use crate::ExecutionError;

/// Reads the instruction stream from a private copy of the address.
pub(crate) struct Cursor<'a, M: MemoryBus> {
    memory: &'a M,
    address: u16,
}

impl<'a, M: MemoryBus> Cursor<'a, M> {
    pub(crate) fn new(memory: &'a M, address: u16) -> Self {
        Self { memory, address }
    }

    /// Address of the next unread byte.
    pub(crate) fn address(&self) -> u16 {
        self.address
    }

    fn next_byte(&mut self) -> Result<u8, BusError> {
        let byte = self.memory.read(self.address)?;
        self.address = self.address.wrapping_add(1);
        Ok(byte)
    }

    fn next_word(&mut self) -> Result<u16, BusError> {
        let low = self.next_byte()? as u16;
        let high = self.next_byte()? as u16;
        Ok((high << 8) | low)
    }
}

/// An addressing mode resolved against the current machine state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand {
    None,
    Register(Reg8),
    RegisterPair(Reg16),
    /// Memory at an effective address. Width is up to the operation.
    Memory(u16),
    Immediate(u8),
    /// Immediate word, or the target of a relative jump.
    ImmediateWord(u16),
    Port(u16),
}

/// A decoded instruction with its operands resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fetched {
    /// Address of the first byte.
    pub address: u16,
    pub instruction: &'static Instruction,
    pub dst: Operand,
    pub src: Operand,
    /// Index displacement, when the instruction has one.
    pub displacement: Option<i8>,
    /// Bytes consumed, prefixes included.
    pub length: u16,
}

impl Fetched {
    /// Opcode fetch cycles for the refresh counter: one per prefix byte plus
    /// the opcode, except that DD CB / FD CB count only their two prefixes.
    pub fn refresh_count(&self) -> u8 {
        (self.instruction.prefix.bytes().len() as u8 + 1).min(2)
    }
}

/// Decode one instruction at the cursor and resolve its operands.
///
/// On error the cursor stays after the last byte successfully read.
pub(crate) fn fetch<M: MemoryBus>(
    tables: &'static DecodeTables,
    registers: &Registers,
    cursor: &mut Cursor<'_, M>,
) -> Result<Fetched, ExecutionError> {
    let address = cursor.address();
    let (instruction, mut displacement) = decode(tables, cursor)?;

    let dst = resolve(instruction.dst, registers, cursor, &mut displacement)?;
    let src = resolve(instruction.src, registers, cursor, &mut displacement)?;

    Ok(Fetched {
        address,
        instruction,
        dst,
        src,
        displacement,
        length: cursor.address().wrapping_sub(address),
    })
}

fn decode<M: MemoryBus>(
    tables: &'static DecodeTables,
    cursor: &mut Cursor<'_, M>,
) -> Result<(&'static Instruction, Option<i8>), ExecutionError> {
    let first = cursor.next_byte()?;

    let (prefix, opcode, displacement) = match first {
        0xCB => (Prefix::CB, cursor.next_byte()?, None),
        0xED => (Prefix::ED, cursor.next_byte()?, None),
        0xDD | 0xFD => {
            let second = cursor.next_byte()?;
            if second == 0xCB {
                let displacement = cursor.next_byte()? as i8;
                let opcode = cursor.next_byte()?;
                let prefix = if first == 0xDD {
                    Prefix::DDCB
                } else {
                    Prefix::FDCB
                };
                (prefix, opcode, Some(displacement))
            } else {
                let prefix = if first == 0xDD { Prefix::DD } else { Prefix::FD };
                (prefix, second, None)
            }
        }
        _ => (Prefix::None, first, None),
    };

    match tables.lookup(prefix, opcode) {
        Some(instruction) => Ok((instruction, displacement)),
        None => {
            let mut bytes = prefix.bytes().to_vec();
            if let Some(d) = displacement {
                bytes.push(d as u8);
            }
            bytes.push(opcode);
            Err(ExecutionError::UnknownOpcode { bytes })
        }
    }
}

fn resolve<M: MemoryBus>(
    mode: AddressingMode,
    registers: &Registers,
    cursor: &mut Cursor<'_, M>,
    displacement: &mut Option<i8>,
) -> Result<Operand, BusError> {
    let operand = match mode {
        AddressingMode::Implied => Operand::None,
        AddressingMode::Register(reg) => Operand::Register(reg),
        AddressingMode::RegisterPair(pair) => Operand::RegisterPair(pair),
        AddressingMode::Indirect(pair) => Operand::Memory(registers.get16(pair)),
        AddressingMode::Indexed(index) => {
            let d = match *displacement {
                Some(d) => d,
                None => {
                    let d = cursor.next_byte()? as i8;
                    *displacement = Some(d);
                    d
                }
            };
            let base = registers.get16(index.register());
            Operand::Memory(base.wrapping_add(d as i16 as u16))
        }
        AddressingMode::Immediate => Operand::Immediate(cursor.next_byte()?),
        AddressingMode::ImmediateExtended => Operand::ImmediateWord(cursor.next_word()?),
        AddressingMode::Extended => Operand::Memory(cursor.next_word()?),
        AddressingMode::Relative => {
            let e = cursor.next_byte()? as i8;
            Operand::ImmediateWord(cursor.address().wrapping_add(e as i16 as u16))
        }
        AddressingMode::PortImmediate => {
            let low = cursor.next_byte()? as u16;
            Operand::Port(((registers.a() as u16) << 8) | low)
        }
        AddressingMode::PortC => Operand::Port(registers.bc()),
    };
    Ok(operand)
}
