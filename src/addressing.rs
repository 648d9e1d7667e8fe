//! # Addressing Modes
//!
//! Operand locators for Z80 instructions, plus the register names and
//! condition codes they refer to.

use std::fmt;

use crate::registers::{Flag, Registers};

/// 8-bit registers an instruction can name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Reg8 {
    A,
    F,
    B,
    C,
    D,
    E,
    H,
    L,
    /// Interrupt vector
    I,
    /// Refresh
    R,
}

/// 16-bit registers and register pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Reg16 {
    AF,
    BC,
    DE,
    HL,
    SP,
    IX,
    IY,
}

/// The two index registers, selected by the DD and FD prefixes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndexRegister {
    IX,
    IY,
}

impl IndexRegister {
    pub fn register(self) -> Reg16 {
        match self {
            IndexRegister::IX => Reg16::IX,
            IndexRegister::IY => Reg16::IY,
        }
    }
}

/// How an instruction locates one operand.
///
/// Modes that need extra bytes consume them from the instruction stream when
/// resolved; the write side of an instruction is resolved before its read
/// side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressingMode {
    /// No operand on this side.
    ///
    /// Example: `NOP`
    Implied,

    /// An 8-bit register.
    ///
    /// Example: `LD A,B`
    Register(Reg8),

    /// A 16-bit register or pair.
    ///
    /// Example: `PUSH BC`
    RegisterPair(Reg16),

    /// Memory at the address held in a 16-bit register.
    ///
    /// Example: `LD A,(DE)`, `JP (HL)`
    Indirect(Reg16),

    /// Memory at IX or IY plus a signed displacement byte.
    ///
    /// Example: `LD A,(IX+5)`
    Indexed(IndexRegister),

    /// One immediate byte.
    ///
    /// Example: `LD A,0x42`
    Immediate,

    /// A little-endian immediate word.
    ///
    /// Example: `LD HL,0x1234`, `JP 0x8000`
    ImmediateExtended,

    /// Memory at an absolute address taken from the instruction.
    ///
    /// Example: `LD A,(0x5C00)`, `LD (0x5C00),HL`
    Extended,

    /// Signed displacement relative to the next instruction.
    ///
    /// Example: `JR -2`
    Relative,

    /// Port with an immediate low byte and A as the high byte.
    ///
    /// Example: `OUT (0xFE),A`
    PortImmediate,

    /// Port addressed by BC.
    ///
    /// Example: `OUT (C),B`
    PortC,
}

impl AddressingMode {
    /// Bytes this mode reads from the instruction stream.
    pub fn operand_bytes(self) -> u16 {
        match self {
            AddressingMode::Indexed(_)
            | AddressingMode::Immediate
            | AddressingMode::Relative
            | AddressingMode::PortImmediate => 1,
            AddressingMode::ImmediateExtended | AddressingMode::Extended => 2,
            _ => 0,
        }
    }
}

/// Condition codes for conditional jumps, calls and returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Condition {
    NZ,
    Z,
    NC,
    C,
    PO,
    PE,
    P,
    M,
}

impl Condition {
    /// All conditions in encoding order.
    pub const ALL: [Condition; 8] = [
        Condition::NZ,
        Condition::Z,
        Condition::NC,
        Condition::C,
        Condition::PO,
        Condition::PE,
        Condition::P,
        Condition::M,
    ];

    /// Evaluate against the current flags.
    pub fn holds(self, regs: &Registers) -> bool {
        match self {
            Condition::NZ => !regs.flag(Flag::Zero),
            Condition::Z => regs.flag(Flag::Zero),
            Condition::NC => !regs.flag(Flag::Carry),
            Condition::C => regs.flag(Flag::Carry),
            Condition::PO => !regs.flag(Flag::ParityOverflow),
            Condition::PE => regs.flag(Flag::ParityOverflow),
            Condition::P => !regs.flag(Flag::Sign),
            Condition::M => regs.flag(Flag::Sign),
        }
    }
}

impl fmt::Display for Reg8 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Reg8::A => "A",
            Reg8::F => "F",
            Reg8::B => "B",
            Reg8::C => "C",
            Reg8::D => "D",
            Reg8::E => "E",
            Reg8::H => "H",
            Reg8::L => "L",
            Reg8::I => "I",
            Reg8::R => "R",
        };
        f.write_str(name)
    }
}

impl fmt::Display for Reg16 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Reg16::AF => "AF",
            Reg16::BC => "BC",
            Reg16::DE => "DE",
            Reg16::HL => "HL",
            Reg16::SP => "SP",
            Reg16::IX => "IX",
            Reg16::IY => "IY",
        };
        f.write_str(name)
    }
}

impl fmt::Display for IndexRegister {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.register().fmt(f)
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Condition::NZ => "NZ",
            Condition::Z => "Z",
            Condition::NC => "NC",
            Condition::C => "C",
            Condition::PO => "PO",
            Condition::PE => "PE",
            Condition::P => "P",
            Condition::M => "M",
        };
        f.write_str(name)
    }
}
