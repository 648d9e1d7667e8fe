//! # Opcode Decode Tables
//!
//! Seven parallel 256-entry tables map an opcode byte to its `Instruction`
//! template: the unprefixed set, the CB, DD, ED and FD prefixed sets, and the
//! double-prefixed DD CB and FD CB bit operations.
//!
//! The tables are built once on first use and shared for the life of the
//! process. Each entry is plain data; the `instructions` module interprets
//! it.
//!
//! Entries whose prefix is DD or FD cover only the documented index-register
//! forms. The undocumented IXH/IXL/IYH/IYL forms and prefix fallthrough have
//! no entry and decode as unknown.

use std::sync::OnceLock;

use crate::addressing::{AddressingMode, Condition, IndexRegister, Reg16, Reg8};

use AddressingMode::*;

/// Prefix byte sequence that selects a decode table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Prefix {
    None,
    CB,
    DD,
    ED,
    FD,
    DDCB,
    FDCB,
}

impl Prefix {
    /// The prefix bytes as they appear in memory.
    pub fn bytes(self) -> &'static [u8] {
        match self {
            Prefix::None => &[],
            Prefix::CB => &[0xCB],
            Prefix::DD => &[0xDD],
            Prefix::ED => &[0xED],
            Prefix::FD => &[0xFD],
            Prefix::DDCB => &[0xDD, 0xCB],
            Prefix::FDCB => &[0xFD, 0xCB],
        }
    }
}

/// Shift and rotate operations of the CB group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShiftOp {
    Rlc,
    Rrc,
    Rl,
    Rr,
    Sla,
    Sra,
    /// Undocumented shift left inserting 1.
    Sll,
    Srl,
}

impl ShiftOp {
    const ALL: [ShiftOp; 8] = [
        ShiftOp::Rlc,
        ShiftOp::Rrc,
        ShiftOp::Rl,
        ShiftOp::Rr,
        ShiftOp::Sla,
        ShiftOp::Sra,
        ShiftOp::Sll,
        ShiftOp::Srl,
    ];
}

/// What an instruction does, independent of its operands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Nop,
    Halt,
    Di,
    Ei,
    Im(u8),

    Ld,
    Ld16,
    Push,
    Pop,

    ExAf,
    ExDeHl,
    ExSp,
    Exx,

    Ldi,
    Ldir,
    Ldd,
    Lddr,
    Cpi,
    Cpir,
    Cpd,
    Cpdr,
    Ini,
    Inir,
    Ind,
    Indr,
    Outi,
    Otir,
    Outd,
    Otdr,

    Add,
    Adc,
    Sub,
    Sbc,
    And,
    Xor,
    Or,
    Cp,
    Inc,
    Dec,

    Add16,
    Adc16,
    Sbc16,
    Inc16,
    Dec16,

    Daa,
    Cpl,
    Neg,
    Ccf,
    Scf,

    Rlca,
    Rrca,
    Rla,
    Rra,
    Shift(ShiftOp),
    Rld,
    Rrd,

    Bit(u8),
    Res(u8),
    Set(u8),

    Jp,
    Jr,
    Djnz,
    Call,
    Ret,
    Reti,
    Retn,
    Rst(u8),

    In,
    Out,
}

impl Operation {
    pub fn mnemonic(self) -> &'static str {
        use Operation::*;
        match self {
            Nop => "NOP",
            Halt => "HALT",
            Di => "DI",
            Ei => "EI",
            Im(_) => "IM",
            Ld | Ld16 => "LD",
            Push => "PUSH",
            Pop => "POP",
            ExAf | ExDeHl | ExSp => "EX",
            Exx => "EXX",
            Ldi => "LDI",
            Ldir => "LDIR",
            Ldd => "LDD",
            Lddr => "LDDR",
            Cpi => "CPI",
            Cpir => "CPIR",
            Cpd => "CPD",
            Cpdr => "CPDR",
            Ini => "INI",
            Inir => "INIR",
            Ind => "IND",
            Indr => "INDR",
            Outi => "OUTI",
            Otir => "OTIR",
            Outd => "OUTD",
            Otdr => "OTDR",
            Add | Add16 => "ADD",
            Adc | Adc16 => "ADC",
            Sub => "SUB",
            Sbc | Sbc16 => "SBC",
            And => "AND",
            Xor => "XOR",
            Or => "OR",
            Cp => "CP",
            Inc | Inc16 => "INC",
            Dec | Dec16 => "DEC",
            Daa => "DAA",
            Cpl => "CPL",
            Neg => "NEG",
            Ccf => "CCF",
            Scf => "SCF",
            Rlca => "RLCA",
            Rrca => "RRCA",
            Rla => "RLA",
            Rra => "RRA",
            Shift(ShiftOp::Rlc) => "RLC",
            Shift(ShiftOp::Rrc) => "RRC",
            Shift(ShiftOp::Rl) => "RL",
            Shift(ShiftOp::Rr) => "RR",
            Shift(ShiftOp::Sla) => "SLA",
            Shift(ShiftOp::Sra) => "SRA",
            Shift(ShiftOp::Sll) => "SLL",
            Shift(ShiftOp::Srl) => "SRL",
            Rld => "RLD",
            Rrd => "RRD",
            Bit(_) => "BIT",
            Res(_) => "RES",
            Set(_) => "SET",
            Jp => "JP",
            Jr => "JR",
            Djnz => "DJNZ",
            Call => "CALL",
            Ret => "RET",
            Reti => "RETI",
            Retn => "RETN",
            Rst(_) => "RST",
            In => "IN",
            Out => "OUT",
        }
    }
}

/// Immutable template for one opcode in one table.
///
/// `dst` is the write side and `src` the read side; either may be
/// `Implied`. `cycles` is the base cost. Conditional and repeating forms
/// report a different figure when they branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instruction {
    pub mnemonic: &'static str,
    pub operation: Operation,
    pub dst: AddressingMode,
    pub src: AddressingMode,
    pub condition: Option<Condition>,
    pub prefix: Prefix,
    pub opcode: u8,
    pub cycles: u8,
}

impl Instruction {
    fn new(
        prefix: Prefix,
        opcode: u8,
        operation: Operation,
        dst: AddressingMode,
        src: AddressingMode,
        cycles: u8,
    ) -> Self {
        Self {
            mnemonic: operation.mnemonic(),
            operation,
            dst,
            src,
            condition: None,
            prefix,
            opcode,
            cycles,
        }
    }

    fn when(mut self, condition: Condition) -> Self {
        self.condition = Some(condition);
        self
    }

    /// Length in bytes, prefixes and operands included.
    pub fn length(&self) -> u16 {
        self.prefix.bytes().len() as u16
            + 1
            + self.dst.operand_bytes()
            + self.src.operand_bytes()
    }
}

/// One decode table.
pub type OpcodeTable = [Option<Instruction>; 256];

/// The full set of decode tables.
pub struct DecodeTables {
    pub base: OpcodeTable,
    pub cb: OpcodeTable,
    pub dd: OpcodeTable,
    pub ed: OpcodeTable,
    pub fd: OpcodeTable,
    pub ddcb: OpcodeTable,
    pub fdcb: OpcodeTable,
}

impl DecodeTables {
    fn build() -> Self {
        Self {
            base: base_table(),
            cb: cb_table(),
            dd: index_table(IndexRegister::IX, Prefix::DD),
            ed: ed_table(),
            fd: index_table(IndexRegister::IY, Prefix::FD),
            ddcb: index_bit_table(IndexRegister::IX, Prefix::DDCB),
            fdcb: index_bit_table(IndexRegister::IY, Prefix::FDCB),
        }
    }

    /// Table selected by a prefix.
    pub fn table(&self, prefix: Prefix) -> &OpcodeTable {
        match prefix {
            Prefix::None => &self.base,
            Prefix::CB => &self.cb,
            Prefix::DD => &self.dd,
            Prefix::ED => &self.ed,
            Prefix::FD => &self.fd,
            Prefix::DDCB => &self.ddcb,
            Prefix::FDCB => &self.fdcb,
        }
    }

    /// Entry for `opcode` under `prefix`.
    pub fn lookup(&self, prefix: Prefix, opcode: u8) -> Option<&Instruction> {
        self.table(prefix)[opcode as usize].as_ref()
    }
}

/// Shared decode tables, built on first call.
pub fn decode_tables() -> &'static DecodeTables {
    static TABLES: OnceLock<DecodeTables> = OnceLock::new();
    TABLES.get_or_init(DecodeTables::build)
}

// ========== Encoding Helpers ==========

/// The `r` field: B, C, D, E, H, L, (HL), A.
fn reg(field: u8) -> AddressingMode {
    match field & 7 {
        0 => Register(Reg8::B),
        1 => Register(Reg8::C),
        2 => Register(Reg8::D),
        3 => Register(Reg8::E),
        4 => Register(Reg8::H),
        5 => Register(Reg8::L),
        6 => Indirect(Reg16::HL),
        _ => Register(Reg8::A),
    }
}

/// The `rp` field with SP.
fn pair_sp(field: u8) -> Reg16 {
    match field & 3 {
        0 => Reg16::BC,
        1 => Reg16::DE,
        2 => Reg16::HL,
        _ => Reg16::SP,
    }
}

/// The `rp` field with AF, used by PUSH and POP.
fn pair_af(field: u8) -> Reg16 {
    match field & 3 {
        0 => Reg16::BC,
        1 => Reg16::DE,
        2 => Reg16::HL,
        _ => Reg16::AF,
    }
}

fn alu(field: u8) -> Operation {
    match field & 7 {
        0 => Operation::Add,
        1 => Operation::Adc,
        2 => Operation::Sub,
        3 => Operation::Sbc,
        4 => Operation::And,
        5 => Operation::Xor,
        6 => Operation::Or,
        _ => Operation::Cp,
    }
}

/// ADD, ADC and SBC name A explicitly; the rest leave it implied.
fn alu_dst(operation: Operation) -> AddressingMode {
    match operation {
        Operation::Add | Operation::Adc | Operation::Sbc => Register(Reg8::A),
        _ => Implied,
    }
}

fn memory_cost(mode: AddressingMode, register: u8, memory: u8) -> u8 {
    if matches!(mode, Indirect(_)) {
        memory
    } else {
        register
    }
}

fn empty_table() -> OpcodeTable {
    [None; 256]
}

// ========== Unprefixed ==========

fn base_table() -> OpcodeTable {
    use Operation as Op;

    let mut table = empty_table();
    let p = Prefix::None;
    let mut put = |instruction: Instruction| {
        table[instruction.opcode as usize] = Some(instruction);
    };

    for opcode in 0u8..=255 {
        let x = opcode >> 6;
        let y = (opcode >> 3) & 7;
        let z = opcode & 7;
        let q = y & 1;
        let pp = y >> 1;

        match (x, z) {
            (0, 0) => match y {
                0 => put(Instruction::new(p, opcode, Op::Nop, Implied, Implied, 4)),
                1 => put(Instruction::new(
                    p,
                    opcode,
                    Op::ExAf,
                    RegisterPair(Reg16::AF),
                    RegisterPair(Reg16::AF),
                    4,
                )),
                2 => put(Instruction::new(p, opcode, Op::Djnz, Implied, Relative, 8)),
                3 => put(Instruction::new(p, opcode, Op::Jr, Implied, Relative, 12)),
                _ => put(
                    Instruction::new(p, opcode, Op::Jr, Implied, Relative, 7)
                        .when(Condition::ALL[(y - 4) as usize]),
                ),
            },
            (0, 1) => {
                if q == 0 {
                    put(Instruction::new(
                        p,
                        opcode,
                        Op::Ld16,
                        RegisterPair(pair_sp(pp)),
                        ImmediateExtended,
                        10,
                    ));
                } else {
                    put(Instruction::new(
                        p,
                        opcode,
                        Op::Add16,
                        RegisterPair(Reg16::HL),
                        RegisterPair(pair_sp(pp)),
                        11,
                    ));
                }
            }
            (0, 2) => {
                let instruction = match (q, pp) {
                    (0, 0) => Instruction::new(p, opcode, Op::Ld, Indirect(Reg16::BC), Register(Reg8::A), 7),
                    (0, 1) => Instruction::new(p, opcode, Op::Ld, Indirect(Reg16::DE), Register(Reg8::A), 7),
                    (0, 2) => Instruction::new(p, opcode, Op::Ld16, Extended, RegisterPair(Reg16::HL), 16),
                    (0, _) => Instruction::new(p, opcode, Op::Ld, Extended, Register(Reg8::A), 13),
                    (_, 0) => Instruction::new(p, opcode, Op::Ld, Register(Reg8::A), Indirect(Reg16::BC), 7),
                    (_, 1) => Instruction::new(p, opcode, Op::Ld, Register(Reg8::A), Indirect(Reg16::DE), 7),
                    (_, 2) => Instruction::new(p, opcode, Op::Ld16, RegisterPair(Reg16::HL), Extended, 16),
                    (_, _) => Instruction::new(p, opcode, Op::Ld, Register(Reg8::A), Extended, 13),
                };
                put(instruction);
            }
            (0, 3) => {
                let operation = if q == 0 { Op::Inc16 } else { Op::Dec16 };
                put(Instruction::new(p, opcode, operation, RegisterPair(pair_sp(pp)), Implied, 6));
            }
            (0, 4) | (0, 5) => {
                let operation = if z == 4 { Op::Inc } else { Op::Dec };
                let target = reg(y);
                put(Instruction::new(p, opcode, operation, target, Implied, memory_cost(target, 4, 11)));
            }
            (0, 6) => {
                let target = reg(y);
                put(Instruction::new(p, opcode, Op::Ld, target, Immediate, memory_cost(target, 7, 10)));
            }
            (0, _) => {
                let operation = [
                    Op::Rlca,
                    Op::Rrca,
                    Op::Rla,
                    Op::Rra,
                    Op::Daa,
                    Op::Cpl,
                    Op::Scf,
                    Op::Ccf,
                ][y as usize];
                put(Instruction::new(p, opcode, operation, Implied, Implied, 4));
            }
            (1, _) => {
                if y == 6 && z == 6 {
                    put(Instruction::new(p, opcode, Op::Halt, Implied, Implied, 4));
                } else {
                    let (dst, src) = (reg(y), reg(z));
                    let cycles = if matches!(dst, Indirect(_)) || matches!(src, Indirect(_)) {
                        7
                    } else {
                        4
                    };
                    put(Instruction::new(p, opcode, Op::Ld, dst, src, cycles));
                }
            }
            (2, _) => {
                let operation = alu(y);
                let src = reg(z);
                put(Instruction::new(p, opcode, operation, alu_dst(operation), src, memory_cost(src, 4, 7)));
            }
            (_, 0) => put(
                Instruction::new(p, opcode, Op::Ret, Implied, Implied, 5).when(Condition::ALL[y as usize]),
            ),
            (_, 1) => {
                let instruction = match (q, pp) {
                    (0, _) => Instruction::new(p, opcode, Op::Pop, RegisterPair(pair_af(pp)), Implied, 10),
                    (_, 0) => Instruction::new(p, opcode, Op::Ret, Implied, Implied, 10),
                    (_, 1) => Instruction::new(p, opcode, Op::Exx, Implied, Implied, 4),
                    (_, 2) => Instruction::new(p, opcode, Op::Jp, Implied, Indirect(Reg16::HL), 4),
                    (_, _) => Instruction::new(
                        p,
                        opcode,
                        Op::Ld16,
                        RegisterPair(Reg16::SP),
                        RegisterPair(Reg16::HL),
                        6,
                    ),
                };
                put(instruction);
            }
            (_, 2) => put(
                Instruction::new(p, opcode, Op::Jp, Implied, ImmediateExtended, 10)
                    .when(Condition::ALL[y as usize]),
            ),
            (_, 3) => {
                let instruction = match y {
                    0 => Instruction::new(p, opcode, Op::Jp, Implied, ImmediateExtended, 10),
                    // CB prefix
                    1 => continue,
                    2 => Instruction::new(p, opcode, Op::Out, PortImmediate, Register(Reg8::A), 11),
                    3 => Instruction::new(p, opcode, Op::In, Register(Reg8::A), PortImmediate, 11),
                    4 => Instruction::new(
                        p,
                        opcode,
                        Op::ExSp,
                        Indirect(Reg16::SP),
                        RegisterPair(Reg16::HL),
                        19,
                    ),
                    5 => Instruction::new(
                        p,
                        opcode,
                        Op::ExDeHl,
                        RegisterPair(Reg16::DE),
                        RegisterPair(Reg16::HL),
                        4,
                    ),
                    6 => Instruction::new(p, opcode, Op::Di, Implied, Implied, 4),
                    _ => Instruction::new(p, opcode, Op::Ei, Implied, Implied, 4),
                };
                put(instruction);
            }
            (_, 4) => put(
                Instruction::new(p, opcode, Op::Call, Implied, ImmediateExtended, 10)
                    .when(Condition::ALL[y as usize]),
            ),
            (_, 5) => {
                if q == 0 {
                    put(Instruction::new(p, opcode, Op::Push, Implied, RegisterPair(pair_af(pp)), 11));
                } else if pp == 0 {
                    put(Instruction::new(p, opcode, Op::Call, Implied, ImmediateExtended, 17));
                }
                // DD, ED and FD are prefixes
            }
            (_, 6) => {
                let operation = alu(y);
                put(Instruction::new(p, opcode, operation, alu_dst(operation), Immediate, 7));
            }
            (_, _) => put(Instruction::new(p, opcode, Op::Rst(y * 8), Implied, Implied, 11)),
        }
    }

    table
}

// ========== CB: Bit Operations ==========

fn cb_table() -> OpcodeTable {
    let mut table = empty_table();

    for opcode in 0u8..=255 {
        let y = (opcode >> 3) & 7;
        let target = reg(opcode);
        let instruction = match opcode >> 6 {
            0 => Instruction::new(
                Prefix::CB,
                opcode,
                Operation::Shift(ShiftOp::ALL[y as usize]),
                target,
                Implied,
                memory_cost(target, 8, 15),
            ),
            1 => Instruction::new(
                Prefix::CB,
                opcode,
                Operation::Bit(y),
                Implied,
                target,
                memory_cost(target, 8, 12),
            ),
            2 => Instruction::new(
                Prefix::CB,
                opcode,
                Operation::Res(y),
                target,
                Implied,
                memory_cost(target, 8, 15),
            ),
            _ => Instruction::new(
                Prefix::CB,
                opcode,
                Operation::Set(y),
                target,
                Implied,
                memory_cost(target, 8, 15),
            ),
        };
        table[opcode as usize] = Some(instruction);
    }

    table
}

// ========== ED: Extended ==========

fn ed_table() -> OpcodeTable {
    use Operation as Op;

    let mut table = empty_table();
    let p = Prefix::ED;
    let mut put = |instruction: Instruction| {
        table[instruction.opcode as usize] = Some(instruction);
    };

    for opcode in 0x40u8..=0x7F {
        let y = (opcode >> 3) & 7;
        let z = opcode & 7;
        let q = y & 1;
        let pp = y >> 1;

        match z {
            0 => {
                // ED 70 reads the port for its flags only
                let dst = if y == 6 { Implied } else { reg(y) };
                put(Instruction::new(p, opcode, Op::In, dst, PortC, 12));
            }
            1 => {
                if y != 6 {
                    put(Instruction::new(p, opcode, Op::Out, PortC, reg(y), 12));
                }
            }
            2 => {
                let operation = if q == 0 { Op::Sbc16 } else { Op::Adc16 };
                put(Instruction::new(
                    p,
                    opcode,
                    operation,
                    RegisterPair(Reg16::HL),
                    RegisterPair(pair_sp(pp)),
                    15,
                ));
            }
            3 => {
                let (dst, src) = if q == 0 {
                    (Extended, RegisterPair(pair_sp(pp)))
                } else {
                    (RegisterPair(pair_sp(pp)), Extended)
                };
                put(Instruction::new(p, opcode, Op::Ld16, dst, src, 20));
            }
            4 => {
                if y == 0 {
                    put(Instruction::new(p, opcode, Op::Neg, Implied, Implied, 8));
                }
            }
            5 => match y {
                0 => put(Instruction::new(p, opcode, Op::Retn, Implied, Implied, 14)),
                1 => put(Instruction::new(p, opcode, Op::Reti, Implied, Implied, 14)),
                _ => {}
            },
            6 => match y {
                0 => put(Instruction::new(p, opcode, Op::Im(0), Implied, Implied, 8)),
                2 => put(Instruction::new(p, opcode, Op::Im(1), Implied, Implied, 8)),
                3 => put(Instruction::new(p, opcode, Op::Im(2), Implied, Implied, 8)),
                _ => {}
            },
            _ => match y {
                0 => put(Instruction::new(p, opcode, Op::Ld, Register(Reg8::I), Register(Reg8::A), 9)),
                1 => put(Instruction::new(p, opcode, Op::Ld, Register(Reg8::R), Register(Reg8::A), 9)),
                2 => put(Instruction::new(p, opcode, Op::Ld, Register(Reg8::A), Register(Reg8::I), 9)),
                3 => put(Instruction::new(p, opcode, Op::Ld, Register(Reg8::A), Register(Reg8::R), 9)),
                4 => put(Instruction::new(p, opcode, Op::Rrd, Implied, Implied, 18)),
                5 => put(Instruction::new(p, opcode, Op::Rld, Implied, Implied, 18)),
                _ => {}
            },
        }
    }

    let block = [
        (0xA0, Op::Ldi),
        (0xA1, Op::Cpi),
        (0xA2, Op::Ini),
        (0xA3, Op::Outi),
        (0xA8, Op::Ldd),
        (0xA9, Op::Cpd),
        (0xAA, Op::Ind),
        (0xAB, Op::Outd),
        (0xB0, Op::Ldir),
        (0xB1, Op::Cpir),
        (0xB2, Op::Inir),
        (0xB3, Op::Otir),
        (0xB8, Op::Lddr),
        (0xB9, Op::Cpdr),
        (0xBA, Op::Indr),
        (0xBB, Op::Otdr),
    ];
    for (opcode, operation) in block {
        put(Instruction::new(p, opcode, operation, Implied, Implied, 16));
    }

    table
}

// ========== DD / FD: Index Registers ==========

fn index_table(index: IndexRegister, prefix: Prefix) -> OpcodeTable {
    use Operation as Op;

    let mut table = empty_table();
    let p = prefix;
    let ix = index.register();
    let mut put = |instruction: Instruction| {
        table[instruction.opcode as usize] = Some(instruction);
    };

    for (opcode, pair) in [(0x09, Reg16::BC), (0x19, Reg16::DE), (0x29, ix), (0x39, Reg16::SP)] {
        put(Instruction::new(p, opcode, Op::Add16, RegisterPair(ix), RegisterPair(pair), 15));
    }

    put(Instruction::new(p, 0x21, Op::Ld16, RegisterPair(ix), ImmediateExtended, 14));
    put(Instruction::new(p, 0x22, Op::Ld16, Extended, RegisterPair(ix), 20));
    put(Instruction::new(p, 0x2A, Op::Ld16, RegisterPair(ix), Extended, 20));
    put(Instruction::new(p, 0x23, Op::Inc16, RegisterPair(ix), Implied, 10));
    put(Instruction::new(p, 0x2B, Op::Dec16, RegisterPair(ix), Implied, 10));

    put(Instruction::new(p, 0x34, Op::Inc, Indexed(index), Implied, 23));
    put(Instruction::new(p, 0x35, Op::Dec, Indexed(index), Implied, 23));
    put(Instruction::new(p, 0x36, Op::Ld, Indexed(index), Immediate, 19));

    for y in (0u8..8).filter(|&y| y != 6) {
        // LD r,(IX+d)
        put(Instruction::new(p, 0x46 | (y << 3), Op::Ld, reg(y), Indexed(index), 19));
        // LD (IX+d),r
        put(Instruction::new(p, 0x70 | y, Op::Ld, Indexed(index), reg(y), 19));
    }

    for y in 0u8..8 {
        let operation = alu(y);
        put(Instruction::new(p, 0x86 | (y << 3), operation, alu_dst(operation), Indexed(index), 19));
    }

    put(Instruction::new(p, 0xE1, Op::Pop, RegisterPair(ix), Implied, 14));
    put(Instruction::new(p, 0xE3, Op::ExSp, Indirect(Reg16::SP), RegisterPair(ix), 23));
    put(Instruction::new(p, 0xE5, Op::Push, Implied, RegisterPair(ix), 15));
    put(Instruction::new(p, 0xE9, Op::Jp, Implied, Indirect(ix), 8));
    put(Instruction::new(p, 0xF9, Op::Ld16, RegisterPair(Reg16::SP), RegisterPair(ix), 10));

    table
}

/// DD CB d op and FD CB d op. Only the `(IX+d)` forms (low bits 110) are
/// documented.
fn index_bit_table(index: IndexRegister, prefix: Prefix) -> OpcodeTable {
    let mut table = empty_table();

    for opcode in (0u8..=255).filter(|op| op & 7 == 6) {
        let y = (opcode >> 3) & 7;
        let target = Indexed(index);
        let instruction = match opcode >> 6 {
            0 => Instruction::new(
                prefix,
                opcode,
                Operation::Shift(ShiftOp::ALL[y as usize]),
                target,
                Implied,
                23,
            ),
            1 => Instruction::new(prefix, opcode, Operation::Bit(y), Implied, target, 20),
            2 => Instruction::new(prefix, opcode, Operation::Res(y), target, Implied, 23),
            _ => Instruction::new(prefix, opcode, Operation::Set(y), target, Implied, 23),
        };
        table[opcode as usize] = Some(instruction);
    }

    table
}
