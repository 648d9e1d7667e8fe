//! # Shift, Rotate and Bit Instructions
//!
//! - RLCA, RRCA, RLA, RRA (accumulator, fast forms)
//! - RLC, RRC, RL, RR, SLA, SRA, SLL, SRL (CB group)
//! - RLD, RRD
//! - BIT, RES, SET

use crate::fetch::{Fetched, Operand};
use crate::opcodes::{Operation, ShiftOp};
use crate::registers::Flag;
use crate::{ExecutionError, MemoryBus, CPU};

/// Executes RLCA/RRCA/RLA/RRA.
///
/// Unlike the CB forms these leave S, Z and P/V alone.
pub(crate) fn execute_rotate_accumulator<M: MemoryBus>(
    cpu: &mut CPU<M>,
    fetched: &Fetched,
) -> Result<u8, ExecutionError> {
    let regs = &mut cpu.registers;
    let a = regs.a;
    let carry_in = regs.carry() as u8;

    let (result, carry) = match fetched.instruction.operation {
        Operation::Rlca => (a.rotate_left(1), a & 0x80 != 0),
        Operation::Rrca => (a.rotate_right(1), a & 0x01 != 0),
        Operation::Rla => ((a << 1) | carry_in, a & 0x80 != 0),
        _ => ((a >> 1) | (carry_in << 7), a & 0x01 != 0),
    };

    regs.a = result;
    regs.set_undocumented_from(result);
    regs.set_flag(Flag::HalfCarry, false);
    regs.set_flag(Flag::Subtract, false);
    regs.set_flag(Flag::Carry, carry);

    Ok(fetched.instruction.cycles)
}

/// Executes a CB-group shift or rotate on a register or memory cell.
pub(crate) fn execute_shift<M: MemoryBus>(
    cpu: &mut CPU<M>,
    fetched: &Fetched,
    op: ShiftOp,
) -> Result<u8, ExecutionError> {
    let instruction = fetched.instruction;
    let value = cpu.read8(fetched.dst, instruction)?;
    let (result, carry) = shift(op, value, cpu.registers.carry());

    cpu.write8(fetched.dst, result, instruction)?;

    let regs = &mut cpu.registers;
    regs.set_result_flags(result);
    regs.set_parity_from(result);
    regs.set_flag(Flag::HalfCarry, false);
    regs.set_flag(Flag::Subtract, false);
    regs.set_flag(Flag::Carry, carry);

    Ok(instruction.cycles)
}

/// Shift `value`, returning the result and the bit shifted out.
pub(crate) fn shift(op: ShiftOp, value: u8, carry_in: bool) -> (u8, bool) {
    let high = value & 0x80 != 0;
    let low = value & 0x01 != 0;
    let carry_in = carry_in as u8;

    match op {
        ShiftOp::Rlc => (value.rotate_left(1), high),
        ShiftOp::Rrc => (value.rotate_right(1), low),
        ShiftOp::Rl => ((value << 1) | carry_in, high),
        ShiftOp::Rr => ((value >> 1) | (carry_in << 7), low),
        ShiftOp::Sla => (value << 1, high),
        ShiftOp::Sra => ((value >> 1) | (value & 0x80), low),
        ShiftOp::Sll => ((value << 1) | 0x01, high),
        ShiftOp::Srl => (value >> 1, low),
    }
}

/// Executes RLD and RRD: rotate a BCD digit between A and (HL).
pub(crate) fn execute_rotate_digit<M: MemoryBus>(
    cpu: &mut CPU<M>,
    fetched: &Fetched,
) -> Result<u8, ExecutionError> {
    let address = cpu.registers.hl();
    let memory = cpu.memory.read(address)?;
    let a = cpu.registers.a;

    let (new_memory, new_a) = if fetched.instruction.operation == Operation::Rld {
        ((memory << 4) | (a & 0x0F), (a & 0xF0) | (memory >> 4))
    } else {
        ((a << 4) | (memory >> 4), (a & 0xF0) | (memory & 0x0F))
    };

    cpu.memory.write(address, new_memory)?;

    let regs = &mut cpu.registers;
    regs.a = new_a;
    regs.set_result_flags(new_a);
    regs.set_parity_from(new_a);
    regs.set_flag(Flag::HalfCarry, false);
    regs.set_flag(Flag::Subtract, false);

    Ok(fetched.instruction.cycles)
}

/// Executes BIT b,operand.
///
/// Z and P/V report the bit inverted; S is set only for bit 7 when it is
/// one. For memory operands the undocumented bits come from the high byte
/// of the effective address.
pub(crate) fn execute_bit<M: MemoryBus>(
    cpu: &mut CPU<M>,
    fetched: &Fetched,
    bit: u8,
) -> Result<u8, ExecutionError> {
    let value = cpu.read8(fetched.src, fetched.instruction)?;
    let clear = value & (1 << bit) == 0;

    let undocumented = match fetched.src {
        Operand::Memory(address) => (address >> 8) as u8,
        _ => value,
    };

    let regs = &mut cpu.registers;
    regs.set_flag(Flag::Zero, clear);
    regs.set_flag(Flag::ParityOverflow, clear);
    regs.set_flag(Flag::Sign, bit == 7 && !clear);
    regs.set_undocumented_from(undocumented);
    regs.set_flag(Flag::HalfCarry, true);
    regs.set_flag(Flag::Subtract, false);

    Ok(fetched.instruction.cycles)
}

/// Executes RES b,operand and SET b,operand. No flags are affected.
pub(crate) fn execute_res_set<M: MemoryBus>(
    cpu: &mut CPU<M>,
    fetched: &Fetched,
    bit: u8,
) -> Result<u8, ExecutionError> {
    let instruction = fetched.instruction;
    let value = cpu.read8(fetched.dst, instruction)?;

    let result = match instruction.operation {
        Operation::Set(_) => value | (1 << bit),
        _ => value & !(1 << bit),
    };

    cpu.write8(fetched.dst, result, instruction)?;
    Ok(instruction.cycles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FlatMemory, CPU};

    fn setup_cpu(program: &[u8]) -> CPU<FlatMemory> {
        let mut memory = FlatMemory::new();
        memory.load(0x0000, program);
        let mut cpu = CPU::new(memory);
        cpu.registers_mut().set_f(0x00);
        cpu
    }

    #[test]
    fn test_shift_table() {
        assert_eq!(shift(ShiftOp::Rlc, 0x81, false), (0x03, true));
        assert_eq!(shift(ShiftOp::Rrc, 0x01, false), (0x80, true));
        assert_eq!(shift(ShiftOp::Rl, 0x80, true), (0x01, true));
        assert_eq!(shift(ShiftOp::Rr, 0x01, true), (0x80, true));
        assert_eq!(shift(ShiftOp::Sla, 0xC0, false), (0x80, true));
        assert_eq!(shift(ShiftOp::Sra, 0x81, false), (0xC0, true));
        assert_eq!(shift(ShiftOp::Sll, 0x00, false), (0x01, false));
        assert_eq!(shift(ShiftOp::Srl, 0x81, false), (0x40, true));
    }

    #[test]
    fn test_rlca_keeps_zero_flag() {
        // RLCA
        let mut cpu = setup_cpu(&[0x07]);
        cpu.registers_mut().set_a(0x80);
        cpu.registers_mut().set_flag(Flag::Zero, true);

        assert_eq!(cpu.step().unwrap(), 4);
        assert_eq!(cpu.registers().a(), 0x01);
        assert!(cpu.registers().carry());
        assert!(cpu.registers().zero());
    }

    #[test]
    fn test_srl_memory() {
        // SRL (HL)
        let mut cpu = setup_cpu(&[0xCB, 0x3E]);
        cpu.registers_mut().set_hl(0x9000);
        cpu.memory_mut().write(0x9000, 0x01).unwrap();

        assert_eq!(cpu.step().unwrap(), 15);
        assert_eq!(cpu.memory().read(0x9000).unwrap(), 0x00);
        assert!(cpu.registers().zero());
        assert!(cpu.registers().carry());
    }

    #[test]
    fn test_bit_register() {
        // BIT 7,H ; BIT 0,H
        let mut cpu = setup_cpu(&[0xCB, 0x7C, 0xCB, 0x44]);
        cpu.registers_mut().set_h(0x80);

        assert_eq!(cpu.step().unwrap(), 8);
        assert!(!cpu.registers().zero());
        assert!(cpu.registers().sign());

        cpu.step().unwrap();
        assert!(cpu.registers().zero());
        assert!(cpu.registers().parity_even());
        assert!(!cpu.registers().sign());
    }

    #[test]
    fn test_res_and_set_indexed() {
        // SET 7,(IY+2) ; RES 0,(IY+2)
        let mut cpu = setup_cpu(&[0xFD, 0xCB, 0x02, 0xFE, 0xFD, 0xCB, 0x02, 0x86]);
        cpu.registers_mut().set_iy(0x5C00);
        cpu.memory_mut().write(0x5C02, 0x01).unwrap();

        assert_eq!(cpu.step().unwrap(), 23);
        assert_eq!(cpu.memory().read(0x5C02).unwrap(), 0x81);

        assert_eq!(cpu.step().unwrap(), 23);
        assert_eq!(cpu.memory().read(0x5C02).unwrap(), 0x80);
        assert_eq!(cpu.pc(), 0x0008);
    }

    #[test]
    fn test_rld_rrd() {
        // RLD ; RRD
        let mut cpu = setup_cpu(&[0xED, 0x6F, 0xED, 0x67]);
        cpu.registers_mut().set_hl(0x8000);
        cpu.registers_mut().set_a(0x12);
        cpu.memory_mut().write(0x8000, 0x34).unwrap();

        assert_eq!(cpu.step().unwrap(), 18);
        assert_eq!(cpu.registers().a(), 0x13);
        assert_eq!(cpu.memory().read(0x8000).unwrap(), 0x42);

        cpu.step().unwrap();
        assert_eq!(cpu.registers().a(), 0x12);
        assert_eq!(cpu.memory().read(0x8000).unwrap(), 0x34);
    }
}
