//! # ALU (Arithmetic Logic Unit) Instructions
//!
//! This module implements arithmetic and logical operations:
//! - ADD, ADC, SUB, SBC, CP (8-bit, through the CPU's carry primitives)
//! - AND, OR, XOR
//! - INC, DEC (8-bit and 16-bit)
//! - ADD, ADC, SBC (16-bit)
//! - DAA, CPL, NEG, CCF, SCF

use crate::fetch::Fetched;
use crate::opcodes::Operation;
use crate::registers::{Flag, Registers};
use crate::{ExecutionError, MemoryBus, CPU};

/// Flags that 16-bit ADD leaves untouched.
const ADD16_PRESERVED: u8 = Flag::Sign.mask() | Flag::Zero.mask() | Flag::ParityOverflow.mask();

/// Executes ADD/ADC/SUB/SBC/CP against the accumulator.
///
/// CP computes the subtraction for its flags only, then takes the two
/// undocumented bits from the operand instead of the result.
pub(crate) fn execute_arithmetic<M: MemoryBus>(
    cpu: &mut CPU<M>,
    fetched: &Fetched,
) -> Result<u8, ExecutionError> {
    let instruction = fetched.instruction;
    let value = cpu.read8(fetched.src, instruction)?;
    let a = cpu.registers.a;
    let carry = cpu.registers.carry();

    match instruction.operation {
        Operation::Add => cpu.registers.a = cpu.add_with_carry(a, value, false),
        Operation::Adc => cpu.registers.a = cpu.add_with_carry(a, value, carry),
        Operation::Sub => cpu.registers.a = cpu.sub_with_carry(a, value, false),
        Operation::Sbc => cpu.registers.a = cpu.sub_with_carry(a, value, carry),
        _ => {
            cpu.sub_with_carry(a, value, false);
            cpu.registers.set_undocumented_from(value);
        }
    }

    Ok(instruction.cycles)
}

/// Executes AND/OR/XOR against the accumulator.
///
/// P/V reports parity, C and N are cleared, H is set only by AND.
pub(crate) fn execute_logic<M: MemoryBus>(
    cpu: &mut CPU<M>,
    fetched: &Fetched,
) -> Result<u8, ExecutionError> {
    let instruction = fetched.instruction;
    let value = cpu.read8(fetched.src, instruction)?;
    let a = cpu.registers.a;

    let (result, half_carry) = match instruction.operation {
        Operation::And => (a & value, true),
        Operation::Or => (a | value, false),
        _ => (a ^ value, false),
    };

    let regs = &mut cpu.registers;
    regs.a = result;
    regs.set_result_flags(result);
    regs.set_parity_from(result);
    regs.set_flag(Flag::HalfCarry, half_carry);
    regs.set_flag(Flag::Subtract, false);
    regs.set_flag(Flag::Carry, false);

    Ok(instruction.cycles)
}

/// Executes 8-bit INC/DEC on a register or memory cell.
///
/// Carry is preserved. Overflow is set only when INC crosses 0x7F→0x80 or
/// DEC crosses 0x80→0x7F.
pub(crate) fn execute_inc_dec<M: MemoryBus>(
    cpu: &mut CPU<M>,
    fetched: &Fetched,
) -> Result<u8, ExecutionError> {
    let instruction = fetched.instruction;
    let value = cpu.read8(fetched.dst, instruction)?;

    let increment = instruction.operation == Operation::Inc;
    let result = if increment {
        value.wrapping_add(1)
    } else {
        value.wrapping_sub(1)
    };

    // Flags only change once the result has landed
    cpu.write8(fetched.dst, result, instruction)?;

    if increment {
        set_increment_flags(&mut cpu.registers, value, result);
    } else {
        set_decrement_flags(&mut cpu.registers, value, result);
    }
    Ok(instruction.cycles)
}

fn set_increment_flags(regs: &mut Registers, value: u8, result: u8) {
    regs.set_result_flags(result);
    regs.set_flag(Flag::HalfCarry, value & 0x0F == 0x0F);
    regs.set_flag(Flag::ParityOverflow, value == 0x7F);
    regs.set_flag(Flag::Subtract, false);
}

fn set_decrement_flags(regs: &mut Registers, value: u8, result: u8) {
    regs.set_result_flags(result);
    regs.set_flag(Flag::HalfCarry, value & 0x0F == 0x00);
    regs.set_flag(Flag::ParityOverflow, value == 0x80);
    regs.set_flag(Flag::Subtract, true);
}

/// Executes ADD/ADC/SBC on HL, IX or IY.
///
/// ADD keeps S, Z and P/V; ADC and SBC set every flag.
pub(crate) fn execute_arithmetic16<M: MemoryBus>(
    cpu: &mut CPU<M>,
    fetched: &Fetched,
) -> Result<u8, ExecutionError> {
    let instruction = fetched.instruction;
    let a = cpu.read16(fetched.dst, instruction)?;
    let b = cpu.read16(fetched.src, instruction)?;
    let carry = cpu.registers.carry();

    let result = match instruction.operation {
        Operation::Add16 => {
            let kept = cpu.registers.f & ADD16_PRESERVED;
            let result = cpu.add_with_carry16(a, b, false);
            cpu.registers.f = (cpu.registers.f & !ADD16_PRESERVED) | kept;
            result
        }
        Operation::Adc16 => cpu.add_with_carry16(a, b, carry),
        _ => cpu.sub_with_carry16(a, b, carry),
    };

    cpu.write16(fetched.dst, result, instruction)?;
    Ok(instruction.cycles)
}

/// Executes 16-bit INC/DEC. No flags are affected.
pub(crate) fn execute_inc_dec16<M: MemoryBus>(
    cpu: &mut CPU<M>,
    fetched: &Fetched,
) -> Result<u8, ExecutionError> {
    let instruction = fetched.instruction;
    let value = cpu.read16(fetched.dst, instruction)?;

    let result = if instruction.operation == Operation::Inc16 {
        value.wrapping_add(1)
    } else {
        value.wrapping_sub(1)
    };

    cpu.write16(fetched.dst, result, instruction)?;
    Ok(instruction.cycles)
}

/// Executes DAA: adjust A to packed BCD after an add or subtract.
pub(crate) fn execute_daa<M: MemoryBus>(
    cpu: &mut CPU<M>,
    fetched: &Fetched,
) -> Result<u8, ExecutionError> {
    let regs = &mut cpu.registers;
    let a = regs.a;
    let subtract = regs.subtract();
    let low = a & 0x0F;

    let mut correction = 0u8;
    let mut carry = regs.carry();

    if regs.half_carry() || low > 9 {
        correction |= 0x06;
    }
    if carry || a > 0x99 {
        correction |= 0x60;
        carry = true;
    }

    let result = if subtract {
        a.wrapping_sub(correction)
    } else {
        a.wrapping_add(correction)
    };

    let half_carry = if subtract {
        regs.half_carry() && low < 6
    } else {
        low > 9
    };

    regs.a = result;
    regs.set_result_flags(result);
    regs.set_parity_from(result);
    regs.set_flag(Flag::HalfCarry, half_carry);
    regs.set_flag(Flag::Carry, carry);

    Ok(fetched.instruction.cycles)
}

/// Executes CPL, NEG, CCF and SCF.
pub(crate) fn execute_accumulator<M: MemoryBus>(
    cpu: &mut CPU<M>,
    fetched: &Fetched,
) -> Result<u8, ExecutionError> {
    let a = cpu.registers.a;

    match fetched.instruction.operation {
        Operation::Cpl => {
            let regs = &mut cpu.registers;
            regs.a = !a;
            regs.set_undocumented_from(regs.a);
            regs.set_flag(Flag::HalfCarry, true);
            regs.set_flag(Flag::Subtract, true);
        }
        Operation::Neg => {
            cpu.registers.a = cpu.sub_with_carry(0, a, false);
        }
        Operation::Ccf => {
            let regs = &mut cpu.registers;
            let carry = regs.carry();
            regs.set_undocumented_from(a);
            regs.set_flag(Flag::HalfCarry, carry);
            regs.set_flag(Flag::Subtract, false);
            regs.set_flag(Flag::Carry, !carry);
        }
        _ => {
            let regs = &mut cpu.registers;
            regs.set_undocumented_from(a);
            regs.set_flag(Flag::HalfCarry, false);
            regs.set_flag(Flag::Subtract, false);
            regs.set_flag(Flag::Carry, true);
        }
    }

    Ok(fetched.instruction.cycles)
}
