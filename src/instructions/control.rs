//! # Control Flow Instructions
//!
//! This module implements control flow and machine control operations:
//! - JP, JR, DJNZ (with and without conditions)
//! - CALL, RET, RETI, RETN, RST
//! - NOP, HALT, DI, EI, IM
//!
//! Conditional forms report different cycle counts depending on whether
//! the branch is taken:
//!
//! | Instruction | Taken | Not taken |
//! |-------------|-------|-----------|
//! | JR cc,e     | 12    | 7         |
//! | DJNZ e      | 13    | 8         |
//! | CALL cc,nn  | 17    | 10        |
//! | RET cc      | 11    | 5         |
//! | JP cc,nn    | 10    | 10        |

use crate::fetch::Fetched;
use crate::opcodes::Operation;
use crate::{ExecutionError, MemoryBus, CPU};

const JR_TAKEN_CYCLES: u8 = 12;
const DJNZ_TAKEN_CYCLES: u8 = 13;
const CALL_TAKEN_CYCLES: u8 = 17;
const RET_TAKEN_CYCLES: u8 = 11;

/// Whether the instruction's condition holds. Unconditional forms always do.
fn taken<M: MemoryBus>(cpu: &CPU<M>, fetched: &Fetched) -> bool {
    fetched
        .instruction
        .condition
        .map_or(true, |condition| condition.holds(&cpu.registers))
}

/// Executes JP nn, JP cc,nn and JP (HL)/(IX)/(IY).
///
/// The register-indirect forms jump to the address held in the register,
/// not to the memory it points at.
pub(crate) fn execute_jp<M: MemoryBus>(
    cpu: &mut CPU<M>,
    fetched: &Fetched,
) -> Result<u8, ExecutionError> {
    let target = cpu.target(fetched.src, fetched.instruction)?;
    if taken(cpu, fetched) {
        cpu.registers.pc = target;
    }
    Ok(fetched.instruction.cycles)
}

/// Executes JR e and JR cc,e.
pub(crate) fn execute_jr<M: MemoryBus>(
    cpu: &mut CPU<M>,
    fetched: &Fetched,
) -> Result<u8, ExecutionError> {
    let target = cpu.target(fetched.src, fetched.instruction)?;
    if taken(cpu, fetched) {
        cpu.registers.pc = target;
        Ok(JR_TAKEN_CYCLES)
    } else {
        Ok(fetched.instruction.cycles)
    }
}

/// Executes DJNZ e.
///
/// The branch is taken when B is nonzero on entry; B is decremented only
/// on the taken path. With B = 0 the instruction falls through and B stays 0.
pub(crate) fn execute_djnz<M: MemoryBus>(
    cpu: &mut CPU<M>,
    fetched: &Fetched,
) -> Result<u8, ExecutionError> {
    let target = cpu.target(fetched.src, fetched.instruction)?;
    let regs = &mut cpu.registers;

    if regs.b != 0 {
        regs.b = regs.b.wrapping_sub(1);
        regs.pc = target;
        Ok(DJNZ_TAKEN_CYCLES)
    } else {
        Ok(fetched.instruction.cycles)
    }
}

/// Executes CALL nn and CALL cc,nn.
///
/// Pushes the address of the next instruction, then jumps.
pub(crate) fn execute_call<M: MemoryBus>(
    cpu: &mut CPU<M>,
    fetched: &Fetched,
) -> Result<u8, ExecutionError> {
    let target = cpu.target(fetched.src, fetched.instruction)?;
    if !taken(cpu, fetched) {
        return Ok(fetched.instruction.cycles);
    }

    cpu.push(cpu.registers.pc)?;
    cpu.registers.pc = target;
    Ok(CALL_TAKEN_CYCLES)
}

/// Executes RET, RET cc, RETI and RETN.
///
/// RETN also restores IFF1 from IFF2.
pub(crate) fn execute_ret<M: MemoryBus>(
    cpu: &mut CPU<M>,
    fetched: &Fetched,
) -> Result<u8, ExecutionError> {
    let instruction = fetched.instruction;
    if !taken(cpu, fetched) {
        return Ok(instruction.cycles);
    }

    cpu.registers.pc = cpu.pop()?;

    if instruction.operation == Operation::Retn {
        cpu.registers.iff1 = cpu.registers.iff2;
    }

    if instruction.condition.is_some() {
        Ok(RET_TAKEN_CYCLES)
    } else {
        Ok(instruction.cycles)
    }
}

/// Executes RST p: a one-byte call to a fixed page-zero vector.
pub(crate) fn execute_rst<M: MemoryBus>(
    cpu: &mut CPU<M>,
    fetched: &Fetched,
    vector: u8,
) -> Result<u8, ExecutionError> {
    cpu.push(cpu.registers.pc)?;
    cpu.registers.pc = vector as u16;
    Ok(fetched.instruction.cycles)
}

/// Executes NOP, HALT, DI, EI and IM n.
///
/// HALT latches the halted state; `CPU::step` then idles without fetching.
pub(crate) fn execute_machine<M: MemoryBus>(
    cpu: &mut CPU<M>,
    fetched: &Fetched,
) -> Result<u8, ExecutionError> {
    let regs = &mut cpu.registers;

    match fetched.instruction.operation {
        Operation::Halt => regs.halted = true,
        Operation::Di => regs.set_interrupts_enabled(false),
        Operation::Ei => regs.set_interrupts_enabled(true),
        Operation::Im(mode) => regs.set_interrupt_mode(mode),
        _ => {}
    }

    Ok(fetched.instruction.cycles)
}
