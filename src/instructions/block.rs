//! # Block Transfer, Compare and I/O Instructions
//!
//! Each instruction moves or compares one byte and steps HL (and DE for
//! transfers) forward or backward. The repeating forms rewind PC over
//! themselves while there is work left, so the next `step` runs them again.
//!
//! | Form        | Repeats while | Cycles (repeat / last) |
//! |-------------|---------------|------------------------|
//! | LDIR, LDDR  | BC != 0       | 21 / 16                |
//! | CPIR, CPDR  | BC != 0, no match | 21 / 16            |
//! | INIR, INDR  | B != 0        | 21 / 16                |
//! | OTIR, OTDR  | B != 0        | 21 / 16                |

use crate::fetch::Fetched;
use crate::opcodes::Operation;
use crate::registers::{Flag, Registers};
use crate::{ExecutionError, MemoryBus, CPU};

/// Cycles for a repeating step that rewinds.
const REPEAT_CYCLES: u8 = 21;

/// Executes LDI, LDD, LDIR and LDDR.
///
/// Flags: H and N cleared, P/V set while BC is nonzero. With n the moved
/// byte plus A, bit 1 of n lands in flag bit 5 and bit 3 of n in flag bit 3.
pub(crate) fn execute_transfer<M: MemoryBus>(
    cpu: &mut CPU<M>,
    fetched: &Fetched,
) -> Result<u8, ExecutionError> {
    use Operation::*;

    let operation = fetched.instruction.operation;
    let step = direction(operation == Ldi || operation == Ldir);

    let value = cpu.memory.read(cpu.registers.hl())?;
    cpu.memory.write(cpu.registers.de(), value)?;

    let regs = &mut cpu.registers;
    regs.set_hl(regs.hl().wrapping_add(step));
    regs.set_de(regs.de().wrapping_add(step));
    let remaining = regs.bc().wrapping_sub(1);
    regs.set_bc(remaining);

    let n = value.wrapping_add(regs.a);
    set_block_undocumented(regs, n);
    regs.set_flag(Flag::HalfCarry, false);
    regs.set_flag(Flag::Subtract, false);
    regs.set_flag(Flag::ParityOverflow, remaining != 0);

    let repeating = matches!(operation, Ldir | Lddr);
    Ok(finish(cpu, fetched, repeating && remaining != 0))
}

/// Executes CPI, CPD, CPIR and CPDR.
///
/// Compares A with (HL) like CP, keeping carry. The repeating forms stop
/// on a match or when BC reaches zero.
pub(crate) fn execute_compare<M: MemoryBus>(
    cpu: &mut CPU<M>,
    fetched: &Fetched,
) -> Result<u8, ExecutionError> {
    use Operation::*;

    let operation = fetched.instruction.operation;
    let step = direction(operation == Cpi || operation == Cpir);

    let value = cpu.memory.read(cpu.registers.hl())?;

    let regs = &mut cpu.registers;
    let a = regs.a;
    let result = a.wrapping_sub(value);
    let half_carry = (a & 0x0F) < (value & 0x0F);

    regs.set_hl(regs.hl().wrapping_add(step));
    let remaining = regs.bc().wrapping_sub(1);
    regs.set_bc(remaining);

    regs.set_sign_from(result);
    regs.set_zero_from(result);
    regs.set_flag(Flag::HalfCarry, half_carry);
    regs.set_flag(Flag::Subtract, true);
    regs.set_flag(Flag::ParityOverflow, remaining != 0);
    set_block_undocumented(regs, result.wrapping_sub(half_carry as u8));

    let repeating = matches!(operation, Cpir | Cpdr);
    Ok(finish(cpu, fetched, repeating && remaining != 0 && result != 0))
}

/// Executes INI, IND, INIR and INDR.
///
/// Reads port BC into (HL), then decrements B.
pub(crate) fn execute_input<M: MemoryBus>(
    cpu: &mut CPU<M>,
    fetched: &Fetched,
) -> Result<u8, ExecutionError> {
    use Operation::*;

    let operation = fetched.instruction.operation;
    let increment = operation == Ini || operation == Inir;
    let step = direction(increment);

    let port = cpu.registers.bc();
    let value = cpu.io.read_io(port);
    cpu.memory.write(cpu.registers.hl(), value)?;

    let regs = &mut cpu.registers;
    regs.set_hl(regs.hl().wrapping_add(step));
    regs.b = regs.b.wrapping_sub(1);

    let adjusted_c = if increment {
        regs.c.wrapping_add(1)
    } else {
        regs.c.wrapping_sub(1)
    };
    set_block_io_flags(regs, value, value as u16 + adjusted_c as u16);

    let repeating = matches!(operation, Inir | Indr);
    let more = cpu.registers.b != 0;
    Ok(finish(cpu, fetched, repeating && more))
}

/// Executes OUTI, OUTD, OTIR and OTDR.
///
/// B is decremented before the port address is formed, so the peripheral
/// sees the new B on the high byte.
pub(crate) fn execute_output<M: MemoryBus>(
    cpu: &mut CPU<M>,
    fetched: &Fetched,
) -> Result<u8, ExecutionError> {
    use Operation::*;

    let operation = fetched.instruction.operation;
    let step = direction(operation == Outi || operation == Otir);

    let value = cpu.memory.read(cpu.registers.hl())?;
    cpu.registers.b = cpu.registers.b.wrapping_sub(1);
    let port = cpu.registers.bc();
    cpu.io.write_io(port, value);

    let regs = &mut cpu.registers;
    regs.set_hl(regs.hl().wrapping_add(step));
    let l = regs.l;
    set_block_io_flags(regs, value, value as u16 + l as u16);

    let repeating = matches!(operation, Otir | Otdr);
    let more = cpu.registers.b != 0;
    Ok(finish(cpu, fetched, repeating && more))
}

fn direction(increment: bool) -> u16 {
    if increment {
        1
    } else {
        0xFFFF
    }
}

fn set_block_undocumented(regs: &mut Registers, n: u8) {
    regs.set_flag(Flag::Bit5, n & 0x02 != 0);
    regs.set_flag(Flag::Bit3, n & 0x08 != 0);
}

/// Flags shared by the block I/O group, from the moved byte and the 9-bit
/// sum `k` of that byte and the adjusted C or L.
fn set_block_io_flags(regs: &mut Registers, value: u8, k: u16) {
    let b = regs.b;
    regs.set_result_flags(b);
    regs.set_flag(Flag::Subtract, value & 0x80 != 0);
    regs.set_flag(Flag::HalfCarry, k > 0xFF);
    regs.set_flag(Flag::Carry, k > 0xFF);
    regs.set_parity_from((k as u8 & 0x07) ^ b);
}

/// Rewind over the instruction when it repeats and pick the cycle count.
fn finish<M: MemoryBus>(cpu: &mut CPU<M>, fetched: &Fetched, repeat: bool) -> u8 {
    if repeat {
        cpu.registers.pc = cpu.registers.pc.wrapping_sub(fetched.length);
        REPEAT_CYCLES
    } else {
        fetched.instruction.cycles
    }
}
