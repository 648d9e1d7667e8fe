//! # Port I/O Instructions
//!
//! - IN A,(n) and OUT (n),A: the port's high byte comes from A
//! - IN r,(C) and OUT (C),r: the full port address is BC

use crate::addressing::AddressingMode;
use crate::fetch::{Fetched, Operand};
use crate::registers::Flag;
use crate::{ExecutionError, MemoryBus, CPU};

/// Executes IN.
///
/// IN A,(n) leaves flags alone. IN r,(C) sets S, Z, parity and the
/// undocumented bits from the byte read and clears H and N. ED 70 reads
/// the port for its flags and discards the value.
pub(crate) fn execute_in<M: MemoryBus>(
    cpu: &mut CPU<M>,
    fetched: &Fetched,
) -> Result<u8, ExecutionError> {
    let instruction = fetched.instruction;
    let port = cpu.port(fetched.src, instruction)?;
    let value = cpu.io.read_io(port);

    if fetched.dst != Operand::None {
        cpu.write8(fetched.dst, value, instruction)?;
    }

    if instruction.src == AddressingMode::PortC {
        let regs = &mut cpu.registers;
        regs.set_result_flags(value);
        regs.set_parity_from(value);
        regs.set_flag(Flag::HalfCarry, false);
        regs.set_flag(Flag::Subtract, false);
    }

    Ok(instruction.cycles)
}

/// Executes OUT. No flags are affected.
pub(crate) fn execute_out<M: MemoryBus>(
    cpu: &mut CPU<M>,
    fetched: &Fetched,
) -> Result<u8, ExecutionError> {
    let instruction = fetched.instruction;
    let port = cpu.port(fetched.dst, instruction)?;
    let value = cpu.read8(fetched.src, instruction)?;

    cpu.io.write_io(port, value);
    Ok(instruction.cycles)
}
