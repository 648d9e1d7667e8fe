//! # Z80 Instruction Implementations
//!
//! Execution semantics, organized by category. Every function takes the CPU
//! and a `Fetched` instruction whose operands are already resolved, performs
//! the operation, and returns the cycles it consumed.
//!
//! ## Categories
//!
//! - **load**: 8/16-bit loads, PUSH/POP, exchanges
//! - **alu**: 8/16-bit arithmetic and logic, INC/DEC, DAA/CPL/NEG/CCF/SCF
//! - **bits**: rotates, shifts, RLD/RRD, BIT/SET/RES
//! - **block**: LDI/LDD/CPI/CPD/INI/IND/OUTI/OUTD and repeating forms
//! - **control**: jumps, calls, returns, restarts, HALT, interrupt control
//! - **io**: IN/OUT

pub mod alu;
pub mod bits;
pub mod block;
pub mod control;
pub mod io;
pub mod load;

use crate::fetch::Fetched;
use crate::opcodes::Operation;
use crate::{ExecutionError, MemoryBus, CPU};

/// Dispatches a fetched instruction to its implementation.
pub(crate) fn execute<M: MemoryBus>(
    cpu: &mut CPU<M>,
    fetched: &Fetched,
) -> Result<u8, ExecutionError> {
    use Operation::*;

    match fetched.instruction.operation {
        Ld => load::execute_ld(cpu, fetched),
        Ld16 => load::execute_ld16(cpu, fetched),
        Push => load::execute_push(cpu, fetched),
        Pop => load::execute_pop(cpu, fetched),
        ExAf | ExDeHl | Exx => load::execute_exchange(cpu, fetched),
        ExSp => load::execute_ex_sp(cpu, fetched),

        Add | Adc | Sub | Sbc | Cp => alu::execute_arithmetic(cpu, fetched),
        And | Xor | Or => alu::execute_logic(cpu, fetched),
        Inc | Dec => alu::execute_inc_dec(cpu, fetched),
        Add16 | Adc16 | Sbc16 => alu::execute_arithmetic16(cpu, fetched),
        Inc16 | Dec16 => alu::execute_inc_dec16(cpu, fetched),
        Daa => alu::execute_daa(cpu, fetched),
        Cpl | Neg | Ccf | Scf => alu::execute_accumulator(cpu, fetched),

        Rlca | Rrca | Rla | Rra => bits::execute_rotate_accumulator(cpu, fetched),
        Shift(op) => bits::execute_shift(cpu, fetched, op),
        Rld | Rrd => bits::execute_rotate_digit(cpu, fetched),
        Bit(bit) => bits::execute_bit(cpu, fetched, bit),
        Res(bit) | Set(bit) => bits::execute_res_set(cpu, fetched, bit),

        Ldi | Ldir | Ldd | Lddr => block::execute_transfer(cpu, fetched),
        Cpi | Cpir | Cpd | Cpdr => block::execute_compare(cpu, fetched),
        Ini | Inir | Ind | Indr => block::execute_input(cpu, fetched),
        Outi | Otir | Outd | Otdr => block::execute_output(cpu, fetched),

        Jp => control::execute_jp(cpu, fetched),
        Jr => control::execute_jr(cpu, fetched),
        Djnz => control::execute_djnz(cpu, fetched),
        Call => control::execute_call(cpu, fetched),
        Ret | Reti | Retn => control::execute_ret(cpu, fetched),
        Rst(vector) => control::execute_rst(cpu, fetched, vector),
        Nop | Halt | Di | Ei | Im(_) => control::execute_machine(cpu, fetched),

        In => io::execute_in(cpu, fetched),
        Out => io::execute_out(cpu, fetched),
    }
}
