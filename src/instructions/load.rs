//! # Load and Exchange Instructions
//!
//! - LD (8-bit, including LD A,I and LD A,R)
//! - LD (16-bit)
//! - PUSH, POP
//! - EX AF,AF', EX DE,HL, EXX, EX (SP),HL/IX/IY

use crate::addressing::Reg8;
use crate::fetch::{Fetched, Operand};
use crate::opcodes::Operation;
use crate::registers::Flag;
use crate::{ExecutionError, MemoryBus, CPU};

/// Executes an 8-bit LD.
///
/// Loads never touch flags, except LD A,I and LD A,R which report the
/// loaded value and copy IFF2 into P/V.
pub(crate) fn execute_ld<M: MemoryBus>(
    cpu: &mut CPU<M>,
    fetched: &Fetched,
) -> Result<u8, ExecutionError> {
    let instruction = fetched.instruction;
    let value = cpu.read8(fetched.src, instruction)?;
    cpu.write8(fetched.dst, value, instruction)?;

    if let (Operand::Register(Reg8::A), Operand::Register(Reg8::I | Reg8::R)) =
        (fetched.dst, fetched.src)
    {
        let iff2 = cpu.registers.iff2;
        let regs = &mut cpu.registers;
        regs.set_result_flags(value);
        regs.set_flag(Flag::HalfCarry, false);
        regs.set_flag(Flag::Subtract, false);
        regs.set_flag(Flag::ParityOverflow, iff2);
    }

    Ok(instruction.cycles)
}

/// Executes a 16-bit LD. No flags are affected.
pub(crate) fn execute_ld16<M: MemoryBus>(
    cpu: &mut CPU<M>,
    fetched: &Fetched,
) -> Result<u8, ExecutionError> {
    let instruction = fetched.instruction;
    let value = cpu.read16(fetched.src, instruction)?;
    cpu.write16(fetched.dst, value, instruction)?;
    Ok(instruction.cycles)
}

pub(crate) fn execute_push<M: MemoryBus>(
    cpu: &mut CPU<M>,
    fetched: &Fetched,
) -> Result<u8, ExecutionError> {
    let value = cpu.read16(fetched.src, fetched.instruction)?;
    cpu.push(value)?;
    Ok(fetched.instruction.cycles)
}

pub(crate) fn execute_pop<M: MemoryBus>(
    cpu: &mut CPU<M>,
    fetched: &Fetched,
) -> Result<u8, ExecutionError> {
    let value = cpu.pop()?;
    cpu.write16(fetched.dst, value, fetched.instruction)?;
    Ok(fetched.instruction.cycles)
}

/// Executes the register-bank exchanges.
pub(crate) fn execute_exchange<M: MemoryBus>(
    cpu: &mut CPU<M>,
    fetched: &Fetched,
) -> Result<u8, ExecutionError> {
    match fetched.instruction.operation {
        Operation::ExAf => cpu.registers.exchange_af(),
        Operation::ExDeHl => cpu.registers.exchange_de_hl(),
        _ => cpu.registers.exchange_all_except_af(),
    }
    Ok(fetched.instruction.cycles)
}

/// Executes EX (SP),HL / EX (SP),IX / EX (SP),IY.
pub(crate) fn execute_ex_sp<M: MemoryBus>(
    cpu: &mut CPU<M>,
    fetched: &Fetched,
) -> Result<u8, ExecutionError> {
    let instruction = fetched.instruction;

    // dst is the stack top, src the register
    let stacked = cpu.read16(fetched.dst, instruction)?;
    let register = cpu.read16(fetched.src, instruction)?;

    cpu.write16(fetched.dst, register, instruction)?;
    cpu.write16(fetched.src, stacked, instruction)?;

    Ok(instruction.cycles)
}

#[cfg(test)]
mod tests {
    use crate::{FlatMemory, MemoryBus, CPU};

    fn setup_cpu(program: &[u8]) -> CPU<FlatMemory> {
        let mut memory = FlatMemory::new();
        memory.load(0x0000, program);
        CPU::new(memory)
    }

    #[test]
    fn test_ld_a_i_copies_iff2() {
        // LD A,I
        let mut cpu = setup_cpu(&[0xED, 0x57]);
        cpu.registers_mut().set_i(0x80);
        cpu.registers_mut().set_interrupts_enabled(true);

        assert_eq!(cpu.step().unwrap(), 9);
        assert_eq!(cpu.registers().a(), 0x80);
        assert!(cpu.registers().sign());
        assert!(cpu.registers().parity_even());
    }

    #[test]
    fn test_ld_preserves_flags() {
        // LD B,0x00
        let mut cpu = setup_cpu(&[0x06, 0x00]);
        cpu.registers_mut().set_f(0xA5);
        cpu.step().unwrap();
        assert_eq!(cpu.registers().f(), 0xA5);
    }

    #[test]
    fn test_push_pop_af() {
        // PUSH AF; POP BC
        let mut cpu = setup_cpu(&[0xF5, 0xC1]);
        cpu.registers_mut().set_sp(0x9000);
        cpu.registers_mut().set_af(0x12C5);

        assert_eq!(cpu.step().unwrap(), 11);
        assert_eq!(cpu.step().unwrap(), 10);
        assert_eq!(cpu.registers().bc(), 0x12C5);
        assert_eq!(cpu.registers().sp(), 0x9000);
    }

    #[test]
    fn test_ex_sp_hl() {
        // EX (SP),HL
        let mut cpu = setup_cpu(&[0xE3]);
        cpu.registers_mut().set_sp(0x8000);
        cpu.registers_mut().set_hl(0x1234);
        cpu.memory_mut().write_word(0x8000, 0xABCD).unwrap();

        assert_eq!(cpu.step().unwrap(), 19);
        assert_eq!(cpu.registers().hl(), 0xABCD);
        assert_eq!(cpu.memory().read_word(0x8000).unwrap(), 0x1234);
    }

    #[test]
    fn test_ld_nn_hl_ed_form() {
        // LD (0x9000),DE via ED 53
        let mut cpu = setup_cpu(&[0xED, 0x53, 0x00, 0x90]);
        cpu.registers_mut().set_de(0xBEEF);

        assert_eq!(cpu.step().unwrap(), 20);
        assert_eq!(cpu.memory().read_word(0x9000).unwrap(), 0xBEEF);
        assert_eq!(cpu.pc(), 0x0004);
    }
}
