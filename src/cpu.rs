//! # CPU State and Execution
//!
//! This module contains the `CPU` struct, which owns the register file, the
//! memory bus, the port bus and a reference to the shared decode tables, and
//! drives fetch → decode → execute.
//!
//! ## Execution Model
//!
//! - `step()`: execute exactly one instruction and return its cycle cost
//! - `run_for_cycles()`: step until a cycle budget is used up
//! - `preview()`: decode at any address without touching state
//!
//! There is no state carried between steps other than the registers and
//! memory: a step either completes or returns an error, leaving PC after
//! whatever bytes it had consumed.
//!
//! ## Arithmetic Primitives
//!
//! `add_with_carry`, `sub_with_carry` and their 16-bit counterparts compute
//! a result and the full flag byte. Subtraction is addition of the one's
//! complement with the carry-in inverted, followed by inverting carry and
//! recomputing half-carry from the original operands.

use std::fmt::Write as _;

use crate::config::CpuConfig;
use crate::disassembler::{Disassembly, LogTracer, Tracer};
use crate::fetch::{self, Cursor, Fetched, Operand};
use crate::instructions;
use crate::io::{DetachedIo, IoBus};
use crate::memory::MemoryBus;
use crate::opcodes::{decode_tables, DecodeTables, Instruction};
use crate::registers::{Flag, Registers};
use crate::ExecutionError;

/// Cycles spent per step while halted.
const HALT_CYCLES: u8 = 4;

/// Z80 processor state and execution context.
///
/// # Type Parameters
///
/// * `M` - Memory bus implementation
///
/// # Examples
///
/// ```
/// use libz80::{FlatMemory, CPU};
///
/// let mut memory = FlatMemory::new();
/// memory.load(0x0000, &[0xC3, 0xCD, 0xAB]); // JP 0xABCD
///
/// let mut cpu = CPU::new(memory);
/// assert_eq!(cpu.step().unwrap(), 10);
/// assert_eq!(cpu.pc(), 0xABCD);
/// ```
pub struct CPU<M: MemoryBus> {
    pub(crate) registers: Registers,

    /// Total cycles executed
    pub(crate) cycles: u64,

    pub(crate) memory: M,

    /// Port space for IN/OUT
    pub(crate) io: Box<dyn IoBus>,

    tables: &'static DecodeTables,
    config: CpuConfig,
    tracer: Option<Box<dyn Tracer>>,
}

impl<M: MemoryBus> CPU<M> {
    /// Creates a CPU in its power-on state with nothing on the port bus.
    pub fn new(memory: M) -> Self {
        Self::with_config(memory, Box::new(DetachedIo), CpuConfig::default())
    }

    /// Creates a CPU wired to a port bus.
    pub fn with_io(memory: M, io: Box<dyn IoBus>) -> Self {
        Self::with_config(memory, io, CpuConfig::default())
    }

    /// Creates a CPU with explicit settings.
    ///
    /// With `trace_instructions` set, a `LogTracer` is installed.
    pub fn with_config(memory: M, io: Box<dyn IoBus>, config: CpuConfig) -> Self {
        let tracer: Option<Box<dyn Tracer>> = if config.trace_instructions {
            Some(Box::new(LogTracer))
        } else {
            None
        };

        Self {
            registers: Registers::new(),
            cycles: 0,
            memory,
            io,
            tables: decode_tables(),
            config,
            tracer,
        }
    }

    /// Return to the power-on register state. Memory is left alone.
    pub fn reset(&mut self) {
        self.registers = Registers::new();
        self.cycles = 0;
    }

    /// Executes one instruction.
    ///
    /// 1. Decode at PC, consuming prefixes, displacement and operand bytes
    /// 2. Latch the opcode and advance the refresh counter
    /// 3. Hand the instruction to its category module
    ///
    /// Returns the cycles consumed. While halted, no fetch happens and each
    /// call costs 4 cycles.
    ///
    /// # Errors
    ///
    /// - `ExecutionError::UnknownOpcode` when no table has an entry
    /// - `ExecutionError::Bus` when a memory access fails
    ///
    /// PC is left after the bytes consumed before the failure.
    pub fn step(&mut self) -> Result<u8, ExecutionError> {
        if self.registers.halted {
            self.registers.advance_refresh(1);
            self.cycles += HALT_CYCLES as u64;
            return Ok(HALT_CYCLES);
        }

        let mut cursor = Cursor::new(&self.memory, self.registers.pc);
        let fetched = fetch::fetch(self.tables, &self.registers, &mut cursor);
        self.registers.pc = cursor.address();

        let fetched = match fetched {
            Ok(fetched) => fetched,
            Err(err) => {
                if let ExecutionError::UnknownOpcode { .. } = err {
                    log::warn!("{} before 0x{:04X}", err, self.registers.pc);
                }
                return Err(err);
            }
        };

        self.registers.ir = fetched.instruction.opcode;
        self.registers.advance_refresh(fetched.refresh_count());

        if let Some(tracer) = self.tracer.as_mut() {
            tracer.trace(&Disassembly::capture(&fetched, &self.memory));
        }

        let cycles = instructions::execute(self, &fetched)?;
        self.cycles += cycles as u64;
        Ok(cycles)
    }

    /// Decodes the instruction at `address` without changing any state.
    ///
    /// Operands are resolved against the current registers exactly as
    /// `step` would resolve them.
    pub fn preview(&self, address: u16) -> Result<Fetched, ExecutionError> {
        let mut cursor = Cursor::new(&self.memory, address);
        fetch::fetch(self.tables, &self.registers, &mut cursor)
    }

    /// Renders the instruction at `address` for diagnostics.
    pub fn disassemble_at(&self, address: u16) -> Result<Disassembly, ExecutionError> {
        let fetched = self.preview(address)?;
        Ok(Disassembly::capture(&fetched, &self.memory))
    }

    /// Runs until at least `cycle_budget` cycles have elapsed.
    ///
    /// Returns the cycles actually consumed, which can overshoot the budget
    /// by up to one instruction.
    pub fn run_for_cycles(&mut self, cycle_budget: u64) -> Result<u64, ExecutionError> {
        let start_cycles = self.cycles;
        let target_cycles = start_cycles + cycle_budget;

        while self.cycles < target_cycles {
            self.step()?;
        }

        Ok(self.cycles - start_cycles)
    }

    /// Installs or removes the per-instruction diagnostic sink.
    pub fn set_tracer(&mut self, tracer: Option<Box<dyn Tracer>>) {
        self.tracer = tracer;
    }

    // ========== State Access ==========

    pub fn registers(&self) -> &Registers {
        &self.registers
    }

    pub fn registers_mut(&mut self) -> &mut Registers {
        &mut self.registers
    }

    /// Returns the program counter.
    pub fn pc(&self) -> u16 {
        self.registers.pc
    }

    /// Returns the total number of cycles executed since creation or reset.
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    pub fn memory(&self) -> &M {
        &self.memory
    }

    pub fn memory_mut(&mut self) -> &mut M {
        &mut self.memory
    }

    pub fn config(&self) -> &CpuConfig {
        &self.config
    }

    /// One-line register summary.
    pub fn dump(&self) -> String {
        let r = &self.registers;
        let mut out = String::new();
        let _ = write!(
            out,
            "AF={:04X} BC={:04X} DE={:04X} HL={:04X} IX={:04X} IY={:04X} SP={:04X} PC={:04X} \
             AF'={:04X} BC'={:04X} DE'={:04X} HL'={:04X} I={:02X} R={:02X} IFF={}{} IM{} ",
            r.af(),
            r.bc(),
            r.de(),
            r.hl(),
            r.ix,
            r.iy,
            r.sp,
            r.pc,
            r.af_alt(),
            r.bc_alt(),
            r.de_alt(),
            r.hl_alt(),
            r.i,
            r.r,
            r.iff1 as u8,
            r.iff2 as u8,
            r.interrupt_mode
        );
        for (flag, name) in [
            (Flag::Sign, 'S'),
            (Flag::Zero, 'Z'),
            (Flag::Bit5, '5'),
            (Flag::HalfCarry, 'H'),
            (Flag::Bit3, '3'),
            (Flag::ParityOverflow, 'P'),
            (Flag::Subtract, 'N'),
            (Flag::Carry, 'C'),
        ] {
            out.push(if r.flag(flag) { name } else { '-' });
        }
        out
    }

    // ========== Arithmetic Primitives ==========

    /// `a + b + carry`, setting S, Z, H, P/V (overflow), N=0, C and the
    /// undocumented bits from the result.
    pub fn add_with_carry(&mut self, a: u8, b: u8, carry: bool) -> u8 {
        let c = carry as u8;
        let wide = a as u16 + b as u16 + c as u16;
        let result = wide as u8;

        let regs = &mut self.registers;
        regs.set_result_flags(result);
        regs.set_flag(Flag::HalfCarry, (a & 0x0F) + (b & 0x0F) + c > 0x0F);
        regs.set_flag(
            Flag::ParityOverflow,
            (a ^ b) & 0x80 == 0 && (a ^ result) & 0x80 != 0,
        );
        regs.set_flag(Flag::Subtract, false);
        regs.set_flag(Flag::Carry, wide > 0xFF);

        result
    }

    /// `a - b - carry` as `a + !b + !carry`, with carry inverted to mean
    /// borrow and half-carry taken from the original operands. N=1.
    pub fn sub_with_carry(&mut self, a: u8, b: u8, carry: bool) -> u8 {
        let result = self.add_with_carry(a, !b, !carry);

        let regs = &mut self.registers;
        let borrow = !regs.flag(Flag::Carry);
        regs.set_flag(Flag::Carry, borrow);
        regs.set_flag(Flag::HalfCarry, (a & 0x0F) < (b & 0x0F) + carry as u8);
        regs.set_flag(Flag::Subtract, true);

        result
    }

    /// 16-bit `a + b + carry`. Half-carry comes out of bit 11; S and the
    /// undocumented bits come from the high byte of the result.
    pub fn add_with_carry16(&mut self, a: u16, b: u16, carry: bool) -> u16 {
        let c = carry as u32;
        let wide = a as u32 + b as u32 + c;
        let result = wide as u16;
        let high = (result >> 8) as u8;

        let regs = &mut self.registers;
        regs.set_sign_from(high);
        regs.set_flag(Flag::Zero, result == 0);
        regs.set_undocumented_from(high);
        regs.set_flag(
            Flag::HalfCarry,
            (a & 0x0FFF) as u32 + (b & 0x0FFF) as u32 + c > 0x0FFF,
        );
        regs.set_flag(
            Flag::ParityOverflow,
            (a ^ b) & 0x8000 == 0 && (a ^ result) & 0x8000 != 0,
        );
        regs.set_flag(Flag::Subtract, false);
        regs.set_flag(Flag::Carry, wide > 0xFFFF);

        result
    }

    /// 16-bit `a - b - carry`, the complement-and-invert counterpart of
    /// `add_with_carry16`.
    pub fn sub_with_carry16(&mut self, a: u16, b: u16, carry: bool) -> u16 {
        let result = self.add_with_carry16(a, !b, !carry);

        let regs = &mut self.registers;
        let borrow = !regs.flag(Flag::Carry);
        regs.set_flag(Flag::Carry, borrow);
        regs.set_flag(
            Flag::HalfCarry,
            (a & 0x0FFF) < (b & 0x0FFF) + carry as u16,
        );
        regs.set_flag(Flag::Subtract, true);

        result
    }

    // ========== Operand Access ==========

    pub(crate) fn read8(&self, operand: Operand, instruction: &Instruction) -> Result<u8, ExecutionError> {
        match operand {
            Operand::Register(reg) => Ok(self.registers.get8(reg)),
            Operand::Memory(address) => Ok(self.memory.read(address)?),
            Operand::Immediate(value) => Ok(value),
            other => Err(unsupported(instruction, other)),
        }
    }

    pub(crate) fn write8(
        &mut self,
        operand: Operand,
        value: u8,
        instruction: &Instruction,
    ) -> Result<(), ExecutionError> {
        match operand {
            Operand::Register(reg) => {
                self.registers.set8(reg, value);
                Ok(())
            }
            Operand::Memory(address) => Ok(self.memory.write(address, value)?),
            other => Err(unsupported(instruction, other)),
        }
    }

    pub(crate) fn read16(&self, operand: Operand, instruction: &Instruction) -> Result<u16, ExecutionError> {
        match operand {
            Operand::RegisterPair(pair) => Ok(self.registers.get16(pair)),
            Operand::Memory(address) => Ok(self.memory.read_word(address)?),
            Operand::ImmediateWord(value) => Ok(value),
            other => Err(unsupported(instruction, other)),
        }
    }

    pub(crate) fn write16(
        &mut self,
        operand: Operand,
        value: u16,
        instruction: &Instruction,
    ) -> Result<(), ExecutionError> {
        match operand {
            Operand::RegisterPair(pair) => {
                self.registers.set16(pair, value);
                Ok(())
            }
            Operand::Memory(address) => Ok(self.memory.write_word(address, value)?),
            other => Err(unsupported(instruction, other)),
        }
    }

    /// Jump target: an immediate word or the address inside `(HL)`-style
    /// operands.
    pub(crate) fn target(&self, operand: Operand, instruction: &Instruction) -> Result<u16, ExecutionError> {
        match operand {
            Operand::ImmediateWord(address) | Operand::Memory(address) => Ok(address),
            other => Err(unsupported(instruction, other)),
        }
    }

    pub(crate) fn port(&self, operand: Operand, instruction: &Instruction) -> Result<u16, ExecutionError> {
        match operand {
            Operand::Port(port) => Ok(port),
            other => Err(unsupported(instruction, other)),
        }
    }

    pub(crate) fn push(&mut self, value: u16) -> Result<(), ExecutionError> {
        let sp = self.registers.sp.wrapping_sub(2);
        self.memory.write_word(sp, value)?;
        self.registers.sp = sp;
        Ok(())
    }

    pub(crate) fn pop(&mut self) -> Result<u16, ExecutionError> {
        let value = self.memory.read_word(self.registers.sp)?;
        self.registers.sp = self.registers.sp.wrapping_add(2);
        Ok(value)
    }
}

pub(crate) fn unsupported(instruction: &Instruction, operand: Operand) -> ExecutionError {
    ExecutionError::UnsupportedAddressingMode {
        mnemonic: instruction.mnemonic,
        operand,
    }
}
