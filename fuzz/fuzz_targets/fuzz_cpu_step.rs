//! Fuzz target for CPU step execution.
//!
//! This target creates arbitrary register states and memory contents,
//! then executes a few instructions. Errors are fine; panics are not.

#![no_main]

use arbitrary::Arbitrary;
use libz80::{FlatMemory, CPU};
use libfuzzer_sys::fuzz_target;

/// Arbitrary register file for fuzzing
#[derive(Debug, Arbitrary)]
struct FuzzCpuState {
    af: u16,
    bc: u16,
    de: u16,
    hl: u16,
    ix: u16,
    iy: u16,
    sp: u16,
    i: u8,
    r: u8,
    interrupts_enabled: bool,
    exchange_banks: bool,
}

/// Memory region for fuzzing
#[derive(Debug, Arbitrary)]
struct FuzzMemory {
    /// Bytes at the PC location: prefixes, displacement, opcode, operands
    instruction_bytes: [u8; 4],
    /// Contents around whatever HL, IX and IY point at
    data: [u8; 256],
}

/// Complete fuzz input
#[derive(Debug, Arbitrary)]
struct FuzzInput {
    cpu_state: FuzzCpuState,
    memory: FuzzMemory,
    pc: u16,
    steps: u8,
}

fuzz_target!(|input: FuzzInput| {
    let mut memory = FlatMemory::new();
    memory.load(input.pc, &input.memory.instruction_bytes);

    let state = &input.cpu_state;
    for base in [state.hl, state.ix, state.iy, state.sp] {
        memory.load(base.wrapping_sub(128), &input.memory.data);
    }

    let mut cpu = CPU::new(memory);
    let regs = cpu.registers_mut();
    regs.set_af(state.af);
    regs.set_bc(state.bc);
    regs.set_de(state.de);
    regs.set_hl(state.hl);
    regs.set_ix(state.ix);
    regs.set_iy(state.iy);
    regs.set_sp(state.sp);
    regs.set_i(state.i);
    regs.set_r(state.r);
    regs.set_interrupts_enabled(state.interrupts_enabled);
    regs.set_pc(input.pc);
    if state.exchange_banks {
        regs.exchange_af();
        regs.exchange_all_except_af();
    }

    for _ in 0..=(input.steps % 8) {
        let before = cpu.cycles();
        match cpu.step() {
            // Every completed instruction costs at least 4 cycles
            Ok(cycles) => {
                assert!(cycles >= 4);
                assert_eq!(cpu.cycles(), before + cycles as u64);
            }
            Err(_) => {
                assert_eq!(cpu.cycles(), before);
                break;
            }
        }
    }

    // The preview path must never panic either
    let _ = cpu.preview(cpu.pc());
    let _ = cpu.dump();
});
