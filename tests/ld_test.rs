//! Tests for 8-bit and 16-bit load instructions.
//!
//! Each test stores a value with one form and reads it back with the
//! matching form, checking the memory image in between.
//!
//! Tests cover:
//! - (BC), (DE) and (nn) with the accumulator
//! - (HL) with general registers
//! - Indexed loads with positive and negative displacements
//! - 16-bit (nn) loads, base and ED-prefixed
//! - SP loads from HL and IX
//! - Loads leave flags alone

use libz80::{FlatMemory, MemoryBus, CPU};

fn setup_cpu(program: &[u8]) -> CPU<FlatMemory> {
    let mut memory = FlatMemory::new();
    memory.load(0x0000, program);
    let mut cpu = CPU::new(memory);
    cpu.registers_mut().set_f(0x00);
    cpu
}

fn run(cpu: &mut CPU<FlatMemory>, steps: usize) -> u64 {
    let start = cpu.cycles();
    for _ in 0..steps {
        cpu.step().unwrap();
    }
    cpu.cycles() - start
}

// ========== Accumulator Indirect ==========

#[test]
fn test_ld_bc_indirect_round_trip() {
    // LD (BC),A ; LD A,0 ; LD A,(BC)
    let mut cpu = setup_cpu(&[0x02, 0x3E, 0x00, 0x0A]);
    cpu.registers_mut().set_bc(0x9000);
    cpu.registers_mut().set_a(0x42);

    assert_eq!(run(&mut cpu, 3), 7 + 7 + 7);
    assert_eq!(cpu.memory().read(0x9000).unwrap(), 0x42);
    assert_eq!(cpu.registers().a(), 0x42);
}

#[test]
fn test_ld_de_indirect_round_trip() {
    // LD (DE),A ; LD A,0 ; LD A,(DE)
    let mut cpu = setup_cpu(&[0x12, 0x3E, 0x00, 0x1A]);
    cpu.registers_mut().set_de(0xA123);
    cpu.registers_mut().set_a(0x99);

    run(&mut cpu, 3);
    assert_eq!(cpu.memory().read(0xA123).unwrap(), 0x99);
    assert_eq!(cpu.registers().a(), 0x99);
}

#[test]
fn test_ld_extended_accumulator() {
    // LD (0x5C00),A ; LD A,0 ; LD A,(0x5C00)
    let mut cpu = setup_cpu(&[0x32, 0x00, 0x5C, 0x3E, 0x00, 0x3A, 0x00, 0x5C]);
    cpu.registers_mut().set_a(0x7E);

    assert_eq!(run(&mut cpu, 3), 13 + 7 + 13);
    assert_eq!(cpu.memory().read(0x5C00).unwrap(), 0x7E);
    assert_eq!(cpu.registers().a(), 0x7E);
    assert_eq!(cpu.registers().f(), 0x00);
}

// ========== (HL) ==========

#[test]
fn test_ld_hl_indirect_register() {
    // LD (HL),B ; LD C,(HL)
    let mut cpu = setup_cpu(&[0x70, 0x4E]);
    cpu.registers_mut().set_hl(0x8800);
    cpu.registers_mut().set_b(0x5A);

    assert_eq!(run(&mut cpu, 2), 14);
    assert_eq!(cpu.memory().read(0x8800).unwrap(), 0x5A);
    assert_eq!(cpu.registers().c(), 0x5A);
}

#[test]
fn test_ld_hl_indirect_immediate() {
    // LD (HL),0x3C
    let mut cpu = setup_cpu(&[0x36, 0x3C]);
    cpu.registers_mut().set_hl(0x8000);

    assert_eq!(run(&mut cpu, 1), 10);
    assert_eq!(cpu.memory().read(0x8000).unwrap(), 0x3C);
}

// ========== Indexed ==========

#[test]
fn test_ld_ix_displacement_round_trip() {
    // LD (IX+5),A ; LD B,(IX+5)
    let mut cpu = setup_cpu(&[0xDD, 0x77, 0x05, 0xDD, 0x46, 0x05]);
    cpu.registers_mut().set_ix(0x9000);
    cpu.registers_mut().set_a(0xC3);

    assert_eq!(run(&mut cpu, 2), 38);
    assert_eq!(cpu.memory().read(0x9005).unwrap(), 0xC3);
    assert_eq!(cpu.registers().b(), 0xC3);
    assert_eq!(cpu.pc(), 0x0006);
}

#[test]
fn test_ld_iy_negative_displacement() {
    // LD (IY-2),0x81 ; LD A,(IY-2)
    let mut cpu = setup_cpu(&[0xFD, 0x36, 0xFE, 0x81, 0xFD, 0x7E, 0xFE]);
    cpu.registers_mut().set_iy(0x9000);

    run(&mut cpu, 2);
    assert_eq!(cpu.memory().read(0x8FFE).unwrap(), 0x81);
    assert_eq!(cpu.registers().a(), 0x81);
    assert_eq!(cpu.pc(), 0x0007);
}

// ========== 16-bit Extended ==========

#[test]
fn test_ld_hl_extended_round_trip() {
    // LD (0x9000),HL ; LD HL,0 ; LD HL,(0x9000)
    let mut cpu = setup_cpu(&[0x22, 0x00, 0x90, 0x21, 0x00, 0x00, 0x2A, 0x00, 0x90]);
    cpu.registers_mut().set_hl(0xBEEF);

    assert_eq!(run(&mut cpu, 3), 16 + 10 + 16);
    assert_eq!(cpu.memory().read(0x9000).unwrap(), 0xEF);
    assert_eq!(cpu.memory().read(0x9001).unwrap(), 0xBE);
    assert_eq!(cpu.registers().hl(), 0xBEEF);
}

#[test]
fn test_ld_ed_pair_extended() {
    // LD (0x9100),BC ; LD DE,(0x9100)
    let mut cpu = setup_cpu(&[0xED, 0x43, 0x00, 0x91, 0xED, 0x5B, 0x00, 0x91]);
    cpu.registers_mut().set_bc(0x1234);

    assert_eq!(run(&mut cpu, 2), 40);
    assert_eq!(cpu.registers().de(), 0x1234);
}

#[test]
fn test_ld_index_extended() {
    // LD (0x9200),IX ; LD IY,(0x9200)
    let mut cpu = setup_cpu(&[0xDD, 0x22, 0x00, 0x92, 0xFD, 0x2A, 0x00, 0x92]);
    cpu.registers_mut().set_ix(0xCAFE);

    assert_eq!(run(&mut cpu, 2), 40);
    assert_eq!(cpu.registers().iy(), 0xCAFE);
}

// ========== Stack Pointer ==========

#[test]
fn test_ld_sp_from_hl_and_ix() {
    // LD SP,HL ; LD SP,IX
    let mut cpu = setup_cpu(&[0xF9, 0xDD, 0xF9]);
    cpu.registers_mut().set_hl(0x8000);
    cpu.registers_mut().set_ix(0x7000);

    assert_eq!(cpu.step().unwrap(), 6);
    assert_eq!(cpu.registers().sp(), 0x8000);
    assert_eq!(cpu.step().unwrap(), 10);
    assert_eq!(cpu.registers().sp(), 0x7000);
}

// ========== Register to Register ==========

#[test]
fn test_ld_register_copy_leaves_flags() {
    // LD D,E
    let mut cpu = setup_cpu(&[0x53]);
    cpu.registers_mut().set_e(0x00);
    cpu.registers_mut().set_d(0xFF);
    cpu.registers_mut().set_f(0xA5);

    assert_eq!(cpu.step().unwrap(), 4);
    assert_eq!(cpu.registers().d(), 0x00);
    assert_eq!(cpu.registers().f(), 0xA5);
}
