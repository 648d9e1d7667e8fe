//! Tests for the carry-aware arithmetic primitives and the ALU
//! instructions built on them.
//!
//! Tests cover:
//! - Exhaustive add/subtract table over the edge-case operand set
//! - Flag results for overflow, half-carry and borrow
//! - 16-bit ADC/SBC through HL
//! - ALU forms reading (HL) and (IX+d)

use libz80::{Flag, FlatMemory, MemoryBus, CPU};

/// Operands that sit on every carry, sign and overflow boundary
const EDGE_VALUES: [u8; 6] = [0x00, 0x01, 0x7F, 0x80, 0x81, 0xFF];

fn setup_cpu() -> CPU<FlatMemory> {
    let mut cpu = CPU::new(FlatMemory::new());
    cpu.registers_mut().set_f(0x00);
    cpu
}

// ========== Exhaustive Table ==========

#[test]
fn test_add_with_carry_table() {
    let mut cpu = setup_cpu();

    for &a in &EDGE_VALUES {
        for &b in &EDGE_VALUES {
            for carry in [false, true] {
                let expected = (a as u16 + b as u16 + carry as u16) as u8;
                let result = cpu.add_with_carry(a, b, carry);
                assert_eq!(result, expected, "{:02X} + {:02X} + {}", a, b, carry as u8);

                let wide = a as u16 + b as u16 + carry as u16;
                assert_eq!(cpu.registers().carry(), wide > 0xFF);
                assert_eq!(cpu.registers().zero(), expected == 0);
                assert!(!cpu.registers().subtract());
            }
        }
    }
}

#[test]
fn test_sub_with_carry_table() {
    let mut cpu = setup_cpu();

    for &a in &EDGE_VALUES {
        for &b in &EDGE_VALUES {
            for carry in [false, true] {
                let expected = a.wrapping_sub(b).wrapping_sub(carry as u8);
                let result = cpu.sub_with_carry(a, b, carry);
                assert_eq!(result, expected, "{:02X} - {:02X} - {}", a, b, carry as u8);

                let borrow = (a as i16 - b as i16 - carry as i16) < 0;
                assert_eq!(cpu.registers().carry(), borrow);
                assert_eq!(cpu.registers().sign(), expected & 0x80 != 0);
                assert!(cpu.registers().subtract());
            }
        }
    }
}

#[test]
fn test_signed_overflow_table() {
    let mut cpu = setup_cpu();

    for &a in &EDGE_VALUES {
        for &b in &EDGE_VALUES {
            cpu.add_with_carry(a, b, false);
            let signed = a as i8 as i16 + b as i8 as i16;
            assert_eq!(
                cpu.registers().flag(Flag::ParityOverflow),
                !(-128..=127).contains(&signed),
                "{:02X} + {:02X}",
                a,
                b
            );

            cpu.sub_with_carry(a, b, false);
            let signed = a as i8 as i16 - b as i8 as i16;
            assert_eq!(
                cpu.registers().flag(Flag::ParityOverflow),
                !(-128..=127).contains(&signed),
                "{:02X} - {:02X}",
                a,
                b
            );
        }
    }
}

// ========== Instruction Forms ==========

#[test]
fn test_add_a_b() {
    let mut cpu = setup_cpu();
    // LD A,0x05 ; LD B,0x03 ; ADD A,B
    cpu.memory_mut().load(0x0000, &[0x3E, 0x05, 0x06, 0x03, 0x80]);

    assert_eq!(cpu.run_for_cycles(18).unwrap(), 18);
    assert_eq!(cpu.registers().a(), 0x08);
    assert_eq!(cpu.pc(), 0x0005);
}

#[test]
fn test_adc_uses_carry() {
    let mut cpu = setup_cpu();
    // ADC A,0x10
    cpu.memory_mut().load(0x0000, &[0xCE, 0x10]);
    cpu.registers_mut().set_a(0x01);
    cpu.registers_mut().set_flag(Flag::Carry, true);

    assert_eq!(cpu.step().unwrap(), 7);
    assert_eq!(cpu.registers().a(), 0x12);
    assert!(!cpu.registers().carry());
}

#[test]
fn test_sbc_memory() {
    let mut cpu = setup_cpu();
    // SBC A,(HL)
    cpu.memory_mut().load(0x0000, &[0x9E]);
    cpu.memory_mut().write(0x9000, 0x01).unwrap();
    cpu.registers_mut().set_hl(0x9000);
    cpu.registers_mut().set_a(0x00);
    cpu.registers_mut().set_flag(Flag::Carry, true);

    assert_eq!(cpu.step().unwrap(), 7);
    assert_eq!(cpu.registers().a(), 0xFE);
    assert!(cpu.registers().carry());
    assert!(cpu.registers().sign());
}

#[test]
fn test_sub_indexed() {
    let mut cpu = setup_cpu();
    // SUB (IX-1)
    cpu.memory_mut().load(0x0000, &[0xDD, 0x96, 0xFF]);
    cpu.memory_mut().write(0x8FFF, 0x20).unwrap();
    cpu.registers_mut().set_ix(0x9000);
    cpu.registers_mut().set_a(0x20);

    assert_eq!(cpu.step().unwrap(), 19);
    assert_eq!(cpu.registers().a(), 0x00);
    assert!(cpu.registers().zero());
    assert_eq!(cpu.pc(), 0x0003);
}

#[test]
fn test_or_and_xor_flags() {
    let mut cpu = setup_cpu();
    // OR 0x80 ; AND 0x00 ; XOR 0x03
    cpu.memory_mut().load(0x0000, &[0xF6, 0x80, 0xE6, 0x00, 0xEE, 0x03]);
    cpu.registers_mut().set_a(0x01);

    cpu.step().unwrap();
    assert_eq!(cpu.registers().a(), 0x81);
    assert!(cpu.registers().sign());
    assert!(cpu.registers().parity_even());

    cpu.step().unwrap();
    assert!(cpu.registers().zero());
    assert!(cpu.registers().half_carry());

    cpu.step().unwrap();
    assert_eq!(cpu.registers().a(), 0x03);
    assert!(!cpu.registers().half_carry());
    assert!(cpu.registers().parity_even());
}

// ========== 16-bit ==========

#[test]
fn test_adc_hl_overflow() {
    let mut cpu = setup_cpu();
    // ADC HL,DE
    cpu.memory_mut().load(0x0000, &[0xED, 0x5A]);
    cpu.registers_mut().set_hl(0x7FFF);
    cpu.registers_mut().set_de(0x0000);
    cpu.registers_mut().set_flag(Flag::Carry, true);

    assert_eq!(cpu.step().unwrap(), 15);
    assert_eq!(cpu.registers().hl(), 0x8000);
    assert!(cpu.registers().flag(Flag::ParityOverflow));
    assert!(cpu.registers().sign());
    assert!(cpu.registers().half_carry());
}

#[test]
fn test_add_ix_sp() {
    let mut cpu = setup_cpu();
    // ADD IX,SP
    cpu.memory_mut().load(0x0000, &[0xDD, 0x39]);
    cpu.registers_mut().set_ix(0x1000);
    cpu.registers_mut().set_sp(0x2000);

    assert_eq!(cpu.step().unwrap(), 15);
    assert_eq!(cpu.registers().ix(), 0x3000);
    assert!(!cpu.registers().carry());
}
