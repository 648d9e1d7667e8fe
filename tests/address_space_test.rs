//! Tests for the slot-based address space.
//!
//! Tests cover:
//! - Routing reads and writes to the bound component
//! - Overlap rejection leaving the space untouched
//! - Detach unbinding every slot of a component
//! - Size and base address bookkeeping
//! - Read-only components
//! - The CPU running on top of an address space
//! - Failed writes into ROM leaving flags untouched
//! - Freed table entries reused by later attaches
//! - Direct component access through handles

use libz80::{
    AddressSpace, BusError, Device, ExecutionError, Flag, MemoryBus, RamDevice, RomDevice, CPU,
};

fn setup_space() -> AddressSpace {
    let mut space = AddressSpace::new();
    space
        .attach(Box::new(RomDevice::from_bytes(0x0000, vec![0x11; 0x4000])))
        .unwrap();
    space.attach(Box::new(RamDevice::new(0x8000, 0x8000))).unwrap();
    space
}

// ========== Bookkeeping ==========

#[test]
fn test_empty_space() {
    let space = AddressSpace::new();
    assert_eq!(space.size(), 0);
    assert_eq!(space.base_address(), None);
    assert!(matches!(
        space.read(0x1234),
        Err(BusError::AddressOutOfRange { address: 0x1234, .. })
    ));
}

#[test]
fn test_size_and_base_track_components() {
    let space = setup_space();
    assert_eq!(space.size(), 0xC000);
    assert_eq!(space.base_address(), Some(0x0000));
}

#[test]
fn test_slot_of() {
    assert_eq!(AddressSpace::slot_of(0x0000), 0);
    assert_eq!(AddressSpace::slot_of(0x4FFF), 4);
    assert_eq!(AddressSpace::slot_of(0xFFFF), 15);
}

// ========== Routing ==========

#[test]
fn test_reads_and_writes_reach_components() {
    let mut space = setup_space();

    assert_eq!(space.read(0x3FFF).unwrap(), 0x11);
    space.write(0xFFFF, 0x22).unwrap();
    assert_eq!(space.read(0xFFFF).unwrap(), 0x22);
}

#[test]
fn test_unbound_gap() {
    let mut space = setup_space();
    assert!(matches!(
        space.write(0x5000, 0x00),
        Err(BusError::AddressOutOfRange {
            address: 0x5000,
            base: 0x5000,
            size: 0
        })
    ));
}

#[test]
fn test_rom_rejects_writes() {
    let mut space = setup_space();
    assert!(matches!(
        space.write(0x0010, 0x00),
        Err(BusError::ReadOnlyViolation { address: 0x0010, .. })
    ));
    assert_eq!(space.read(0x0010).unwrap(), 0x11);
}

// ========== Attach / Detach ==========

#[test]
fn test_overlap_rejected() {
    let mut space = setup_space();

    let result = space.attach(Box::new(RamDevice::new(0x3000, 0x2000)));
    assert!(matches!(
        result,
        Err(BusError::DuplicateBinding { base: 0x3000, slot: 3, .. })
    ));

    // Slot 4 stays free
    assert_eq!(space.size(), 0xC000);
    assert!(space.read(0x4000).is_err());
}

#[test]
fn test_detach_unbinds_slots() {
    let mut space = AddressSpace::new();
    let low = space.attach(Box::new(RamDevice::new(0x1000, 0x2000))).unwrap();
    space.attach(Box::new(RamDevice::new(0xC000, 0x1000))).unwrap();
    space.write(0x2FFF, 0x42).unwrap();

    let device = space.detach(low).unwrap();
    assert_eq!(device.read(0x2FFF).unwrap(), 0x42);

    assert!(matches!(
        space.read(0x1000),
        Err(BusError::AddressOutOfRange { .. })
    ));
    assert!(matches!(
        space.read(0x2FFF),
        Err(BusError::AddressOutOfRange { .. })
    ));
    assert_eq!(space.size(), 0x1000);
    assert_eq!(space.base_address(), Some(0xC000));

    // Second detach is a no-op
    assert!(space.detach(low).is_none());
}

#[test]
fn test_detach_last_component_clears_base() {
    let mut space = AddressSpace::new();
    let handle = space.attach(Box::new(RamDevice::new(0x8000, 0x1000))).unwrap();
    space.detach(handle);

    assert_eq!(space.base_address(), None);
    assert_eq!(space.size(), 0);
}

#[test]
fn test_slot_freed_by_detach_can_be_rebound() {
    let mut space = AddressSpace::new();
    let handle = space.attach(Box::new(RamDevice::new(0x8000, 0x1000))).unwrap();
    space.detach(handle);

    assert!(space.attach(Box::new(RamDevice::new(0x8000, 0x1000))).is_ok());
}

#[test]
fn test_attach_detach_cycles_reuse_table_entries() {
    let mut space = setup_space();
    assert_eq!(space.capacity(), 2);

    for _ in 0..8 {
        let handle = space.attach(Box::new(RamDevice::new(0x4000, 0x1000))).unwrap();
        space.write(0x4000, 0x5A).unwrap();
        space.detach(handle).unwrap();
    }

    assert_eq!(space.capacity(), 3);
    assert_eq!(space.size(), 0xC000);
}

#[test]
fn test_detached_entry_goes_to_next_component() {
    let mut space = AddressSpace::new();
    let first = space.attach(Box::new(RamDevice::new(0x1000, 0x1000))).unwrap();
    let kept = space.attach(Box::new(RamDevice::new(0x2000, 0x1000))).unwrap();
    space.detach(first);

    let second = space.attach(Box::new(RamDevice::new(0x3000, 0x1000))).unwrap();
    assert_eq!(second, first);
    assert_ne!(second, kept);
    assert_eq!(space.device(second).unwrap().base_address(), 0x3000);
    assert_eq!(space.capacity(), 2);
}

// ========== Component Access ==========

#[test]
fn test_device_mut_writes_visible_through_space() {
    let mut space = setup_space();
    let handle = space.attach(Box::new(RamDevice::new(0x4000, 0x1000))).unwrap();

    space.device_mut(handle).unwrap().write(0x4123, 0x99).unwrap();

    assert_eq!(space.read(0x4123).unwrap(), 0x99);
    assert_eq!(space.device(handle).unwrap().read(0x4123).unwrap(), 0x99);
}

#[test]
fn test_device_mut_on_detached_handle() {
    let mut space = AddressSpace::new();
    let handle = space.attach(Box::new(RamDevice::new(0x4000, 0x1000))).unwrap();
    space.detach(handle);

    assert!(space.device_mut(handle).is_none());
    assert!(space.device(handle).is_none());
}

#[test]
fn test_component_past_top_of_memory_rejected() {
    let mut space = AddressSpace::new();
    assert!(matches!(
        space.attach(Box::new(RamDevice::new(0xF000, 0x2000))),
        Err(BusError::AddressOutOfRange { .. })
    ));
}

// ========== CPU on an Address Space ==========

#[test]
fn test_cpu_store_into_rom_fails() {
    let mut space = AddressSpace::new();
    // LD (0x0100),A
    space
        .attach(Box::new(RomDevice::from_bytes(0x0000, vec![0x32, 0x00, 0x01])))
        .unwrap();
    let mut cpu = CPU::new(space);

    let err = cpu.step().unwrap_err();
    assert!(matches!(
        err,
        ExecutionError::Bus(BusError::ReadOnlyViolation { address: 0x0100, .. })
    ));
    assert_eq!(cpu.cycles(), 0);
}

#[test]
fn test_cpu_fetch_from_unbound_slot_fails() {
    let mut cpu = CPU::new(AddressSpace::new());
    assert!(matches!(
        cpu.step(),
        Err(ExecutionError::Bus(BusError::AddressOutOfRange { address: 0x0000, .. }))
    ));
}

// ========== Failed Writes Leave State ==========

/// CPU whose program and data both sit in ROM.
fn setup_rom_cpu(program: &[u8]) -> CPU<AddressSpace> {
    let mut rom = vec![0x7F; 0x1000];
    rom[..program.len()].copy_from_slice(program);

    let mut space = AddressSpace::new();
    space.attach(Box::new(RomDevice::from_bytes(0x0000, rom))).unwrap();
    space.attach(Box::new(RamDevice::new(0x8000, 0x1000))).unwrap();

    let mut cpu = CPU::new(space);
    cpu.registers_mut().set_hl(0x0100);
    cpu.registers_mut().set_f(0x00);
    cpu
}

#[test]
fn test_inc_into_rom_keeps_flags() {
    // INC (HL)
    let mut cpu = setup_rom_cpu(&[0x34]);

    assert!(matches!(
        cpu.step(),
        Err(ExecutionError::Bus(BusError::ReadOnlyViolation { address: 0x0100, .. }))
    ));
    assert_eq!(cpu.registers().f(), 0x00);
    assert_eq!(cpu.memory().read(0x0100).unwrap(), 0x7F);
    assert_eq!(cpu.pc(), 0x0001);
    assert_eq!(cpu.cycles(), 0);
}

#[test]
fn test_dec_indexed_into_rom_keeps_flags() {
    // DEC (IX+2)
    let mut cpu = setup_rom_cpu(&[0xDD, 0x35, 0x02]);
    cpu.registers_mut().set_ix(0x00FE);
    cpu.registers_mut().set_f(0xFF);

    assert!(cpu.step().is_err());
    assert_eq!(cpu.registers().f(), 0xFF);
    assert_eq!(cpu.pc(), 0x0003);
}

#[test]
fn test_rotate_into_rom_keeps_flags() {
    // RLC (HL)
    let mut cpu = setup_rom_cpu(&[0xCB, 0x06]);

    assert!(matches!(
        cpu.step(),
        Err(ExecutionError::Bus(BusError::ReadOnlyViolation { address: 0x0100, .. }))
    ));
    assert_eq!(cpu.registers().f(), 0x00);
    assert_eq!(cpu.pc(), 0x0002);
}

#[test]
fn test_same_instructions_succeed_in_ram() {
    // INC (HL) ; RLC (HL)
    let mut cpu = setup_rom_cpu(&[0x34, 0xCB, 0x06]);
    cpu.registers_mut().set_hl(0x8000);
    cpu.memory_mut().write(0x8000, 0x7F).unwrap();

    cpu.step().unwrap();
    assert_eq!(cpu.memory().read(0x8000).unwrap(), 0x80);
    assert!(cpu.registers().flag(Flag::ParityOverflow));

    cpu.step().unwrap();
    assert_eq!(cpu.memory().read(0x8000).unwrap(), 0x01);
    assert!(cpu.registers().carry());
}
