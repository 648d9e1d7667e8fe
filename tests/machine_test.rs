//! Tests for the assembled 48K machine.
//!
//! Tests cover:
//! - ROM program filling display memory and setting the border
//! - Frame snapshots reflecting CPU writes
//! - Frame pacing budget from the configuration
//! - RAM stack use through CALL/RET
//! - Loading RAM and resetting

use libz80::{CpuConfig, MachineConfig, MemoryBus, Spectrum48};

/// ROM that fills the attribute area with 0x38, sets the border to 4 and
/// halts.
const FILL_ROM: &[u8] = &[
    0x21, 0x00, 0x58, // LD HL,0x5800
    0x11, 0x01, 0x58, // LD DE,0x5801
    0x01, 0xFF, 0x02, // LD BC,0x02FF
    0x36, 0x38, //       LD (HL),0x38
    0xED, 0xB0, //       LDIR
    0x3E, 0x04, //       LD A,0x04
    0xD3, 0xFE, //       OUT (0xFE),A
    0x76, //             HALT
];

fn setup_machine(rom: &[u8]) -> Spectrum48 {
    Spectrum48::new(rom).unwrap()
}

// ========== Display ==========

#[test]
fn test_fill_rom_paints_attributes_and_border() {
    let mut machine = setup_machine(FILL_ROM);
    machine.run_frame().unwrap();

    let frame = machine.frame();
    assert!(frame.attributes().iter().all(|&attr| attr == 0x38));
    assert!(frame.bitmap().iter().all(|&byte| byte == 0x00));
    assert_eq!(frame.border, 4);
    assert!(machine.cpu().registers().halted());
}

#[test]
fn test_frame_size() {
    let mut machine = setup_machine(&[0x76]);
    let frame = machine.frame();
    assert_eq!(frame.screen.len(), 6144 + 768);
}

// ========== Pacing ==========

#[test]
fn test_frame_budget_follows_config() {
    let config = MachineConfig {
        cpu: CpuConfig {
            clock_hz: 1_000_000,
            trace_instructions: false,
        },
        frames_per_second: 100,
    };
    let mut machine = Spectrum48::with_config(&[0x76][..], config).unwrap();

    // HALT costs 4 cycles per step, 10_000 divides evenly
    assert_eq!(machine.run_frame().unwrap(), 10_000);
    assert_eq!(machine.cpu().cycles(), 10_000);
}

// ========== RAM ==========

#[test]
fn test_call_uses_ram_stack() {
    let rom = [
        0x31, 0x00, 0x00, // LD SP,0x0000
        0xCD, 0x08, 0x00, // CALL 0x0008
        0x76, //             HALT
        0x00, //             NOP
        0x3E, 0x07, //       LD A,0x07
        0xC9, //             RET
    ];
    let mut machine = setup_machine(&rom);

    for _ in 0..5 {
        machine.execute().unwrap();
    }

    assert_eq!(machine.cpu().registers().a(), 0x07);
    assert_eq!(machine.cpu().registers().sp(), 0x0000);
    assert_eq!(machine.cpu().memory().read_word(0xFFFE).unwrap(), 0x0006);
    assert!(machine.cpu().registers().halted());
}

#[test]
fn test_load_ram_and_reset() {
    let mut machine = setup_machine(&[0xC3, 0x00, 0x80]);
    // INC A ; HALT
    machine.cpu_mut().memory_mut().write(0x8000, 0x3C).unwrap();
    machine.cpu_mut().memory_mut().write(0x8001, 0x76).unwrap();
    machine.cpu_mut().registers_mut().set_a(0x00);

    for _ in 0..3 {
        machine.execute().unwrap();
    }
    assert_eq!(machine.cpu().registers().a(), 0x01);

    machine.cpu_mut().reset();
    assert_eq!(machine.cpu().pc(), 0x0000);
    assert_eq!(machine.cpu().cycles(), 0);
    assert!(!machine.cpu().registers().halted());
    assert_eq!(machine.cpu().memory().read(0x8000).unwrap(), 0x3C);
}
