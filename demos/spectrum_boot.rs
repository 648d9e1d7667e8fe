//! Boots a 48K machine and runs a few frames.
//!
//! Usage:
//!
//! ```text
//! cargo run --example spectrum_boot -- path/to/48.rom [frames]
//! ```
//!
//! Without a ROM path a small built-in program is used: it paints a stripe
//! of attribute bytes, cycles the border colour, then halts.

use std::env;
use std::error::Error;
use std::fs::File;

use libz80::{MachineError, Spectrum48};

/// Built-in stand-in ROM.
const DEMO_ROM: &[u8] = &[
    0x21, 0x00, 0x58, //       LD HL,0x5800
    0x06, 0x20, //             LD B,0x20
    0x36, 0x38, //       loop: LD (HL),0x38
    0x23, //                   INC HL
    0x10, 0xFB, //             DJNZ loop
    0x3E, 0x07, //             LD A,0x07
    0xD3, 0xFE, //     border: OUT (0xFE),A
    0x3D, //                   DEC A
    0x20, 0xFB, //             JR NZ,border
    0x76, //                   HALT
];

fn boot(path: Option<&str>) -> Result<Spectrum48, MachineError> {
    match path {
        Some(path) => {
            let file = File::open(path).map_err(|e| MachineError::Io(e.to_string()))?;
            Spectrum48::new(file)
        }
        None => Spectrum48::new(DEMO_ROM),
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let args: Vec<String> = env::args().collect();
    let rom_path = args.get(1).map(String::as_str);
    let frames: u32 = match args.get(2) {
        Some(count) => count.parse()?,
        None => 5,
    };

    println!("Z80 48K Machine");
    println!("===============\n");

    let mut machine = boot(rom_path)?;
    println!(
        "Clock {} Hz, {} frames/s, {} cycles per frame\n",
        machine.clock_hz(),
        machine.frames_per_second(),
        machine.config().cycles_per_frame()
    );

    println!("First instructions:");
    let mut address = machine.cpu().pc();
    for _ in 0..8 {
        match machine.cpu().disassemble_at(address) {
            Ok(line) => {
                println!("  {}", line.render());
                address = address.wrapping_add(line.bytes.len() as u16);
            }
            Err(err) => {
                println!("  0x{:04X}  {}", address, err);
                break;
            }
        }
    }
    println!();

    for frame_number in 0..frames {
        let cycles = machine.run_frame()?;
        let frame = machine.frame();
        let lit = frame.attributes().iter().filter(|&&attr| attr != 0).count();

        println!(
            "Frame {}: {} cycles, border {}, {} attribute cells set, PC=0x{:04X}",
            frame_number,
            cycles,
            frame.border,
            lit,
            machine.cpu().pc()
        );
    }

    println!("\nFinal state:");
    println!("  {}", machine.cpu().dump());

    Ok(())
}
