//! Basic disassembler usage example

use libz80::{disassemble, DisassemblyOptions};

fn main() {
    // Clear the screen and set a blue border
    let code = &[
        0x21, 0x00, 0x40, // LD HL,0x4000
        0x11, 0x01, 0x40, // LD DE,0x4001
        0x01, 0xFF, 0x1A, // LD BC,0x1AFF
        0x36, 0x00, //       LD (HL),0x00
        0xED, 0xB0, //       LDIR
        0x3E, 0x01, //       LD A,0x01
        0xD3, 0xFE, //       OUT (0xFE),A
        0xDD, 0xCB, 0x05, 0xC6, // SET 0,(IX+0x05)
        0x18, 0xFE, //       JR 0x8015
    ];

    let options = DisassemblyOptions {
        start_address: 0x8000,
        ..Default::default()
    };

    println!("Disassembled code:");
    for line in disassemble(code, options) {
        println!("{}", line.render());
    }
}
