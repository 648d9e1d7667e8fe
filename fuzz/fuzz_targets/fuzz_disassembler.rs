//! Fuzz target for the disassembler.
//!
//! This target feeds arbitrary byte sequences to the disassembler
//! to find edge cases and crashes in instruction decoding.

#![no_main]

use arbitrary::Arbitrary;
use libz80::{disassemble, DisassemblyOptions};
use libfuzzer_sys::fuzz_target;

/// Complete fuzz input
#[derive(Debug, Arbitrary)]
struct FuzzInput {
    bytes: Vec<u8>,
    start_address: u16,
}

fuzz_target!(|input: FuzzInput| {
    // Stay well inside the address space so nothing wraps onto itself
    if input.bytes.len() > 0x8000 {
        return;
    }

    let options = DisassemblyOptions {
        start_address: input.start_address,
        ..Default::default()
    };

    let lines = disassemble(&input.bytes, options);

    // Verify invariants
    let mut total_size: usize = 0;
    let mut expected_address = input.start_address;

    for line in &lines {
        // Each line starts where the previous one ended
        assert_eq!(line.address, expected_address);

        // Z80 instructions are 1-4 bytes
        assert!(!line.bytes.is_empty() && line.bytes.len() <= 4);
        assert!(!line.text.is_empty());

        total_size += line.bytes.len();
        expected_address = expected_address.wrapping_add(line.bytes.len() as u16);
    }

    // Every input byte is accounted for exactly once
    assert_eq!(total_size, input.bytes.len());
});
