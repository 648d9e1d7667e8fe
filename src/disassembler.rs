//! Z80 Disassembler Module
//!
//! Converts machine code into human-readable assembly text, both for
//! offline listings (`disassemble`) and for the per-instruction trace the
//! CPU emits through a `Tracer`.

pub mod decoder;
pub mod formatter;

use std::fmt;

use crate::fetch::Fetched;
use crate::memory::MemoryBus;

/// A single disassembled instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Disassembly {
    /// Address of the first byte
    pub address: u16,

    /// Raw instruction bytes, prefixes included
    pub bytes: Vec<u8>,

    /// Assembly text, e.g. `LD A,(IX+0x05)`
    pub text: String,
}

impl Disassembly {
    /// Render a decoded instruction, re-reading its bytes from `memory`.
    ///
    /// Bytes that can no longer be read are left out of the dump.
    pub fn capture<M: MemoryBus>(fetched: &Fetched, memory: &M) -> Self {
        let bytes = (0..fetched.length)
            .filter_map(|offset| memory.read(fetched.address.wrapping_add(offset)).ok())
            .collect();

        Self {
            address: fetched.address,
            bytes,
            text: formatter::format_instruction(fetched),
        }
    }

    /// One listing line: address, byte dump, assembly text.
    pub fn render(&self) -> String {
        format!(
            "0x{:04X}  {:<11}  {}",
            self.address,
            formatter::format_bytes(&self.bytes),
            self.text
        )
    }
}

impl fmt::Display for Disassembly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Options controlling disassembly output
#[derive(Debug, Clone, Copy)]
pub struct DisassemblyOptions {
    /// Address of the first byte of the slice
    pub start_address: u16,

    /// Stop after this many lines
    pub max_instructions: Option<usize>,
}

impl Default for DisassemblyOptions {
    fn default() -> Self {
        Self {
            start_address: 0x0000,
            max_instructions: None,
        }
    }
}

/// Disassemble a byte slice into a listing.
///
/// Bytes that do not start a complete, known instruction are emitted one
/// at a time as `DB 0xNN` lines and decoding resumes at the next byte.
pub fn disassemble(bytes: &[u8], options: DisassemblyOptions) -> Vec<Disassembly> {
    let window = decoder::Window::new(bytes, options.start_address);
    let limit = options.max_instructions.unwrap_or(usize::MAX);

    let mut lines = Vec::new();
    let mut offset = 0usize;

    while offset < bytes.len() && lines.len() < limit {
        let address = options.start_address.wrapping_add(offset as u16);

        match decoder::decode_instruction(&window, address) {
            Ok(fetched) => {
                offset += fetched.length as usize;
                lines.push(Disassembly::capture(&fetched, &window));
            }
            Err(_) => {
                let byte = bytes[offset];
                lines.push(Disassembly {
                    address,
                    bytes: vec![byte],
                    text: format!("DB 0x{:02X}", byte),
                });
                offset += 1;
            }
        }
    }

    lines
}

/// Diagnostic sink for executed instructions.
///
/// The CPU calls `trace` before executing each instruction. Implementations
/// must not assume anything about what happens afterwards.
pub trait Tracer {
    fn trace(&mut self, line: &Disassembly);
}

/// Tracer that forwards every line to `log::trace!`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogTracer;

impl Tracer for LogTracer {
    fn trace(&mut self, line: &Disassembly) {
        log::trace!("{}", line);
    }
}
