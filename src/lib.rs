//! # Z80 CPU Emulation Core
//!
//! An instruction-accurate Zilog Z80 emulator built around a slot-mapped
//! address space, designed for clarity and WebAssembly portability.
//!
//! The crate provides the processor (register file, prefix-aware decode
//! tables, instruction semantics including the undocumented flag bits and
//! variable timing), a 16-slot address space that RAM, ROM and peripherals
//! attach to, and the wiring for a 48K Spectrum-style machine.
//!
//! ## Quick Start
//!
//! ```rust
//! use libz80::{FlatMemory, CPU};
//!
//! let mut memory = FlatMemory::new();
//! memory.load(0x0000, &[
//!     0x3E, 0x05, // LD A,0x05
//!     0x06, 0x03, // LD B,0x03
//!     0x80,       // ADD A,B
//! ]);
//!
//! let mut cpu = CPU::new(memory);
//! let cycles = cpu.run_for_cycles(18).unwrap();
//!
//! assert_eq!(cycles, 18);
//! assert_eq!(cpu.registers().a(), 0x08);
//! assert_eq!(cpu.registers().pc(), 0x0005);
//! ```
//!
//! ## Architecture
//!
//! - **Bus**: the processor talks to memory through the `MemoryBus` trait;
//!   `AddressSpace` routes accesses to attached `Device`s by 4 KB slot
//! - **Decode**: seven static tables (unprefixed, CB, DD, ED, FD, DD CB,
//!   FD CB) hold one immutable `Instruction` template per opcode
//! - **Fetch**: a short prefix state machine resolves the template, then
//!   resolves operands in stream order; `CPU::preview` runs the same path
//!   without side effects
//! - **Execute**: category modules apply the operation and report cycles
//! - **Errors**: every failure is a typed `ExecutionError` returned from
//!   `CPU::step`; nothing panics and nothing is rolled back
//!
//! ## Modules
//!
//! - `cpu` - processor state, fetch/execute, ALU primitives
//! - `registers` - register file and flag bits
//! - `opcodes` - decode tables
//! - `fetch` - prefix decoding and operand resolution
//! - `addressing` - addressing modes, register names, condition codes
//! - `memory` - `MemoryBus` trait and flat memory
//! - `devices` - address space, RAM, ROM, ULA
//! - `io` - port I/O trait
//! - `disassembler` - diagnostic rendering and tracing
//! - `machine` - 48K machine wiring
//! - `config` - clock and tracing settings

pub mod addressing;
pub mod config;
pub mod cpu;
pub mod devices;
pub mod disassembler;
pub mod fetch;
pub mod io;
pub mod machine;
pub mod memory;
pub mod opcodes;
pub mod registers;

// Internal instruction implementations (not part of public API)
mod instructions;

pub mod wasm;

// Re-export public API
pub use addressing::{AddressingMode, Condition, IndexRegister, Reg16, Reg8};
pub use config::{CpuConfig, MachineConfig};
pub use cpu::CPU;
pub use devices::{
    AddressSpace, Device, DeviceHandle, Frame, GraphicsAdapter, RamDevice, RomDevice, Ula,
};
pub use disassembler::{disassemble, Disassembly, DisassemblyOptions, LogTracer, Tracer};
pub use fetch::{Fetched, Operand};
pub use io::{DetachedIo, IoBus};
pub use machine::{MachineError, Spectrum48};
pub use memory::{BusError, FlatMemory, MemoryBus};
pub use opcodes::{decode_tables, DecodeTables, Instruction, Operation, Prefix, ShiftOp};
pub use registers::{Flag, Registers};

/// Errors that can occur during CPU execution.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExecutionError {
    /// A memory access made by the instruction failed.
    #[error(transparent)]
    Bus(#[from] BusError),

    /// No table entry for the decoded byte sequence.
    ///
    /// Contains every prefix, displacement and opcode byte read so far.
    #[error("unknown opcode {}", hex_bytes(.bytes))]
    UnknownOpcode { bytes: Vec<u8> },

    /// An instruction was handed an operand its operation cannot use.
    ///
    /// Indicates a defect in the decode tables rather than bad input.
    #[error("{mnemonic} cannot use operand {operand:?}")]
    UnsupportedAddressingMode {
        mnemonic: &'static str,
        operand: Operand,
    },
}

fn hex_bytes(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{:02X}", b))
        .collect::<Vec<_>>()
        .join(" ")
}
