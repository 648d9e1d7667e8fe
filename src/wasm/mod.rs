//! WebAssembly bindings for the libz80 machine.
//!
//! This module provides JavaScript-callable interfaces to the 48K machine,
//! enabling browser-based execution of Z80 code.

#[cfg(feature = "wasm")]
pub mod api;

#[cfg(feature = "wasm")]
pub use api::SpectrumEmulator;
