//! WASM API for the Z80 machine.
//!
//! Provides JavaScript-callable interfaces for machine control, register
//! inspection, display snapshots and disassembly.

use crate::{Disassembly, MemoryBus, Spectrum48};
use wasm_bindgen::prelude::*;

/// JavaScript-compatible error wrapper
#[wasm_bindgen]
#[derive(Debug, Clone)]
pub struct JsError {
    message: String,
}

#[wasm_bindgen]
impl JsError {
    #[wasm_bindgen(constructor)]
    pub fn new(message: &str) -> JsError {
        JsError {
            message: message.to_string(),
        }
    }

    #[wasm_bindgen(getter)]
    pub fn message(&self) -> String {
        self.message.clone()
    }
}

fn js_error(err: impl std::fmt::Display) -> JsError {
    JsError::new(&err.to_string())
}

/// One line of a disassembly listing
#[wasm_bindgen]
#[derive(Debug, Clone)]
pub struct DisassemblyLine {
    address: u16,
    bytes: Vec<u8>,
    text: String,
}

impl From<Disassembly> for DisassemblyLine {
    fn from(line: Disassembly) -> Self {
        DisassemblyLine {
            address: line.address,
            bytes: line.bytes,
            text: line.text,
        }
    }
}

#[wasm_bindgen]
impl DisassemblyLine {
    #[wasm_bindgen(getter)]
    pub fn address(&self) -> u16 {
        self.address
    }

    #[wasm_bindgen(getter)]
    pub fn bytes(&self) -> Vec<u8> {
        self.bytes.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn text(&self) -> String {
        self.text.clone()
    }
}

/// Main emulator interface for JavaScript
#[wasm_bindgen]
pub struct SpectrumEmulator {
    machine: Spectrum48,
    on_border: js_sys::Function,
    last_border: u8,
}

#[wasm_bindgen]
impl SpectrumEmulator {
    /// Create a machine running `rom`.
    ///
    /// `on_border` is called with the new colour whenever a frame ends with
    /// a different border than the previous one.
    #[wasm_bindgen(constructor)]
    pub fn new(rom: &[u8], on_border: js_sys::Function) -> Result<SpectrumEmulator, JsError> {
        let machine = Spectrum48::new(rom).map_err(js_error)?;
        let last_border = machine.border();
        Ok(SpectrumEmulator {
            machine,
            on_border,
            last_border,
        })
    }

    /// Execute a single instruction and return its cycle count
    pub fn step(&mut self) -> Result<u8, JsError> {
        self.machine.execute().map_err(js_error)
    }

    /// Run one display frame and return the cycles used
    pub fn run_frame(&mut self) -> Result<u32, JsError> {
        let cycles = self.machine.run_frame().map_err(js_error)?;

        let border = self.machine.border();
        if border != self.last_border {
            self.last_border = border;
            let _ = self
                .on_border
                .call1(&JsValue::NULL, &JsValue::from(border));
        }

        Ok(cycles as u32)
    }

    /// Reset registers; memory is kept
    pub fn reset(&mut self) {
        self.machine.cpu_mut().reset();
    }

    /// Bitmap followed by attributes for the current frame
    pub fn screen(&mut self) -> Vec<u8> {
        self.machine.frame().screen
    }

    #[wasm_bindgen(getter)]
    pub fn border(&self) -> u8 {
        self.machine.border()
    }

    // Register getters
    #[wasm_bindgen(getter)]
    pub fn af(&self) -> u16 {
        self.machine.cpu().registers().af()
    }

    #[wasm_bindgen(getter)]
    pub fn bc(&self) -> u16 {
        self.machine.cpu().registers().bc()
    }

    #[wasm_bindgen(getter)]
    pub fn de(&self) -> u16 {
        self.machine.cpu().registers().de()
    }

    #[wasm_bindgen(getter)]
    pub fn hl(&self) -> u16 {
        self.machine.cpu().registers().hl()
    }

    #[wasm_bindgen(getter)]
    pub fn ix(&self) -> u16 {
        self.machine.cpu().registers().ix()
    }

    #[wasm_bindgen(getter)]
    pub fn iy(&self) -> u16 {
        self.machine.cpu().registers().iy()
    }

    #[wasm_bindgen(getter)]
    pub fn sp(&self) -> u16 {
        self.machine.cpu().registers().sp()
    }

    #[wasm_bindgen(getter)]
    pub fn pc(&self) -> u16 {
        self.machine.cpu().pc()
    }

    #[wasm_bindgen(getter)]
    pub fn cycles(&self) -> f64 {
        self.machine.cpu().cycles() as f64 // u64 does not cross into JS
    }

    #[wasm_bindgen(getter)]
    pub fn halted(&self) -> bool {
        self.machine.cpu().registers().halted()
    }

    /// Register summary line
    pub fn dump(&self) -> String {
        self.machine.cpu().dump()
    }

    // Memory access methods

    /// Read a single byte; unmapped or failing reads return 0xFF
    pub fn read_memory(&self, addr: u16) -> u8 {
        self.machine.cpu().memory().read(addr).unwrap_or(0xFF)
    }

    /// Write a single byte
    pub fn write_memory(&mut self, addr: u16, value: u8) -> Result<(), JsError> {
        self.machine
            .cpu_mut()
            .memory_mut()
            .write(addr, value)
            .map_err(js_error)
    }

    /// Read a 256-byte page from memory (for efficient display)
    pub fn get_memory_page(&self, page: u8) -> Vec<u8> {
        let start = (page as u16) << 8;
        (0..=0xFF).map(|i| self.read_memory(start | i)).collect()
    }

    /// Copy `program` into RAM and point PC at it
    pub fn load_program(&mut self, program: &[u8], start_addr: u16) -> Result<(), JsError> {
        for (i, &byte) in program.iter().enumerate() {
            self.write_memory(start_addr.wrapping_add(i as u16), byte)?;
        }
        self.machine.cpu_mut().registers_mut().set_pc(start_addr);
        Ok(())
    }

    /// Disassemble memory starting at an address
    pub fn disassemble(&self, start_addr: u16, num_instructions: u32) -> Vec<JsValue> {
        let cpu = self.machine.cpu();
        let mut address = start_addr;
        let mut lines = Vec::with_capacity(num_instructions as usize);

        for _ in 0..num_instructions {
            let line = match cpu.disassemble_at(address) {
                Ok(line) => line,
                Err(_) => {
                    let byte = self.read_memory(address);
                    Disassembly {
                        address,
                        bytes: vec![byte],
                        text: format!("DB 0x{:02X}", byte),
                    }
                }
            };
            address = address.wrapping_add(line.bytes.len().max(1) as u16);
            lines.push(JsValue::from(DisassemblyLine::from(line)));
        }

        lines
    }
}
