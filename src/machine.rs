//! # 48K Machine Wiring
//!
//! Assembles a Spectrum 48K-style machine from the crate's parts:
//!
//! ```text
//! 0x0000-0x3FFF  ROM  (16 KB, loaded from the caller's reader)
//! 0x4000-0x7FFF  ULA  (16 KB display memory + border latch on even ports)
//! 0x8000-0xFFFF  RAM  (32 KB)
//! ```
//!
//! The ULA sits on both buses: the address space reaches its display memory
//! and the CPU's port bus reaches its border latch. Both go through a
//! `SharedUla` handle so the machine can still hand out frames.

use std::cell::{Ref, RefCell};
use std::io::Read;
use std::rc::Rc;

use crate::config::MachineConfig;
use crate::cpu::CPU;
use crate::devices::ram::KB;
use crate::devices::{AddressSpace, Device, Frame, GraphicsAdapter, RamDevice, RomDevice, Ula};
use crate::io::IoBus;
use crate::memory::BusError;
use crate::ExecutionError;

const ROM_BASE: u16 = 0x0000;
const ROM_KB: usize = 16;
const RAM_BASE: u16 = 0x8000;
const RAM_KB: usize = 32;

/// Errors raised while putting a machine together.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MachineError {
    /// A component could not be attached.
    #[error(transparent)]
    Bus(#[from] BusError),

    /// The ROM image could not be read.
    #[error("failed to read ROM image: {0}")]
    Io(String),
}

/// Shared ULA handle that is both a memory component and the port bus.
struct SharedUla {
    ula: Rc<RefCell<Ula>>,
}

impl SharedUla {
    fn new(ula: Rc<RefCell<Ula>>) -> Self {
        SharedUla { ula }
    }
}

impl Device for SharedUla {
    fn base_address(&self) -> u16 {
        self.ula.borrow().base_address()
    }

    fn size(&self) -> usize {
        self.ula.borrow().size()
    }

    fn read(&self, address: u16) -> Result<u8, BusError> {
        self.ula.borrow().read(address)
    }

    fn write(&mut self, address: u16, value: u8) -> Result<(), BusError> {
        self.ula.borrow_mut().write(address, value)
    }
}

impl IoBus for SharedUla {
    fn write_io(&mut self, port: u16, value: u8) {
        self.ula.borrow_mut().write_io(port, value);
    }

    fn read_io(&mut self, port: u16) -> u8 {
        self.ula.borrow_mut().read_io(port)
    }
}

/// A ready-to-run 48K machine.
///
/// # Examples
///
/// ```
/// use libz80::Spectrum48;
///
/// // LD A,0x02 ; OUT (0xFE),A ; HALT
/// let rom: &[u8] = &[0x3E, 0x02, 0xD3, 0xFE, 0x76];
/// let mut machine = Spectrum48::new(rom).unwrap();
///
/// machine.execute().unwrap();
/// machine.execute().unwrap();
/// assert_eq!(machine.frame().border, 2);
/// ```
pub struct Spectrum48 {
    cpu: CPU<AddressSpace>,
    ula: Rc<RefCell<Ula>>,
    config: MachineConfig,
}

impl Spectrum48 {
    /// Builds the machine with default settings, loading the ROM image from
    /// `rom`. A short image leaves the rest of ROM zeroed.
    pub fn new<R: Read>(rom: R) -> Result<Self, MachineError> {
        Self::with_config(rom, MachineConfig::default())
    }

    /// Builds the machine with explicit settings.
    pub fn with_config<R: Read>(rom: R, config: MachineConfig) -> Result<Self, MachineError> {
        let mut image = RomDevice::new(ROM_BASE, ROM_KB * KB);
        let loaded = image.load(rom).map_err(|e| MachineError::Io(e.to_string()))?;

        let ula = Rc::new(RefCell::new(Ula::new()));

        let mut bus = AddressSpace::new();
        bus.attach(Box::new(image))?;
        bus.attach(Box::new(SharedUla::new(Rc::clone(&ula))))?;
        bus.attach(Box::new(RamDevice::with_kb(RAM_BASE, RAM_KB)))?;

        let io = Box::new(SharedUla::new(Rc::clone(&ula)));
        let cpu = CPU::with_config(bus, io, config.cpu.clone());

        log::debug!(
            "48K machine ready: {} ROM bytes, {} Hz, {} cycles per frame",
            loaded,
            config.cpu.clock_hz,
            config.cycles_per_frame()
        );

        Ok(Self { cpu, ula, config })
    }

    /// Executes one instruction and returns its cycle count.
    pub fn execute(&mut self) -> Result<u8, ExecutionError> {
        self.cpu.step()
    }

    /// Runs one frame's worth of cycles.
    ///
    /// Returns the cycles actually used, which may overshoot by part of
    /// an instruction.
    pub fn run_frame(&mut self) -> Result<u64, ExecutionError> {
        self.cpu.run_for_cycles(self.config.cycles_per_frame())
    }

    /// Snapshot of the display for the presentation layer.
    pub fn frame(&mut self) -> Frame {
        self.ula.borrow_mut().frame()
    }

    /// Current border colour.
    pub fn border(&self) -> u8 {
        self.ula.borrow().border()
    }

    /// The ULA, for inspection.
    ///
    /// The guard shares the ULA with the I/O bus and borrows the machine, so
    /// it has to be dropped before the next `execute` or `run_frame`. Use
    /// `border` or `frame` to keep values across execution.
    pub fn ula(&self) -> Ref<'_, Ula> {
        self.ula.borrow()
    }

    pub fn cpu(&self) -> &CPU<AddressSpace> {
        &self.cpu
    }

    pub fn cpu_mut(&mut self) -> &mut CPU<AddressSpace> {
        &mut self.cpu
    }

    pub fn config(&self) -> &MachineConfig {
        &self.config
    }

    pub fn clock_hz(&self) -> u32 {
        self.config.cpu.clock_hz
    }

    pub fn frames_per_second(&self) -> u32 {
        self.config.frames_per_second
    }
}
