//! Video and I/O peripheral boundary.
//!
//! The ULA owns the 16 KB of display memory at 0x4000 and answers port
//! writes from `OUT`. Turning the display bytes into pixels is the display
//! layer's job; this module only hands out byte snapshots.

use super::{Device, RamDevice};
use crate::io::IoBus;
use crate::memory::BusError;

/// Base address of display memory.
pub const DISPLAY_BASE: u16 = 0x4000;

/// Size of the memory the ULA owns.
pub const DISPLAY_SIZE: usize = 0x4000;

/// Bitmap bytes at the start of display memory.
pub const BITMAP_SIZE: usize = 6144;

/// Attribute bytes following the bitmap.
pub const ATTRIBUTE_SIZE: usize = 768;

/// Snapshot of what the display layer needs for one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Bitmap followed by attributes, `BITMAP_SIZE + ATTRIBUTE_SIZE` bytes.
    pub screen: Vec<u8>,
    /// Border colour, 0-7.
    pub border: u8,
    /// Number of frames handed out before this one.
    pub sequence: u64,
}

impl Frame {
    /// Pixel bitmap portion.
    pub fn bitmap(&self) -> &[u8] {
        &self.screen[..BITMAP_SIZE]
    }

    /// Colour attribute portion.
    pub fn attributes(&self) -> &[u8] {
        &self.screen[BITMAP_SIZE..]
    }
}

/// Source of frames for a display layer.
pub trait GraphicsAdapter {
    /// Capture the current display state.
    fn frame(&mut self) -> Frame;
}

/// The Spectrum ULA: display memory plus the border latch.
pub struct Ula {
    memory: RamDevice,
    border: u8,
    frames: u64,
}

impl Ula {
    pub fn new() -> Self {
        Self {
            memory: RamDevice::new(DISPLAY_BASE, DISPLAY_SIZE),
            border: 0,
            frames: 0,
        }
    }

    /// Current border colour.
    pub fn border(&self) -> u8 {
        self.border
    }

    /// Display memory, including the area above the attributes.
    pub fn memory(&self) -> &RamDevice {
        &self.memory
    }
}

impl Default for Ula {
    fn default() -> Self {
        Self::new()
    }
}

impl Device for Ula {
    fn base_address(&self) -> u16 {
        self.memory.base_address()
    }

    fn size(&self) -> usize {
        self.memory.size()
    }

    fn read(&self, address: u16) -> Result<u8, BusError> {
        self.memory.read(address)
    }

    fn write(&mut self, address: u16, value: u8) -> Result<(), BusError> {
        self.memory.write(address, value)
    }
}

impl IoBus for Ula {
    fn write_io(&mut self, port: u16, value: u8) {
        // Any even port selects the ULA
        if port & 0x0001 == 0 {
            let border = value & 0x07;
            if border != self.border {
                log::debug!("border colour {} -> {}", self.border, border);
            }
            self.border = border;
        }
    }
}

impl GraphicsAdapter for Ula {
    fn frame(&mut self) -> Frame {
        let screen = self.memory.as_slice()[..BITMAP_SIZE + ATTRIBUTE_SIZE].to_vec();
        let frame = Frame {
            screen,
            border: self.border,
            sequence: self.frames,
        };
        self.frames += 1;
        frame
    }
}
