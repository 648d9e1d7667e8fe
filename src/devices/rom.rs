//! ROM device implementation.
//!
//! A memory region whose contents are fixed once loaded. Every write fails
//! with `ReadOnlyViolation`; reads behave exactly like RAM.

use std::io::{self, Read};

use super::{Device, RamDevice};
use crate::memory::BusError;

/// Read-only memory region.
///
/// # Examples
///
/// ```rust
/// use libz80::{BusError, Device, RomDevice};
///
/// let mut rom = RomDevice::from_bytes(0x0000, vec![0xF3, 0xAF]);
///
/// assert_eq!(rom.read(0x0000).unwrap(), 0xF3);
/// assert!(matches!(
///     rom.write(0x0000, 0x00),
///     Err(BusError::ReadOnlyViolation { .. })
/// ));
/// ```
pub struct RomDevice {
    cells: RamDevice,
}

impl RomDevice {
    /// Create a zero-filled ROM of `size` bytes at `base`, ready for `load`.
    pub fn new(base: u16, size: usize) -> Self {
        Self {
            cells: RamDevice::new(base, size),
        }
    }

    /// Create a ROM holding `bytes`.
    pub fn from_bytes(base: u16, bytes: Vec<u8>) -> Self {
        Self {
            cells: RamDevice::from_bytes(base, bytes),
        }
    }

    /// Populate the ROM image from a flat byte dump.
    ///
    /// Returns the count actually read, which may be short of `size()`.
    pub fn load<R: Read>(&mut self, reader: R) -> io::Result<usize> {
        self.cells.load(reader)
    }

    /// ROM image bytes.
    pub fn as_slice(&self) -> &[u8] {
        self.cells.as_slice()
    }

    /// Hex listing of the image.
    pub fn dump(&self) -> String {
        self.cells.dump()
    }
}

impl Device for RomDevice {
    fn base_address(&self) -> u16 {
        self.cells.base_address()
    }

    fn size(&self) -> usize {
        self.cells.size()
    }

    fn read(&self, address: u16) -> Result<u8, BusError> {
        self.cells.read(address)
    }

    fn write(&mut self, address: u16, _value: u8) -> Result<(), BusError> {
        Err(BusError::ReadOnlyViolation {
            address,
            base: self.base_address(),
            size: self.size(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rom_read() {
        let rom = RomDevice::from_bytes(0x1000, vec![0xAA, 0xBB]);
        assert_eq!(rom.read(0x1000).unwrap(), 0xAA);
        assert_eq!(rom.read(0x1001).unwrap(), 0xBB);
        assert!(rom.read(0x1002).is_err());
    }

    #[test]
    fn test_rom_write_rejected() {
        let mut rom = RomDevice::new(0x0000, 0x4000);
        assert_eq!(
            rom.write(0x0123, 0x55),
            Err(BusError::ReadOnlyViolation {
                address: 0x0123,
                base: 0x0000,
                size: 0x4000
            })
        );
        assert_eq!(rom.read(0x0123).unwrap(), 0x00);
    }

    #[test]
    fn test_rom_load_counts_bytes() {
        let mut rom = RomDevice::new(0x0000, 0x4000);
        let image = vec![0x3E; 0x1000];
        assert_eq!(rom.load(image.as_slice()).unwrap(), 0x1000);
        assert_eq!(rom.read(0x0FFF).unwrap(), 0x3E);
        assert_eq!(rom.read(0x1000).unwrap(), 0x00);
    }
}
