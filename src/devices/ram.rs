//! RAM device implementation.
//!
//! A fixed-base, fixed-size block of readable and writable cells. The ROM
//! device and the ULA's display memory are built on top of it.

use std::fmt::Write as _;
use std::io::{self, Read};

use super::Device;
use crate::memory::BusError;

/// Kilobyte multiplier for region sizes.
pub const KB: usize = 1024;

/// Readable and writable memory region.
///
/// # Examples
///
/// ```rust
/// use libz80::{Device, RamDevice};
///
/// let mut ram = RamDevice::new(0x8000, 0x8000); // 32KB at 0x8000
///
/// ram.write(0x8042, 0xAA).unwrap();
/// assert_eq!(ram.read(0x8042).unwrap(), 0xAA);
///
/// // Addresses are absolute; 0x0042 belongs to someone else
/// assert!(ram.read(0x0042).is_err());
/// ```
pub struct RamDevice {
    base: u16,
    data: Vec<u8>,
}

impl RamDevice {
    /// Create a zero-filled region of `size` bytes starting at `base`.
    pub fn new(base: u16, size: usize) -> Self {
        Self {
            base,
            data: vec![0; size],
        }
    }

    /// Create a zero-filled region sized in kilobytes.
    pub fn with_kb(base: u16, kb: usize) -> Self {
        Self::new(base, kb * KB)
    }

    /// Create a region holding `bytes`, sized to fit them.
    pub fn from_bytes(base: u16, bytes: Vec<u8>) -> Self {
        Self { base, data: bytes }
    }

    /// Copy `bytes` into the region starting at absolute `address`.
    ///
    /// # Errors
    ///
    /// Returns `AddressOutOfRange` for the first byte that does not fit;
    /// bytes before it are already written.
    pub fn load_bytes(&mut self, address: u16, bytes: &[u8]) -> Result<(), BusError> {
        for (i, &byte) in bytes.iter().enumerate() {
            let offset = self.check(address.wrapping_add(i as u16))?;
            self.data[offset] = byte;
        }
        Ok(())
    }

    /// Fill the region from a byte source, start to end.
    ///
    /// Stops at end of input or when the region is full and returns the
    /// number of bytes actually read. Nothing wraps and nothing is verified.
    pub fn load<R: Read>(&mut self, mut reader: R) -> io::Result<usize> {
        let mut filled = 0;
        while filled < self.data.len() {
            match reader.read(&mut self.data[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
        log::debug!(
            "loaded {} bytes into region at 0x{:04X}",
            filled,
            self.base
        );
        Ok(filled)
    }

    /// Backing bytes.
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Hex listing, 16 bytes per line, each line prefixed with its address.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        for (row, chunk) in self.data.chunks(16).enumerate() {
            let address = self.base as usize + row * 16;
            let _ = write!(out, "{:04X}:", address);
            for byte in chunk {
                let _ = write!(out, " {:02X}", byte);
            }
            out.push('\n');
        }
        out
    }
}

impl Device for RamDevice {
    fn base_address(&self) -> u16 {
        self.base
    }

    fn size(&self) -> usize {
        self.data.len()
    }

    fn read(&self, address: u16) -> Result<u8, BusError> {
        let offset = self.check(address)?;
        Ok(self.data[offset])
    }

    fn write(&mut self, address: u16, value: u8) -> Result<(), BusError> {
        let offset = self.check(address)?;
        self.data[offset] = value;
        Ok(())
    }
}
