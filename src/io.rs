//! I/O port interface.
//!
//! `IN` and `OUT` instructions talk to peripherals through `IoBus`. The
//! processor builds a 16-bit port address and leaves all side effects to the
//! implementation.

/// Peripheral port space.
pub trait IoBus {
    /// Write `value` to `port`.
    fn write_io(&mut self, port: u16, value: u8);

    /// Read from `port`. Nothing driving the bus reads as 0xFF.
    fn read_io(&mut self, _port: u16) -> u8 {
        0xFF
    }
}

/// Port space with nothing attached.
#[derive(Debug, Default, Clone, Copy)]
pub struct DetachedIo;

impl IoBus for DetachedIo {
    fn write_io(&mut self, port: u16, value: u8) {
        log::trace!("write to unattached port 0x{:04X}: 0x{:02X}", port, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detached_reads_float_high() {
        let mut io = DetachedIo;
        io.write_io(0x00FE, 0x01);
        assert_eq!(io.read_io(0x00FE), 0xFF);
    }
}
