//! Memory-mapped components and the slot-based address space.
//!
//! The 16-bit address range is cut into 16 slots of 4 KB. Each slot is bound
//! to at most one attached component; the slot for an address is its high
//! nibble. Components see absolute addresses and do their own bounds check.
//!
//! # Example
//!
//! ```rust
//! use libz80::{AddressSpace, MemoryBus, RamDevice, RomDevice};
//!
//! let mut bus = AddressSpace::new();
//!
//! // 16KB ROM at 0x0000-0x3FFF
//! bus.attach(Box::new(RomDevice::from_bytes(0x0000, vec![0x00; 0x4000]))).unwrap();
//!
//! // 32KB RAM at 0x8000-0xFFFF
//! bus.attach(Box::new(RamDevice::new(0x8000, 0x8000))).unwrap();
//!
//! bus.write(0x8000, 0x42).unwrap();
//! assert_eq!(bus.read(0x8000).unwrap(), 0x42);
//!
//! // Nothing is bound at 0x4000
//! assert!(bus.read(0x4000).is_err());
//! ```

use crate::memory::{BusError, MemoryBus};

pub mod ram;
pub mod rom;
pub mod ula;

pub use ram::RamDevice;
pub use rom::RomDevice;
pub use ula::{Frame, GraphicsAdapter, Ula};

/// Number of slots in the address space.
pub const SLOT_COUNT: usize = 16;

/// Bytes covered by one slot.
pub const SLOT_SIZE: usize = 0x1000;

/// A memory-like component that can be attached to an `AddressSpace`.
///
/// Addresses passed to `read` and `write` are absolute 16-bit addresses, not
/// offsets. An implementation rejects anything outside
/// `base_address()..base_address() + size()` with
/// `BusError::AddressOutOfRange`.
///
/// # Examples
///
/// ```rust
/// use libz80::{BusError, Device};
///
/// struct Latch {
///     value: u8,
/// }
///
/// impl Device for Latch {
///     fn base_address(&self) -> u16 {
///         0xF000
///     }
///
///     fn size(&self) -> usize {
///         1
///     }
///
///     fn read(&self, address: u16) -> Result<u8, BusError> {
///         self.check(address)?;
///         Ok(self.value)
///     }
///
///     fn write(&mut self, address: u16, value: u8) -> Result<(), BusError> {
///         self.check(address)?;
///         self.value = value;
///         Ok(())
///     }
/// }
///
/// let mut latch = Latch { value: 0 };
/// latch.write(0xF000, 7).unwrap();
/// assert_eq!(latch.read(0xF000).unwrap(), 7);
/// assert!(latch.read(0xF001).is_err());
/// ```
pub trait Device {
    /// First address the component answers.
    fn base_address(&self) -> u16;

    /// Number of bytes the component covers.
    fn size(&self) -> usize;

    /// Read the byte at an absolute address.
    fn read(&self, address: u16) -> Result<u8, BusError>;

    /// Write the byte at an absolute address.
    fn write(&mut self, address: u16, value: u8) -> Result<(), BusError>;

    /// Validate `address` against this component's bounds and return the
    /// offset into its storage.
    fn check(&self, address: u16) -> Result<usize, BusError> {
        let base = self.base_address();
        let size = self.size();
        let offset = address.wrapping_sub(base) as usize;
        if address < base || offset >= size {
            return Err(BusError::AddressOutOfRange {
                address,
                base,
                size,
            });
        }
        Ok(offset)
    }
}

/// Opaque ticket returned by `AddressSpace::attach`, used to detach or
/// reach the component again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeviceHandle(usize);

/// Routes processor accesses to the component bound to each 4 KB slot.
///
/// # Invariants
///
/// - A slot is bound to at most one component.
/// - `size()` is the sum of the sizes of attached components.
/// - `base_address()` is the base of the component in the lowest bound slot,
///   or `None` when nothing is attached.
pub struct AddressSpace {
    components: Vec<Option<Box<dyn Device>>>,
    slots: [Option<usize>; SLOT_COUNT],
    size: usize,
    base_address: Option<u16>,
}

impl AddressSpace {
    /// Creates an empty address space.
    pub fn new() -> Self {
        Self {
            components: Vec::new(),
            slots: [None; SLOT_COUNT],
            size: 0,
            base_address: None,
        }
    }

    /// Binds every slot covered by `device` to it.
    ///
    /// The covered slots are `base >> 12` through `(base + size - 1) >> 12`,
    /// inclusive. Nothing is modified when any of them is already bound.
    ///
    /// # Errors
    ///
    /// - `BusError::DuplicateBinding` if a covered slot is taken.
    /// - `BusError::AddressOutOfRange` if the component is empty or runs
    ///   past 0xFFFF.
    pub fn attach(&mut self, device: Box<dyn Device>) -> Result<DeviceHandle, BusError> {
        let base = device.base_address();
        let size = device.size();
        let (first, last) = slot_range(base, size)?;

        if let Some(slot) = (first..=last).find(|&slot| self.slots[slot].is_some()) {
            return Err(BusError::DuplicateBinding { base, size, slot });
        }

        let index = match self.components.iter().position(Option::is_none) {
            Some(free) => {
                self.components[free] = Some(device);
                free
            }
            None => {
                self.components.push(Some(device));
                self.components.len() - 1
            }
        };
        for slot in first..=last {
            self.slots[slot] = Some(index);
        }

        self.size += size;
        self.base_address = Some(match self.base_address {
            Some(current) => current.min(base),
            None => base,
        });

        log::debug!(
            "attached component 0x{:04X}-0x{:04X} to slots {}..={}",
            base,
            base as usize + size - 1,
            first,
            last
        );

        Ok(DeviceHandle(index))
    }

    /// Unbinds a component and hands it back.
    ///
    /// Returns `None` if the handle was already detached. The freed entry is
    /// reused by the next `attach`, so a handle must not be kept once its
    /// component is detached: it would then name the newcomer.
    pub fn detach(&mut self, handle: DeviceHandle) -> Option<Box<dyn Device>> {
        let device = self.components.get_mut(handle.0)?.take()?;

        for slot in self.slots.iter_mut() {
            if *slot == Some(handle.0) {
                *slot = None;
            }
        }

        self.size -= device.size();
        self.base_address = self
            .slots
            .iter()
            .flatten()
            .next()
            .and_then(|&index| self.components[index].as_ref())
            .map(|component| component.base_address());

        log::debug!(
            "detached component at 0x{:04X}, space base now {:?}",
            device.base_address(),
            self.base_address
        );

        Some(device)
    }

    /// Total bytes covered by attached components.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Lowest attached base address, `None` when empty.
    pub fn base_address(&self) -> Option<u16> {
        self.base_address
    }

    /// Attached component for a handle.
    pub fn device(&self, handle: DeviceHandle) -> Option<&dyn Device> {
        self.components.get(handle.0)?.as_deref()
    }

    /// Mutable access to an attached component.
    pub fn device_mut(&mut self, handle: DeviceHandle) -> Option<&mut (dyn Device + 'static)> {
        self.components.get_mut(handle.0)?.as_deref_mut()
    }

    /// Number of entries in the component table, free ones included.
    pub fn capacity(&self) -> usize {
        self.components.len()
    }

    /// Slot index for an address.
    pub fn slot_of(address: u16) -> usize {
        (address >> 12) as usize & 0x0F
    }

    fn component_at(&self, address: u16) -> Result<usize, BusError> {
        self.slots[Self::slot_of(address)].ok_or(BusError::AddressOutOfRange {
            address,
            base: address & 0xF000,
            size: 0,
        })
    }
}

impl Default for AddressSpace {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryBus for AddressSpace {
    fn read(&self, address: u16) -> Result<u8, BusError> {
        let index = self.component_at(address)?;
        match &self.components[index] {
            Some(device) => device.read(address),
            None => Err(unbound(address)),
        }
    }

    fn write(&mut self, address: u16, value: u8) -> Result<(), BusError> {
        let index = self.component_at(address)?;
        match &mut self.components[index] {
            Some(device) => device.write(address, value),
            None => Err(unbound(address)),
        }
    }
}

fn unbound(address: u16) -> BusError {
    BusError::AddressOutOfRange {
        address,
        base: address & 0xF000,
        size: 0,
    }
}

fn slot_range(base: u16, size: usize) -> Result<(usize, usize), BusError> {
    let end = base as usize + size;
    if size == 0 || end > 0x10000 {
        return Err(BusError::AddressOutOfRange {
            address: base,
            base,
            size,
        });
    }
    Ok((base as usize / SLOT_SIZE, (end - 1) / SLOT_SIZE))
}
