//! Memory controller register handling.
//!
//! Timing and chip-select configuration registers are stored as written.
//! They do not change how the bus decodes addresses.

use pxa260_hw::mmio::memctrl::SIZE;
use tracing::{trace, warn};

const REGISTERS: usize = (SIZE / 4) as usize;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryController {
    pub registers: [u32; REGISTERS],
}

impl MemoryController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    fn index(offset: u32) -> Option<usize> {
        (offset < SIZE).then_some((offset / 4) as usize)
    }

    pub fn read(&self, offset: u32) -> u32 {
        trace!("MEMC register read: offset={:#X}", offset);

        match Self::index(offset) {
            Some(index) => self.registers[index],
            None => {
                warn!("Unknown MEMC register read: offset={:#X}", offset);
                0
            }
        }
    }

    pub fn write(&mut self, offset: u32, value: u32) {
        trace!("MEMC register write: offset={:#X}, value={:#X}", offset, value);

        match Self::index(offset) {
            Some(index) => self.registers[index] = value,
            None => warn!(
                "Unknown MEMC register write: offset={:#X}, value={:#X}",
                offset, value
            ),
        }
    }
}
