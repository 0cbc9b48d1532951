//! W86L488 SD/MMC bridge on static chip select 2.
//!
//! The chip sits on a 16-bit bus and only decodes half-word accesses; the bus
//! never routes bytes or words here. Registers mirror through the whole
//! chip-select window.

use pxa260_hw::mmio::w86l488::{REGISTER_COUNT, REGISTER_MASK};
use tracing::trace;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct W86l488 {
    pub registers: [u16; REGISTER_COUNT],
}

impl W86l488 {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    fn index(offset: u32) -> usize {
        ((offset & REGISTER_MASK) / 2) as usize
    }

    pub fn read(&self, offset: u32) -> u16 {
        trace!("W86L488 register read: offset={:#X}", offset);
        self.registers[Self::index(offset)]
    }

    pub fn write(&mut self, offset: u32, value: u16) {
        trace!("W86L488 register write: offset={:#X}, value={:#X}", offset, value);
        self.registers[Self::index(offset)] = value;
    }
}
