//! I2C bus interface unit register handling.
//!
//! No devices are attached to the bus; data written to IDBR reads back and
//! the bus monitor reports both lines released.

use pxa260_hw::mmio::i2c::{IBMR_IDLE, registers as hw_regs};
use tracing::{trace, warn};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct I2c {
    pub data: u8,
    pub control: u16,
    pub status: u16,
    pub slave_address: u8,
}

impl I2c {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn read(&self, offset: u32) -> u32 {
        trace!("I2C register read: offset={:#X}", offset);

        match offset {
            hw_regs::IBMR => IBMR_IDLE,
            hw_regs::IDBR => self.data as u32,
            hw_regs::ICR => self.control as u32,
            hw_regs::ISR => self.status as u32,
            hw_regs::ISAR => self.slave_address as u32,
            _ => {
                warn!("Unknown I2C register read: offset={:#X}", offset);
                0
            }
        }
    }

    pub fn write(&mut self, offset: u32, value: u32) {
        trace!("I2C register write: offset={:#X}, value={:#X}", offset, value);

        match offset {
            hw_regs::IBMR => {}
            hw_regs::IDBR => self.data = value as u8,
            hw_regs::ICR => self.control = value as u16,
            hw_regs::ISR => self.status &= !(value as u16),
            hw_regs::ISAR => self.slave_address = (value & 0x7F) as u8,
            _ => {
                warn!(
                    "Unknown I2C register write: offset={:#X}, value={:#X}",
                    offset, value
                );
            }
        }
    }
}
