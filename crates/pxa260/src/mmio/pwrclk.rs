//! Power manager and clock manager register handling.
//!
//! Two separate register windows share one state block. Values are stored
//! as written; sleep and frequency change sequencing belong to the CPU core.

use pxa260_hw::mmio::pwrclk::{clock, power};
use tracing::{trace, warn};

const POWER_REGISTERS: usize = (power::SIZE / 4) as usize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PowerClock {
    pub power: [u32; POWER_REGISTERS],
    pub cccr: u32,
    pub cken: u32,
    pub oscc: u32,
}

impl Default for PowerClock {
    fn default() -> Self {
        let mut regs = [0; POWER_REGISTERS];
        regs[(power::registers::RCSR / 4) as usize] = power::RCSR_RESET;
        Self {
            power: regs,
            cccr: clock::CCCR_RESET,
            cken: clock::CKEN_RESET,
            oscc: 0,
        }
    }
}

impl PowerClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    fn power_index(offset: u32) -> Option<usize> {
        let index = (offset / 4) as usize;
        (offset % 4 == 0 && index < POWER_REGISTERS && offset != 0x2C).then_some(index)
    }

    pub fn read_power(&self, offset: u32) -> u32 {
        trace!("PWR register read: offset={:#X}", offset);

        match Self::power_index(offset) {
            Some(index) => self.power[index],
            None => {
                warn!("Unknown PWR register read: offset={:#X}", offset);
                0
            }
        }
    }

    pub fn write_power(&mut self, offset: u32, value: u32) {
        trace!("PWR register write: offset={:#X}, value={:#X}", offset, value);

        match offset {
            // write 1 to clear
            power::registers::PSSR | power::registers::PEDR | power::registers::RCSR => {
                self.power[(offset / 4) as usize] &= !value;
            }
            _ => match Self::power_index(offset) {
                Some(index) => self.power[index] = value,
                None => warn!(
                    "Unknown PWR register write: offset={:#X}, value={:#X}",
                    offset, value
                ),
            },
        }
    }

    pub fn read_clock(&self, offset: u32) -> u32 {
        trace!("CLK register read: offset={:#X}", offset);

        match offset {
            clock::registers::CCCR => self.cccr,
            clock::registers::CKEN => self.cken,
            clock::registers::OSCC => self.oscc,
            _ => {
                warn!("Unknown CLK register read: offset={:#X}", offset);
                0
            }
        }
    }

    pub fn write_clock(&mut self, offset: u32, value: u32) {
        trace!("CLK register write: offset={:#X}, value={:#X}", offset, value);

        match offset {
            clock::registers::CCCR => self.cccr = value & 0x3FF,
            clock::registers::CKEN => self.cken = value,
            // OON is sticky; OOK reports the oscillator as stable right away
            clock::registers::OSCC => {
                if value & 0x2 != 0 {
                    self.oscc |= 0x3;
                }
            }
            _ => {
                warn!(
                    "Unknown CLK register write: offset={:#X}, value={:#X}",
                    offset, value
                );
            }
        }
    }
}
