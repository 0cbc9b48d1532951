//! OS timer register handling.
//!
//! The counter advances once per `tick`, which the lifecycle controller calls
//! at the 3.6864 MHz crystal rate. A counter match latches the status bit and,
//! when enabled, raises the matching OST interrupt line.

use super::ic::InterruptController;
use pxa260_hw::mmio::timer::{MATCH_COUNT, registers as hw_regs};
use pxa260_hw::specs::irq;
use tracing::{trace, warn};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OsTimer {
    pub matches: [u32; MATCH_COUNT],
    pub counter: u32,
    pub status: u32,
    pub watchdog_enable: u32,
    pub interrupt_enable: u32,
}

impl OsTimer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn tick(&mut self, ic: &mut InterruptController) {
        self.counter = self.counter.wrapping_add(1);

        for (channel, &value) in self.matches.iter().enumerate() {
            if value != self.counter {
                continue;
            }
            self.status |= 1 << channel;
            if self.interrupt_enable & (1 << channel) != 0 {
                ic.raise(irq::OST0 + channel as u8);
            }
            if channel == MATCH_COUNT - 1 && self.watchdog_enable & 1 != 0 {
                warn!("OS timer watchdog expired at {:#X}", self.counter);
            }
        }
    }

    pub fn read(&self, offset: u32) -> u32 {
        trace!("OST register read: offset={:#X}", offset);

        match offset {
            hw_regs::OSMR0..=hw_regs::OSMR3 if offset % 4 == 0 => {
                self.matches[(offset / 4) as usize]
            }
            hw_regs::OSCR => self.counter,
            hw_regs::OSSR => self.status,
            hw_regs::OWER => self.watchdog_enable,
            hw_regs::OIER => self.interrupt_enable,
            _ => {
                warn!("Unknown OST register read: offset={:#X}", offset);
                0
            }
        }
    }

    pub fn write(&mut self, offset: u32, value: u32, ic: &mut InterruptController) {
        trace!("OST register write: offset={:#X}, value={:#X}", offset, value);

        match offset {
            hw_regs::OSMR0..=hw_regs::OSMR3 if offset % 4 == 0 => {
                self.matches[(offset / 4) as usize] = value;
            }
            hw_regs::OSCR => self.counter = value,
            hw_regs::OSSR => {
                let cleared = value & 0xF;
                self.status &= !cleared;
                for channel in 0..MATCH_COUNT {
                    if cleared & (1 << channel) != 0 {
                        ic.lower(irq::OST0 + channel as u8);
                    }
                }
            }
            // once set, the watchdog enable sticks until reset
            hw_regs::OWER => self.watchdog_enable |= value & 1,
            hw_regs::OIER => self.interrupt_enable = value & 0xF,
            _ => {
                warn!(
                    "Unknown OST register write: offset={:#X}, value={:#X}",
                    offset, value
                );
            }
        }
    }
}
