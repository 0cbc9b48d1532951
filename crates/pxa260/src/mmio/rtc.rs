//! Real-time clock register handling.
//!
//! The counter is a plain seconds count set by the host through `set_time`.
//! It advances once per emulated second of frames and survives a reset,
//! which only clears the alarm and interrupt state.

use super::ic::InterruptController;
use pxa260_hw::mmio::rtc::{
    RTTR_RESET, SECONDS_PER_DAY, SECONDS_PER_HOUR, SECONDS_PER_MINUTE, registers as hw_regs, rtsr,
};
use pxa260_hw::specs::{clock, irq};
use tracing::{debug, trace, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rtc {
    pub counter: u32,
    pub alarm: u32,
    pub status: u32,
    pub trim: u32,
    /// Frames seen since the last one-second tick
    pub frame_phase: u32,
}

impl Default for Rtc {
    fn default() -> Self {
        Self {
            counter: 0,
            alarm: 0,
            status: 0,
            trim: RTTR_RESET,
            frame_phase: 0,
        }
    }
}

impl Rtc {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self {
            counter: self.counter,
            ..Self::new()
        };
    }

    /// Times past `u32::MAX` seconds wrap, as RCNR is 32 bits wide
    pub fn set_time(&mut self, days: u16, hours: u8, minutes: u8, seconds: u8) {
        let total = days as u64 * SECONDS_PER_DAY as u64
            + hours as u64 * SECONDS_PER_HOUR as u64
            + minutes as u64 * SECONDS_PER_MINUTE as u64
            + seconds as u64;
        self.counter = total as u32;
        debug!("RTC set to {} seconds", self.counter);
    }

    /// Called once per emulated frame
    pub fn frame_elapsed(&mut self, ic: &mut InterruptController) {
        self.frame_phase += 1;
        if self.frame_phase < clock::FRAMES_PER_SECOND {
            return;
        }
        self.frame_phase = 0;

        self.counter = self.counter.wrapping_add(1);
        self.status |= rtsr::HZ;
        if self.counter == self.alarm {
            self.status |= rtsr::AL;
        }
        self.update_interrupts(ic);
    }

    fn update_interrupts(&self, ic: &mut InterruptController) {
        ic.set_line(
            irq::RTC_HZ,
            self.status & rtsr::HZ != 0 && self.status & rtsr::HZE != 0,
        );
        ic.set_line(
            irq::RTC_ALARM,
            self.status & rtsr::AL != 0 && self.status & rtsr::ALE != 0,
        );
    }

    pub fn read(&self, offset: u32) -> u32 {
        trace!("RTC register read: offset={:#X}", offset);

        match offset {
            hw_regs::RCNR => self.counter,
            hw_regs::RTAR => self.alarm,
            hw_regs::RTSR => self.status,
            hw_regs::RTTR => self.trim,
            _ => {
                warn!("Unknown RTC register read: offset={:#X}", offset);
                0
            }
        }
    }

    pub fn write(&mut self, offset: u32, value: u32, ic: &mut InterruptController) {
        trace!("RTC register write: offset={:#X}, value={:#X}", offset, value);

        match offset {
            hw_regs::RCNR => self.counter = value,
            hw_regs::RTAR => self.alarm = value,
            hw_regs::RTSR => {
                let enables = value & (rtsr::ALE | rtsr::HZE);
                let cleared = value & (rtsr::AL | rtsr::HZ);
                self.status = (self.status & !cleared & (rtsr::AL | rtsr::HZ)) | enables;
                self.update_interrupts(ic);
            }
            hw_regs::RTTR => self.trim = value,
            _ => {
                warn!(
                    "Unknown RTC register write: offset={:#X}, value={:#X}",
                    offset, value
                );
            }
        }
    }
}
