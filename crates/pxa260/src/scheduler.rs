//! Frame timing for the PXA260.
//!
//! The OS timer and RTC run off the 3.6864 MHz crystal. One emulated frame
//! is a fixed slice of crystal ticks; each tick advances the OS timer once.

use crate::mmio::Peripherals;
use pxa260_hw::specs::clock;
use tracing::trace;

// ================================================================================================
// Emulation Timing Constants
// ================================================================================================

/// PXA260 crystal frequency in Hz
/// Reference: PXA255 Developer's Manual, section 3.3 "Clock Manager"
pub const CRYSTAL_HZ: u32 = clock::CRYSTAL_HZ; // 3.6864 MHz

/// Target frames per second
pub const TARGET_FPS: u32 = clock::FRAMES_PER_SECOND;

/// Timer ticks to run per frame
pub const TICKS_PER_FRAME: u32 = clock::TICKS_PER_FRAME; // 61,440

/// Drives the timer-backed peripherals
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimingEngine {
    total_ticks: u64,
    frames: u64,
}

impl TimingEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Restore counters from a saved state
    pub fn restore(&mut self, total_ticks: u64, frames: u64) {
        self.total_ticks = total_ticks;
        self.frames = frames;
    }

    /// Get total ticks run since reset
    pub fn total_ticks(&self) -> u64 {
        self.total_ticks
    }

    /// Get frames run since reset
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Tick the OS timer `units` times
    pub fn run(&mut self, units: u32, peripherals: &mut Peripherals) {
        for _ in 0..units {
            peripherals.timer.tick(&mut peripherals.ic);
        }
        self.total_ticks += units as u64;
        trace!("Ran {} timer ticks, total {}", units, self.total_ticks);
    }

    /// Run one frame's worth of ticks and advance the RTC
    pub fn run_frame(&mut self, peripherals: &mut Peripherals) {
        self.run(TICKS_PER_FRAME, peripherals);
        peripherals.rtc.frame_elapsed(&mut peripherals.ic);
        self.frames += 1;
    }
}
