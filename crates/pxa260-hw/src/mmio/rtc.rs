//! # References
//! - PXA255 Developer's Manual, section 4.3 "Real-Time Clock"

/// RTC base address
pub const BASE: u32 = 0x4090_0000;

/// Register window size
pub const SIZE: u32 = 0x10;

/// Register offsets (relative to `BASE`)
pub mod registers {
    /// Counter (seconds)
    pub const RCNR: u32 = 0x00;
    /// Alarm
    pub const RTAR: u32 = 0x04;
    /// Status
    pub const RTSR: u32 = 0x08;
    /// Trim
    pub const RTTR: u32 = 0x0C;
}

/// RTSR bits
pub mod rtsr {
    /// Alarm detected (write 1 to clear)
    pub const AL: u32 = 1 << 0;
    /// 1 Hz tick detected (write 1 to clear)
    pub const HZ: u32 = 1 << 1;
    /// Alarm interrupt enable
    pub const ALE: u32 = 1 << 2;
    /// 1 Hz interrupt enable
    pub const HZE: u32 = 1 << 3;
}

/// RTTR after reset (32.768 kHz divider)
pub const RTTR_RESET: u32 = 0x7FFF;

pub const SECONDS_PER_MINUTE: u32 = 60;
pub const SECONDS_PER_HOUR: u32 = 60 * SECONDS_PER_MINUTE;
pub const SECONDS_PER_DAY: u32 = 24 * SECONDS_PER_HOUR;
