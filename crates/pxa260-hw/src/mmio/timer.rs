//! # References
//! - PXA255 Developer's Manual, section 4.4 "Operating System Timer"

/// OS timer base address
pub const BASE: u32 = 0x40A0_0000;

/// Register window size
pub const SIZE: u32 = 0x20;

/// Number of match registers
pub const MATCH_COUNT: usize = 4;

/// Register offsets (relative to `BASE`)
pub mod registers {
    /// Match registers 0-3 (consecutive words)
    pub const OSMR0: u32 = 0x00;
    pub const OSMR3: u32 = 0x0C;
    /// Counter
    pub const OSCR: u32 = 0x10;
    /// Status (write 1 to clear)
    pub const OSSR: u32 = 0x14;
    /// Watchdog match enable
    pub const OWER: u32 = 0x18;
    /// Interrupt enable
    pub const OIER: u32 = 0x1C;
}
