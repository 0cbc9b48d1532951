//! Winbond W86L488 SD/MMC bridge, 16-bit bus on nCS2.

/// Number of half-word registers decoded by the chip
pub const REGISTER_COUNT: usize = 16;

/// Address bits selecting a register (mirrored through the window)
pub const REGISTER_MASK: u32 = (REGISTER_COUNT as u32 * 2) - 1;
