//! # References
//! - PXA255 Developer's Manual, section 6 "Memory Controller"

/// Memory controller base address
pub const BASE: u32 = 0x4800_0000;

/// Register window size
pub const SIZE: u32 = 0x60;

/// Register offsets (relative to `BASE`)
pub mod registers {
    pub const MDCNFG: u32 = 0x00;
    pub const MDREFR: u32 = 0x04;
    pub const MSC0: u32 = 0x08;
    pub const MSC1: u32 = 0x0C;
    pub const MSC2: u32 = 0x10;
    pub const MECR: u32 = 0x14;
    pub const SXCNFG: u32 = 0x1C;
    pub const SXMRS: u32 = 0x24;
    pub const MCMEM0: u32 = 0x28;
    pub const MCMEM1: u32 = 0x2C;
    pub const MCATT0: u32 = 0x30;
    pub const MCATT1: u32 = 0x34;
    pub const MCIO0: u32 = 0x38;
    pub const MCIO1: u32 = 0x3C;
    pub const MDMRS: u32 = 0x40;
    pub const BOOT_DEF: u32 = 0x44;
    pub const MDMRSLP: u32 = 0x58;
}
