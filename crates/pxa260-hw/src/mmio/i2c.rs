//! # References
//! - PXA255 Developer's Manual, section 9 "I2C Bus Interface Unit"

/// I2C unit base address
pub const BASE: u32 = 0x4030_1680;

/// Register window size
pub const SIZE: u32 = 0x24;

/// Register offsets (relative to `BASE`)
pub mod registers {
    /// Bus monitor
    pub const IBMR: u32 = 0x00;
    /// Data buffer
    pub const IDBR: u32 = 0x08;
    /// Control
    pub const ICR: u32 = 0x10;
    /// Status (write 1 to clear)
    pub const ISR: u32 = 0x18;
    /// Slave address
    pub const ISAR: u32 = 0x20;
}

/// IBMR with both lines released
pub const IBMR_IDLE: u32 = 0x3;
