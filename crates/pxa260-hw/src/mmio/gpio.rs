//! # References
//! - PXA255 Developer's Manual, section 4.1 "General-Purpose I/O"

/// GPIO base address
pub const BASE: u32 = 0x40E0_0000;

/// Register window size
pub const SIZE: u32 = 0x6C;

/// Number of 32-pin banks
pub const BANKS: usize = 3;

/// Highest usable pin number
pub const MAX_PIN: u8 = 84;

/// Register offsets (relative to `BASE`); each group holds one word per bank
pub mod registers {
    /// Pin level
    pub const GPLR0: u32 = 0x00;
    /// Pin direction (1 = output)
    pub const GPDR0: u32 = 0x0C;
    /// Output set
    pub const GPSR0: u32 = 0x18;
    /// Output clear
    pub const GPCR0: u32 = 0x24;
    /// Rising edge detect enable
    pub const GRER0: u32 = 0x30;
    /// Falling edge detect enable
    pub const GFER0: u32 = 0x3C;
    /// Edge detect status (write 1 to clear)
    pub const GEDR0: u32 = 0x48;
    /// Alternate function, six words (GAFR0_L .. GAFR2_U)
    pub const GAFR0_L: u32 = 0x54;
}
