//! # References
//! - PXA255 Developer's Manual, section 4.2 "Interrupt Controller"

/// Interrupt controller base address
pub const BASE: u32 = 0x40D0_0000;

/// Register window size
pub const SIZE: u32 = 0x18;

/// Register offsets (relative to `BASE`)
pub mod registers {
    /// IRQ pending
    pub const ICIP: u32 = 0x00;
    /// Mask
    pub const ICMR: u32 = 0x04;
    /// Level (0 = IRQ, 1 = FIQ)
    pub const ICLR: u32 = 0x08;
    /// FIQ pending
    pub const ICFP: u32 = 0x0C;
    /// Raw pending
    pub const ICPR: u32 = 0x10;
    /// Control (bit 0: DIM, idle mask disable)
    pub const ICCR: u32 = 0x14;
}
