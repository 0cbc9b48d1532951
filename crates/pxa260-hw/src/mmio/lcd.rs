//! # References
//! - PXA255 Developer's Manual, section 7 "LCD Controller"

/// LCD controller base address
pub const BASE: u32 = 0x4400_0000;

/// Register offsets (relative to `BASE`)
pub mod registers {
    pub const LCCR0: u32 = 0x000;
    pub const LCCR1: u32 = 0x004;
    pub const LCCR2: u32 = 0x008;
    pub const LCCR3: u32 = 0x00C;
    /// Frame branch registers
    pub const FBR0: u32 = 0x020;
    pub const FBR1: u32 = 0x024;
    /// Status (write 1 to clear)
    pub const LCSR: u32 = 0x038;
    pub const LIIDR: u32 = 0x03C;
    pub const TRGBR: u32 = 0x040;
    pub const TCR: u32 = 0x044;
    /// DMA channel 0 descriptor registers; channel 1 follows at +0x10
    pub const FDADR0: u32 = 0x200;
    pub const FSADR0: u32 = 0x204;
    pub const FIDR0: u32 = 0x208;
    pub const LDCMD0: u32 = 0x20C;
    pub const FDADR1: u32 = 0x210;
    pub const LDCMD1: u32 = 0x21C;
}

/// LCCR0 bits
pub mod lccr0 {
    /// Controller enable
    pub const ENB: u32 = 1 << 0;
    /// Start-of-frame interrupt mask
    pub const SFM: u32 = 1 << 4;
    /// End-of-frame interrupt mask
    pub const EFM: u32 = 1 << 6;
}

/// LCSR bits
pub mod lcsr {
    /// Start of frame
    pub const SOF: u32 = 1 << 1;
    /// End of frame
    pub const EOF: u32 = 1 << 9;
}
