//! # References
//! - PXA255 Processor Developer's Manual, section 2.4 "Memory Map"
//! - Palm Tungsten T3 board wiring (W86L488 on nCS2)

/// Address bits discarded to form a bank index
pub const BANK_SHIFT: u32 = 26;

/// Size of one dispatch bank (64 MB)
pub const BANK_SIZE: u32 = 1 << BANK_SHIFT;

/// Number of banks covering the 32-bit physical address space
pub const TOTAL_BANKS: usize = 1 << (32 - BANK_SHIFT);

/// Bank holding `address`
pub const fn bank_of(address: u32) -> usize {
    (address >> BANK_SHIFT) as usize
}

/// Last bank touched by a range starting at `start` of `size` bytes.
/// Ranges running past the top of the address space stop at the last bank.
pub const fn end_bank_of(start: u32, size: u32) -> usize {
    bank_of(start.saturating_add(size.saturating_sub(1)))
}

/// Boot flash on static chip select 0
pub mod rom {
    /// ROM base address
    pub const BASE: u32 = 0x0000_0000;
    /// Tungsten T3 flash size (16 MB)
    pub const SIZE: u32 = 16 * 1024 * 1024;
}

/// SDRAM bank 0
pub mod ram {
    /// RAM base address
    pub const BASE: u32 = 0xA000_0000;
    /// Tungsten T3 SDRAM size (64 MB)
    pub const SIZE: u32 = 64 * 1024 * 1024;
}

/// Winbond W86L488 SD/MMC bridge on static chip select 2
pub mod w86l488 {
    /// Chip select 2 base address
    pub const BASE: u32 = 0x0800_0000;
    /// Decoded window size
    pub const SIZE: u32 = 64 * 1024;
}

/// PCMCIA / CompactFlash socket 0
pub mod pcmcia0 {
    pub const BASE: u32 = 0x2000_0000;
    /// 256 MB (I/O, attribute and memory space)
    pub const SIZE: u32 = 0x1000_0000;
}

/// PCMCIA / CompactFlash socket 1
pub mod pcmcia1 {
    pub const BASE: u32 = 0x3000_0000;
    /// 256 MB (I/O, attribute and memory space)
    pub const SIZE: u32 = 0x1000_0000;
}

/// On-chip peripheral register space
pub mod io {
    pub const BASE: u32 = 0x4000_0000;
    pub const SIZE: u32 = super::BANK_SIZE;
}

/// LCD controller register space
pub mod lcd {
    pub const BASE: u32 = 0x4400_0000;
    pub const SIZE: u32 = super::BANK_SIZE;
}

/// Memory controller register space
pub mod memctrl {
    pub const BASE: u32 = 0x4800_0000;
    pub const SIZE: u32 = super::BANK_SIZE;
}
