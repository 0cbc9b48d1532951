//! # References
//! - PXA255 Developer's Manual, section 3 "Clocks and Power Manager"

/// Power manager block
pub mod power {
    /// Power manager base address
    pub const BASE: u32 = 0x40F0_0000;

    /// Register window size
    pub const SIZE: u32 = 0x34;

    /// Register offsets (relative to `BASE`)
    pub mod registers {
        pub const PMCR: u32 = 0x00;
        pub const PSSR: u32 = 0x04;
        pub const PSPR: u32 = 0x08;
        pub const PWER: u32 = 0x0C;
        pub const PRER: u32 = 0x10;
        pub const PFER: u32 = 0x14;
        pub const PEDR: u32 = 0x18;
        pub const PCFR: u32 = 0x1C;
        pub const PGSR0: u32 = 0x20;
        pub const PGSR1: u32 = 0x24;
        pub const PGSR2: u32 = 0x28;
        pub const RCSR: u32 = 0x30;
    }

    /// RCSR after power-on: hardware reset flag
    pub const RCSR_RESET: u32 = 0x1;
}

/// Clock manager block
pub mod clock {
    /// Clock manager base address
    pub const BASE: u32 = 0x4130_0000;

    /// Register window size
    pub const SIZE: u32 = 0x0C;

    /// Register offsets (relative to `BASE`)
    pub mod registers {
        /// Core clock configuration
        pub const CCCR: u32 = 0x00;
        /// Clock enable
        pub const CKEN: u32 = 0x04;
        /// Oscillator configuration
        pub const OSCC: u32 = 0x08;
    }

    /// CCCR after reset (L=27, M=2, N=1.0: 199.1 MHz turbo-off)
    pub const CCCR_RESET: u32 = 0x121;
    /// CKEN after reset: every unit clock on
    pub const CKEN_RESET: u32 = 0x17DEF;
}
