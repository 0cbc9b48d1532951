/// Clock specifications
pub mod clock {
    /// Main crystal feeding the OS timer and RTC prescaler (3.6864 MHz)
    pub const CRYSTAL_HZ: u32 = 3_686_400;

    /// Emulated frames per second
    pub const FRAMES_PER_SECOND: u32 = 60;

    /// OS timer ticks in one emulated frame
    pub const TICKS_PER_FRAME: u32 = CRYSTAL_HZ / FRAMES_PER_SECOND;
}

/// CPU reset state
pub mod cpu {
    /// CP15 control register value after hard reset
    pub const RESET_CONTROL: u32 = 0x0005_0078;

    /// Supervisor mode bits of the CPSR
    pub const MODE_SVC: u32 = 0x13;

    /// IRQ and FIQ disable bits of the CPSR
    pub const IRQ_FIQ_DISABLE: u32 = 0xC0;

    /// Low 28 CPSR bits after hard reset
    pub const RESET_CPSR_LOW28: u32 = MODE_SVC | IRQ_FIQ_DISABLE;
}

/// Interrupt controller source numbers
pub mod irq {
    pub const GPIO0: u8 = 8;
    pub const GPIO1: u8 = 9;
    pub const GPIO_X: u8 = 10;
    pub const PMU: u8 = 12;
    pub const LCD: u8 = 17;
    pub const I2C: u8 = 18;
    /// OS timer match 0; matches 1-3 follow consecutively
    pub const OST0: u8 = 26;
    pub const RTC_HZ: u8 = 30;
    pub const RTC_ALARM: u8 = 31;
}
