//! Memory-mapped peripheral routing for the PXA260.
//!
//! The dispatch table hands each access the full physical address. This
//! module turns it into a block-local offset and forwards it to the owning
//! peripheral. Width gating happens in the dispatch table; by the time an
//! access arrives here its width is already one the block supports.
//!
//! # Memory Map
//! - `0x0800_0000`: W86L488 SD bridge on nCS2 (half-word only)
//! - `0x2000_0000`, `0x3000_0000`: PCMCIA sockets 0 and 1
//! - `0x4000_0000-0x43FF_FFFF`: on-chip peripherals (byte and word)
//! - `0x4400_0000`: LCD controller (word only)
//! - `0x4800_0000`: memory controller (word only)

use pxa260_hw::{memory_map, mmio as hw_mmio};
use tracing::instrument;

pub mod generic;
pub mod gpio;
pub mod i2c;
pub mod ic;
pub mod lcd;
pub mod memctrl;
pub mod pwrclk;
pub mod rtc;
pub mod timer;
pub mod w86l488;

pub use gpio::Gpio;
pub use i2c::I2c;
pub use ic::InterruptController;
pub use lcd::LcdController;
pub use memctrl::MemoryController;
pub use pwrclk::PowerClock;
pub use rtc::Rtc;
pub use timer::OsTimer;
pub use w86l488::W86l488;

use crate::error::AccessWidth;

/// On-chip blocks inside the IO bank
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoBlock {
    I2c,
    Rtc,
    Timer,
    Interrupts,
    Gpio,
    Power,
    Clock,
    Unmodeled,
}

const IO_BLOCKS: [(IoBlock, u32, u32); 7] = [
    (IoBlock::I2c, hw_mmio::i2c::BASE, hw_mmio::i2c::SIZE),
    (IoBlock::Rtc, hw_mmio::rtc::BASE, hw_mmio::rtc::SIZE),
    (IoBlock::Timer, hw_mmio::timer::BASE, hw_mmio::timer::SIZE),
    (IoBlock::Interrupts, hw_mmio::ic::BASE, hw_mmio::ic::SIZE),
    (IoBlock::Gpio, hw_mmio::gpio::BASE, hw_mmio::gpio::SIZE),
    (IoBlock::Power, hw_mmio::pwrclk::power::BASE, hw_mmio::pwrclk::power::SIZE),
    (IoBlock::Clock, hw_mmio::pwrclk::clock::BASE, hw_mmio::pwrclk::clock::SIZE),
];

/// Block owning `address` and the offset inside it
pub fn locate_io(address: u32) -> (IoBlock, u32) {
    IO_BLOCKS
        .iter()
        .find(|(_, base, size)| address.wrapping_sub(*base) < *size)
        .map(|&(block, base, _)| (block, address - base))
        .unwrap_or((IoBlock::Unmodeled, address.wrapping_sub(memory_map::io::BASE)))
}

/// Every peripheral owned by the emulator context
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Peripherals {
    pub ic: InterruptController,
    pub pwrclk: PowerClock,
    pub lcd: LcdController,
    pub timer: OsTimer,
    pub gpio: Gpio,
    pub i2c: I2c,
    pub rtc: Rtc,
    pub memctrl: MemoryController,
    pub w86l488: W86l488,
}

impl Peripherals {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return every block to its power-on state
    pub fn reset(&mut self) {
        self.ic.reset();
        self.pwrclk.reset();
        self.lcd.reset();
        self.timer.reset();
        self.gpio.reset();
        self.i2c.reset();
        self.rtc.reset();
        self.memctrl.reset();
        self.w86l488.reset();
    }

    #[instrument(level = "trace", skip(self))]
    pub fn io_read_word(&mut self, address: u32) -> u32 {
        let address = address & !3;
        let (block, offset) = locate_io(address);
        match block {
            IoBlock::I2c => self.i2c.read(offset),
            IoBlock::Rtc => self.rtc.read(offset),
            IoBlock::Timer => self.timer.read(offset),
            IoBlock::Interrupts => self.ic.read(offset),
            IoBlock::Gpio => self.gpio.read(offset),
            IoBlock::Power => self.pwrclk.read_power(offset),
            IoBlock::Clock => self.pwrclk.read_clock(offset),
            IoBlock::Unmodeled => generic::read("IO", address, AccessWidth::Word),
        }
    }

    #[instrument(level = "trace", skip(self))]
    pub fn io_write_word(&mut self, address: u32, value: u32) {
        let address = address & !3;
        let (block, offset) = locate_io(address);
        match block {
            IoBlock::I2c => self.i2c.write(offset, value),
            IoBlock::Rtc => self.rtc.write(offset, value, &mut self.ic),
            IoBlock::Timer => self.timer.write(offset, value, &mut self.ic),
            IoBlock::Interrupts => self.ic.write(offset, value),
            IoBlock::Gpio => self.gpio.write(offset, value, &mut self.ic),
            IoBlock::Power => self.pwrclk.write_power(offset, value),
            IoBlock::Clock => self.pwrclk.write_clock(offset, value),
            IoBlock::Unmodeled => generic::write("IO", address, AccessWidth::Word, value),
        }
    }

    /// Byte lane of the containing word register
    #[instrument(level = "trace", skip(self))]
    pub fn io_read_byte(&mut self, address: u32) -> u8 {
        if locate_io(address).0 == IoBlock::Unmodeled {
            return generic::read("IO", address, AccessWidth::Byte) as u8;
        }
        let shift = (address & 3) * 8;
        (self.io_read_word(address) >> shift) as u8
    }

    /// Byte written into its lane of the containing word register, other
    /// lanes zero
    #[instrument(level = "trace", skip(self))]
    pub fn io_write_byte(&mut self, address: u32, value: u8) {
        if locate_io(address).0 == IoBlock::Unmodeled {
            generic::write("IO", address, AccessWidth::Byte, value as u32);
            return;
        }
        // No read-modify-write: a plain register such as ICMR or GPDR loses
        // its other three lanes, a write-1-clear register only clears bits
        // in the addressed lane.
        let shift = (address & 3) * 8;
        self.io_write_word(address, (value as u32) << shift);
    }

    #[instrument(level = "trace", skip(self))]
    pub fn lcd_read_word(&mut self, address: u32) -> u32 {
        self.lcd.read((address & !3) - memory_map::lcd::BASE)
    }

    #[instrument(level = "trace", skip(self))]
    pub fn lcd_write_word(&mut self, address: u32, value: u32) {
        self.lcd
            .write((address & !3) - memory_map::lcd::BASE, value, &mut self.ic);
    }

    #[instrument(level = "trace", skip(self))]
    pub fn memctrl_read_word(&mut self, address: u32) -> u32 {
        self.memctrl.read((address & !3) - memory_map::memctrl::BASE)
    }

    #[instrument(level = "trace", skip(self))]
    pub fn memctrl_write_word(&mut self, address: u32, value: u32) {
        self.memctrl
            .write((address & !3) - memory_map::memctrl::BASE, value);
    }

    #[instrument(level = "trace", skip(self))]
    pub fn static_chip_select_2_read_half(&mut self, address: u32) -> u16 {
        self.w86l488
            .read((address & !1) - memory_map::w86l488::BASE)
    }

    #[instrument(level = "trace", skip(self))]
    pub fn static_chip_select_2_write_half(&mut self, address: u32, value: u16) {
        self.w86l488
            .write((address & !1) - memory_map::w86l488::BASE, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pxa260_hw::mmio::{i2c, ic as hw_ic, timer as hw_timer};

    #[test]
    fn io_addresses_route_to_blocks() {
        assert_eq!(locate_io(0x40A0_0010), (IoBlock::Timer, 0x10));
        assert_eq!(locate_io(0x40D0_0004), (IoBlock::Interrupts, 0x04));
        assert_eq!(locate_io(0x4130_0004), (IoBlock::Clock, 0x04));
        assert_eq!(locate_io(0x4030_1690), (IoBlock::I2c, 0x10));
        assert_eq!(locate_io(0x4010_0000), (IoBlock::Unmodeled, 0x0010_0000));
    }

    #[test]
    fn word_writes_reach_the_owning_block() {
        let mut p = Peripherals::new();
        p.io_write_word(hw_timer::BASE + hw_timer::registers::OSMR0 + 8, 0x1234);
        assert_eq!(p.timer.matches[2], 0x1234);

        p.io_write_word(hw_ic::BASE + hw_ic::registers::ICMR, 0xFFFF_0000);
        assert_eq!(p.io_read_word(hw_ic::BASE + hw_ic::registers::ICMR), 0xFFFF_0000);
    }

    #[test]
    fn byte_accesses_use_lanes() {
        let mut p = Peripherals::new();
        p.io_write_word(hw_ic::BASE + hw_ic::registers::ICMR, 0xAABB_CCDD);
        assert_eq!(p.io_read_byte(hw_ic::BASE + hw_ic::registers::ICMR + 2), 0xBB);

        p.io_write_byte(i2c::BASE + i2c::registers::IDBR, 0x5A);
        assert_eq!(p.i2c.data, 0x5A);
    }

    #[test]
    fn byte_write_to_plain_register_zeroes_other_lanes() {
        let mut p = Peripherals::new();
        let icmr = hw_ic::BASE + hw_ic::registers::ICMR;
        p.io_write_word(icmr, 0xAABB_CCDD);
        p.io_write_byte(icmr + 1, 0x12);
        assert_eq!(p.ic.mask, 0x0000_1200);
        assert_eq!(p.io_read_word(icmr), 0x0000_1200);
    }

    #[test]
    fn unmodeled_blocks_read_zero() {
        let mut p = Peripherals::new();
        p.io_write_word(0x4010_0000, 0xFFFF_FFFF);
        assert_eq!(p.io_read_word(0x4010_0000), 0);
        assert_eq!(p.io_read_byte(0x4010_0001), 0);
    }

    #[test]
    fn chip_select_2_mirrors_registers() {
        let mut p = Peripherals::new();
        p.static_chip_select_2_write_half(0x0800_0004, 0xBEEF);
        assert_eq!(p.static_chip_select_2_read_half(0x0800_0024), 0xBEEF);
    }
}
