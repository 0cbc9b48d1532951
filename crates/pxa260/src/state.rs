//! Save-state serialization.
//!
//! A state is a fixed little-endian layout:
//!
//! ```text
//! magic "PXAS" | version | rom_size | ram_size
//! cpu | dsp | timing
//! ic | pwrclk | lcd | timer | gpio | i2c | rtc | memctrl | w86l488
//! rom bytes | ram bytes
//! ```
//!
//! Every block has a fixed size, so the total only depends on the region
//! sizes.

use crate::cpu_types::CpuState;
use crate::dsp::Dsp;
use crate::error::StateError;
use crate::mmio::{
    Gpio, I2c, InterruptController, LcdController, MemoryController, OsTimer, Peripherals,
    PowerClock, Rtc, W86l488,
};
use crate::scheduler::TimingEngine;
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io::{self, Read, Write};

pub const MAGIC: [u8; 4] = *b"PXAS";
pub const VERSION: u32 = 1;

/// Bytes taken by the magic, version and region sizes
pub const HEADER_LEN: usize = 16;

impl From<io::Error> for StateError {
    fn from(_: io::Error) -> Self {
        StateError::Truncated
    }
}

/// A block with a fixed-size binary form
pub trait Snapshot {
    fn save<W: Write>(&self, w: &mut W) -> io::Result<()>;
    fn load<R: Read>(&mut self, r: &mut R) -> io::Result<()>;
}

fn write_words<W: Write>(w: &mut W, words: &[u32]) -> io::Result<()> {
    words
        .iter()
        .try_for_each(|&word| w.write_u32::<LittleEndian>(word))
}

fn write_halves<W: Write>(w: &mut W, halves: &[u16]) -> io::Result<()> {
    halves
        .iter()
        .try_for_each(|&half| w.write_u16::<LittleEndian>(half))
}

/// Region sizes recorded in a state header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub rom_size: u32,
    pub ram_size: u32,
}

impl Header {
    pub fn save<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_all(&MAGIC)?;
        w.write_u32::<LittleEndian>(VERSION)?;
        w.write_u32::<LittleEndian>(self.rom_size)?;
        w.write_u32::<LittleEndian>(self.ram_size)
    }

    /// Parse and validate a header
    pub fn load<R: Read>(r: &mut R) -> Result<Self, StateError> {
        let mut magic = [0u8; 4];
        r.read_exact(&mut magic)?;
        if magic != MAGIC {
            return Err(StateError::BadMagic);
        }
        let version = r.read_u32::<LittleEndian>()?;
        if version != VERSION {
            return Err(StateError::UnsupportedVersion(version));
        }
        Ok(Self {
            rom_size: r.read_u32::<LittleEndian>()?,
            ram_size: r.read_u32::<LittleEndian>()?,
        })
    }
}

impl Snapshot for CpuState {
    fn save<W: Write>(&self, w: &mut W) -> io::Result<()> {
        write_words(w, &self.regs)?;
        w.write_u32::<LittleEndian>(self.cpsr_low28)?;
        w.write_u32::<LittleEndian>(self.control)?;
        w.write_u32::<LittleEndian>(self.cpu_events)?;
        w.write_i32::<LittleEndian>(self.cycle_count_delta)
    }

    fn load<R: Read>(&mut self, r: &mut R) -> io::Result<()> {
        r.read_u32_into::<LittleEndian>(&mut self.regs)?;
        self.cpsr_low28 = r.read_u32::<LittleEndian>()?;
        self.control = r.read_u32::<LittleEndian>()?;
        self.cpu_events = r.read_u32::<LittleEndian>()?;
        self.cycle_count_delta = r.read_i32::<LittleEndian>()?;
        Ok(())
    }
}

impl Snapshot for Dsp {
    fn save<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_u64::<LittleEndian>(self.acc0())
    }

    fn load<R: Read>(&mut self, r: &mut R) -> io::Result<()> {
        self.set_acc0(r.read_u64::<LittleEndian>()?);
        Ok(())
    }
}

impl Snapshot for TimingEngine {
    fn save<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_u64::<LittleEndian>(self.total_ticks())?;
        w.write_u64::<LittleEndian>(self.frames())
    }

    fn load<R: Read>(&mut self, r: &mut R) -> io::Result<()> {
        let total_ticks = r.read_u64::<LittleEndian>()?;
        let frames = r.read_u64::<LittleEndian>()?;
        self.restore(total_ticks, frames);
        Ok(())
    }
}

impl Snapshot for InterruptController {
    fn save<W: Write>(&self, w: &mut W) -> io::Result<()> {
        write_words(w, &[self.pending, self.mask, self.level, self.control])
    }

    fn load<R: Read>(&mut self, r: &mut R) -> io::Result<()> {
        self.pending = r.read_u32::<LittleEndian>()?;
        self.mask = r.read_u32::<LittleEndian>()?;
        self.level = r.read_u32::<LittleEndian>()?;
        self.control = r.read_u32::<LittleEndian>()?;
        Ok(())
    }
}

impl Snapshot for PowerClock {
    fn save<W: Write>(&self, w: &mut W) -> io::Result<()> {
        write_words(w, &self.power)?;
        write_words(w, &[self.cccr, self.cken, self.oscc])
    }

    fn load<R: Read>(&mut self, r: &mut R) -> io::Result<()> {
        r.read_u32_into::<LittleEndian>(&mut self.power)?;
        self.cccr = r.read_u32::<LittleEndian>()?;
        self.cken = r.read_u32::<LittleEndian>()?;
        self.oscc = r.read_u32::<LittleEndian>()?;
        Ok(())
    }
}

impl Snapshot for LcdController {
    fn save<W: Write>(&self, w: &mut W) -> io::Result<()> {
        write_words(w, &self.lccr)?;
        write_words(w, &self.fbr)?;
        write_words(w, &[self.lcsr, self.liidr, self.trgbr, self.tcr])?;
        for desc in &self.channels {
            write_words(w, &[desc.fdadr, desc.fsadr, desc.fidr, desc.ldcmd])?;
        }
        w.write_u64::<LittleEndian>(self.frames)
    }

    fn load<R: Read>(&mut self, r: &mut R) -> io::Result<()> {
        r.read_u32_into::<LittleEndian>(&mut self.lccr)?;
        r.read_u32_into::<LittleEndian>(&mut self.fbr)?;
        self.lcsr = r.read_u32::<LittleEndian>()?;
        self.liidr = r.read_u32::<LittleEndian>()?;
        self.trgbr = r.read_u32::<LittleEndian>()?;
        self.tcr = r.read_u32::<LittleEndian>()?;
        for desc in &mut self.channels {
            desc.fdadr = r.read_u32::<LittleEndian>()?;
            desc.fsadr = r.read_u32::<LittleEndian>()?;
            desc.fidr = r.read_u32::<LittleEndian>()?;
            desc.ldcmd = r.read_u32::<LittleEndian>()?;
        }
        self.frames = r.read_u64::<LittleEndian>()?;
        Ok(())
    }
}

impl Snapshot for OsTimer {
    fn save<W: Write>(&self, w: &mut W) -> io::Result<()> {
        write_words(w, &self.matches)?;
        write_words(
            w,
            &[
                self.counter,
                self.status,
                self.watchdog_enable,
                self.interrupt_enable,
            ],
        )
    }

    fn load<R: Read>(&mut self, r: &mut R) -> io::Result<()> {
        r.read_u32_into::<LittleEndian>(&mut self.matches)?;
        self.counter = r.read_u32::<LittleEndian>()?;
        self.status = r.read_u32::<LittleEndian>()?;
        self.watchdog_enable = r.read_u32::<LittleEndian>()?;
        self.interrupt_enable = r.read_u32::<LittleEndian>()?;
        Ok(())
    }
}

impl Snapshot for Gpio {
    fn save<W: Write>(&self, w: &mut W) -> io::Result<()> {
        write_words(w, &self.inputs)?;
        write_words(w, &self.outputs)?;
        write_words(w, &self.direction)?;
        write_words(w, &self.rising_enable)?;
        write_words(w, &self.falling_enable)?;
        write_words(w, &self.edge_detect)?;
        write_words(w, &self.alt_function)
    }

    fn load<R: Read>(&mut self, r: &mut R) -> io::Result<()> {
        r.read_u32_into::<LittleEndian>(&mut self.inputs)?;
        r.read_u32_into::<LittleEndian>(&mut self.outputs)?;
        r.read_u32_into::<LittleEndian>(&mut self.direction)?;
        r.read_u32_into::<LittleEndian>(&mut self.rising_enable)?;
        r.read_u32_into::<LittleEndian>(&mut self.falling_enable)?;
        r.read_u32_into::<LittleEndian>(&mut self.edge_detect)?;
        r.read_u32_into::<LittleEndian>(&mut self.alt_function)
    }
}

impl Snapshot for I2c {
    fn save<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_u8(self.data)?;
        w.write_u16::<LittleEndian>(self.control)?;
        w.write_u16::<LittleEndian>(self.status)?;
        w.write_u8(self.slave_address)
    }

    fn load<R: Read>(&mut self, r: &mut R) -> io::Result<()> {
        self.data = r.read_u8()?;
        self.control = r.read_u16::<LittleEndian>()?;
        self.status = r.read_u16::<LittleEndian>()?;
        self.slave_address = r.read_u8()?;
        Ok(())
    }
}

impl Snapshot for Rtc {
    fn save<W: Write>(&self, w: &mut W) -> io::Result<()> {
        write_words(
            w,
            &[
                self.counter,
                self.alarm,
                self.status,
                self.trim,
                self.frame_phase,
            ],
        )
    }

    fn load<R: Read>(&mut self, r: &mut R) -> io::Result<()> {
        self.counter = r.read_u32::<LittleEndian>()?;
        self.alarm = r.read_u32::<LittleEndian>()?;
        self.status = r.read_u32::<LittleEndian>()?;
        self.trim = r.read_u32::<LittleEndian>()?;
        self.frame_phase = r.read_u32::<LittleEndian>()?;
        Ok(())
    }
}

impl Snapshot for MemoryController {
    fn save<W: Write>(&self, w: &mut W) -> io::Result<()> {
        write_words(w, &self.registers)
    }

    fn load<R: Read>(&mut self, r: &mut R) -> io::Result<()> {
        r.read_u32_into::<LittleEndian>(&mut self.registers)
    }
}

impl Snapshot for W86l488 {
    fn save<W: Write>(&self, w: &mut W) -> io::Result<()> {
        write_halves(w, &self.registers)
    }

    fn load<R: Read>(&mut self, r: &mut R) -> io::Result<()> {
        r.read_u16_into::<LittleEndian>(&mut self.registers)
    }
}

impl Snapshot for Peripherals {
    fn save<W: Write>(&self, w: &mut W) -> io::Result<()> {
        self.ic.save(w)?;
        self.pwrclk.save(w)?;
        self.lcd.save(w)?;
        self.timer.save(w)?;
        self.gpio.save(w)?;
        self.i2c.save(w)?;
        self.rtc.save(w)?;
        self.memctrl.save(w)?;
        self.w86l488.save(w)
    }

    fn load<R: Read>(&mut self, r: &mut R) -> io::Result<()> {
        self.ic.load(r)?;
        self.pwrclk.load(r)?;
        self.lcd.load(r)?;
        self.timer.load(r)?;
        self.gpio.load(r)?;
        self.i2c.load(r)?;
        self.rtc.load(r)?;
        self.memctrl.load(r)?;
        self.w86l488.load(r)
    }
}

/// Serialized size of a block
pub fn encoded_len<S: Snapshot>(block: &S) -> usize {
    let mut buf = Vec::new();
    // writes into a Vec cannot fail
    let _ = block.save(&mut buf);
    buf.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_rejects_bad_magic_and_version() {
        let mut buf = Vec::new();
        Header {
            rom_size: 0x1000,
            ram_size: 0x4000,
        }
        .save(&mut buf)
        .unwrap();
        assert_eq!(buf.len(), HEADER_LEN);
        assert_eq!(
            Header::load(&mut &buf[..]),
            Ok(Header {
                rom_size: 0x1000,
                ram_size: 0x4000
            })
        );

        let mut bad = buf.clone();
        bad[0] = b'X';
        assert_eq!(Header::load(&mut &bad[..]), Err(StateError::BadMagic));

        let mut bad = buf.clone();
        bad[4] = 2;
        assert_eq!(
            Header::load(&mut &bad[..]),
            Err(StateError::UnsupportedVersion(2))
        );

        assert_eq!(Header::load(&mut &buf[..6]), Err(StateError::Truncated));
    }

    #[test]
    fn peripherals_restore_from_snapshot() {
        let mut peripherals = Peripherals::new();
        peripherals.timer.counter = 0x1234;
        peripherals.timer.matches[3] = 0x99;
        peripherals.rtc.counter = 86_400;
        peripherals.gpio.alt_function[5] = 0xAAAA;
        peripherals.i2c.slave_address = 0x2A;
        peripherals.w86l488.registers[15] = 0xBEEF;
        peripherals.lcd.frames = 7;

        let mut buf = Vec::new();
        peripherals.save(&mut buf).unwrap();
        assert_eq!(buf.len(), encoded_len(&Peripherals::new()));

        let mut restored = Peripherals::new();
        restored.load(&mut &buf[..]).unwrap();
        assert_eq!(restored, peripherals);
    }

    #[test]
    fn short_input_is_truncated() {
        let mut cpu = CpuState::new();
        let err = cpu.load(&mut &[0u8; 10][..]).unwrap_err();
        assert_eq!(StateError::from(err), StateError::Truncated);
    }
}
