//! Core emulator API for the PXA260.
//!
//! This module owns every piece of machine state and exposes the lifecycle
//! entry points used by the CPU core and by frontends: init, reset, per-frame
//! execution, debugger reads, and save states.

use crate::bus::{Bus, DispatchTable};
use crate::cpu_types::{ArmRegister, CpuState};
use crate::dsp::Dsp;
use crate::error::{AccessWidth, EmulatorError, StateError};
use crate::memory::{NullTranslationCache, TranslationCache};
use crate::mmio::Peripherals;
use crate::scheduler::TimingEngine;
use crate::state::{self, Header, Snapshot};
use pxa260_hw::memory_map::{self, BANK_SIZE};
use std::io::{self, Read, Write};
use std::time::Instant;
use tracing::info;

/// Configuration for the emulator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmulatorConfig {
    /// Boot flash size in bytes
    pub rom_size: u32,
    /// SDRAM size in bytes
    pub ram_size: u32,
}

impl Default for EmulatorConfig {
    fn default() -> Self {
        Self {
            rom_size: memory_map::rom::SIZE,
            ram_size: memory_map::ram::SIZE,
        }
    }
}

impl EmulatorConfig {
    /// Both regions must be non-empty and fit inside their bank
    pub fn validate(&self) -> Result<(), EmulatorError> {
        for (name, size) in [("ROM", self.rom_size), ("RAM", self.ram_size)] {
            if size == 0 || size > BANK_SIZE {
                return Err(EmulatorError::InvalidConfig(format!(
                    "{} size {:#X} must be between 1 and {:#X} bytes",
                    name, size, BANK_SIZE
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    /// No arena, every bank unmapped
    Uninitialized,
    Ready,
    /// Inside `execute`
    Running,
}

/// Core emulator for the PXA260
pub struct Emulator {
    config: EmulatorConfig,
    state: LifecycleState,
    bus: Bus,
    cpu: CpuState,
    dsp: Dsp,
    timing: TimingEngine,
    cache: Box<dyn TranslationCache>,
    start_time: Instant,
}

impl Emulator {
    /// Create an uninitialized emulator
    pub fn new(config: EmulatorConfig) -> Self {
        Self {
            config,
            state: LifecycleState::Uninitialized,
            bus: Bus::default(),
            cpu: CpuState::new(),
            dsp: Dsp::new(),
            timing: TimingEngine::new(),
            cache: Box::new(NullTranslationCache),
            start_time: Instant::now(),
        }
    }

    /// Attach the translator's code cache, flushed before the arena goes away
    pub fn with_translation_cache(mut self, cache: Box<dyn TranslationCache>) -> Self {
        self.cache = cache;
        self
    }

    pub fn config(&self) -> &EmulatorConfig {
        &self.config
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    fn require_initialized(&self) -> Result<(), EmulatorError> {
        match self.state {
            LifecycleState::Uninitialized => Err(EmulatorError::NotInitialized),
            _ => Ok(()),
        }
    }

    /// Allocate memory and register every handler.
    ///
    /// Returns the ROM and RAM backing so the caller can load an image.
    pub fn init(&mut self) -> Result<(&mut [u8], &mut [u8]), EmulatorError> {
        if self.state != LifecycleState::Uninitialized {
            return Err(EmulatorError::AlreadyInitialized);
        }
        self.config.validate()?;

        info!("=== Memory Setup ===");
        self.bus
            .memory
            .init(self.config.rom_size, self.config.ram_size)?;
        self.bus.table = DispatchTable::pxa260();
        self.state = LifecycleState::Ready;
        info!("Emulator initialized");

        self.bus
            .memory
            .regions_mut()
            .ok_or(EmulatorError::NotInitialized)
    }

    /// Flush the translation cache, then release memory. No-op when not
    /// initialized.
    pub fn deinit(&mut self) {
        if self.state == LifecycleState::Uninitialized {
            return;
        }
        self.bus.memory.deinit(self.cache.as_mut());
        self.bus.table = DispatchTable::new();
        self.state = LifecycleState::Uninitialized;
        info!("Emulator deinitialized");
    }

    /// Power-on reset of every block, RAM and the CPU register file
    pub fn reset(&mut self) -> Result<(), EmulatorError> {
        self.require_initialized()?;

        self.bus.peripherals.reset();
        self.timing.reset();
        self.bus.memory.reset_ram();
        self.cpu.hard_reset();
        self.dsp.reset();
        self.start_time = Instant::now();

        info!(
            "Reset: control={:#010X} cpsr={:#X}",
            self.cpu.control, self.cpu.cpsr_low28
        );
        Ok(())
    }

    /// Run one frame of timer ticks, composing a video frame if asked
    pub fn execute(&mut self, want_video: bool) -> Result<(), EmulatorError> {
        self.require_initialized()?;
        self.state = LifecycleState::Running;

        let peripherals = &mut self.bus.peripherals;
        self.timing.run_frame(peripherals);
        if want_video {
            peripherals.lcd.frame(&mut peripherals.ic);
        }

        self.state = LifecycleState::Ready;
        Ok(())
    }

    pub fn get_register(&self, reg: ArmRegister) -> u32 {
        self.cpu.reg(reg)
    }

    /// Debugger read; `u64::MAX` where the access would fault
    pub fn read_arbitrary_memory(&mut self, address: u32, width: AccessWidth) -> u64 {
        self.bus.peek(address, width)
    }

    /// Set the RTC counter to the given time since the epoch
    pub fn set_rtc(&mut self, days: u16, hours: u8, minutes: u8, seconds: u8) {
        self.bus
            .peripherals
            .rtc
            .set_time(days, hours, minutes, seconds);
    }

    /// Run a coprocessor 0 instruction; `false` if it is not a DSP encoding
    pub fn coprocessor_instruction(&mut self, insn: u32) -> bool {
        self.dsp.execute_instruction(&mut self.cpu, insn)
    }

    pub fn bus(&self) -> &Bus {
        &self.bus
    }

    pub fn bus_mut(&mut self) -> &mut Bus {
        &mut self.bus
    }

    pub fn cpu(&self) -> &CpuState {
        &self.cpu
    }

    pub fn cpu_mut(&mut self) -> &mut CpuState {
        &mut self.cpu
    }

    pub fn dsp(&self) -> &Dsp {
        &self.dsp
    }

    pub fn peripherals(&self) -> &Peripherals {
        &self.bus.peripherals
    }

    pub fn timing(&self) -> &TimingEngine {
        &self.timing
    }

    /// Get elapsed time since the last reset
    pub fn elapsed(&self) -> std::time::Duration {
        self.start_time.elapsed()
    }

    /// Exact size of a save state for this configuration
    pub fn state_size(&self) -> usize {
        state::HEADER_LEN
            + state::encoded_len(&self.cpu)
            + state::encoded_len(&self.dsp)
            + state::encoded_len(&self.timing)
            + state::encoded_len(&self.bus.peripherals)
            + self.config.rom_size as usize
            + self.config.ram_size as usize
    }

    fn check_len(&self, actual: usize) -> Result<(), StateError> {
        let expected = self.state_size();
        if actual != expected {
            return Err(StateError::BufferSize { expected, actual });
        }
        Ok(())
    }

    fn write_state<W: Write>(&self, w: &mut W, rom: &[u8], ram: &[u8]) -> io::Result<()> {
        Header {
            rom_size: self.config.rom_size,
            ram_size: self.config.ram_size,
        }
        .save(w)?;
        self.cpu.save(w)?;
        self.dsp.save(w)?;
        self.timing.save(w)?;
        self.bus.peripherals.save(w)?;
        w.write_all(rom)?;
        w.write_all(ram)
    }

    /// Serialize the whole machine into `buf`, which must be exactly
    /// `state_size()` bytes
    pub fn save_state(&self, buf: &mut [u8]) -> Result<(), EmulatorError> {
        self.require_initialized()?;
        self.check_len(buf.len())?;

        let rom = self.bus.memory.rom().ok_or(EmulatorError::NotInitialized)?;
        let ram = self.bus.memory.ram().ok_or(EmulatorError::NotInitialized)?;
        let mut w = buf;
        self.write_state(&mut w, rom, ram)
            .map_err(StateError::from)?;
        Ok(())
    }

    /// Restore a state produced by `save_state`. Nothing changes if the
    /// header or length is rejected.
    pub fn load_state(&mut self, buf: &[u8]) -> Result<(), EmulatorError> {
        self.require_initialized()?;

        let mut r = buf;
        let header = Header::load(&mut r)?;
        if header.rom_size != self.config.rom_size || header.ram_size != self.config.ram_size {
            return Err(StateError::RegionSizeMismatch {
                saved_rom: header.rom_size,
                saved_ram: header.ram_size,
                rom: self.config.rom_size,
                ram: self.config.ram_size,
            }
            .into());
        }
        self.check_len(buf.len())?;

        let mut cpu = CpuState::new();
        let mut dsp = Dsp::new();
        let mut timing = TimingEngine::new();
        let mut peripherals = Peripherals::new();
        cpu.load(&mut r).map_err(StateError::from)?;
        dsp.load(&mut r).map_err(StateError::from)?;
        timing.load(&mut r).map_err(StateError::from)?;
        peripherals.load(&mut r).map_err(StateError::from)?;

        let (rom, ram) = self
            .bus
            .memory
            .regions_mut()
            .ok_or(EmulatorError::NotInitialized)?;
        r.read_exact(rom).map_err(StateError::from)?;
        r.read_exact(ram).map_err(StateError::from)?;

        self.cpu = cpu;
        self.dsp = dsp;
        self.timing = timing;
        self.bus.peripherals = peripherals;
        info!("Loaded {} byte state", buf.len());
        Ok(())
    }

    /// Print final emulator state
    pub fn print_final_state(&self) {
        info!(
            "Frames: {}, timer ticks: {}",
            self.timing.frames(),
            self.timing.total_ticks()
        );
        info!("Elapsed time: {:.2?}", self.elapsed());

        let reg = |r| self.get_register(r);
        info!(
            "CPU: pc={:#x} r0={:#x} r1={:#x} r2={:#x} r3={:#x} r4={:#x} r5={:#x} r6={:#x} sp={:#x} lr={:#x}",
            reg(ArmRegister::PC),
            reg(ArmRegister::R0),
            reg(ArmRegister::R1),
            reg(ArmRegister::R2),
            reg(ArmRegister::R3),
            reg(ArmRegister::R4),
            reg(ArmRegister::R5),
            reg(ArmRegister::R6),
            reg(ArmRegister::SP),
            reg(ArmRegister::LR)
        );
        info!("DSP: acc0={:#012x}", self.dsp.acc0());
        info!(
            "IC: pending={:#010x} mask={:#010x}",
            self.bus.peripherals.ic.pending, self.bus.peripherals.ic.mask
        );
    }
}

impl Drop for Emulator {
    fn drop(&mut self) {
        self.deinit();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small() -> EmulatorConfig {
        EmulatorConfig {
            rom_size: 0x1000,
            ram_size: 0x4000,
        }
    }

    #[test]
    fn config_rejects_bad_sizes() {
        assert!(EmulatorConfig::default().validate().is_ok());
        let zero = EmulatorConfig {
            ram_size: 0,
            ..small()
        };
        assert!(matches!(zero.validate(), Err(EmulatorError::InvalidConfig(_))));
        let huge = EmulatorConfig {
            rom_size: BANK_SIZE + 1,
            ..small()
        };
        assert!(huge.validate().is_err());
    }

    #[test]
    fn lifecycle_transitions() {
        let mut emu = Emulator::new(small());
        assert_eq!(emu.state(), LifecycleState::Uninitialized);
        assert_eq!(emu.reset(), Err(EmulatorError::NotInitialized));
        assert_eq!(emu.execute(false), Err(EmulatorError::NotInitialized));

        emu.init().unwrap();
        assert_eq!(emu.state(), LifecycleState::Ready);
        assert!(matches!(emu.init(), Err(EmulatorError::AlreadyInitialized)));

        emu.execute(false).unwrap();
        assert_eq!(emu.state(), LifecycleState::Ready);

        emu.deinit();
        assert_eq!(emu.state(), LifecycleState::Uninitialized);
        assert_eq!(
            emu.read_arbitrary_memory(memory_map::ram::BASE, AccessWidth::Word),
            u64::MAX
        );
    }

    #[test]
    fn invalid_config_leaves_emulator_uninitialized() {
        let mut emu = Emulator::new(EmulatorConfig {
            rom_size: 0,
            ..small()
        });
        assert!(emu.init().is_err());
        assert_eq!(emu.state(), LifecycleState::Uninitialized);
        assert!(!emu.bus().memory.is_allocated());
    }

    #[test]
    fn state_size_covers_regions() {
        let emu = Emulator::new(small());
        let fixed = emu.state_size() - 0x5000;
        assert!(fixed > state::HEADER_LEN);
    }
}
