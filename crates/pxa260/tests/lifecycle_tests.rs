use std::cell::Cell;
use std::rc::Rc;

use pxa260::{
    AccessWidth, ArmRegister, Emulator, EmulatorConfig, EmulatorError, LifecycleState,
    StateError, TranslationCache,
};
use tracing_subscriber::{EnvFilter, fmt};

const RAM_BASE: u32 = 0xA000_0000;
const ROM_SIZE: u32 = 0x1000;
const RAM_SIZE: u32 = 0x4000;

#[cfg(test)]
#[ctor::ctor]
fn init() {
    let fmt_subscriber = fmt::Subscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(fmt_subscriber)
        .expect("Unable to set global tracing subscriber");
}

struct CountingCache(Rc<Cell<u32>>);

impl TranslationCache for CountingCache {
    fn flush(&mut self) {
        self.0.set(self.0.get() + 1);
    }
}

fn config() -> EmulatorConfig {
    EmulatorConfig {
        rom_size: ROM_SIZE,
        ram_size: RAM_SIZE,
    }
}

fn get_emulator() -> Emulator {
    let mut emu = Emulator::new(config());
    emu.init().expect("init");
    emu.reset().expect("reset");
    emu
}

#[test]
fn test_init_returns_backing() {
    let mut emu = Emulator::new(config());
    let (rom, ram) = emu.init().unwrap();
    assert_eq!(rom.len(), ROM_SIZE as usize);
    assert_eq!(ram.len(), RAM_SIZE as usize);
    rom[..4].copy_from_slice(&0xE1A0_0000u32.to_le_bytes());

    assert_eq!(emu.bus_mut().read_word(0), Ok(0xE1A0_0000));
    assert_eq!(emu.state(), LifecycleState::Ready);
}

#[test]
fn test_reset_applies_cpu_values() {
    let mut emu = get_emulator();
    emu.cpu_mut().regs = [0x55; 16];
    emu.cpu_mut().cpu_events = 3;
    emu.cpu_mut().cycle_count_delta = 99;
    emu.coprocessor_instruction(0xEC42_1000);

    emu.reset().unwrap();
    let cpu = emu.cpu();
    assert_eq!(cpu.regs, [0; 16]);
    assert_eq!(cpu.control, 0x0005_0078);
    assert_eq!(cpu.cpsr_low28, 0xD3);
    assert_eq!(cpu.cpu_events, 0);
    assert_eq!(cpu.cycle_count_delta, 0);
    assert_eq!(emu.dsp().acc0(), 0);
}

#[test]
fn test_reset_zeroes_ram_not_rom() {
    let mut emu = Emulator::new(config());
    let (rom, ram) = emu.init().unwrap();
    rom.fill(0xAB);
    ram.fill(0xCD);

    emu.reset().unwrap();
    assert_eq!(emu.read_arbitrary_memory(0x10, AccessWidth::Byte), 0xAB);
    assert_eq!(emu.read_arbitrary_memory(RAM_BASE + 0x10, AccessWidth::Word), 0);
}

#[test]
fn test_reset_twice_equals_once() {
    let mut emu = get_emulator();
    emu.bus_mut().write_word(RAM_BASE, 0x1234).unwrap();
    emu.execute(true).unwrap();

    emu.reset().unwrap();
    let cpu = emu.cpu().clone();
    let peripherals = emu.peripherals().clone();
    let timing = emu.timing().clone();
    let ram = emu.bus().memory.ram().unwrap().to_vec();

    emu.reset().unwrap();
    assert_eq!(emu.cpu(), &cpu);
    assert_eq!(emu.peripherals(), &peripherals);
    assert_eq!(emu.timing(), &timing);
    assert_eq!(emu.bus().memory.ram().unwrap(), &ram[..]);
}

#[test]
fn test_deinit_is_noop_when_uninitialized() {
    let flushes = Rc::new(Cell::new(0));
    let mut emu =
        Emulator::new(config()).with_translation_cache(Box::new(CountingCache(flushes.clone())));

    emu.deinit();
    assert_eq!(flushes.get(), 0);

    emu.init().unwrap();
    emu.deinit();
    emu.deinit();
    assert_eq!(flushes.get(), 1);
    assert_eq!(emu.state(), LifecycleState::Uninitialized);
    assert_eq!(emu.reset(), Err(EmulatorError::NotInitialized));

    // the same instance can come back up
    emu.init().unwrap();
    drop(emu);
    assert_eq!(flushes.get(), 2);
}

#[test]
fn test_execute_runs_one_frame_of_ticks() {
    let mut emu = get_emulator();
    emu.execute(false).unwrap();
    assert_eq!(emu.timing().total_ticks(), 61_440);
    assert_eq!(emu.peripherals().timer.counter, 61_440);
    assert_eq!(emu.peripherals().lcd.frames, 0);

    emu.execute(true).unwrap();
    assert_eq!(emu.timing().total_ticks(), 2 * 61_440);
    assert_eq!(emu.timing().frames(), 2);
}

#[test]
fn test_execute_composes_frames_only_with_video() {
    let mut emu = get_emulator();
    // LCCR0.ENB
    emu.bus_mut().write_word(0x4400_0000, 1).unwrap();

    emu.execute(false).unwrap();
    assert_eq!(emu.peripherals().lcd.frames, 0);
    emu.execute(true).unwrap();
    assert_eq!(emu.peripherals().lcd.frames, 1);
}

#[test]
fn test_timer_match_raises_interrupt() {
    let mut emu = get_emulator();
    let bus = emu.bus_mut();
    bus.write_word(0x40A0_0000, 100).unwrap(); // OSMR0
    bus.write_word(0x40A0_001C, 1).unwrap(); // OIER
    bus.write_word(0x40D0_0004, 1 << 26).unwrap(); // ICMR

    emu.execute(false).unwrap();
    assert_eq!(emu.bus_mut().read_word(0x40A0_0014), Ok(1)); // OSSR
    assert_eq!(emu.bus_mut().read_word(0x40D0_0000), Ok(1 << 26)); // ICIP
    assert!(emu.peripherals().ic.irq_asserted());

    emu.bus_mut().write_word(0x40A0_0014, 1).unwrap();
    assert!(!emu.peripherals().ic.irq_asserted());
}

#[test]
fn test_set_rtc() {
    let mut emu = get_emulator();
    emu.set_rtc(1, 2, 3, 4);
    let expected = 86_400 + 2 * 3600 + 3 * 60 + 4;
    assert_eq!(emu.peripherals().rtc.counter, expected);
    assert_eq!(emu.bus_mut().read_word(0x4090_0000), Ok(expected));

    for _ in 0..60 {
        emu.execute(false).unwrap();
    }
    assert_eq!(emu.peripherals().rtc.counter, expected + 1);
}

#[test]
fn test_set_rtc_at_the_largest_day_count() {
    let mut emu = get_emulator();
    emu.set_rtc(u16::MAX, 23, 59, 59);
    let expected = (u16::MAX as u64 * 86_400 + 23 * 3600 + 59 * 60 + 59) as u32;
    assert_eq!(emu.peripherals().rtc.counter, expected);
    assert_eq!(emu.bus_mut().read_word(0x4090_0000), Ok(expected));
}

#[test]
fn test_get_register() {
    let mut emu = get_emulator();
    emu.cpu_mut().set_reg(ArmRegister::PC, 0x0000_0100);
    emu.cpu_mut().set_reg(ArmRegister::R7, 77);
    assert_eq!(emu.get_register(ArmRegister::PC), 0x100);
    assert_eq!(emu.get_register(ArmRegister::R7), 77);
    assert_eq!(emu.get_register(ArmRegister::R0), 0);
}

#[test]
fn test_read_arbitrary_memory() {
    let mut emu = get_emulator();
    emu.bus_mut().write_word(RAM_BASE + 8, 0xDEAD_BEEF).unwrap();
    assert_eq!(
        emu.read_arbitrary_memory(RAM_BASE + 8, AccessWidth::Word),
        0xDEAD_BEEF
    );
    assert_eq!(
        emu.read_arbitrary_memory(RAM_BASE + 8, AccessWidth::Half),
        0xBEEF
    );
    // unmapped slot
    assert_eq!(
        emu.read_arbitrary_memory(0x4000_0000, AccessWidth::Half),
        u64::MAX
    );
    // mapped to memory but outside any region
    assert_eq!(
        emu.read_arbitrary_memory(0xFFFF_0000, AccessWidth::Word),
        u64::MAX
    );
}

#[test]
fn test_save_load_round_trip() {
    let mut emu = get_emulator();
    emu.bus_mut().write_word(RAM_BASE + 0x40, 0x0BAD_F00D).unwrap();
    emu.cpu_mut().set_reg(ArmRegister::R1, 0x1234_5678);
    emu.cpu_mut().set_reg(ArmRegister::R2, 0xAB);
    assert!(emu.coprocessor_instruction(0xEC42_1000)); // MAR acc0, r1, r2
    emu.execute(false).unwrap();

    let mut buf = vec![0u8; emu.state_size()];
    emu.save_state(&mut buf).unwrap();
    assert_eq!(&buf[..4], b"PXAS");

    emu.reset().unwrap();
    assert_eq!(emu.read_arbitrary_memory(RAM_BASE + 0x40, AccessWidth::Word), 0);

    emu.load_state(&buf).unwrap();
    assert_eq!(
        emu.read_arbitrary_memory(RAM_BASE + 0x40, AccessWidth::Word),
        0x0BAD_F00D
    );
    assert_eq!(emu.get_register(ArmRegister::R1), 0x1234_5678);
    assert_eq!(emu.dsp().acc0(), 0xAB_1234_5678);
    assert_eq!(emu.peripherals().timer.counter, 61_440);
    assert_eq!(emu.timing().frames(), 1);
}

#[test]
fn test_load_rejects_bad_states() {
    let mut emu = get_emulator();
    let mut buf = vec![0u8; emu.state_size()];
    emu.save_state(&mut buf).unwrap();

    let mut bad = buf.clone();
    bad[0] ^= 0xFF;
    assert_eq!(
        emu.load_state(&bad),
        Err(EmulatorError::State(StateError::BadMagic))
    );

    let mut bad = buf.clone();
    bad[4..8].copy_from_slice(&7u32.to_le_bytes());
    assert_eq!(
        emu.load_state(&bad),
        Err(EmulatorError::State(StateError::UnsupportedVersion(7)))
    );

    assert_eq!(
        emu.load_state(&buf[..buf.len() - 1]),
        Err(EmulatorError::State(StateError::BufferSize {
            expected: buf.len(),
            actual: buf.len() - 1
        }))
    );
    assert_eq!(
        emu.load_state(&buf[..3]),
        Err(EmulatorError::State(StateError::Truncated))
    );

    let mut short = vec![0u8; 8];
    assert!(matches!(
        emu.save_state(&mut short),
        Err(EmulatorError::State(StateError::BufferSize { .. }))
    ));
}

#[test]
fn test_load_rejects_other_region_sizes() {
    let mut emu = get_emulator();
    let mut buf = vec![0u8; emu.state_size()];
    emu.save_state(&mut buf).unwrap();

    let mut other = Emulator::new(EmulatorConfig {
        ram_size: RAM_SIZE * 2,
        ..config()
    });
    other.init().unwrap();
    assert!(matches!(
        other.load_state(&buf),
        Err(EmulatorError::State(StateError::RegionSizeMismatch { .. }))
    ));
}
