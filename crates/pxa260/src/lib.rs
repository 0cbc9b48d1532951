pub mod args;
pub mod bus;
pub mod core;
pub mod cpu_types;
pub mod dsp;
pub mod error;
pub mod memory;
pub mod mmio;
pub mod scheduler;
pub mod state;

// Re-export commonly used types
pub use args::{Args, RtcTime, load_rom};
pub use bus::{BankEntry, Bus, DispatchTable, Handler, Slot};
pub use core::{Emulator, EmulatorConfig, LifecycleState};
pub use cpu_types::{ArmRegister, CpuState};
pub use dsp::Dsp;
pub use error::{AccessWidth, BusError, Direction, EmulatorError, StateError};
pub use memory::{NullTranslationCache, TranslationCache};
pub use mmio::Peripherals;
pub use scheduler::TimingEngine;
