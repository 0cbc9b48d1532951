//! CPU-related type definitions
//!
//! The instruction interpreter lives outside this crate. `CpuState` is the
//! register file it shares with the core: reset writes fixed values into it
//! and the DSP coprocessor reads and writes general registers through it.

use pxa260_hw::specs::cpu;

/// ARM general-purpose registers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArmRegister {
    R0,
    R1,
    R2,
    R3,
    R4,
    R5,
    R6,
    R7,
    R8,
    R9,
    R10,
    R11,
    R12,
    R13, // Stack Pointer (SP)
    R14, // Link Register (LR)
    R15, // Program Counter (PC)
}

impl ArmRegister {
    pub const SP: ArmRegister = ArmRegister::R13;
    pub const LR: ArmRegister = ArmRegister::R14;
    pub const PC: ArmRegister = ArmRegister::R15;

    pub const fn index(self) -> usize {
        self as usize
    }
}

impl TryFrom<u8> for ArmRegister {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        use ArmRegister::*;
        const ALL: [ArmRegister; 16] = [
            R0, R1, R2, R3, R4, R5, R6, R7, R8, R9, R10, R11, R12, R13, R14, R15,
        ];
        ALL.get(value as usize).copied().ok_or(value)
    }
}

/// Register file and control state shared with the CPU core
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CpuState {
    pub regs: [u32; 16],
    pub cpsr_low28: u32,
    /// CP15 control register
    pub control: u32,
    /// Pending CPU events (IRQ, FIQ, reset, debug step)
    pub cpu_events: u32,
    /// Cycles run past or short of the current timing slice
    pub cycle_count_delta: i32,
}

impl CpuState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Zero everything, then apply the hard reset values
    pub fn hard_reset(&mut self) {
        *self = Self::default();
        self.control = cpu::RESET_CONTROL;
        self.cpsr_low28 = cpu::RESET_CPSR_LOW28;
    }

    pub fn reg(&self, reg: ArmRegister) -> u32 {
        self.regs[reg.index()]
    }

    pub fn set_reg(&mut self, reg: ArmRegister, value: u32) {
        self.regs[reg.index()] = value;
    }

    /// Read by encoded register number; only the low four bits are decoded
    pub(crate) fn reg_field(&self, field: u8) -> u32 {
        self.regs[(field & 0xF) as usize]
    }

    pub(crate) fn set_reg_field(&mut self, field: u8, value: u32) {
        self.regs[(field & 0xF) as usize] = value;
    }
}
