//! Interrupt controller register handling.
//!
//! Peripherals raise and lower numbered source lines here; the CPU core polls
//! `irq_asserted` / `fiq_asserted`. Priority resolution between sources is
//! left to the CPU core.

use pxa260_hw::mmio::ic::registers as hw_regs;
use tracing::{trace, warn};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InterruptController {
    /// Raw pending lines (ICPR)
    pub pending: u32,
    pub mask: u32,
    /// Set bits route a source to FIQ instead of IRQ
    pub level: u32,
    pub control: u32,
}

impl InterruptController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn raise(&mut self, irq: u8) {
        trace!("IRQ line {} raised", irq);
        self.pending |= 1 << irq;
    }

    pub fn lower(&mut self, irq: u8) {
        self.pending &= !(1 << irq);
    }

    pub fn set_line(&mut self, irq: u8, active: bool) {
        if active {
            self.raise(irq);
        } else {
            self.lower(irq);
        }
    }

    pub fn is_pending(&self, irq: u8) -> bool {
        self.pending & (1 << irq) != 0
    }

    /// ICIP
    pub fn irq_pending(&self) -> u32 {
        self.pending & self.mask & !self.level
    }

    /// ICFP
    pub fn fiq_pending(&self) -> u32 {
        self.pending & self.mask & self.level
    }

    pub fn irq_asserted(&self) -> bool {
        self.irq_pending() != 0
    }

    pub fn fiq_asserted(&self) -> bool {
        self.fiq_pending() != 0
    }

    pub fn read(&self, offset: u32) -> u32 {
        trace!("IC register read: offset={:#X}", offset);

        match offset {
            hw_regs::ICIP => self.irq_pending(),
            hw_regs::ICMR => self.mask,
            hw_regs::ICLR => self.level,
            hw_regs::ICFP => self.fiq_pending(),
            hw_regs::ICPR => self.pending,
            hw_regs::ICCR => self.control,
            _ => {
                warn!("Unknown IC register read: offset={:#X}", offset);
                0
            }
        }
    }

    pub fn write(&mut self, offset: u32, value: u32) {
        trace!("IC register write: offset={:#X}, value={:#X}", offset, value);

        match offset {
            hw_regs::ICMR => self.mask = value,
            hw_regs::ICLR => self.level = value,
            hw_regs::ICCR => self.control = value & 1,
            // pending registers are read-only
            hw_regs::ICIP | hw_regs::ICFP | hw_regs::ICPR => {}
            _ => {
                warn!(
                    "Unknown IC register write: offset={:#X}, value={:#X}",
                    offset, value
                );
            }
        }
    }
}
