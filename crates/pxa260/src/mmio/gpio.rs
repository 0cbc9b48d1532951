//! GPIO register handling.
//!
//! Pin levels driven from outside the SoC enter through `set_input_level`.
//! Enabled edges latch into GEDR and raise the GPIO0, GPIO1 or shared
//! GPIO2..84 interrupt line.

use super::ic::InterruptController;
use pxa260_hw::mmio::gpio::{BANKS, MAX_PIN, registers as hw_regs};
use pxa260_hw::specs::irq;
use tracing::{trace, warn};

const ALT_FUNCTION_WORDS: usize = BANKS * 2;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Gpio {
    /// Levels driven by external inputs
    pub inputs: [u32; BANKS],
    /// Output latches
    pub outputs: [u32; BANKS],
    pub direction: [u32; BANKS],
    pub rising_enable: [u32; BANKS],
    pub falling_enable: [u32; BANKS],
    pub edge_detect: [u32; BANKS],
    pub alt_function: [u32; ALT_FUNCTION_WORDS],
}

fn bank_register(offset: u32, group: u32) -> Option<usize> {
    let index = offset.checked_sub(group)? / 4;
    (offset % 4 == 0 && (index as usize) < BANKS).then_some(index as usize)
}

impl Gpio {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// GPLR: outputs for output pins, driven inputs for the rest
    pub fn level(&self, bank: usize) -> u32 {
        (self.outputs[bank] & self.direction[bank]) | (self.inputs[bank] & !self.direction[bank])
    }

    /// Drive an input pin from outside the SoC
    pub fn set_input_level(&mut self, pin: u8, high: bool, ic: &mut InterruptController) {
        if pin > MAX_PIN {
            warn!("GPIO pin {} out of range", pin);
            return;
        }

        let bank = (pin / 32) as usize;
        let bit = 1u32 << (pin % 32);
        let was_high = self.inputs[bank] & bit != 0;

        if high {
            self.inputs[bank] |= bit;
        } else {
            self.inputs[bank] &= !bit;
        }

        let rising = high && !was_high && self.rising_enable[bank] & bit != 0;
        let falling = !high && was_high && self.falling_enable[bank] & bit != 0;
        if rising || falling {
            self.edge_detect[bank] |= bit;
        }
        self.update_interrupts(ic);
    }

    fn update_interrupts(&self, ic: &mut InterruptController) {
        ic.set_line(irq::GPIO0, self.edge_detect[0] & 1 != 0);
        ic.set_line(irq::GPIO1, self.edge_detect[0] & 2 != 0);
        let others =
            (self.edge_detect[0] & !3) != 0 || self.edge_detect[1] != 0 || self.edge_detect[2] != 0;
        ic.set_line(irq::GPIO_X, others);
    }

    pub fn read(&self, offset: u32) -> u32 {
        trace!("GPIO register read: offset={:#X}", offset);

        if let Some(bank) = bank_register(offset, hw_regs::GPLR0) {
            self.level(bank)
        } else if let Some(bank) = bank_register(offset, hw_regs::GPDR0) {
            self.direction[bank]
        } else if bank_register(offset, hw_regs::GPSR0).is_some()
            || bank_register(offset, hw_regs::GPCR0).is_some()
        {
            // write-only
            0
        } else if let Some(bank) = bank_register(offset, hw_regs::GRER0) {
            self.rising_enable[bank]
        } else if let Some(bank) = bank_register(offset, hw_regs::GFER0) {
            self.falling_enable[bank]
        } else if let Some(bank) = bank_register(offset, hw_regs::GEDR0) {
            self.edge_detect[bank]
        } else if let Some(index) = self.alt_function_index(offset) {
            self.alt_function[index]
        } else {
            warn!("Unknown GPIO register read: offset={:#X}", offset);
            0
        }
    }

    pub fn write(&mut self, offset: u32, value: u32, ic: &mut InterruptController) {
        trace!("GPIO register write: offset={:#X}, value={:#X}", offset, value);

        if bank_register(offset, hw_regs::GPLR0).is_some() {
            // read-only
        } else if let Some(bank) = bank_register(offset, hw_regs::GPDR0) {
            self.direction[bank] = value;
        } else if let Some(bank) = bank_register(offset, hw_regs::GPSR0) {
            self.outputs[bank] |= value;
        } else if let Some(bank) = bank_register(offset, hw_regs::GPCR0) {
            self.outputs[bank] &= !value;
        } else if let Some(bank) = bank_register(offset, hw_regs::GRER0) {
            self.rising_enable[bank] = value;
        } else if let Some(bank) = bank_register(offset, hw_regs::GFER0) {
            self.falling_enable[bank] = value;
        } else if let Some(bank) = bank_register(offset, hw_regs::GEDR0) {
            self.edge_detect[bank] &= !value;
            self.update_interrupts(ic);
        } else if let Some(index) = self.alt_function_index(offset) {
            self.alt_function[index] = value;
        } else {
            warn!(
                "Unknown GPIO register write: offset={:#X}, value={:#X}",
                offset, value
            );
        }
    }

    fn alt_function_index(&self, offset: u32) -> Option<usize> {
        let index = offset.checked_sub(hw_regs::GAFR0_L)? / 4;
        (offset % 4 == 0 && (index as usize) < ALT_FUNCTION_WORDS).then_some(index as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_and_clear_drive_output_pins() {
        let mut ic = InterruptController::new();
        let mut gpio = Gpio::new();
        gpio.write(hw_regs::GPDR0 + 4, 0x0000_00F0, &mut ic);
        gpio.write(hw_regs::GPSR0 + 4, 0x0000_00FF, &mut ic);
        gpio.write(hw_regs::GPCR0 + 4, 0x0000_0010, &mut ic);
        assert_eq!(gpio.read(hw_regs::GPLR0 + 4), 0x0000_00E0);
    }

    #[test]
    fn enabled_edges_latch_and_raise() {
        let mut ic = InterruptController::new();
        let mut gpio = Gpio::new();
        gpio.write(hw_regs::GRER0, 1 << 1, &mut ic);
        gpio.write(hw_regs::GFER0 + 4, 1 << 3, &mut ic);

        gpio.set_input_level(1, true, &mut ic);
        assert!(ic.is_pending(irq::GPIO1));
        assert_eq!(gpio.read(hw_regs::GPLR0), 1 << 1);

        gpio.set_input_level(35, true, &mut ic);
        assert!(!ic.is_pending(irq::GPIO_X));
        gpio.set_input_level(35, false, &mut ic);
        assert!(ic.is_pending(irq::GPIO_X));

        gpio.write(hw_regs::GEDR0, 1 << 1, &mut ic);
        assert!(!ic.is_pending(irq::GPIO1));
        assert!(ic.is_pending(irq::GPIO_X));
    }
}
