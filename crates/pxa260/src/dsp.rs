//! XScale CP0 DSP Coprocessor Emulation
//!
//! The PXA260 core carries a single 40-bit accumulator (acc0) on coprocessor 0
//! and a small set of multiply-accumulate instructions that target it:
//!
//! - `MIA acc0, Rm, Rs` - signed 32x32 multiply-accumulate
//! - `MIAPH acc0, Rm, Rs` - packed signed 16x16 pair, both products added
//! - `MIAxy acc0, Rm, Rs` - signed 16x16 of a selected half of each operand
//! - `MAR acc0, RdLo, RdHi` / `MRA RdLo, RdHi, acc0` - move to/from acc0
//!
//! Every accumulation wraps at 40 bits. Encodings the unit does not implement
//! return `false` so that the CPU core raises an undefined-instruction trap.
//!
//! # References
//! - Intel XScale Core Developer's Manual, section 2.3 "DSP Coprocessor 0"

use crate::cpu_types::CpuState;
use tracing::trace;

/// acc0 is 40 bits wide: 8 high bits plus a 32-bit low word
pub const ACC_MASK: u64 = (1 << 40) - 1;

/// Coprocessor data-transfer family (bits 27:24 = 1110, bit 4 = 1)
const MCR_MASK: u32 = 0x0F00_0010;
const MCR_VALUE: u32 = 0x0E00_0010;

/// Two-register transfer family (bits 27:21 = 1100010)
const MCRR_MASK: u32 = 0x0FE0_0000;
const MCRR_VALUE: u32 = 0x0C40_0000;

/// Coprocessor number field
const CP_NUM_MASK: u32 = 0x0000_0F00;

/// Condition field value of the unconditional MCR2/MRC2 space
const COND_UNCONDITIONAL: u32 = 0xF;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dsp {
    acc0: u64,
}

impl Dsp {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.acc0 = 0;
    }

    /// Raw 40-bit accumulator contents
    pub fn acc0(&self) -> u64 {
        self.acc0
    }

    /// Accumulator as a signed value, sign-extended from bit 39
    pub fn acc0_signed(&self) -> i64 {
        ((self.acc0 << 24) as i64) >> 24
    }

    pub fn set_acc0(&mut self, value: u64) {
        self.acc0 = value & ACC_MASK;
    }

    fn accumulate(&mut self, addend: i64) {
        self.acc0 = self.acc0.wrapping_add(addend as u64) & ACC_MASK;
    }

    /// MAR / MRA: move between acc0 and a pair of general registers.
    ///
    /// `mrrc` selects MRA (read acc0). Only accumulator 0 with a zero opcode
    /// exists; anything else is not handled.
    pub fn access(
        &mut self,
        cpu: &mut CpuState,
        mrrc: bool,
        op: u8,
        rd_lo: u8,
        rd_hi: u8,
        acc: u8,
    ) -> bool {
        if acc != 0 || op != 0 {
            return false;
        }

        if mrrc {
            cpu.set_reg_field(rd_lo, self.acc0 as u32);
            cpu.set_reg_field(rd_hi, ((self.acc0 >> 32) as u32) & 0xFF);
        } else {
            let hi = (cpu.reg_field(rd_hi) & 0xFF) as u64;
            let lo = cpu.reg_field(rd_lo) as u64;
            self.acc0 = (hi << 32) | lo;
        }

        true
    }

    /// MIA / MIAPH / MIAxy
    ///
    /// `two` marks the MCR2 encoding and `mrc` the MRC direction; neither is
    /// valid here. `opcode_3` bits 3:2 pick the form, bits 1:0 pick the
    /// operand halves for MIAxy (bit 1 = top of Rm, bit 0 = top of Rs).
    #[allow(clippy::too_many_arguments)]
    pub fn operate(
        &mut self,
        cpu: &CpuState,
        two: bool,
        mrc: bool,
        op1: u8,
        rs: u8,
        opcode_3: u8,
        rm: u8,
        acc: u8,
    ) -> bool {
        if op1 != 1 || two || mrc || acc != 0 {
            return false;
        }

        let mut vs = cpu.reg_field(rs);
        let mut vm = cpu.reg_field(rm);

        let addend = match (opcode_3 >> 2) & 0x3 {
            // MIA
            0 => (vm as i32 as i64) * (vs as i32 as i64),
            // MIAPH
            2 => {
                let lo = (vm as i16 as i64) * (vs as i16 as i64);
                let hi = ((vm >> 16) as i16 as i64) * ((vs >> 16) as i16 as i64);
                lo + hi
            }
            // MIAxy
            3 => {
                if opcode_3 & 2 != 0 {
                    vm >>= 16;
                }
                if opcode_3 & 1 != 0 {
                    vs >>= 16;
                }
                (vm as i16 as i64) * (vs as i16 as i64)
            }
            _ => return false,
        };

        self.accumulate(addend);
        true
    }

    /// Decode a raw ARM instruction word aimed at CP0 and run it.
    ///
    /// Returns `false` for anything that is not a CP0 register transfer the
    /// unit implements.
    pub fn execute_instruction(&mut self, cpu: &mut CpuState, insn: u32) -> bool {
        if insn & CP_NUM_MASK != 0 {
            return false;
        }

        let cond = insn >> 28;

        if insn & MCRR_MASK == MCRR_VALUE {
            let mrrc = insn & (1 << 20) != 0;
            let rd_hi = ((insn >> 16) & 0xF) as u8;
            let rd_lo = ((insn >> 12) & 0xF) as u8;
            let op = ((insn >> 4) & 0xF) as u8;
            let acc = (insn & 0xF) as u8;
            let handled = cond != COND_UNCONDITIONAL
                && self.access(cpu, mrrc, op, rd_lo, rd_hi, acc);
            trace!(
                "CP0 {}: rdlo=r{} rdhi=r{} acc{} handled={}",
                if mrrc { "MRA" } else { "MAR" },
                rd_lo,
                rd_hi,
                acc,
                handled
            );
            return handled;
        }

        if insn & MCR_MASK == MCR_VALUE {
            let two = cond == COND_UNCONDITIONAL;
            let op1 = ((insn >> 21) & 0x7) as u8;
            let mrc = insn & (1 << 20) != 0;
            let opcode_3 = ((insn >> 16) & 0xF) as u8;
            let rs = ((insn >> 12) & 0xF) as u8;
            let acc = ((insn >> 5) & 0x7) as u8;
            let rm = (insn & 0xF) as u8;
            let handled = self.operate(cpu, two, mrc, op1, rs, opcode_3, rm, acc);
            trace!(
                "CP0 MIA family: opcode_3={:#X} rm=r{} rs=r{} acc{} handled={}",
                opcode_3,
                rm,
                rs,
                acc,
                handled
            );
            return handled;
        }

        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MIA: u8 = 0b0000;
    const MIAPH: u8 = 0b1000;
    const MIABB: u8 = 0b1100;
    const MIABT: u8 = 0b1101;
    const MIATB: u8 = 0b1110;
    const MIATT: u8 = 0b1111;

    fn cpu_with(rm: u32, rs: u32) -> CpuState {
        let mut cpu = CpuState::new();
        cpu.regs[1] = rm;
        cpu.regs[2] = rs;
        cpu
    }

    fn mia(dsp: &mut Dsp, cpu: &CpuState, opcode_3: u8) -> bool {
        dsp.operate(cpu, false, false, 1, 2, opcode_3, 1, 0)
    }

    #[test]
    fn accumulator_wraps_at_40_bits() {
        let mut dsp = Dsp::new();
        dsp.set_acc0(ACC_MASK);
        let cpu = cpu_with(1, 1);
        assert!(mia(&mut dsp, &cpu, MIA));
        assert_eq!(dsp.acc0(), 0);
    }

    #[test]
    fn mia_multiplies_signed_words() {
        let mut dsp = Dsp::new();
        let cpu = cpu_with(-3i32 as u32, 7);
        assert!(mia(&mut dsp, &cpu, MIA));
        assert_eq!(dsp.acc0_signed(), -21);
        assert_eq!(dsp.acc0(), ACC_MASK - 20);

        let cpu = cpu_with(0x7FFF_FFFF, 0x7FFF_FFFF);
        dsp.reset();
        assert!(mia(&mut dsp, &cpu, MIA));
        // 0x3FFFFFFF00000001 truncated to 40 bits
        assert_eq!(dsp.acc0(), 0xFF_0000_0001);
    }

    #[test]
    fn miaph_sums_both_half_products() {
        let mut dsp = Dsp::new();
        let cpu = cpu_with(0x0002_0003, 0x0005_0007);
        assert!(mia(&mut dsp, &cpu, MIAPH));
        assert_eq!(dsp.acc0(), 31);
    }

    #[test]
    fn miaph_sign_extends_top_half() {
        let mut dsp = Dsp::new();
        // lo: 1 * 3, hi: -1 * 2
        let cpu = cpu_with(0xFFFF_0001, 0x0002_0003);
        assert!(mia(&mut dsp, &cpu, MIAPH));
        assert_eq!(dsp.acc0(), 1);

        dsp.reset();
        let cpu = cpu_with(0xFFFF_0000, 0x0005_0000);
        assert!(mia(&mut dsp, &cpu, MIAPH));
        assert_eq!(dsp.acc0_signed(), -5);
        assert_eq!(dsp.acc0(), (1 << 40) - 5);
    }

    #[test]
    fn miaxy_selects_halves() {
        let cpu = cpu_with(0x0004_FFFE, 0x0003_0005);
        let cases = [(MIABB, -10), (MIABT, -6), (MIATB, 20), (MIATT, 12)];
        for (opcode_3, expected) in cases {
            let mut dsp = Dsp::new();
            assert!(mia(&mut dsp, &cpu, opcode_3));
            assert_eq!(dsp.acc0_signed(), expected, "opcode_3={opcode_3:#06b}");
        }
    }

    #[test]
    fn reserved_form_and_bad_fields_are_rejected() {
        let mut dsp = Dsp::new();
        let cpu = cpu_with(5, 5);
        assert!(!mia(&mut dsp, &cpu, 0b0100));
        assert!(!dsp.operate(&cpu, false, false, 0, 2, MIA, 1, 0));
        assert!(!dsp.operate(&cpu, true, false, 1, 2, MIA, 1, 0));
        assert!(!dsp.operate(&cpu, false, true, 1, 2, MIA, 1, 0));
        assert!(!dsp.operate(&cpu, false, false, 1, 2, MIA, 1, 1));
        assert_eq!(dsp.acc0(), 0);
    }

    #[test]
    fn mar_then_mra_masks_high_byte() {
        let mut dsp = Dsp::new();
        let mut cpu = CpuState::new();
        cpu.regs[3] = 0x1234_5678;
        cpu.regs[4] = 0xFFFF_FFAB;
        assert!(dsp.access(&mut cpu, false, 0, 3, 4, 0));
        assert_eq!(dsp.acc0(), 0xAB_1234_5678);

        assert!(dsp.access(&mut cpu, true, 0, 5, 6, 0));
        assert_eq!(cpu.regs[5], 0x1234_5678);
        assert_eq!(cpu.regs[6], 0xAB);
    }

    #[test]
    fn access_rejects_other_accumulators_and_opcodes() {
        let mut dsp = Dsp::new();
        let mut cpu = CpuState::new();
        assert!(!dsp.access(&mut cpu, false, 0, 3, 4, 1));
        assert!(!dsp.access(&mut cpu, true, 1, 3, 4, 0));
    }

    #[test]
    fn decodes_raw_instructions() {
        let mut dsp = Dsp::new();
        let mut cpu = CpuState::new();
        cpu.regs[1] = 6;
        cpu.regs[2] = 7;

        // MIA acc0, r1, r2
        assert!(dsp.execute_instruction(&mut cpu, 0xEE20_2011));
        assert_eq!(dsp.acc0(), 42);

        // MIAPH acc0, r1, r2
        assert!(dsp.execute_instruction(&mut cpu, 0xEE28_2011));
        assert_eq!(dsp.acc0(), 84);

        // MRA r3, r4, acc0
        assert!(dsp.execute_instruction(&mut cpu, 0xEC54_3000));
        assert_eq!(cpu.regs[3], 84);
        assert_eq!(cpu.regs[4], 0);

        // MAR acc0, r1, r2
        assert!(dsp.execute_instruction(&mut cpu, 0xEC42_1000));
        assert_eq!(dsp.acc0(), 0x07_0000_0006);
    }

    #[test]
    fn foreign_encodings_are_not_handled() {
        let mut dsp = Dsp::new();
        let mut cpu = CpuState::new();
        // MCR p15, 0, r0, c1, c0, 0
        assert!(!dsp.execute_instruction(&mut cpu, 0xEE01_0F10));
        // MCR2 form of MIA
        assert!(!dsp.execute_instruction(&mut cpu, 0xFE20_2011));
        // MIA with acc1
        assert!(!dsp.execute_instruction(&mut cpu, 0xEE20_2031));
        // add r0, r0, r0
        assert!(!dsp.execute_instruction(&mut cpu, 0xE080_0000));
    }
}
