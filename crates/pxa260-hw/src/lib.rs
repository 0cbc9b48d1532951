//! Hardware definitions for the Intel PXA260 SoC as wired in the Palm Tungsten T3.
//!
//! Plain constants only: physical memory map, bank geometry, clocks and
//! per-peripheral register offsets.

pub mod memory_map;
pub mod mmio;
pub mod specs;
