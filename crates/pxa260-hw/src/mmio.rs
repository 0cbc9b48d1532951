//! On-chip and board peripheral register maps.
//!
//! Each module gives the block's physical base and its register offsets
//! relative to that base.

pub mod gpio;
pub mod i2c;
pub mod ic;
pub mod lcd;
pub mod memctrl;
pub mod pwrclk;
pub mod rtc;
pub mod timer;
pub mod w86l488;
