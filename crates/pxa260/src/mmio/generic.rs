//! Generic handler for unmodeled I/O ranges.
//!
//! Reads return zero and writes are ignored. Serves the PCMCIA sockets (no
//! card inserted) and the on-chip blocks without a model of their own
//! (DMA, UARTs, AC97, USB client, MMC, SSP, PWM).

use crate::error::AccessWidth;
use tracing::{instrument, trace};

/// Generic read - returns zero
#[instrument(level = "trace")]
pub fn read(block: &'static str, address: u32, width: AccessWidth) -> u32 {
    trace!(
        "{} read: addr={:#X}, size={}",
        block,
        address,
        width.bits()
    );
    0
}

/// Generic write - ignored
#[instrument(level = "trace")]
pub fn write(block: &'static str, address: u32, width: AccessWidth, value: u32) {
    trace!(
        "{} write: addr={:#X}, size={}, value={:#X}",
        block,
        address,
        width.bits(),
        value
    );
}
