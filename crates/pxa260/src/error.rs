//! Error types for the PXA260 core.

use thiserror::Error;

/// Width of a bus access
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessWidth {
    Byte,
    Half,
    Word,
}

impl AccessWidth {
    /// Width in bits
    pub const fn bits(self) -> u8 {
        match self {
            AccessWidth::Byte => 8,
            AccessWidth::Half => 16,
            AccessWidth::Word => 32,
        }
    }

    /// Parse a width given in bits (8, 16 or 32)
    pub const fn from_bits(bits: u8) -> Option<Self> {
        match bits {
            8 => Some(AccessWidth::Byte),
            16 => Some(AccessWidth::Half),
            32 => Some(AccessWidth::Word),
            _ => None,
        }
    }
}

/// Direction of a bus access
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Read,
    Write,
}

/// An address/width/direction combination with no real backing.
///
/// The CPU core is expected to turn this into a data abort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid {direction:?} of {} bits at {address:#010X}", .width.bits())]
pub struct BusError {
    pub address: u32,
    pub width: AccessWidth,
    pub direction: Direction,
}

impl BusError {
    pub const fn new(address: u32, width: AccessWidth, direction: Direction) -> Self {
        Self {
            address,
            width,
            direction,
        }
    }
}

/// Errors raised while saving or restoring emulator state
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateError {
    #[error("state buffer has the wrong magic")]
    BadMagic,
    #[error("unsupported state version {0}")]
    UnsupportedVersion(u32),
    #[error("state was saved with {saved_rom:#X}/{saved_ram:#X} byte ROM/RAM, emulator has {rom:#X}/{ram:#X}")]
    RegionSizeMismatch {
        saved_rom: u32,
        saved_ram: u32,
        rom: u32,
        ram: u32,
    },
    #[error("state buffer is {actual} bytes, expected {expected}")]
    BufferSize { expected: usize, actual: usize },
    #[error("state buffer ended early")]
    Truncated,
}

/// Errors surfaced by the lifecycle entry points
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EmulatorError {
    #[error("failed to reserve {bytes} bytes for the memory arena")]
    AllocationFailure { bytes: usize },
    #[error("emulator is not initialized")]
    NotInitialized,
    #[error("emulator is already initialized")]
    AlreadyInitialized,
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error(transparent)]
    State(#[from] StateError),
}
