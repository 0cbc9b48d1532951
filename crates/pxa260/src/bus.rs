//! Physical bus dispatch.
//!
//! The 32-bit address space is split into 64 banks of 64 MB. Every bank
//! carries six slots, one per (width, direction) pair, each either bound to
//! a handler family or `Unmapped`. Width gating is part of the table: a bank
//! that only decodes word accesses has its byte and half slots unmapped.
//!
//! # Registration order
//! 1. every slot of every bank defaults to memory
//! 2. PCMCIA0 and PCMCIA1, all widths
//! 3. on-chip IO, byte and word
//! 4. LCD controller, word only
//! 5. memory controller, word only
//! 6. W86L488 on nCS2, half only
//!
//! Later registrations win where ranges overlap.

use crate::error::{AccessWidth, BusError, Direction};
use crate::memory::AddressSpace;
use crate::mmio::{Peripherals, generic};
use pxa260_hw::memory_map::{self, TOTAL_BANKS, bank_of, end_bank_of};
use tracing::{debug, instrument, warn};

/// Handler families a slot can bind to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handler {
    /// ROM and RAM through the address space
    Memory,
    Pcmcia0,
    Pcmcia1,
    /// On-chip peripherals at `0x4000_0000`
    Io,
    Lcd,
    MemCtrl,
    /// W86L488 SD bridge
    StaticChipSelect2,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Slot {
    Mapped(Handler),
    /// Any access raises a bus error
    #[default]
    Unmapped,
}

/// The six slots of one bank
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BankEntry {
    pub read_byte: Slot,
    pub read_half: Slot,
    pub read_word: Slot,
    pub write_byte: Slot,
    pub write_half: Slot,
    pub write_word: Slot,
}

impl BankEntry {
    pub const UNMAPPED: Self = Self {
        read_byte: Slot::Unmapped,
        read_half: Slot::Unmapped,
        read_word: Slot::Unmapped,
        write_byte: Slot::Unmapped,
        write_half: Slot::Unmapped,
        write_word: Slot::Unmapped,
    };

    /// Every width and direction bound to `handler`
    pub const fn uniform(handler: Handler) -> Self {
        Self::UNMAPPED
            .with_byte(handler)
            .with_half(handler)
            .with_word(handler)
    }

    /// Bind byte reads and writes
    pub const fn with_byte(mut self, handler: Handler) -> Self {
        self.read_byte = Slot::Mapped(handler);
        self.write_byte = Slot::Mapped(handler);
        self
    }

    /// Bind half-word reads and writes
    pub const fn with_half(mut self, handler: Handler) -> Self {
        self.read_half = Slot::Mapped(handler);
        self.write_half = Slot::Mapped(handler);
        self
    }

    /// Bind word reads and writes
    pub const fn with_word(mut self, handler: Handler) -> Self {
        self.read_word = Slot::Mapped(handler);
        self.write_word = Slot::Mapped(handler);
        self
    }

    pub fn slot(&self, width: AccessWidth, direction: Direction) -> Slot {
        match (direction, width) {
            (Direction::Read, AccessWidth::Byte) => self.read_byte,
            (Direction::Read, AccessWidth::Half) => self.read_half,
            (Direction::Read, AccessWidth::Word) => self.read_word,
            (Direction::Write, AccessWidth::Byte) => self.write_byte,
            (Direction::Write, AccessWidth::Half) => self.write_half,
            (Direction::Write, AccessWidth::Word) => self.write_word,
        }
    }

    pub fn slots(&self) -> [Slot; 6] {
        [
            self.read_byte,
            self.read_half,
            self.read_word,
            self.write_byte,
            self.write_half,
            self.write_word,
        ]
    }
}

/// Per-bank handler bindings for the whole address space
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchTable {
    banks: [BankEntry; TOTAL_BANKS],
}

impl Default for DispatchTable {
    fn default() -> Self {
        Self::new()
    }
}

impl DispatchTable {
    /// A table with every slot unmapped
    pub fn new() -> Self {
        Self {
            banks: [BankEntry::UNMAPPED; TOTAL_BANKS],
        }
    }

    /// The PXA260 / Tungsten T3 layout
    pub fn pxa260() -> Self {
        let mut table = Self::new();
        table.install_defaults();
        table.install_region(
            memory_map::pcmcia0::BASE,
            memory_map::pcmcia0::SIZE,
            BankEntry::uniform(Handler::Pcmcia0),
        );
        table.install_region(
            memory_map::pcmcia1::BASE,
            memory_map::pcmcia1::SIZE,
            BankEntry::uniform(Handler::Pcmcia1),
        );
        table.install_region(
            memory_map::io::BASE,
            memory_map::io::SIZE,
            BankEntry::UNMAPPED
                .with_byte(Handler::Io)
                .with_word(Handler::Io),
        );
        table.install_region(
            memory_map::lcd::BASE,
            memory_map::lcd::SIZE,
            BankEntry::UNMAPPED.with_word(Handler::Lcd),
        );
        table.install_region(
            memory_map::memctrl::BASE,
            memory_map::memctrl::SIZE,
            BankEntry::UNMAPPED.with_word(Handler::MemCtrl),
        );
        table.install_region(
            memory_map::w86l488::BASE,
            memory_map::w86l488::SIZE,
            BankEntry::UNMAPPED.with_half(Handler::StaticChipSelect2),
        );
        table
    }

    /// Bind every slot of every bank to memory
    pub fn install_defaults(&mut self) {
        self.banks = [BankEntry::uniform(Handler::Memory); TOTAL_BANKS];
    }

    /// Overwrite all banks touched by `start..start + size`. An empty range
    /// touches nothing.
    pub fn install_region(&mut self, start: u32, size: u32, entry: BankEntry) {
        if size == 0 {
            debug!("Skipping empty region at {:#010X}", start);
            return;
        }
        let first = bank_of(start);
        let last = end_bank_of(start, size);
        debug!(
            "Installing banks {}..={} for {:#010X} (+{:#X})",
            first, last, start, size
        );
        for bank in &mut self.banks[first..=last] {
            *bank = entry;
        }
    }

    pub fn entry(&self, bank: usize) -> &BankEntry {
        &self.banks[bank]
    }

    pub fn banks(&self) -> &[BankEntry] {
        &self.banks
    }

    pub fn resolve(&self, address: u32, width: AccessWidth, direction: Direction) -> Slot {
        self.banks[bank_of(address)].slot(width, direction)
    }
}

/// The CPU-facing bus: memory, dispatch table, and peripherals.
///
/// `Default` leaves every bank unmapped; `new` installs the PXA260 layout.
#[derive(Debug, Default)]
pub struct Bus {
    pub memory: AddressSpace,
    pub table: DispatchTable,
    pub peripherals: Peripherals,
}

impl Bus {
    pub fn new() -> Self {
        Self {
            memory: AddressSpace::new(),
            table: DispatchTable::pxa260(),
            peripherals: Peripherals::new(),
        }
    }

    fn dispatch_read(&mut self, address: u32, width: AccessWidth) -> Result<u32, BusError> {
        let invalid = BusError::new(address, width, Direction::Read);
        let Slot::Mapped(handler) = self.table.resolve(address, width, Direction::Read) else {
            return Err(invalid);
        };

        let p = &mut self.peripherals;
        match (handler, width) {
            (Handler::Memory, AccessWidth::Byte) => self.memory.read_byte(address).map(u32::from),
            (Handler::Memory, AccessWidth::Half) => self.memory.read_half(address).map(u32::from),
            (Handler::Memory, AccessWidth::Word) => self.memory.read_word(address),
            (Handler::Pcmcia0, _) => Ok(generic::read("PCMCIA0", address, width)),
            (Handler::Pcmcia1, _) => Ok(generic::read("PCMCIA1", address, width)),
            (Handler::Io, AccessWidth::Byte) => Ok(p.io_read_byte(address) as u32),
            (Handler::Io, AccessWidth::Word) => Ok(p.io_read_word(address)),
            (Handler::Lcd, AccessWidth::Word) => Ok(p.lcd_read_word(address)),
            (Handler::MemCtrl, AccessWidth::Word) => Ok(p.memctrl_read_word(address)),
            (Handler::StaticChipSelect2, AccessWidth::Half) => {
                Ok(p.static_chip_select_2_read_half(address) as u32)
            }
            _ => Err(invalid),
        }
    }

    fn dispatch_write(
        &mut self,
        address: u32,
        width: AccessWidth,
        value: u32,
    ) -> Result<(), BusError> {
        let invalid = BusError::new(address, width, Direction::Write);
        let Slot::Mapped(handler) = self.table.resolve(address, width, Direction::Write) else {
            return Err(invalid);
        };

        let p = &mut self.peripherals;
        match (handler, width) {
            (Handler::Memory, AccessWidth::Byte) => self.memory.write_byte(address, value as u8),
            (Handler::Memory, AccessWidth::Half) => self.memory.write_half(address, value as u16),
            (Handler::Memory, AccessWidth::Word) => self.memory.write_word(address, value),
            (Handler::Pcmcia0, _) => {
                generic::write("PCMCIA0", address, width, value);
                Ok(())
            }
            (Handler::Pcmcia1, _) => {
                generic::write("PCMCIA1", address, width, value);
                Ok(())
            }
            (Handler::Io, AccessWidth::Byte) => {
                p.io_write_byte(address, value as u8);
                Ok(())
            }
            (Handler::Io, AccessWidth::Word) => {
                p.io_write_word(address, value);
                Ok(())
            }
            (Handler::Lcd, AccessWidth::Word) => {
                p.lcd_write_word(address, value);
                Ok(())
            }
            (Handler::MemCtrl, AccessWidth::Word) => {
                p.memctrl_write_word(address, value);
                Ok(())
            }
            (Handler::StaticChipSelect2, AccessWidth::Half) => {
                p.static_chip_select_2_write_half(address, value as u16);
                Ok(())
            }
            _ => Err(invalid),
        }
    }

    fn checked_read(&mut self, address: u32, width: AccessWidth) -> Result<u32, BusError> {
        self.dispatch_read(address, width).inspect_err(|e| {
            warn!("{}", e);
        })
    }

    fn checked_write(
        &mut self,
        address: u32,
        width: AccessWidth,
        value: u32,
    ) -> Result<(), BusError> {
        self.dispatch_write(address, width, value).inspect_err(|e| {
            warn!("{}", e);
        })
    }

    #[instrument(level = "trace", skip(self))]
    pub fn read_byte(&mut self, address: u32) -> Result<u8, BusError> {
        self.checked_read(address, AccessWidth::Byte).map(|v| v as u8)
    }

    #[instrument(level = "trace", skip(self))]
    pub fn read_half(&mut self, address: u32) -> Result<u16, BusError> {
        self.checked_read(address, AccessWidth::Half).map(|v| v as u16)
    }

    #[instrument(level = "trace", skip(self))]
    pub fn read_word(&mut self, address: u32) -> Result<u32, BusError> {
        self.checked_read(address, AccessWidth::Word)
    }

    #[instrument(level = "trace", skip(self))]
    pub fn write_byte(&mut self, address: u32, value: u8) -> Result<(), BusError> {
        self.checked_write(address, AccessWidth::Byte, value as u32)
    }

    #[instrument(level = "trace", skip(self))]
    pub fn write_half(&mut self, address: u32, value: u16) -> Result<(), BusError> {
        self.checked_write(address, AccessWidth::Half, value as u32)
    }

    #[instrument(level = "trace", skip(self))]
    pub fn write_word(&mut self, address: u32, value: u32) -> Result<(), BusError> {
        self.checked_write(address, AccessWidth::Word, value)
    }

    /// Debugger read. `u64::MAX` when the slot is unmapped or the handler
    /// rejects the access; unmapped slots are never invoked.
    pub fn peek(&mut self, address: u32, width: AccessWidth) -> u64 {
        if self.table.resolve(address, width, Direction::Read) == Slot::Unmapped {
            return u64::MAX;
        }
        self.dispatch_read(address, width)
            .map(u64::from)
            .unwrap_or(u64::MAX)
    }
}
