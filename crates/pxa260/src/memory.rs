//! Host memory arena for the physically backed regions.
//!
//! One owning buffer holds ROM followed by RAM. A small descriptor table maps
//! physical address ranges onto byte offsets inside that buffer, and every
//! access is bounds-checked against it. Peripheral ranges are never entered
//! here; they are reached only through the dispatch table.

use crate::error::{AccessWidth, BusError, Direction, EmulatorError};
use byteorder::{ByteOrder, LittleEndian};
use pxa260_hw::memory_map;
use tracing::{debug, info};

pub const ROM_BASE: u32 = memory_map::rom::BASE;
pub const ROM_SIZE: u32 = memory_map::rom::SIZE;
pub const RAM_BASE: u32 = memory_map::ram::BASE;
pub const RAM_SIZE: u32 = memory_map::ram::SIZE;

/// A cache of translated guest code that may hold absolute host addresses
/// into the arena.
pub trait TranslationCache {
    /// Drop every cached translation
    fn flush(&mut self);
}

/// Used when no translator is attached
#[derive(Debug, Default, Clone, Copy)]
pub struct NullTranslationCache;

impl TranslationCache for NullTranslationCache {
    fn flush(&mut self) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionKind {
    Rom,
    Ram,
}

/// A physical range backed by a slice of the arena
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryRegion {
    pub kind: RegionKind,
    pub base: u32,
    pub size: u32,
    /// Byte offset of the region inside the arena
    pub offset: usize,
}

impl MemoryRegion {
    /// Arena offset of `address` if `len` bytes starting there fit in the region
    fn translate(&self, address: u32, len: u32) -> Option<usize> {
        let local = address.wrapping_sub(self.base);
        if local < self.size && self.size - local >= len {
            Some(self.offset + local as usize)
        } else {
            None
        }
    }
}

/// Owns the arena and the region descriptor table
#[derive(Debug, Default)]
pub struct AddressSpace {
    arena: Option<Vec<u8>>,
    regions: Vec<MemoryRegion>,
}

impl AddressSpace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_allocated(&self) -> bool {
        self.arena.is_some()
    }

    /// Reserve the arena and carve out ROM and RAM.
    ///
    /// Twice the backing size is reserved for headroom. Nothing is kept if
    /// the reservation fails.
    pub fn init(
        &mut self,
        rom_size: u32,
        ram_size: u32,
    ) -> Result<(&mut [u8], &mut [u8]), EmulatorError> {
        if self.arena.is_some() {
            return Err(EmulatorError::AlreadyInitialized);
        }

        let backing = rom_size as usize + ram_size as usize;
        let reserve = backing * 2;
        let mut arena = Vec::new();
        arena
            .try_reserve_exact(reserve)
            .map_err(|_| EmulatorError::AllocationFailure { bytes: reserve })?;
        arena.resize(backing, 0);

        info!(
            "Reserved {}KB arena for ROM ({}KB) and RAM ({}KB)",
            reserve / 1024,
            rom_size / 1024,
            ram_size / 1024
        );

        let rom = MemoryRegion {
            kind: RegionKind::Rom,
            base: ROM_BASE,
            size: rom_size,
            offset: 0,
        };
        let ram = MemoryRegion {
            kind: RegionKind::Ram,
            base: RAM_BASE,
            size: ram_size,
            offset: rom_size as usize,
        };
        debug!("  ROM at {:#010X}, arena offset {:#X}", rom.base, rom.offset);
        debug!("  RAM at {:#010X}, arena offset {:#X}", ram.base, ram.offset);

        self.regions = vec![rom, ram];
        self.arena = Some(arena);

        self.regions_mut()
            .ok_or(EmulatorError::NotInitialized)
    }

    /// Flush `cache`, then forget the regions and release the arena.
    ///
    /// No-op when nothing is allocated.
    pub fn deinit(&mut self, cache: &mut dyn TranslationCache) {
        if self.arena.is_none() {
            return;
        }

        // translations hold absolute addresses into the arena
        cache.flush();
        self.regions.clear();
        self.arena = None;
        info!("Released memory arena");
    }

    /// Zero the RAM region
    pub fn reset_ram(&mut self) {
        if let Some(ram) = self.region_mut(RegionKind::Ram) {
            ram.fill(0);
        }
    }

    pub fn regions(&self) -> &[MemoryRegion] {
        &self.regions
    }

    fn descriptor(&self, kind: RegionKind) -> Option<MemoryRegion> {
        self.regions.iter().copied().find(|r| r.kind == kind)
    }

    pub fn region(&self, kind: RegionKind) -> Option<&[u8]> {
        let region = self.descriptor(kind)?;
        let arena = self.arena.as_deref()?;
        Some(&arena[region.offset..region.offset + region.size as usize])
    }

    pub fn region_mut(&mut self, kind: RegionKind) -> Option<&mut [u8]> {
        let region = self.descriptor(kind)?;
        let arena = self.arena.as_deref_mut()?;
        Some(&mut arena[region.offset..region.offset + region.size as usize])
    }

    pub fn rom(&self) -> Option<&[u8]> {
        self.region(RegionKind::Rom)
    }

    pub fn ram(&self) -> Option<&[u8]> {
        self.region(RegionKind::Ram)
    }

    pub fn rom_mut(&mut self) -> Option<&mut [u8]> {
        self.region_mut(RegionKind::Rom)
    }

    pub fn ram_mut(&mut self) -> Option<&mut [u8]> {
        self.region_mut(RegionKind::Ram)
    }

    /// ROM and RAM at once
    pub fn regions_mut(&mut self) -> Option<(&mut [u8], &mut [u8])> {
        let rom = self.descriptor(RegionKind::Rom)?;
        let ram = self.descriptor(RegionKind::Ram)?;
        let arena = self.arena.as_deref_mut()?;
        let (rom_bytes, ram_bytes) = arena.split_at_mut(ram.offset);
        Some((
            &mut rom_bytes[rom.offset..rom.offset + rom.size as usize],
            &mut ram_bytes[..ram.size as usize],
        ))
    }

    fn locate(&self, address: u32, width: AccessWidth, direction: Direction) -> Result<usize, BusError> {
        let len = width.bits() as u32 / 8;
        self.regions
            .iter()
            .find_map(|r| r.translate(address, len))
            .filter(|_| self.arena.is_some())
            .ok_or(BusError::new(address, width, direction))
    }

    fn bytes(&self, address: u32, width: AccessWidth) -> Result<&[u8], BusError> {
        let offset = self.locate(address, width, Direction::Read)?;
        let len = width.bits() as usize / 8;
        let arena = self
            .arena
            .as_deref()
            .ok_or(BusError::new(address, width, Direction::Read))?;
        Ok(&arena[offset..offset + len])
    }

    fn bytes_mut(&mut self, address: u32, width: AccessWidth) -> Result<&mut [u8], BusError> {
        let offset = self.locate(address, width, Direction::Write)?;
        let len = width.bits() as usize / 8;
        let arena = self
            .arena
            .as_deref_mut()
            .ok_or(BusError::new(address, width, Direction::Write))?;
        Ok(&mut arena[offset..offset + len])
    }

    pub fn read_byte(&self, address: u32) -> Result<u8, BusError> {
        Ok(self.bytes(address, AccessWidth::Byte)?[0])
    }

    pub fn read_half(&self, address: u32) -> Result<u16, BusError> {
        let bytes = self.bytes(address & !1, AccessWidth::Half)?;
        Ok(LittleEndian::read_u16(bytes))
    }

    pub fn read_word(&self, address: u32) -> Result<u32, BusError> {
        let bytes = self.bytes(address & !3, AccessWidth::Word)?;
        Ok(LittleEndian::read_u32(bytes))
    }

    pub fn write_byte(&mut self, address: u32, value: u8) -> Result<(), BusError> {
        self.bytes_mut(address, AccessWidth::Byte)?[0] = value;
        Ok(())
    }

    pub fn write_half(&mut self, address: u32, value: u16) -> Result<(), BusError> {
        let bytes = self.bytes_mut(address & !1, AccessWidth::Half)?;
        LittleEndian::write_u16(bytes, value);
        Ok(())
    }

    pub fn write_word(&mut self, address: u32, value: u32) -> Result<(), BusError> {
        let bytes = self.bytes_mut(address & !3, AccessWidth::Word)?;
        LittleEndian::write_u32(bytes, value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    const ROM: u32 = 0x1000;
    const RAM: u32 = 0x4000;

    struct CountingCache(Rc<Cell<u32>>);

    impl TranslationCache for CountingCache {
        fn flush(&mut self) {
            self.0.set(self.0.get() + 1);
        }
    }

    #[test]
    fn init_carves_rom_then_ram() {
        let mut space = AddressSpace::new();
        let (rom, ram) = space.init(ROM, RAM).unwrap();
        assert_eq!(rom.len(), ROM as usize);
        assert_eq!(ram.len(), RAM as usize);
        rom[0] = 0xAA;
        ram[0] = 0x55;

        assert_eq!(space.read_byte(ROM_BASE).unwrap(), 0xAA);
        assert_eq!(space.read_byte(RAM_BASE).unwrap(), 0x55);
        assert_eq!(space.regions()[1].offset, ROM as usize);
    }

    #[test]
    fn second_init_is_rejected() {
        let mut space = AddressSpace::new();
        space.init(ROM, RAM).unwrap();
        assert_eq!(
            space.init(ROM, RAM).unwrap_err(),
            EmulatorError::AlreadyInitialized
        );
    }

    #[test]
    fn accesses_are_little_endian_and_aligned_down() {
        let mut space = AddressSpace::new();
        space.init(ROM, RAM).unwrap();
        space.write_word(RAM_BASE + 0x10, 0x1122_3344).unwrap();

        assert_eq!(space.read_byte(RAM_BASE + 0x10).unwrap(), 0x44);
        assert_eq!(space.read_half(RAM_BASE + 0x12).unwrap(), 0x1122);
        assert_eq!(space.read_half(RAM_BASE + 0x13).unwrap(), 0x1122);
        assert_eq!(space.read_word(RAM_BASE + 0x12).unwrap(), 0x1122_3344);
    }

    #[test]
    fn outside_regions_is_invalid() {
        let mut space = AddressSpace::new();
        space.init(ROM, RAM).unwrap();

        let err = space.read_word(RAM_BASE + RAM).unwrap_err();
        assert_eq!(err.direction, Direction::Read);
        assert_eq!(err.width, AccessWidth::Word);
        assert!(space.write_byte(ROM_BASE + ROM, 1).is_err());
        assert!(space.read_byte(0x4000_0000).is_err());
    }

    #[test]
    fn reset_ram_leaves_rom() {
        let mut space = AddressSpace::new();
        let (rom, ram) = space.init(ROM, RAM).unwrap();
        rom.fill(0x11);
        ram.fill(0x22);

        space.reset_ram();
        assert!(space.ram().unwrap().iter().all(|&b| b == 0));
        assert!(space.rom().unwrap().iter().all(|&b| b == 0x11));
    }

    #[test]
    fn deinit_flushes_once_and_is_idempotent() {
        let flushes = Rc::new(Cell::new(0));
        let mut cache = CountingCache(flushes.clone());

        let mut space = AddressSpace::new();
        space.deinit(&mut cache);
        assert_eq!(flushes.get(), 0);

        space.init(ROM, RAM).unwrap();
        space.deinit(&mut cache);
        space.deinit(&mut cache);
        assert_eq!(flushes.get(), 1);
        assert!(!space.is_allocated());
        assert!(space.regions().is_empty());
        assert!(space.read_byte(RAM_BASE).is_err());
    }
}
