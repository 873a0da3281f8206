//! Program memory with the built-in hexadecimal font.

use super::error::{Error, Result};
use crate::util::bit_splitter::BitSplitter;

pub const MEM_SIZE: usize = 4096;
pub const PROGRAM_START: usize = 0x200;

/// Bytes per font glyph.
pub const GLYPH_SIZE: usize = 5;

pub const FONT: [u8; 80] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];

/// The 4 KiB address space. Every access is bounds checked and
/// fails with [`Error::MemoryOutOfBounds`] instead of wrapping.
#[derive(Clone)]
pub struct Memory {
    bytes: [u8; MEM_SIZE],
}

impl Memory {

    /// Zeroed memory with the font at address 0.
    pub fn new() -> Memory {
        let mut bytes = [0; MEM_SIZE];
        bytes[..FONT.len()].copy_from_slice(&FONT);
        Memory { bytes }
    }

    /// Fresh memory with `program` copied to [`PROGRAM_START`].
    pub fn with_program(program: &[u8]) -> Result<Memory> {
        let capacity = MEM_SIZE - PROGRAM_START;
        if program.len() > capacity {
            return Err(Error::RomTooLarge { size: program.len(), capacity });
        }
        let mut memory = Memory::new();
        memory.bytes[PROGRAM_START..PROGRAM_START + program.len()].copy_from_slice(program);
        Ok(memory)
    }

    pub fn read(&self, addr: usize) -> Result<u8> {
        self.bytes
            .get(addr)
            .copied()
            .ok_or(Error::MemoryOutOfBounds { addr, size: MEM_SIZE })
    }

    pub fn write(&mut self, addr: usize, value: u8) -> Result<()> {
        let cell = self
            .bytes
            .get_mut(addr)
            .ok_or(Error::MemoryOutOfBounds { addr, size: MEM_SIZE })?;
        *cell = value;
        Ok(())
    }

    /// Read a big-endian instruction word.
    pub fn read_word(&self, addr: usize) -> Result<u16> {
        let word = BitSplitter::from_two_u8(self.read(addr)?, self.read(addr + 1)?);
        Ok(word.as_u16())
    }

    /// Borrow `len` bytes starting at `addr`. Fails if any of them is out of bounds.
    pub fn read_slice(&self, addr: usize, len: usize) -> Result<&[u8]> {
        self.check_range(addr, len)?;
        Ok(&self.bytes[addr..addr + len])
    }

    /// Copy `values` to `addr`. Nothing is written unless all of it fits.
    pub fn write_slice(&mut self, addr: usize, values: &[u8]) -> Result<()> {
        self.check_range(addr, values.len())?;
        self.bytes[addr..addr + values.len()].copy_from_slice(values);
        Ok(())
    }

    /// Up to `len` sprite bytes from `addr`, cut short at the end of memory.
    pub fn sprite(&self, addr: usize, len: usize) -> &[u8] {
        let start = addr.min(MEM_SIZE);
        let end = addr.saturating_add(len).min(MEM_SIZE);
        &self.bytes[start..end]
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }

    fn check_range(&self, addr: usize, len: usize) -> Result<()> {
        match addr.checked_add(len) {
            Some(end) if end <= MEM_SIZE => Ok(()),
            // Report the first address that does not exist
            _ => Err(Error::MemoryOutOfBounds { addr: addr.max(MEM_SIZE), size: MEM_SIZE }),
        }
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {

    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn font_is_loaded_at_zero() {
        let memory = Memory::new();
        assert_eq!(&memory.as_slice()[..80], &FONT[..]);
        assert!(memory.as_slice()[80..].iter().all(|&b| b == 0));
    }

    #[test]
    fn program_is_copied_to_program_start() {
        let memory = Memory::with_program(&[0xDE, 0xAD, 0xBE, 0xEF]).unwrap();
        assert_eq!(&memory.as_slice()[0x200..0x204], &[0xDE, 0xAD, 0xBE, 0xEF]);
        assert_eq!(memory.read(0x204).unwrap(), 0);
    }

    #[test]
    fn largest_program_fits() {
        let program = vec![0xAA; MEM_SIZE - PROGRAM_START];
        let memory = Memory::with_program(&program).unwrap();
        assert_eq!(memory.read(MEM_SIZE - 1).unwrap(), 0xAA);
    }

    #[test]
    fn oversized_program_is_rejected() {
        let program = vec![0xAA; MEM_SIZE - PROGRAM_START + 1];
        match Memory::with_program(&program) {
            Err(Error::RomTooLarge { size, capacity }) => {
                assert_eq!(size, 3585);
                assert_eq!(capacity, 3584);
            }
            other => panic!("expected RomTooLarge, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn words_are_big_endian() {
        let memory = Memory::with_program(&[0x6A, 0x02]).unwrap();
        assert_eq!(memory.read_word(0x200).unwrap(), 0x6A02);
    }

    #[test]
    fn accesses_past_the_end_fail() {
        let mut memory = Memory::new();
        assert!(matches!(memory.read(MEM_SIZE), Err(Error::MemoryOutOfBounds { addr: 4096, .. })));
        assert!(matches!(memory.write(MEM_SIZE, 1), Err(Error::MemoryOutOfBounds { .. })));
        assert!(matches!(memory.read_word(MEM_SIZE - 1), Err(Error::MemoryOutOfBounds { addr: 4096, .. })));
    }

    #[test]
    fn slice_writes_are_all_or_nothing() {
        let mut memory = Memory::new();
        assert!(memory.write_slice(MEM_SIZE - 2, &[1, 2, 3]).is_err());
        assert_eq!(memory.read(MEM_SIZE - 2).unwrap(), 0);
        assert_eq!(memory.read(MEM_SIZE - 1).unwrap(), 0);

        memory.write_slice(MEM_SIZE - 3, &[1, 2, 3]).unwrap();
        assert_eq!(memory.read_slice(MEM_SIZE - 3, 3).unwrap(), &[1, 2, 3]);
    }

    #[test]
    fn sprites_are_clipped_at_end_of_memory() {
        let memory = Memory::new();
        assert_eq!(memory.sprite(MEM_SIZE - 2, 5).len(), 2);
        assert_eq!(memory.sprite(MEM_SIZE + 10, 5).len(), 0);
        assert_eq!(memory.sprite(0, 5), &FONT[..5]);
    }
}
