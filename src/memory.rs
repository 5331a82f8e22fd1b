use std::io::Read;

use log::debug;

use crate::decode::RawInstruction;
use crate::error::{ExecError, LoadError};

pub type TypeAddr = u16; // in reality u12

/// Addressable bytes, 0x000..=0xFFE.
pub const MEMORY_SIZE: usize = 0xFFF;
pub const PROGRAM_START: TypeAddr = 0x200;
pub const MAX_ROM_SIZE: usize = MEMORY_SIZE - PROGRAM_START as usize;

pub const FONT_START: TypeAddr = 0x000;
pub const FONT_GLYPH_SIZE: u16 = 5;
type FontBytes = [u8; 5 * 16];

const DEFAULT_FONT: FontBytes = [
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

/// Address of the built-in glyph for a hex digit. Only the low 8 bits of the
/// digit are used, so values above 0xF point past the font table.
pub fn font_address(digit: u8) -> TypeAddr {
    FONT_START + FONT_GLYPH_SIZE * digit as u16
}

pub struct Memory {
    // font lives at 000 -> 04F, programs are loaded at 200
    bytes: [u8; MEMORY_SIZE],
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

impl Memory {
    pub fn new() -> Self {
        let mut mem = Self {
            bytes: [0; MEMORY_SIZE],
        };
        mem.reset();
        mem
    }

    /// Zeroes everything and writes the font table back.
    pub fn reset(&mut self) {
        self.bytes = [0; MEMORY_SIZE];
        let start = FONT_START as usize;
        self.bytes[start..start + DEFAULT_FONT.len()].copy_from_slice(&DEFAULT_FONT);
    }

    pub fn get(&self, addr: TypeAddr) -> Result<u8, ExecError> {
        self.bytes
            .get(addr as usize)
            .copied()
            .ok_or(ExecError::AddressOutOfRange(addr))
    }

    #[cfg(test)]
    fn set(&mut self, addr: TypeAddr, val: u8) -> Result<(), ExecError> {
        let slot = self
            .bytes
            .get_mut(addr as usize)
            .ok_or(ExecError::AddressOutOfRange(addr))?;
        *slot = val;
        Ok(())
    }

    /// `len` bytes starting at `addr`, or the first address that falls outside memory.
    pub fn slice(&self, addr: TypeAddr, len: usize) -> Result<&[u8], ExecError> {
        let range = Self::checked_range(addr, len)?;
        Ok(&self.bytes[range])
    }

    pub fn slice_mut(&mut self, addr: TypeAddr, len: usize) -> Result<&mut [u8], ExecError> {
        let range = Self::checked_range(addr, len)?;
        Ok(&mut self.bytes[range])
    }

    fn checked_range(addr: TypeAddr, len: usize) -> Result<std::ops::Range<usize>, ExecError> {
        let start = addr as usize;
        let end = start + len;
        if end > MEMORY_SIZE {
            let first_bad = start.max(MEMORY_SIZE);
            return Err(ExecError::AddressOutOfRange(first_bad as TypeAddr));
        }
        Ok(start..end)
    }

    /// Reads the big-endian opcode at `pc`.
    pub fn fetch(&self, pc: TypeAddr) -> Result<RawInstruction, ExecError> {
        let bytes = self.slice(pc, 2)?;
        Ok(RawInstruction::from_bytes(bytes[0], bytes[1]))
    }

    /// Copies a program image to 0x200. Memory is untouched if the image does not fit.
    pub fn load_rom(&mut self, bytes: &[u8]) -> Result<(), LoadError> {
        if bytes.len() > MAX_ROM_SIZE {
            return Err(LoadError::Size {
                size: bytes.len(),
                max: MAX_ROM_SIZE,
            });
        }
        let start = PROGRAM_START as usize;
        self.bytes[start..start + bytes.len()].copy_from_slice(bytes);
        debug!("loaded {} byte rom at {:#05x}", bytes.len(), PROGRAM_START);
        Ok(())
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

/// Reads a whole program image into a staging buffer. At most one byte past the
/// capacity is read so an oversized image is detected without draining the source.
pub fn stage_rom<R: Read>(reader: R) -> Result<Vec<u8>, LoadError> {
    let requested = MAX_ROM_SIZE + 1;
    let mut buffer = Vec::new();
    buffer
        .try_reserve_exact(requested)
        .map_err(|_| LoadError::Allocation { requested })?;

    reader.take(requested as u64).read_to_end(&mut buffer)?;
    if buffer.len() > MAX_ROM_SIZE {
        return Err(LoadError::Size {
            size: buffer.len(),
            max: MAX_ROM_SIZE,
        });
    }
    Ok(buffer)
}
