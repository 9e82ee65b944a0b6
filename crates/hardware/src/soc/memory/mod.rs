//! Physical Memory (RAM).
//!
//! Byte-addressable RAM mapped at a base address on the backing-store bus.
//! Page tables live here; so does everything the translated addresses point at.

use crate::soc::traits::Device;

/// System Memory structure.
#[derive(Clone, Debug)]
pub struct Memory {
    /// Backing bytes.
    data: Vec<u8>,
    /// The base physical address where this memory is mapped.
    base_addr: u32,
}

impl Memory {
    /// Creates a zero-filled memory of `size` bytes mapped at `base_addr`.
    pub fn new(size: usize, base_addr: u32) -> Self {
        Self {
            data: vec![0; size],
            base_addr,
        }
    }

    /// Loads a byte slice at a device-relative offset.
    ///
    /// Bytes that would fall past the end of the memory are dropped.
    pub fn load(&mut self, data: &[u8], offset: usize) {
        let end = offset.saturating_add(data.len()).min(self.data.len());
        if offset < end {
            self.data[offset..end].copy_from_slice(&data[..end - offset]);
        }
    }

    /// Returns the memory contents.
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }
}

impl Device for Memory {
    fn name(&self) -> &str {
        "RAM"
    }

    fn address_range(&self) -> (u32, u32) {
        (self.base_addr, self.data.len() as u32)
    }

    fn read_u8(&mut self, offset: u32) -> u8 {
        self.data.get(offset as usize).copied().unwrap_or(0)
    }

    fn write_u8(&mut self, offset: u32, val: u8) {
        if let Some(byte) = self.data.get_mut(offset as usize) {
            *byte = val;
        }
    }

    fn write_bytes(&mut self, offset: u32, data: &[u8]) {
        self.load(data, offset as usize);
    }
}
