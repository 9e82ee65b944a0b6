//! Backing-store bus traits.
//!
//! This module defines the two seams between the translation unit and the
//! memory fabric it reads page tables from:
//! 1. **`BackingBus`:** The unit's view: single-byte reads under a request/acknowledge handshake.
//! 2. **`Device`:** Anything the fabric can decode an address to (RAM, peripherals).

/// Byte-wide, read-only view of the backing store used by the page-table fetch.
///
/// A transaction is held asserted by calling `read_byte` once per tick with the
/// same address until it returns `Some(data)`; the data is valid on exactly the
/// tick the acknowledge is observed. An implementation that never acknowledges
/// stalls the caller indefinitely.
pub trait BackingBus {
    /// Drives a read of `addr` for one tick; returns the byte on acknowledge.
    fn read_byte(&mut self, addr: u32) -> Option<u8>;
}

/// A component decoded by the backing-store fabric.
///
/// All implementors must be `Send` so a whole system can move between threads.
pub trait Device: Send {
    /// Returns a short name for this device (e.g., `"RAM"`).
    fn name(&self) -> &str;
    /// Returns `(base_address, size_in_bytes)` of the region this device decodes.
    fn address_range(&self) -> (u32, u32);
    /// Reads one byte at the given device-relative offset.
    fn read_u8(&mut self, offset: u32) -> u8;
    /// Writes one byte at the given device-relative offset.
    fn write_u8(&mut self, offset: u32, val: u8);

    /// Writes a contiguous byte slice at the given offset (default: byte-by-byte).
    fn write_bytes(&mut self, offset: u32, data: &[u8]) {
        for (i, byte) in data.iter().enumerate() {
            self.write_u8(offset + i as u32, *byte);
        }
    }

    /// Returns true if `addr` falls inside this device's region.
    fn contains(&self, addr: u32) -> bool {
        let (base, size) = self.address_range();
        addr >= base && addr - base < size
    }
}
