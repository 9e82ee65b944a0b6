//! Page-Table Entry codec.
//!
//! A mapping descriptor occupies two bytes in backing store. The flags live in
//! the low byte so that presence can be decided from the first byte alone:
//!
//! ```text
//!  byte 0:  7   6   5   4   3   2   1   0      byte 1:  7 ........ 0
//!          [ pfn[3:0]    ] rsv  X   W   P               [ pfn[11:4] ]
//! ```

use crate::common::constants::{PAGE_SHIFT, PFN_MASK};
use crate::common::VirtAddr;

/// Present bit (byte 0, bit 0).
const PTE_PRESENT_BIT: u16 = 1;

/// Write permission bit (byte 0, bit 1).
const PTE_WRITE_BIT: u16 = 1 << 1;

/// Execute permission bit (byte 0, bit 2).
const PTE_EXEC_BIT: u16 = 1 << 2;

/// Bit shift of the physical frame number within the 16-bit entry.
const PTE_PFN_SHIFT: u16 = 4;

/// A strongly-typed wrapper around a raw 16-bit mapping descriptor.
///
/// When `is_present()` is false the remaining fields are meaningless and
/// must not drive permission decisions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct PageTableEntry(u16);

impl PageTableEntry {
    /// Builds a descriptor from its fields; `pfn` is truncated to 12 bits.
    pub const fn new(present: bool, writable: bool, executable: bool, pfn: u16) -> Self {
        let mut raw = (pfn & PFN_MASK) << PTE_PFN_SHIFT;
        if present {
            raw |= PTE_PRESENT_BIT;
        }
        if writable {
            raw |= PTE_WRITE_BIT;
        }
        if executable {
            raw |= PTE_EXEC_BIT;
        }
        Self(raw)
    }

    /// A present mapping of `pfn` with every permission.
    pub const fn full_access(pfn: u16) -> Self {
        Self::new(true, true, true, pfn)
    }

    /// The all-zero, not-present descriptor.
    pub const fn absent() -> Self {
        Self(0)
    }

    /// The descriptor synthesized for the identity-mapped region.
    ///
    /// The frame number is the address's own page number, so the physical
    /// address equals the virtual one.
    pub const fn identity(vaddr: VirtAddr) -> Self {
        Self::full_access((vaddr.val() >> PAGE_SHIFT) as u16)
    }

    /// Wraps a raw 16-bit descriptor (byte 0 in the low half).
    pub const fn from_raw(raw: u16) -> Self {
        Self(raw)
    }

    /// Combines the two backing-store bytes.
    pub const fn from_bytes(low: u8, high: u8) -> Self {
        Self(u16::from_le_bytes([low, high]))
    }

    /// Returns the raw 16-bit value.
    pub const fn raw(self) -> u16 {
        self.0
    }

    /// Returns the backing-store byte image `[low, high]`.
    pub const fn to_bytes(self) -> [u8; 2] {
        self.0.to_le_bytes()
    }

    /// Decides presence from the first (low) byte alone.
    pub const fn low_byte_present(low: u8) -> bool {
        low as u16 & PTE_PRESENT_BIT != 0
    }

    /// Returns true if the Present bit is set.
    pub const fn is_present(self) -> bool {
        self.0 & PTE_PRESENT_BIT != 0
    }

    /// Returns true if the Writable bit is set.
    pub const fn is_writable(self) -> bool {
        self.0 & PTE_WRITE_BIT != 0
    }

    /// Returns true if the Executable bit is set.
    pub const fn is_executable(self) -> bool {
        self.0 & PTE_EXEC_BIT != 0
    }

    /// Extracts the physical frame number.
    pub const fn pfn(self) -> u16 {
        (self.0 >> PTE_PFN_SHIFT) & PFN_MASK
    }
}
