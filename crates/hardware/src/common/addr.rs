//! Physical and Virtual Address types.
//!
//! This module defines strong types for the 24-bit virtual and physical address
//! spaces so the two can never be mixed by accident. It provides:
//! 1. **Type Safety:** Distinguishes virtual from physical addresses at compile time.
//! 2. **Decomposition:** Page offset, cache/page-table index and the mode bit.
//! 3. **Region Checks:** Identity-region and supervisor-region classification.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::constants::{
    ADDR_MASK, IDENTITY_BIT, PAGE_OFFSET_MASK, PAGE_SHIFT, SUPERVISOR_WINDOW_BASE,
    SUPERVISOR_WINDOW_MASK,
};

/// A virtual address as issued by the processor front-end.
///
/// Only the low 24 bits are significant; construction masks the rest away.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "u32", into = "u32")]
pub struct VirtAddr(u32);

/// A physical address on the backing-store fabric.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "u32", into = "u32")]
pub struct PhysAddr(u32);

impl VirtAddr {
    /// Creates a new virtual address, truncated to 24 bits.
    #[inline(always)]
    pub const fn new(addr: u32) -> Self {
        Self(addr & ADDR_MASK)
    }

    /// Returns the raw 24-bit address value.
    #[inline(always)]
    pub const fn val(self) -> u32 {
        self.0
    }

    /// Extracts the page offset (low 12 bits), which translation leaves unchanged.
    #[inline(always)]
    pub const fn page_offset(self) -> u32 {
        self.0 & PAGE_OFFSET_MASK
    }

    /// Returns the full 12-bit virtual page number.
    #[inline(always)]
    pub const fn page_number(self) -> u32 {
        self.0 >> PAGE_SHIFT
    }

    /// Returns the cache/page-table index for an index of `index_bits` bits.
    ///
    /// The index is the slice of the address immediately above the page offset.
    #[inline(always)]
    pub const fn index(self, index_bits: u32) -> usize {
        ((self.0 >> PAGE_SHIFT) & ((1 << index_bits) - 1)) as usize
    }

    /// Returns true if the top address bit selects the identity-mapped region.
    #[inline(always)]
    pub const fn is_identity_region(self) -> bool {
        self.0 & IDENTITY_BIT != 0
    }

    /// Returns true if the address requires a privileged context.
    ///
    /// The supervisor region is the identity region plus the reserved
    /// window `0x00E000..=0x00FFFF`.
    #[inline(always)]
    pub const fn is_supervisor_region(self) -> bool {
        self.is_identity_region() || (self.0 & SUPERVISOR_WINDOW_MASK) == SUPERVISOR_WINDOW_BASE
    }
}

impl PhysAddr {
    /// Creates a new physical address, truncated to 24 bits.
    #[inline(always)]
    pub const fn new(addr: u32) -> Self {
        Self(addr & ADDR_MASK)
    }

    /// Builds a physical address by concatenating a frame number with a page offset.
    #[inline(always)]
    pub const fn from_parts(pfn: u16, offset: u32) -> Self {
        Self::new(((pfn as u32) << PAGE_SHIFT) | (offset & PAGE_OFFSET_MASK))
    }

    /// Returns the raw 24-bit address value.
    #[inline(always)]
    pub const fn val(self) -> u32 {
        self.0
    }

    /// Returns the physical frame number.
    #[inline(always)]
    pub const fn pfn(self) -> u16 {
        (self.0 >> PAGE_SHIFT) as u16
    }
}

impl fmt::Display for VirtAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v:{:06x}", self.0)
    }
}

impl fmt::Display for PhysAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "p:{:06x}", self.0)
    }
}

impl From<u32> for VirtAddr {
    fn from(addr: u32) -> Self {
        Self::new(addr)
    }
}

impl From<VirtAddr> for u32 {
    fn from(addr: VirtAddr) -> Self {
        addr.val()
    }
}

impl From<u32> for PhysAddr {
    fn from(addr: u32) -> Self {
        Self::new(addr)
    }
}

impl From<PhysAddr> for u32 {
    fn from(addr: PhysAddr) -> Self {
        addr.val()
    }
}
