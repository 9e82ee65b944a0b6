//! Global Address-Space Constants.
//!
//! This module defines the fixed geometry of the 24-bit address space. It includes:
//! 1. **Address Width:** Masks for virtual and physical addresses.
//! 2. **Page Geometry:** Page size, offset mask and page shift.
//! 3. **Regions:** The identity-mapped mode bit and the supervisor-only window.

/// Width of virtual and physical addresses in bits.
pub const ADDR_BITS: u32 = 24;

/// Mask for a full 24-bit address.
pub const ADDR_MASK: u32 = (1 << ADDR_BITS) - 1;

/// Number of bits to shift to convert between bytes and pages.
pub const PAGE_SHIFT: u32 = 12;

/// Page size in bytes (4KB).
pub const PAGE_SIZE: u32 = 1 << PAGE_SHIFT;

/// Mask for extracting the page offset from an address.
pub const PAGE_OFFSET_MASK: u32 = PAGE_SIZE - 1;

/// Width of a physical frame number in bits (24-bit physical space / 4KB pages).
pub const PFN_BITS: u32 = ADDR_BITS - PAGE_SHIFT;

/// Mask for a physical frame number.
pub const PFN_MASK: u16 = (1 << PFN_BITS) - 1;

/// Top address bit: selects the identity-mapped region and marks supervisor pages.
pub const IDENTITY_BIT: u32 = 1 << (ADDR_BITS - 1);

/// Page-aligned mask used to match the reserved supervisor window.
pub const SUPERVISOR_WINDOW_MASK: u32 = 0x00FF_E000;

/// Base of the reserved supervisor window (`0x00E000..=0x00FFFF`).
pub const SUPERVISOR_WINDOW_BASE: u32 = 0x0000_E000;

/// Default width of the translation cache index (2048 lines).
pub const DEFAULT_INDEX_BITS: u32 = 11;

/// Largest supported index width (the whole 12-bit page number).
pub const MAX_INDEX_BITS: u32 = ADDR_BITS - PAGE_SHIFT;

/// Size of one page-table entry in backing store, in bytes.
pub const PTE_SIZE: u32 = 2;
