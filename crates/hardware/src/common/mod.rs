//! Common types shared by every part of the translation-unit model.
//!
//! This module provides the fundamental building blocks used across the crate:
//! 1. **Address Types:** Strong 24-bit types for virtual and physical addresses.
//! 2. **Constants:** Address-space geometry and the fixed regions.
//! 3. **Requester Interface:** Translation request and response values.
//! 4. **Error Handling:** The crate-wide `MmuError`.

/// Address type definitions (physical and virtual addresses).
pub mod addr;

/// Address-space constants.
pub mod constants;

/// Request and response types for the requester interface.
pub mod data;

/// Error types.
pub mod error;

pub use addr::{PhysAddr, VirtAddr};
pub use constants::{PAGE_SHIFT, PFN_MASK};
pub use data::{TranslationRequest, TranslationResponse};
pub use error::MmuError;
