//! Translation hardware.
//!
//! This module contains the functional units of the model. The only unit is
//! the address-translation unit; its translation cache, fetch sequencer,
//! invalidation controller, fault recorder and register window live beneath it.

/// Functional units (address translation).
pub mod units;

pub use self::units::mmu::Mmu;
