//! Backing-store fabric.
//!
//! This module organizes the memory side of the system: the bus the
//! translation unit fetches page-table entries through, the RAM device that
//! holds them, and the traits that connect the two.

/// Backing-store bus interconnect and routing.
pub mod interconnect;

/// RAM device.
pub mod memory;

/// Bus and device traits.
pub mod traits;

pub use interconnect::Bus;
pub use memory::Memory;
pub use traits::{BackingBus, Device};
