//! 24-bit address-translation unit model.
//!
//! This crate implements a cycle-stepped model of a small MMU with the following:
//! 1. **Core:** Translation control state machine, direct-mapped TLB, page-table fetch and invalidation.
//! 2. **Diagnostics:** Fault recorder and the byte-wide configuration register window.
//! 3. **SoC:** Backing-store bus with request/acknowledge timing and a RAM device.
//! 4. **Simulation:** Driver, JSON scenarios, configuration and statistics collection.

/// Common types and constants (addresses, requests, responses, errors).
pub mod common;
/// Model configuration (defaults, enums, hierarchical config structures).
pub mod config;
/// Translation hardware (MMU and its sub-units).
pub mod core;
/// Simulator driver and scenario runner.
pub mod sim;
/// Backing-store fabric (bus, memory, traits).
pub mod soc;
/// Translation statistics collection and reporting.
pub mod stats;

/// Crate-wide error type.
pub use crate::common::MmuError;
/// Root configuration type; use `Config::default()` or deserialize from JSON.
pub use crate::config::Config;
/// Translation unit; construct with `Mmu::new`.
pub use crate::core::Mmu;
/// Driver owning a unit and its backing store; construct with `Simulator::new`.
pub use crate::sim::Simulator;
