//! Error definitions.
//!
//! Translation faults are not errors: a denied or unmapped access is an ordinary
//! `abort` response plus a fault record. `MmuError` covers misuse of the unit's
//! interfaces, invalid configuration, and host-side failures (I/O, JSON), and
//! the driver-level stall detection.

use thiserror::Error;

use super::addr::VirtAddr;

/// Errors reported by the translation unit, its configuration and its drivers.
#[derive(Debug, Error)]
pub enum MmuError {
    /// A request was submitted while another is still in flight.
    ///
    /// The second request is rejected, not queued.
    #[error("translation unit busy: request for {vaddr} still in flight")]
    Busy {
        /// Address of the rejected request.
        vaddr: VirtAddr,
    },

    /// An invalidation or page-table write named an index outside the cache.
    #[error("cache index {index} out of range (cache has {lines} lines)")]
    InvalidIndex {
        /// Requested index.
        index: usize,
        /// Number of cache lines.
        lines: usize,
    },

    /// The configuration cannot describe a valid unit.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// No response was produced within the driver's cycle budget.
    ///
    /// The unit itself never times out; this is raised by the simulator driver
    /// when the backing store stops acknowledging.
    #[error("translation of {vaddr} stalled for {cycles} cycles")]
    Stalled {
        /// Address of the stalled request.
        vaddr: VirtAddr,
        /// Cycles waited before giving up.
        cycles: u64,
    },

    /// Host I/O failure while loading a scenario.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed scenario or configuration JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
