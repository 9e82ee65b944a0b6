//! Simulation drivers.
//!
//! Wires a translation unit to a RAM-backed bus and runs request sequences
//! against it, either programmatically or from JSON scenario files.

/// JSON scenario format and runner.
pub mod scenario;

/// Unit + bus driver with bounded waits.
pub mod simulator;

pub use self::scenario::{Scenario, StepOutcome};
pub use self::simulator::Simulator;
