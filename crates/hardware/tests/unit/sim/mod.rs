/// JSON scenario parsing and execution.
pub mod scenario;

/// Bounded driver waits.
pub mod simulator;
