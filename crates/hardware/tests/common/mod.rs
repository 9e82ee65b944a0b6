//! Shared test infrastructure.


/// Backing-store bus doubles.
pub mod mocks;
