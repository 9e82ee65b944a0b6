//! Test doubles for the backing-store fabric.

/// `BackingBus` mock and a recording wrapper around the real bus.
pub mod bus;
