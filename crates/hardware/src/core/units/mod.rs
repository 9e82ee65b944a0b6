//! Functional units.
//!
//! This module contains the memory management unit and its sub-components:
//! the direct-mapped translation cache, the page-table fetch sequencer, the
//! invalidation controller and the fault recorder.

/// Memory Management Unit with TLB and page table fetch sequencer.
pub mod mmu;
