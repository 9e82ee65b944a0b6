//! Invalidation controller.
//!
//! Holds at most one pending invalidation and retires it one cache line per
//! tick. A single-entry request overwrites an earlier single-entry request that
//! has not been serviced yet. A full sweep runs from line 0 to the last line and
//! cannot be displaced: single-entry requests arriving while it is pending are
//! ignored, and a repeated full request lets the cursor carry on.

use super::tlb::Tlb;

/// The pending invalidation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum FlushRequest {
    /// Invalidate one line.
    Entry(usize),
    /// Invalidate every line from `cursor` upward.
    Sweep { cursor: usize },
}

/// Single-slot invalidation queue.
#[derive(Clone, Copy, Debug, Default)]
pub struct FlushController {
    pending: Option<FlushRequest>,
}

impl FlushController {
    /// Queues invalidation of line `index` (last writer wins).
    ///
    /// Returns false, leaving the queue untouched, while a full sweep is pending.
    pub fn request_entry(&mut self, index: usize) -> bool {
        if self.is_sweeping() {
            return false;
        }
        self.pending = Some(FlushRequest::Entry(index));
        true
    }

    /// Queues a full sweep starting at line 0.
    ///
    /// A sweep already in progress keeps its cursor.
    pub fn request_all(&mut self) {
        if !self.is_sweeping() {
            self.pending = Some(FlushRequest::Sweep { cursor: 0 });
        }
    }

    /// Returns true if any invalidation is waiting to be serviced.
    pub const fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Returns true while a full sweep is pending or running.
    pub const fn is_sweeping(&self) -> bool {
        matches!(self.pending, Some(FlushRequest::Sweep { .. }))
    }

    /// Invalidates exactly one line and returns its index.
    pub fn step(&mut self, tlb: &mut Tlb) -> Option<usize> {
        let last = tlb.len() - 1;
        match self.pending.take()? {
            FlushRequest::Entry(index) => {
                tlb.invalidate(index);
                Some(index & last)
            }
            FlushRequest::Sweep { cursor } => {
                tlb.invalidate(cursor);
                if cursor < last {
                    self.pending = Some(FlushRequest::Sweep { cursor: cursor + 1 });
                }
                Some(cursor)
            }
        }
    }
}
