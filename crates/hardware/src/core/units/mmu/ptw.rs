//! Backing-store fetch sequencer.
//!
//! Retrieves one two-byte page-table entry over the byte-wide backing bus.
//! The low byte is read first; if its present bit is clear the entry is absent
//! and the high-byte read is never issued. Otherwise the high byte is read from
//! the next address and the two are combined.

use tracing::trace;

use crate::common::constants::{ADDR_MASK, PTE_SIZE};
use crate::soc::traits::BackingBus;

use super::pte::PageTableEntry;

/// Outcome of one sequencer tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WalkStep {
    /// The current read has not been acknowledged yet.
    Waiting,
    /// The low byte arrived with present set; the high-byte read is next.
    LowByte,
    /// The low byte arrived with present clear; no second read was issued.
    Absent,
    /// Both bytes arrived.
    Complete(PageTableEntry),
}

/// Sequencer position.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum WalkState {
    Idle,
    LowByte,
    HighByte { low: u8 },
}

/// Two-read page-table fetch state.
#[derive(Clone, Copy, Debug)]
pub struct PageTableWalker {
    state: WalkState,
    /// Address of the entry's low byte, fixed when the fetch starts.
    low_addr: u32,
}

impl Default for PageTableWalker {
    fn default() -> Self {
        Self::new()
    }
}

impl PageTableWalker {
    /// Creates an idle sequencer.
    pub const fn new() -> Self {
        Self {
            state: WalkState::Idle,
            low_addr: 0,
        }
    }

    /// Begins fetching entry `index` of the page table at `base`.
    ///
    /// Only the low 24 bits of `base` address bytes. Both read addresses are
    /// fixed here, so a later base-pointer write cannot split an entry.
    pub fn start(&mut self, base: u32, index: usize) {
        self.low_addr = base.wrapping_add(index as u32 * PTE_SIZE) & ADDR_MASK;
        self.state = WalkState::LowByte;
        trace!("pte fetch: index {index} at {:#08x}", self.low_addr);
    }

    /// Address of the entry's low byte.
    pub const fn low_address(&self) -> u32 {
        self.low_addr
    }

    /// Address of the entry's high byte.
    pub const fn high_address(&self) -> u32 {
        (self.low_addr + 1) & ADDR_MASK
    }

    /// Returns true while a fetch is in progress.
    pub const fn is_active(&self) -> bool {
        !matches!(self.state, WalkState::Idle)
    }

    /// Returns true once the low byte is in and the high byte is being read.
    pub const fn awaiting_high_byte(&self) -> bool {
        matches!(self.state, WalkState::HighByte { .. })
    }

    /// Holds the current read asserted for one tick.
    ///
    /// Calling this while idle is a no-op that reports `Waiting`.
    pub fn step(&mut self, bus: &mut dyn BackingBus) -> WalkStep {
        match self.state {
            WalkState::Idle => WalkStep::Waiting,
            WalkState::LowByte => match bus.read_byte(self.low_addr) {
                None => WalkStep::Waiting,
                Some(low) if PageTableEntry::low_byte_present(low) => {
                    self.state = WalkState::HighByte { low };
                    WalkStep::LowByte
                }
                Some(_) => {
                    self.state = WalkState::Idle;
                    WalkStep::Absent
                }
            },
            WalkState::HighByte { low } => match bus.read_byte(self.high_address()) {
                None => WalkStep::Waiting,
                Some(high) => {
                    self.state = WalkState::Idle;
                    WalkStep::Complete(PageTableEntry::from_bytes(low, high))
                }
            },
        }
    }
}
