//! Fault Recorder.
//!
//! Latches the address and cause of the most recent denied or unmapped
//! translation for diagnostic read-back. Only the latest fault is kept; every
//! new fault overwrites the record unconditionally.

use serde::Serialize;

use crate::common::constants::ADDR_MASK;
use crate::common::{TranslationRequest, VirtAddr};

/// Register bit of the unprivileged cause.
const FAULT_USER_BIT: u32 = 1 << 28;
/// Register bit of the instruction-fetch cause.
const FAULT_IFETCH_BIT: u32 = 1 << 29;
/// Register bit of the write cause.
const FAULT_WRITE_BIT: u32 = 1 << 30;
/// Register bit of the non-present cause.
const FAULT_NON_PRESENT_BIT: u32 = 1 << 31;

/// Snapshot of the most recent fault.
///
/// For permission faults the three access flags name the violated checks and
/// `non_present` is false. For a non-present fault `non_present` is set and the
/// access flags carry the attributes of the request that missed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct FaultRecord {
    /// Faulting virtual address.
    pub addr: VirtAddr,
    /// No valid mapping existed, even after a page-table fetch.
    pub non_present: bool,
    /// Write to a non-writable page.
    pub write: bool,
    /// Instruction fetch from a non-executable page.
    pub instruction_fetch: bool,
    /// Unprivileged access to the supervisor region.
    pub unprivileged: bool,
}

impl FaultRecord {
    /// Packs the record into the 32-bit FaultReason register image.
    pub const fn to_register(self) -> u32 {
        let mut reg = self.addr.val() & ADDR_MASK;
        if self.unprivileged {
            reg |= FAULT_USER_BIT;
        }
        if self.instruction_fetch {
            reg |= FAULT_IFETCH_BIT;
        }
        if self.write {
            reg |= FAULT_WRITE_BIT;
        }
        if self.non_present {
            reg |= FAULT_NON_PRESENT_BIT;
        }
        reg
    }

    /// Unpacks a FaultReason register image.
    pub const fn from_register(reg: u32) -> Self {
        Self {
            addr: VirtAddr::new(reg),
            non_present: reg & FAULT_NON_PRESENT_BIT != 0,
            write: reg & FAULT_WRITE_BIT != 0,
            instruction_fetch: reg & FAULT_IFETCH_BIT != 0,
            unprivileged: reg & FAULT_USER_BIT != 0,
        }
    }
}

/// Holder of the latest fault record.
#[derive(Clone, Copy, Debug, Default)]
pub struct FaultRecorder {
    last: FaultRecord,
}

impl FaultRecorder {
    /// Latches a permission fault on a present mapping.
    pub fn record_permission(
        &mut self,
        vaddr: VirtAddr,
        write: bool,
        instruction_fetch: bool,
        unprivileged: bool,
    ) {
        self.last = FaultRecord {
            addr: vaddr,
            non_present: false,
            write,
            instruction_fetch,
            unprivileged,
        };
    }

    /// Latches a non-present fault for `request`.
    pub fn record_non_present(&mut self, request: &TranslationRequest) {
        self.last = FaultRecord {
            addr: request.vaddr,
            non_present: true,
            write: request.write,
            instruction_fetch: request.instruction_fetch,
            unprivileged: request.unprivileged,
        };
    }

    /// Returns the most recent fault.
    pub const fn last(&self) -> FaultRecord {
        self.last
    }
}
