//! Requester Interface Types.
//!
//! This module defines the values exchanged with the processor front-end:
//! 1. **Request:** Virtual address plus the access attributes the permission check needs.
//! 2. **Response:** Physical address and the pass/fail abort flag.
//!
//! The detailed fault cause is never part of the response; it is only visible
//! through the diagnostic fault record.

use serde::{Deserialize, Serialize};

use super::addr::{PhysAddr, VirtAddr};

/// A single translation request.
///
/// `write` and `instruction_fetch` are independent attributes, exactly as the
/// front-end drives them; a request may carry neither (a plain data read).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationRequest {
    /// Virtual address to translate.
    pub vaddr: VirtAddr,
    /// The access writes memory.
    #[serde(default)]
    pub write: bool,
    /// The access is an instruction fetch.
    #[serde(default)]
    pub instruction_fetch: bool,
    /// The accessing context is unprivileged (user mode).
    #[serde(default)]
    pub unprivileged: bool,
}

impl TranslationRequest {
    /// Creates a privileged data read of `vaddr`.
    pub const fn read(vaddr: u32) -> Self {
        Self {
            vaddr: VirtAddr::new(vaddr),
            write: false,
            instruction_fetch: false,
            unprivileged: false,
        }
    }

    /// Creates a privileged data write of `vaddr`.
    pub const fn write(vaddr: u32) -> Self {
        Self {
            write: true,
            ..Self::read(vaddr)
        }
    }

    /// Creates a privileged instruction fetch of `vaddr`.
    pub const fn fetch(vaddr: u32) -> Self {
        Self {
            instruction_fetch: true,
            ..Self::read(vaddr)
        }
    }

    /// Returns the same request issued from an unprivileged context.
    #[must_use]
    pub const fn unprivileged(self) -> Self {
        Self {
            unprivileged: true,
            ..self
        }
    }
}

/// The unit's answer to a request, asserted for exactly one tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationResponse {
    /// Translated physical address (zero when the mapping was absent).
    pub paddr: PhysAddr,
    /// The access was denied; the cause is in the fault record.
    pub abort: bool,
}

impl TranslationResponse {
    /// Creates a successful response.
    #[inline]
    pub const fn success(paddr: PhysAddr) -> Self {
        Self { paddr, abort: false }
    }

    /// Creates an aborted response carrying the computed address.
    #[inline]
    pub const fn denied(paddr: PhysAddr) -> Self {
        Self { paddr, abort: true }
    }

    /// Creates an aborted response for an absent mapping.
    #[inline]
    pub const fn absent() -> Self {
        Self {
            paddr: PhysAddr::new(0),
            abort: true,
        }
    }
}
