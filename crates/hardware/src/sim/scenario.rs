//! JSON scenarios.
//!
//! A scenario describes a complete run: the model configuration, the initial
//! backing-store contents, a page table, and a sequence of requester and
//! configuration-interface operations. Running it yields one outcome per step.
//!
//! ```json
//! {
//!   "config": { "mmu": { "page_table_base": 8192, "initial_mapping": "Empty" } },
//!   "page_table": [ { "index": 5, "pfn": 16, "writable": true, "executable": true } ],
//!   "steps": [
//!     { "op": "translate", "vaddr": 20771 },
//!     { "op": "read_fault" }
//!   ]
//! }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::common::{MmuError, PhysAddr, TranslationRequest, VirtAddr};
use crate::config::Config;
use crate::core::units::mmu::fault::FaultRecord;
use crate::core::units::mmu::pte::PageTableEntry;
use crate::sim::Simulator;

/// A blob written to backing store before the run.
#[derive(Debug, Clone, Deserialize)]
pub struct MemoryInit {
    /// Physical address of the first byte.
    pub addr: u32,
    /// Bytes to write.
    pub bytes: Vec<u8>,
}

/// One page-table entry, written at the unit's page-table base.
#[derive(Debug, Clone, Deserialize)]
pub struct PageMapping {
    /// Page-table index.
    pub index: usize,
    /// Physical frame number.
    pub pfn: u16,
    /// Mapping is valid.
    #[serde(default = "PageMapping::default_present")]
    pub present: bool,
    /// Writes allowed.
    #[serde(default)]
    pub writable: bool,
    /// Instruction fetches allowed.
    #[serde(default)]
    pub executable: bool,
}

impl PageMapping {
    fn default_present() -> bool {
        true
    }

    /// Encodes the mapping as a descriptor.
    pub const fn to_pte(&self) -> PageTableEntry {
        PageTableEntry::new(self.present, self.writable, self.executable, self.pfn)
    }
}

/// A scenario operation.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    /// Submit a translation request and wait for its response.
    Translate(TranslationRequest),
    /// Write a page-table entry at the current base (host-side, untimed).
    Map(PageMapping),
    /// Write the page-table base pointer.
    SetPageTableBase {
        /// New pointer value.
        value: u32,
    },
    /// Invalidate one cache line and wait for it to finish.
    InvalidateEntry {
        /// Cache line.
        index: usize,
    },
    /// Invalidate every cache line and wait for the sweep to finish.
    InvalidateAll,
    /// Read the fault record.
    ReadFault,
    /// Write one byte of the register window.
    CsrWrite {
        /// Window offset.
        offset: u8,
        /// Byte value.
        value: u8,
    },
    /// Read one byte of the register window.
    CsrRead {
        /// Window offset.
        offset: u8,
    },
    /// Let the unit run idle for a number of cycles.
    Idle {
        /// Cycles to tick.
        cycles: u64,
    },
}

/// The observable result of one step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum StepOutcome {
    /// Response to a translation request.
    Translate {
        /// Requested address.
        vaddr: VirtAddr,
        /// Translated address.
        paddr: PhysAddr,
        /// Access denied.
        abort: bool,
        /// Cycles from submission to response.
        cycles: u64,
    },
    /// An invalidation finished.
    Invalidated {
        /// Cycles spent.
        cycles: u64,
    },
    /// Current fault record.
    Fault(FaultRecord),
    /// A register byte.
    CsrRead {
        /// Window offset.
        offset: u8,
        /// Byte read.
        value: u8,
    },
    /// A state change with nothing to report.
    Done,
}

/// A complete scenario.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Scenario {
    /// Model configuration.
    #[serde(default)]
    pub config: Config,
    /// Initial backing-store contents.
    #[serde(default)]
    pub memory: Vec<MemoryInit>,
    /// Page-table entries written at the configured base.
    #[serde(default)]
    pub page_table: Vec<PageMapping>,
    /// Operations to perform in order.
    #[serde(default)]
    pub steps: Vec<Step>,
}

impl Scenario {
    /// Reads a scenario from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns `MmuError::Io` if the file cannot be read and `MmuError::Json`
    /// if it is not a valid scenario.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, MmuError> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Parses a scenario from JSON text.
    ///
    /// # Errors
    ///
    /// Returns `MmuError::Json` if the text is not a valid scenario.
    pub fn from_json(text: &str) -> Result<Self, MmuError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Builds a simulator with the scenario's memory and page table loaded.
    ///
    /// # Errors
    ///
    /// Returns `MmuError::InvalidConfig` if the configuration is invalid and
    /// `MmuError::InvalidIndex` if a page-table entry names no cache line.
    pub fn build(&self) -> Result<Simulator, MmuError> {
        let mut sim = Simulator::new(&self.config)?;
        for blob in &self.memory {
            sim.load_bytes(blob.addr, &blob.bytes);
        }
        for mapping in &self.page_table {
            sim.write_pte(mapping.index, mapping.to_pte())?;
        }
        Ok(sim)
    }

    /// Runs the steps against a fresh simulator.
    ///
    /// # Errors
    ///
    /// Propagates the first error from building the simulator or running a step.
    pub fn run(&self) -> Result<Vec<StepOutcome>, MmuError> {
        let mut sim = self.build()?;
        self.execute(&mut sim)
    }

    /// Runs the steps against `sim`.
    ///
    /// # Errors
    ///
    /// Propagates the first step error (busy, stall or bad index).
    pub fn execute(&self, sim: &mut Simulator) -> Result<Vec<StepOutcome>, MmuError> {
        let mut outcomes = Vec::with_capacity(self.steps.len());
        self.execute_with(sim, |_, outcome| {
            outcomes.push(outcome.clone());
            Ok(())
        })?;
        Ok(outcomes)
    }

    /// Runs the steps against `sim`, handing each outcome to `report` as soon
    /// as its step finishes.
    ///
    /// # Errors
    ///
    /// Stops at the first error from a step or from `report`. Outcomes of the
    /// steps before it have already been reported.
    pub fn execute_with<F>(&self, sim: &mut Simulator, mut report: F) -> Result<(), MmuError>
    where
        F: FnMut(usize, &StepOutcome) -> Result<(), MmuError>,
    {
        for (index, step) in self.steps.iter().enumerate() {
            let outcome = run_step(sim, step)?;
            report(index, &outcome)?;
        }
        Ok(())
    }
}

fn run_step(sim: &mut Simulator, step: &Step) -> Result<StepOutcome, MmuError> {
    let outcome = match *step {
        Step::Translate(request) => {
            let start = sim.cycles();
            let response = sim.translate(request)?;
            StepOutcome::Translate {
                vaddr: request.vaddr,
                paddr: response.paddr,
                abort: response.abort,
                cycles: sim.cycles() - start,
            }
        }
        Step::Map(ref mapping) => {
            sim.write_pte(mapping.index, mapping.to_pte())?;
            StepOutcome::Done
        }
        Step::SetPageTableBase { value } => {
            sim.mmu.set_page_table_base(value);
            StepOutcome::Done
        }
        Step::InvalidateEntry { index } => {
            sim.mmu.invalidate_entry(index)?;
            StepOutcome::Invalidated {
                cycles: sim.settle()?,
            }
        }
        Step::InvalidateAll => {
            sim.mmu.invalidate_all();
            StepOutcome::Invalidated {
                cycles: sim.settle()?,
            }
        }
        Step::ReadFault => StepOutcome::Fault(sim.mmu.fault_record()),
        Step::CsrWrite { offset, value } => {
            sim.mmu.csr_write(offset, value);
            StepOutcome::Done
        }
        Step::CsrRead { offset } => StepOutcome::CsrRead {
            offset,
            value: sim.mmu.csr_read(offset),
        },
        Step::Idle { cycles } => {
            for _ in 0..cycles {
                if let Some(response) = sim.tick() {
                    info!("late response {} while idling", response.paddr);
                }
            }
            StepOutcome::Done
        }
    };
    Ok(outcome)
}
