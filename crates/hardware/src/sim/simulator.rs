//! Simulator: owns the translation unit and its backing store side-by-side.
//!
//! The unit borrows the bus only for the duration of each tick, so both can be
//! inspected and poked between ticks without any interior mutability.

use tracing::{debug, warn};

use crate::common::constants::ADDR_MASK;
use crate::common::{MmuError, TranslationRequest, TranslationResponse, VirtAddr};
use crate::config::Config;
use crate::core::Mmu;
use crate::core::units::mmu::pte::PageTableEntry;
use crate::soc::{Bus, Memory};

/// Top-level simulator: translation unit + backing-store bus.
#[derive(Debug)]
pub struct Simulator {
    /// Translation unit.
    pub mmu: Mmu,
    /// Backing-store bus holding RAM and the page table.
    pub bus: Bus,
    /// Cycles any bounded wait may spend before reporting a stall.
    stall_budget: u64,
}

impl Simulator {
    /// Creates a simulator with RAM and a unit built from `config`.
    ///
    /// # Errors
    ///
    /// Returns `MmuError::InvalidConfig` if the configuration is invalid.
    pub fn new(config: &Config) -> Result<Self, MmuError> {
        config.validate()?;

        let mut bus = Bus::new(config.bus.latency);
        bus.add_device(Box::new(Memory::new(
            config.bus.ram_size,
            config.bus.ram_base,
        )));

        let mut mmu = Mmu::new(&config.mmu)?;
        mmu.trace_translations = config.general.trace_translations;

        debug!(
            "simulator: {} cache lines, RAM {:#x}+{:#x}, bus latency {}",
            mmu.tlb().len(),
            config.bus.ram_base,
            config.bus.ram_size,
            config.bus.latency
        );

        Ok(Self {
            mmu,
            bus,
            stall_budget: config.general.stall_budget,
        })
    }

    /// Advances the unit by one clock cycle.
    pub fn tick(&mut self) -> Option<TranslationResponse> {
        self.mmu.tick(&mut self.bus)
    }

    /// Returns the number of cycles simulated so far.
    pub const fn cycles(&self) -> u64 {
        self.mmu.stats.cycles
    }

    /// Submits `request` and ticks until its response.
    ///
    /// Pending invalidations run first; their cycles count against the budget.
    ///
    /// # Errors
    ///
    /// Returns `MmuError::Busy` if the unit still holds an earlier request and
    /// `MmuError::Stalled` if no response arrives within the stall budget. A
    /// stalled request stays in flight; the unit has no way to abandon it.
    pub fn translate(
        &mut self,
        request: TranslationRequest,
    ) -> Result<TranslationResponse, MmuError> {
        self.mmu.submit(request)?;

        for _ in 0..self.stall_budget {
            if let Some(response) = self.tick() {
                return Ok(response);
            }
        }

        warn!(
            "translation of {} stalled in {:?} after {} cycles",
            request.vaddr,
            self.mmu.phase(),
            self.stall_budget
        );
        Err(MmuError::Stalled {
            vaddr: request.vaddr,
            cycles: self.stall_budget,
        })
    }

    /// Ticks until no invalidation is pending; returns the cycles spent.
    ///
    /// # Errors
    ///
    /// Returns `MmuError::Stalled` (at address zero) if the invalidation has
    /// not finished within the stall budget.
    pub fn settle(&mut self) -> Result<u64, MmuError> {
        let mut spent = 0;
        while self.mmu.is_flushing() {
            if spent == self.stall_budget {
                return Err(MmuError::Stalled {
                    vaddr: VirtAddr::new(0),
                    cycles: spent,
                });
            }
            if let Some(response) = self.tick() {
                debug!("response {} delivered while settling", response.paddr);
            }
            spent += 1;
        }
        Ok(spent)
    }

    /// Writes a blob into backing store without handshake timing.
    pub fn load_bytes(&mut self, addr: u32, data: &[u8]) {
        self.bus.load_bytes(addr, data);
    }

    /// Stores `pte` as entry `index` of the page table the unit currently points at.
    ///
    /// # Errors
    ///
    /// Returns `MmuError::InvalidIndex` if `index` names no cache line; the
    /// unit never fetches such an entry.
    pub fn write_pte(&mut self, index: usize, pte: PageTableEntry) -> Result<(), MmuError> {
        let lines = self.mmu.tlb().len();
        if index >= lines {
            return Err(MmuError::InvalidIndex { index, lines });
        }
        let base = self.mmu.page_table_base() & ADDR_MASK;
        self.bus.write_pte(base, index, pte);
        Ok(())
    }
}
