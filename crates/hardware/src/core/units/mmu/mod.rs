//! Memory Management Unit (MMU).
//!
//! This module implements the address-translation unit: a direct-mapped
//! translation cache backed by a page table in external memory, a permission
//! check with precise fault recording, and an invalidation path that shares the
//! idle slot with translation traffic.
//!
//! The unit is cycle-stepped. `Mmu::tick` performs exactly one state transition;
//! every wait on the cache read or on a backing-store acknowledge is a phase the
//! unit stays in until the response arrives.

/// Configuration and diagnostic register window.
pub mod csr;

/// Fault recorder.
pub mod fault;

/// Invalidation controller.
pub mod flush;

/// Page-table entry codec.
pub mod pte;

/// Backing-store fetch sequencer for page-table entries.
pub mod ptw;

/// Direct-mapped translation cache.
pub mod tlb;

use tracing::{debug, info, trace, warn};

use crate::common::{MmuError, PhysAddr, TranslationRequest, TranslationResponse};
use crate::config::MmuConfig;
use crate::soc::traits::BackingBus;
use crate::stats::MmuStats;

use self::csr::{CsrWindow, CsrWrite, RegisterValues};
use self::fault::{FaultRecord, FaultRecorder};
use self::flush::FlushController;
use self::pte::PageTableEntry;
use self::ptw::{PageTableWalker, WalkStep};
use self::tlb::Tlb;

/// Control state of the unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Waiting for a request; services pending invalidations.
    Idle,
    /// Cache line is being read.
    CacheLookup,
    /// Descriptor is latched; check permissions or start a fetch.
    Evaluate,
    /// Low byte of the page-table entry is being read.
    FetchFirstByte,
    /// High byte of the page-table entry is being read.
    FetchSecondByte,
    /// Fetched descriptor is being written into the cache.
    CacheFill,
}

/// Where the latched descriptor came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Source {
    Identity,
    Cache,
    Fetched,
}

/// The request being processed and everything latched for it.
#[derive(Clone, Copy, Debug)]
struct InFlight {
    request: TranslationRequest,
    /// Cache line selected by the request's address.
    index: usize,
    descriptor: PageTableEntry,
    source: Source,
}

/// Outcome of one tick, computed before any field is committed.
struct Transition {
    next: Phase,
    inflight: Option<InFlight>,
    response: Option<TranslationResponse>,
}

impl Transition {
    const fn stay(next: Phase, inflight: InFlight) -> Self {
        Self {
            next,
            inflight: Some(inflight),
            response: None,
        }
    }

    const fn respond(response: TranslationResponse) -> Self {
        Self {
            next: Phase::Idle,
            inflight: None,
            response: Some(response),
        }
    }

    const fn idle() -> Self {
        Self {
            next: Phase::Idle,
            inflight: None,
            response: None,
        }
    }
}

/// Address-translation unit.
///
/// Sole owner of the translation cache, the fault record and the page-table
/// pointer; the translation path and the configuration path reach them only
/// through methods on this type.
#[derive(Debug)]
pub struct Mmu {
    tlb: Tlb,
    walker: PageTableWalker,
    flush: FlushController,
    faults: FaultRecorder,
    csr: CsrWindow,
    /// Page-table base pointer as last written (all 32 bits retained).
    pt_pointer: u32,
    identity_region: bool,
    phase: Phase,
    /// Request handed over by the requester but not yet accepted from idle.
    queued: Option<TranslationRequest>,
    inflight: Option<InFlight>,
    /// Log every response at `info` level.
    pub trace_translations: bool,
    /// Performance counters.
    pub stats: MmuStats,
}

impl Mmu {
    /// Creates a unit from its configuration.
    ///
    /// # Errors
    ///
    /// Returns `MmuError::InvalidConfig` if the configuration is invalid.
    pub fn new(config: &MmuConfig) -> Result<Self, MmuError> {
        config.validate()?;
        let tlb = Tlb::new(config.index_bits, config.initial_mapping);
        Ok(Self::with_tlb(config, tlb))
    }

    /// Creates a unit around a caller-supplied cache.
    ///
    /// The cache's own width overrides `config.index_bits`.
    pub fn with_tlb(config: &MmuConfig, tlb: Tlb) -> Self {
        Self {
            tlb,
            walker: PageTableWalker::new(),
            flush: FlushController::default(),
            faults: FaultRecorder::default(),
            csr: CsrWindow::default(),
            pt_pointer: config.page_table_base,
            identity_region: config.identity_region,
            phase: Phase::Idle,
            queued: None,
            inflight: None,
            trace_translations: false,
            stats: MmuStats::default(),
        }
    }

    // ── Requester interface ──────────────────────────────────

    /// Hands a request to the unit.
    ///
    /// # Errors
    ///
    /// Returns `MmuError::Busy` while an earlier request has not been answered;
    /// the new request is dropped, not queued.
    pub fn submit(&mut self, request: TranslationRequest) -> Result<(), MmuError> {
        if self.is_busy() {
            self.stats.rejected += 1;
            warn!("rejected request for {}: unit busy", request.vaddr);
            return Err(MmuError::Busy {
                vaddr: request.vaddr,
            });
        }
        self.queued = Some(request);
        Ok(())
    }

    /// Returns true while a request is held and unanswered.
    pub const fn is_busy(&self) -> bool {
        self.queued.is_some() || self.inflight.is_some()
    }

    /// Returns the current control state.
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Returns true while the unit waits on a backing-store acknowledge.
    ///
    /// A bus that never acknowledges keeps this true forever; the unit has
    /// no timeout of its own.
    pub const fn is_waiting_on_bus(&self) -> bool {
        matches!(self.phase, Phase::FetchFirstByte | Phase::FetchSecondByte)
    }

    /// Advances the unit by one cycle.
    ///
    /// Returns the response on the single tick it is asserted.
    pub fn tick(&mut self, bus: &mut dyn BackingBus) -> Option<TranslationResponse> {
        self.stats.cycles += 1;

        let transition = match (self.phase, self.inflight) {
            (Phase::Idle, _) => self.tick_idle(),
            (_, None) => Transition::idle(),
            (Phase::CacheLookup, Some(inflight)) => self.tick_lookup(inflight),
            (Phase::Evaluate, Some(inflight)) => self.tick_evaluate(inflight),
            (Phase::FetchFirstByte | Phase::FetchSecondByte, Some(inflight)) => {
                self.tick_fetch(inflight, bus)
            }
            (Phase::CacheFill, Some(inflight)) => self.tick_fill(inflight),
        };

        if transition.next != self.phase {
            trace!("mmu: {:?} -> {:?}", self.phase, transition.next);
        }
        self.phase = transition.next;
        self.inflight = transition.inflight;

        if let Some(response) = transition.response {
            self.log_response(response);
        }
        transition.response
    }

    fn tick_idle(&mut self) -> Transition {
        if self.flush.is_pending() {
            if let Some(index) = self.flush.step(&mut self.tlb) {
                self.stats.flushed_lines += 1;
                if !self.flush.is_pending() {
                    debug!("invalidation done at line {index}");
                }
            }
            return Transition::idle();
        }

        let Some(request) = self.queued.take() else {
            return Transition::idle();
        };
        self.stats.requests += 1;

        let index = self.tlb.index_of(request.vaddr);
        if self.identity_region && request.vaddr.is_identity_region() {
            self.stats.identity += 1;
            let inflight = InFlight {
                request,
                index,
                descriptor: PageTableEntry::identity(request.vaddr),
                source: Source::Identity,
            };
            return Transition::stay(Phase::Evaluate, inflight);
        }

        let inflight = InFlight {
            request,
            index,
            descriptor: PageTableEntry::absent(),
            source: Source::Cache,
        };
        Transition::stay(Phase::CacheLookup, inflight)
    }

    fn tick_lookup(&self, inflight: InFlight) -> Transition {
        let descriptor = self.tlb.lookup(inflight.index);
        Transition::stay(
            Phase::Evaluate,
            InFlight {
                descriptor,
                ..inflight
            },
        )
    }

    fn tick_evaluate(&mut self, inflight: InFlight) -> Transition {
        let InFlight {
            request,
            index,
            descriptor,
            source,
        } = inflight;

        if descriptor.is_present() {
            if source == Source::Cache {
                self.stats.hits += 1;
            }
            return Transition::respond(self.check_permissions(&request, descriptor));
        }

        if source == Source::Fetched {
            return Transition::respond(self.fault_non_present(&request));
        }

        self.stats.misses += 1;
        debug!(
            "tlb miss: {} index {index}, fetching from {:#08x}",
            request.vaddr,
            self.page_table_base()
        );
        self.walker.start(self.pt_pointer, index);
        Transition::stay(Phase::FetchFirstByte, inflight)
    }

    fn tick_fetch(&mut self, inflight: InFlight, bus: &mut dyn BackingBus) -> Transition {
        match self.walker.step(bus) {
            WalkStep::Waiting => {
                self.stats.bus_wait_cycles += 1;
                let phase = if self.walker.awaiting_high_byte() {
                    Phase::FetchSecondByte
                } else {
                    Phase::FetchFirstByte
                };
                Transition::stay(phase, inflight)
            }
            WalkStep::LowByte => {
                self.stats.pt_reads += 1;
                Transition::stay(Phase::FetchSecondByte, inflight)
            }
            WalkStep::Absent => {
                self.stats.pt_reads += 1;
                self.stats.short_circuits += 1;
                debug!(
                    "page table entry {} absent at {:#08x}; high byte skipped",
                    inflight.index,
                    self.walker.low_address()
                );
                Transition::respond(self.fault_non_present(&inflight.request))
            }
            WalkStep::Complete(descriptor) => {
                self.stats.pt_reads += 1;
                Transition::stay(
                    Phase::CacheFill,
                    InFlight {
                        descriptor,
                        source: Source::Fetched,
                        ..inflight
                    },
                )
            }
        }
    }

    fn tick_fill(&mut self, inflight: InFlight) -> Transition {
        self.tlb.fill(inflight.index, inflight.descriptor);
        self.stats.fills += 1;
        debug!(
            "tlb fill: line {} <- {:#06x}",
            inflight.index,
            inflight.descriptor.raw()
        );
        Transition::stay(Phase::Evaluate, inflight)
    }

    /// Applies the write, execute and privilege checks to a present mapping.
    fn check_permissions(
        &mut self,
        request: &TranslationRequest,
        descriptor: PageTableEntry,
    ) -> TranslationResponse {
        let abort_write = request.write && !descriptor.is_writable();
        let abort_exec = request.instruction_fetch && !descriptor.is_executable();
        let abort_priv = request.unprivileged && request.vaddr.is_supervisor_region();
        let paddr = PhysAddr::from_parts(descriptor.pfn(), request.vaddr.page_offset());

        if !(abort_write || abort_exec || abort_priv) {
            return TranslationResponse::success(paddr);
        }

        self.faults
            .record_permission(request.vaddr, abort_write, abort_exec, abort_priv);
        self.stats.aborts += 1;
        self.stats.aborts_write += u64::from(abort_write);
        self.stats.aborts_exec += u64::from(abort_exec);
        self.stats.aborts_priv += u64::from(abort_priv);
        TranslationResponse::denied(paddr)
    }

    fn fault_non_present(&mut self, request: &TranslationRequest) -> TranslationResponse {
        self.faults.record_non_present(request);
        self.stats.aborts += 1;
        self.stats.aborts_non_present += 1;
        TranslationResponse::absent()
    }

    fn log_response(&self, response: TranslationResponse) {
        if self.trace_translations {
            info!("response: {} abort={}", response.paddr, response.abort);
        } else {
            trace!("response: {} abort={}", response.paddr, response.abort);
        }
    }

    // ── Configuration / diagnostic interface ─────────────────

    /// Writes the page-table base pointer.
    ///
    /// All 32 bits are kept for read-back; only the low 24 bits address bytes.
    /// A fetch already in flight keeps the addresses it started with.
    pub fn set_page_table_base(&mut self, ptr: u32) {
        debug!("page table pointer <- {ptr:#010x}");
        self.pt_pointer = ptr;
    }

    /// Returns the page-table base pointer as last written.
    pub const fn page_table_base(&self) -> u32 {
        self.pt_pointer
    }

    /// Queues invalidation of cache line `index`.
    ///
    /// Ignored while a full invalidation is pending; the sweep covers it.
    ///
    /// # Errors
    ///
    /// Returns `MmuError::InvalidIndex` if `index` is not a cache line.
    pub fn invalidate_entry(&mut self, index: usize) -> Result<(), MmuError> {
        let lines = self.tlb.len();
        if index >= lines {
            return Err(MmuError::InvalidIndex { index, lines });
        }
        self.queue_entry_flush(index);
        Ok(())
    }

    fn queue_entry_flush(&mut self, index: usize) {
        if self.flush.request_entry(index) {
            debug!("invalidate line {index} queued");
        } else {
            warn!("invalidate line {index} ignored: full invalidation in progress");
        }
    }

    /// Queues invalidation of every cache line.
    pub fn invalidate_all(&mut self) {
        debug!("full invalidation queued");
        self.flush.request_all();
    }

    /// Returns true while an invalidation is waiting or running.
    pub const fn is_flushing(&self) -> bool {
        self.flush.is_pending()
    }

    /// Returns the most recent fault record.
    pub const fn fault_record(&self) -> FaultRecord {
        self.faults.last()
    }

    /// Reads one byte of the register window.
    pub fn csr_read(&mut self, offset: u8) -> u8 {
        let values = RegisterValues {
            fault_reason: self.faults.last().to_register(),
            pt_pointer: self.pt_pointer,
        };
        self.csr.read(offset, values)
    }

    /// Writes one byte of the register window.
    pub fn csr_write(&mut self, offset: u8, val: u8) {
        match self.csr.write(offset, val) {
            Some(CsrWrite::PtPointer(ptr)) => self.set_page_table_base(ptr),
            Some(CsrWrite::TlbFlush { full: true, .. }) => self.invalidate_all(),
            Some(CsrWrite::TlbFlush { full: false, index }) => {
                self.queue_entry_flush(index & (self.tlb.len() - 1));
            }
            None => {}
        }
    }

    /// Returns the translation cache for inspection.
    pub const fn tlb(&self) -> &Tlb {
        &self.tlb
    }
}
