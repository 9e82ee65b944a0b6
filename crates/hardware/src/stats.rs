//! Translation statistics collection and reporting.
//!
//! This module tracks performance metrics for the translation unit. It provides:
//! 1. **Traffic:** Cycles, accepted and rejected requests.
//! 2. **Cache behaviour:** Identity bypasses, hits, misses, fills and the hit rate.
//! 3. **Backing store:** Page-table byte reads, short-circuited fetches and wait cycles.
//! 4. **Faults:** Aborts by cause.
//! 5. **Invalidation:** Lines flushed.

use std::time::Instant;

use serde::Serialize;

/// Translation statistics structure.
#[derive(Clone, Debug, Serialize)]
pub struct MmuStats {
    #[serde(skip)]
    start_time: Instant,
    /// Total cycles the unit has been ticked.
    pub cycles: u64,
    /// Requests accepted for processing.
    pub requests: u64,
    /// Submissions rejected because a request was already in flight.
    pub rejected: u64,

    /// Requests served by the identity region without consulting the cache.
    pub identity: u64,
    /// Requests whose cache line was present on first lookup.
    pub hits: u64,
    /// Requests whose cache line was absent on first lookup.
    pub misses: u64,
    /// Cache lines written from backing store.
    pub fills: u64,

    /// Page-table bytes read from backing store.
    pub pt_reads: u64,
    /// Fetches that stopped after the first byte (entry absent).
    pub short_circuits: u64,
    /// Ticks spent waiting for a backing-store acknowledge.
    pub bus_wait_cycles: u64,

    /// Aborted translations; one abort may carry several causes.
    pub aborts: u64,
    /// Aborts caused by writes to non-writable pages.
    pub aborts_write: u64,
    /// Aborts caused by instruction fetches from non-executable pages.
    pub aborts_exec: u64,
    /// Aborts caused by unprivileged access to supervisor pages.
    pub aborts_priv: u64,
    /// Aborts caused by absent mappings.
    pub aborts_non_present: u64,

    /// Cache lines invalidated.
    pub flushed_lines: u64,
}

impl Default for MmuStats {
    fn default() -> Self {
        Self {
            start_time: Instant::now(),
            cycles: 0,
            requests: 0,
            rejected: 0,
            identity: 0,
            hits: 0,
            misses: 0,
            fills: 0,
            pt_reads: 0,
            short_circuits: 0,
            bus_wait_cycles: 0,
            aborts: 0,
            aborts_write: 0,
            aborts_exec: 0,
            aborts_priv: 0,
            aborts_non_present: 0,
            flushed_lines: 0,
        }
    }
}

impl MmuStats {
    /// Fraction of cache lookups that hit, in `0.0..=1.0`.
    ///
    /// Returns zero before the first lookup.
    pub fn hit_rate(&self) -> f64 {
        let lookups = self.hits + self.misses;
        if lookups == 0 {
            0.0
        } else {
            self.hits as f64 / lookups as f64
        }
    }

    /// Prints the statistics report to stdout.
    pub fn print(&self) {
        let seconds = self.start_time.elapsed().as_secs_f64();
        let cyc = self.cycles.max(1);

        println!("\n==========================================================");
        println!("ADDRESS TRANSLATION STATISTICS");
        println!("==========================================================");
        println!("host_seconds             {seconds:.4} s");
        println!("sim_cycles               {}", self.cycles);
        println!("requests                 {}", self.requests);
        println!("requests.rejected        {}", self.rejected);
        println!("----------------------------------------------------------");
        println!("TRANSLATION CACHE");
        println!("  tlb.identity           {}", self.identity);
        println!("  tlb.hits               {}", self.hits);
        println!("  tlb.misses             {}", self.misses);
        println!("  tlb.fills              {}", self.fills);
        println!("  tlb.hit_rate           {:.2}%", self.hit_rate() * 100.0);
        println!("  tlb.flushed_lines      {}", self.flushed_lines);
        println!("----------------------------------------------------------");
        println!("BACKING STORE");
        println!("  pt.byte_reads          {}", self.pt_reads);
        println!("  pt.short_circuits      {}", self.short_circuits);
        println!(
            "  bus.wait_cycles        {} ({:.2}%)",
            self.bus_wait_cycles,
            (self.bus_wait_cycles as f64 / cyc as f64) * 100.0
        );
        println!("----------------------------------------------------------");
        println!("FAULTS");
        println!("  abort.total            {}", self.aborts);
        println!("  abort.write            {}", self.aborts_write);
        println!("  abort.exec             {}", self.aborts_exec);
        println!("  abort.priv             {}", self.aborts_priv);
        println!("  abort.non_present      {}", self.aborts_non_present);
        println!("==========================================================");
    }
}
