//! # Simulator Driver Tests
//!
//! Bounded waits around the unit, including the stalled-fetch case.

use crate::common::harness::{PT_BASE, TestContext, empty_config};
use crate::common::mocks::bus::SilentBus;
use mmusim_core::MmuError;
use mmusim_core::common::TranslationRequest;
use mmusim_core::core::units::mmu::Phase;
use mmusim_core::core::units::mmu::pte::PageTableEntry;
use mmusim_core::sim::Simulator;

#[test]
fn new_rejects_invalid_config() {
    let mut config = empty_config();
    config.mmu.index_bits = 0;
    assert!(matches!(Simulator::new(&config), Err(MmuError::InvalidConfig(_))));
}

#[test]
fn translate_counts_cycles() {
    let mut tc = TestContext::new().map(5, PageTableEntry::full_access(0x010));
    let (response, ticks) = tc.translate(TranslationRequest::read(0x5123));
    assert_eq!(response.paddr.val(), 0x01_0123);
    assert_eq!(ticks, 9);
    assert_eq!(tc.sim.cycles(), 9);
}

#[test]
fn write_pte_follows_current_base() {
    let mut tc = TestContext::new();
    tc.sim.mmu.set_page_table_base(0x6000);
    tc.sim.write_pte(1, PageTableEntry::full_access(0x0EE)).unwrap();
    assert_eq!(tc.sim.bus.peek_u8(0x6002), Some(0xE7));
    assert_eq!(tc.sim.bus.peek_u8(PT_BASE + 2), Some(0));
}

#[test]
fn write_pte_rejects_index_past_the_cache() {
    let mut tc = TestContext::new();
    assert!(matches!(
        tc.sim.write_pte(2048, PageTableEntry::full_access(0x0EE)),
        Err(MmuError::InvalidIndex { index: 2048, lines: 2048 })
    ));
    assert_eq!(tc.sim.bus.peek_u8(PT_BASE + 4096), Some(0));
}

#[test]
fn unmapped_page_table_stalls_and_is_reported() {
    let mut config = empty_config();
    config.bus.ram_size = 0x1000;
    config.general.stall_budget = 50;
    let mut tc = TestContext::with_config(&config);

    let err = tc.sim.translate(TranslationRequest::read(0x5000)).unwrap_err();
    assert!(matches!(err, MmuError::Stalled { cycles: 50, .. }));
    assert!(tc.sim.mmu.is_waiting_on_bus());
    assert_eq!(tc.sim.mmu.phase(), Phase::FetchFirstByte);

    // The stalled request is still held.
    let err = tc.sim.translate(TranslationRequest::read(0x80_0000)).unwrap_err();
    assert!(matches!(err, MmuError::Busy { .. }));
}

#[test]
fn unit_waits_forever_on_a_silent_bus() {
    let mut tc = TestContext::new();
    let mut bus = SilentBus::default();
    tc.sim.mmu.submit(TranslationRequest::read(0x1000)).unwrap();
    for _ in 0..500 {
        assert_eq!(tc.sim.mmu.tick(&mut bus), None);
    }
    assert!(tc.sim.mmu.is_waiting_on_bus());
    assert_eq!(bus.polls, 497);
    assert_eq!(tc.sim.mmu.stats.bus_wait_cycles, 497);
}

#[test]
fn settle_without_pending_work_is_free() {
    let mut tc = TestContext::new();
    assert_eq!(tc.sim.settle().unwrap(), 0);
}

#[test]
fn settle_is_bounded_by_the_budget() {
    let mut config = empty_config();
    config.mmu.index_bits = 12;
    config.general.stall_budget = 100;
    let mut tc = TestContext::with_config(&config);
    tc.sim.mmu.invalidate_all();
    assert!(matches!(tc.sim.settle(), Err(MmuError::Stalled { cycles: 100, .. })));
    assert!(tc.sim.mmu.is_flushing());
}
