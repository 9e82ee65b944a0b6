//! # Register Window Tests
//!
//! Byte-lane access to FaultReason, PtPointer and TlbFlush.

use crate::common::harness::{TestContext, empty_config};
use mmusim_core::common::TranslationRequest;
use mmusim_core::config::InitialMapping;
use mmusim_core::core::units::mmu::Mmu;
use mmusim_core::core::units::mmu::csr::{
    FAULT_REASON_OFFSET, PT_POINTER_OFFSET, Register, TLB_FLUSH_OFFSET, flush_value,
};
use mmusim_core::core::units::mmu::fault::FaultRecord;

fn write_register(mmu: &mut Mmu, offset: u8, bytes: &[u8]) {
    for (lane, byte) in bytes.iter().enumerate() {
        mmu.csr_write(offset + lane as u8, *byte);
    }
}

fn read_u32(mmu: &mut Mmu, offset: u8) -> u32 {
    let bytes = [0, 1, 2, 3].map(|lane| mmu.csr_read(offset + lane));
    u32::from_le_bytes(bytes)
}

#[test]
fn decode_maps_offsets_to_lanes() {
    assert_eq!(Register::decode(0x0), Some((Register::FaultReason, 0)));
    assert_eq!(Register::decode(0x7), Some((Register::PtPointer, 3)));
    assert_eq!(Register::decode(0x9), Some((Register::TlbFlush, 1)));
    assert_eq!(Register::decode(0xA), None);
    assert_eq!(Register::decode(0xF), None);
}

#[test]
fn pt_pointer_takes_effect_on_highest_byte() {
    let mut tc = TestContext::new();
    let mmu = &mut tc.sim.mmu;
    write_register(mmu, PT_POINTER_OFFSET, &[0x00, 0x40, 0x01]);
    assert_eq!(mmu.page_table_base(), 0x2000);

    mmu.csr_write(PT_POINTER_OFFSET + 3, 0xAB);
    assert_eq!(mmu.page_table_base(), 0xAB01_4000);
    assert_eq!(read_u32(mmu, PT_POINTER_OFFSET), 0xAB01_4000);
}

#[test]
fn pt_pointer_high_byte_is_ignored_for_addressing() {
    let mut tc = TestContext::new();
    tc.sim.bus.load_bytes(0x4006, &[0x51, 0x03]);
    write_register(&mut tc.sim.mmu, PT_POINTER_OFFSET, &[0x00, 0x40, 0x00, 0xFF]);

    let (response, _) = tc.translate(TranslationRequest::read(0x3ABC));
    assert_eq!(response.paddr.val(), 0x03_5ABC);
}

#[test]
fn fault_reason_reads_latest_fault() {
    let mut tc = TestContext::new();
    let request = TranslationRequest::fetch(0x6543).unprivileged();
    let (response, _) = tc.translate(request);
    assert!(response.abort);

    let reg = read_u32(&mut tc.sim.mmu, FAULT_REASON_OFFSET);
    assert_eq!(reg, 0x0000_6543 | 1u32 << 31 | 1 << 29 | 1 << 28);
    assert_eq!(FaultRecord::from_register(reg), tc.sim.mmu.fault_record());
}

#[test]
fn fault_reason_read_is_snapshotted_at_byte_zero() {
    let mut tc = TestContext::new();
    let (_, _) = tc.translate(TranslationRequest::read(0x1111));
    let low = tc.sim.mmu.csr_read(FAULT_REASON_OFFSET);

    // A new fault between byte reads does not tear the value.
    let (_, _) = tc.translate(TranslationRequest::write(0x2222));
    let rest = [1, 2, 3].map(|lane| tc.sim.mmu.csr_read(FAULT_REASON_OFFSET + lane));
    let reg = u32::from_le_bytes([low, rest[0], rest[1], rest[2]]);
    assert_eq!(reg, 0x0000_1111 | 1u32 << 31);
}

#[test]
fn fault_reason_is_read_only() {
    let mut tc = TestContext::new();
    write_register(&mut tc.sim.mmu, FAULT_REASON_OFFSET, &[0xFF; 4]);
    assert_eq!(tc.sim.mmu.fault_record(), FaultRecord::default());
}

#[test]
fn tlb_flush_register_selects_entry() {
    let mut config = empty_config();
    config.mmu.index_bits = 4;
    config.mmu.initial_mapping = InitialMapping::Identity;
    let mut tc = TestContext::with_config(&config);

    let value = flush_value(false, 5).to_le_bytes();
    tc.sim.mmu.csr_write(TLB_FLUSH_OFFSET, value[0]);
    assert!(!tc.sim.mmu.is_flushing());
    tc.sim.mmu.csr_write(TLB_FLUSH_OFFSET + 1, value[1]);
    assert!(tc.sim.mmu.is_flushing());

    assert_eq!(tc.sim.settle().unwrap(), 1);
    assert!(!tc.sim.mmu.tlb().lookup(5).is_present());
}

#[test]
fn tlb_flush_register_masks_index_to_cache() {
    let mut config = empty_config();
    config.mmu.index_bits = 4;
    config.mmu.initial_mapping = InitialMapping::Identity;
    let mut tc = TestContext::with_config(&config);

    write_register(&mut tc.sim.mmu, TLB_FLUSH_OFFSET, &flush_value(false, 0x12).to_le_bytes());
    let _ = tc.sim.settle().unwrap();
    assert!(!tc.sim.mmu.tlb().lookup(2).is_present());
    assert_eq!(tc.sim.mmu.tlb().present_entries().count(), 15);
}

#[test]
fn tlb_flush_register_full_bit_sweeps() {
    let mut config = empty_config();
    config.mmu.index_bits = 3;
    config.mmu.initial_mapping = InitialMapping::Identity;
    let mut tc = TestContext::with_config(&config);

    write_register(&mut tc.sim.mmu, TLB_FLUSH_OFFSET, &flush_value(true, 5).to_le_bytes());
    assert_eq!(tc.sim.settle().unwrap(), 8);
    assert_eq!(tc.sim.mmu.tlb().present_entries().count(), 0);
}

#[test]
fn tlb_flush_and_unmapped_offsets_read_zero() {
    let mut tc = TestContext::new();
    assert_eq!(tc.sim.mmu.csr_read(TLB_FLUSH_OFFSET), 0);
    assert_eq!(tc.sim.mmu.csr_read(0x0C), 0);
    tc.sim.mmu.csr_write(0x0C, 0xFF);
    assert_eq!(tc.sim.mmu.page_table_base(), 0x2000);
    assert!(!tc.sim.mmu.is_flushing());
}
