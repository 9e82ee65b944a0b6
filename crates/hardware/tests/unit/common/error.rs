//! # Error Tests
//!
//! Display output and conversions of `MmuError`.

use mmusim_core::MmuError;
use mmusim_core::common::VirtAddr;

#[test]
fn busy_names_rejected_address() {
    let err = MmuError::Busy {
        vaddr: VirtAddr::new(0x1234),
    };
    assert!(err.to_string().contains("v:001234"));
}

#[test]
fn invalid_index_reports_bounds() {
    let err = MmuError::InvalidIndex {
        index: 4096,
        lines: 2048,
    };
    let msg = err.to_string();
    assert!(msg.contains("4096"));
    assert!(msg.contains("2048"));
}

#[test]
fn stalled_reports_cycles() {
    let err = MmuError::Stalled {
        vaddr: VirtAddr::new(0x5000),
        cycles: 64,
    };
    assert!(err.to_string().contains("64 cycles"));
}

#[test]
fn json_error_converts() {
    let parse = serde_json::from_str::<u32>("not json").unwrap_err();
    let err: MmuError = parse.into();
    assert!(matches!(err, MmuError::Json(_)));
}

#[test]
fn io_error_converts() {
    let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
    let err: MmuError = io.into();
    assert!(matches!(err, MmuError::Io(_)));
    assert!(err.to_string().contains("missing"));
}
