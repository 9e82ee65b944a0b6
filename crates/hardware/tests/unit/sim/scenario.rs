//! # Scenario Tests
//!
//! Loading JSON scenarios from disk and running their steps.

use std::io::Write;

use mmusim_core::MmuError;
use mmusim_core::common::{PhysAddr, VirtAddr};
use mmusim_core::core::units::mmu::fault::FaultRecord;
use mmusim_core::sim::{Scenario, StepOutcome};
use pretty_assertions::assert_eq;
use tempfile::NamedTempFile;

const REFERENCE: &str = r#"{
    "config": {
        "mmu": { "page_table_base": 8192, "initial_mapping": "Empty" },
        "bus": { "latency": 1 }
    },
    "page_table": [
        { "index": 5, "pfn": 16, "writable": true, "executable": true },
        { "index": 6, "pfn": 32 }
    ],
    "steps": [
        { "op": "translate", "vaddr": 20771 },
        { "op": "translate", "vaddr": 20771 },
        { "op": "translate", "vaddr": 24576, "write": true },
        { "op": "read_fault" },
        { "op": "csr_read", "offset": 3 }
    ]
}"#;

fn scenario_file(json: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(json.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn load_and_run_reference_scenario() {
    let file = scenario_file(REFERENCE);
    let scenario = Scenario::load(file.path()).unwrap();
    let outcomes = scenario.run().unwrap();

    assert_eq!(
        outcomes,
        vec![
            StepOutcome::Translate {
                vaddr: VirtAddr::new(0x5123),
                paddr: PhysAddr::new(0x01_0123),
                abort: false,
                cycles: 9,
            },
            StepOutcome::Translate {
                vaddr: VirtAddr::new(0x5123),
                paddr: PhysAddr::new(0x01_0123),
                abort: false,
                cycles: 3,
            },
            StepOutcome::Translate {
                vaddr: VirtAddr::new(0x6000),
                paddr: PhysAddr::new(0x02_0000),
                abort: true,
                cycles: 9,
            },
            StepOutcome::Fault(FaultRecord {
                addr: VirtAddr::new(0x6000),
                non_present: false,
                write: true,
                instruction_fetch: false,
                unprivileged: false,
            }),
            // FaultReason byte 3 read without a byte-0 snapshot first.
            StepOutcome::CsrRead {
                offset: 3,
                value: 0,
            },
        ]
    );
}

#[test]
fn invalidation_steps_report_cycles() {
    let scenario = Scenario::from_json(
        r#"{
            "config": { "mmu": { "index_bits": 3 } },
            "steps": [
                { "op": "invalidate_entry", "index": 2 },
                { "op": "invalidate_all" },
                { "op": "translate", "vaddr": 4096 }
            ]
        }"#,
    )
    .unwrap();

    let outcomes = scenario.run().unwrap();
    assert_eq!(outcomes[0], StepOutcome::Invalidated { cycles: 1 });
    assert_eq!(outcomes[1], StepOutcome::Invalidated { cycles: 8 });
    assert!(matches!(outcomes[2], StepOutcome::Translate { abort: true, .. }));
}

#[test]
fn map_and_base_steps_recover_a_missing_page() {
    let scenario = Scenario::from_json(
        r#"{
            "config": { "mmu": { "initial_mapping": "Empty" } },
            "steps": [
                { "op": "set_page_table_base", "value": 12288 },
                { "op": "translate", "vaddr": 8192 },
                { "op": "map", "index": 2, "pfn": 291 },
                { "op": "translate", "vaddr": 8192 }
            ]
        }"#,
    )
    .unwrap();

    let outcomes = scenario.run().unwrap();
    assert_eq!(outcomes[0], StepOutcome::Done);
    assert!(matches!(outcomes[1], StepOutcome::Translate { abort: true, .. }));
    assert!(matches!(
        outcomes[3],
        StepOutcome::Translate { abort: false, paddr, .. } if paddr.val() == 0x12_3000
    ));
}

#[test]
fn csr_steps_drive_the_register_window() {
    let scenario = Scenario::from_json(
        r#"{
            "steps": [
                { "op": "csr_write", "offset": 4, "value": 0 },
                { "op": "csr_write", "offset": 5, "value": 64 },
                { "op": "csr_write", "offset": 6, "value": 0 },
                { "op": "csr_write", "offset": 7, "value": 0 },
                { "op": "csr_read", "offset": 4 },
                { "op": "csr_read", "offset": 5 },
                { "op": "idle", "cycles": 3 }
            ]
        }"#,
    )
    .unwrap();

    let mut sim = scenario.build().unwrap();
    let outcomes = scenario.execute(&mut sim).unwrap();
    assert_eq!(outcomes[5], StepOutcome::CsrRead { offset: 5, value: 64 });
    assert_eq!(sim.mmu.page_table_base(), 0x4000);
    assert_eq!(sim.cycles(), 3);
}

#[test]
fn bad_index_aborts_the_run() {
    let scenario = Scenario::from_json(
        r#"{ "steps": [ { "op": "invalidate_entry", "index": 4096 } ] }"#,
    )
    .unwrap();
    assert!(matches!(
        scenario.run(),
        Err(MmuError::InvalidIndex { index: 4096, lines: 2048 })
    ));
}

#[test]
fn out_of_range_page_table_index_is_rejected() {
    let scenario = Scenario::from_json(
        r#"{ "page_table": [ { "index": 3000000000, "pfn": 1 } ], "steps": [] }"#,
    )
    .unwrap();
    assert!(matches!(
        scenario.build(),
        Err(MmuError::InvalidIndex { index: 3_000_000_000, lines: 2048 })
    ));
}

#[test]
fn out_of_range_map_step_is_rejected() {
    let scenario = Scenario::from_json(
        r#"{ "steps": [ { "op": "map", "index": 18446744073709551615, "pfn": 1 } ] }"#,
    )
    .unwrap();
    assert!(matches!(
        scenario.run(),
        Err(MmuError::InvalidIndex { index: usize::MAX, lines: 2048 })
    ));
}

#[test]
fn execute_with_reports_steps_before_a_failure() {
    let scenario = Scenario::from_json(
        r#"{ "steps": [
            { "op": "csr_read", "offset": 0 },
            { "op": "invalidate_entry", "index": 9999 },
            { "op": "read_fault" }
        ] }"#,
    )
    .unwrap();
    let mut sim = scenario.build().unwrap();
    let mut seen = Vec::new();
    let result = scenario.execute_with(&mut sim, |step, outcome| {
        seen.push((step, outcome.clone()));
        Ok(())
    });

    assert!(matches!(result, Err(MmuError::InvalidIndex { index: 9999, .. })));
    assert_eq!(seen, vec![(0, StepOutcome::CsrRead { offset: 0, value: 0 })]);
}

#[test]
fn malformed_json_is_an_error() {
    let file = scenario_file(r#"{ "steps": [ { "op": "teleport" } ] }"#);
    assert!(matches!(Scenario::load(file.path()), Err(MmuError::Json(_))));
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("absent.json");
    assert!(matches!(Scenario::load(missing), Err(MmuError::Io(_))));
}

#[test]
fn memory_blobs_are_loaded() {
    let scenario = Scenario::from_json(
        r#"{
            "config": { "mmu": { "initial_mapping": "Empty" } },
            "memory": [ { "addr": 10, "bytes": [7, 1] } ],
            "steps": [ { "op": "translate", "vaddr": 20771 } ]
        }"#,
    )
    .unwrap();
    let outcomes = scenario.run().unwrap();
    assert!(matches!(
        outcomes[0],
        StepOutcome::Translate { abort: false, paddr, .. } if paddr.val() == 0x01_0123
    ));
}

#[test]
fn outcomes_serialize_with_op_tag() {
    let value = serde_json::to_value(StepOutcome::Invalidated { cycles: 4 }).unwrap();
    assert_eq!(value, serde_json::json!({ "op": "invalidated", "cycles": 4 }));
}
