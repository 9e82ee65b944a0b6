//! Address-translation unit model CLI.
//!
//! This binary drives the `mmusim-core` library. It provides:
//! 1. **Scenario run:** Execute a JSON scenario and print one JSON outcome per step.
//! 2. **Descriptor decode:** Unpack a two-byte page-table entry as it sits in memory.
//!
//! Logging goes to stderr and is filtered with `RUST_LOG` (e.g. `RUST_LOG=mmusim_core=debug`).

use std::process;

use clap::{Parser, Subcommand};
use serde_json::json;
use tracing::error;
use tracing_subscriber::EnvFilter;

use mmusim_core::MmuError;
use mmusim_core::core::units::mmu::pte::PageTableEntry;
use mmusim_core::sim::Scenario;

#[derive(Parser, Debug)]
#[command(
    name = "mmusim",
    author,
    version,
    about = "Cycle-stepped 24-bit MMU model",
    long_about = "Run translation scenarios against a cycle-stepped MMU model, or decode page-table entries.\n\nExamples:\n  mmusim run demos/miss_then_hit.json --stats\n  mmusim decode 0701"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a JSON scenario.
    Run {
        /// Scenario file.
        path: String,

        /// Print the statistics report after the run.
        #[arg(long)]
        stats: bool,
    },

    /// Decode a page-table entry given as four hex digits in memory order (low byte first).
    Decode {
        /// Entry bytes, e.g. `0701` for low byte 0x07 and high byte 0x01.
        bytes: String,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Run { path, stats } => cmd_run(&path, stats),
        Commands::Decode { bytes } => cmd_decode(&bytes),
    };

    if let Err(e) = result {
        error!("{e}");
        eprintln!("error: {e}");
        process::exit(1);
    }
}

/// Loads and runs a scenario, printing each step's outcome as a JSON line as
/// soon as the step finishes.
fn cmd_run(path: &str, stats: bool) -> Result<(), MmuError> {
    let scenario = Scenario::load(path)?;
    let mut sim = scenario.build()?;
    let result = scenario.execute_with(&mut sim, |step, outcome| {
        println!(
            "{}",
            json!({ "step": step, "outcome": serde_json::to_value(outcome)? })
        );
        Ok(())
    });

    // Steps before a failure are already printed; the report covers them too.
    if stats {
        sim.mmu.stats.print();
    }
    result
}

/// Decodes a page-table entry and prints its fields as JSON.
fn cmd_decode(bytes: &str) -> Result<(), MmuError> {
    let [low, high] = parse_entry(bytes)?;
    let pte = PageTableEntry::from_bytes(low, high);
    println!(
        "{}",
        json!({
            "raw": format!("{:#06x}", pte.raw()),
            "present": pte.is_present(),
            "writable": pte.is_writable(),
            "executable": pte.is_executable(),
            "pfn": format!("{:#05x}", pte.pfn()),
        })
    );
    Ok(())
}

fn parse_entry(text: &str) -> Result<[u8; 2], MmuError> {
    let digits = text.trim().trim_start_matches("0x");
    let bad = || MmuError::InvalidConfig(format!("expected four hex digits, got {text:?}"));
    if digits.len() != 4 || !digits.is_ascii() {
        return Err(bad());
    }
    let low = u8::from_str_radix(&digits[..2], 16).map_err(|_| bad())?;
    let high = u8::from_str_radix(&digits[2..], 16).map_err(|_| bad())?;
    Ok([low, high])
}
