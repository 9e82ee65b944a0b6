//! Configuration system for the translation-unit model.
//!
//! This module defines all configuration structures used to parameterize the
//! model. It provides:
//! 1. **Defaults:** Baseline constants (cache index width, bus latency, RAM size).
//! 2. **Structures:** Hierarchical config for the unit, the backing-store bus and the driver.
//! 3. **Enums:** Power-on contents of the translation cache.
//!
//! Configuration is deserialized from JSON (scenario files) or built with `Config::default()`.

use serde::Deserialize;

use crate::common::MmuError;
use crate::common::constants::{ADDR_BITS, MAX_INDEX_BITS};

/// Default configuration constants.
mod defaults {
    /// Width of the translation cache index (2048 lines).
    pub const INDEX_BITS: u32 = crate::common::constants::DEFAULT_INDEX_BITS;

    /// Page-table base pointer at reset.
    pub const PAGE_TABLE_BASE: u32 = 0;

    /// Backing-store cycles between a read being asserted and its acknowledge.
    pub const BUS_LATENCY: u64 = 1;

    /// Base address of the RAM device on the backing-store bus.
    pub const RAM_BASE: u32 = 0;

    /// RAM size in bytes (the low 16 MiB, the whole 24-bit space).
    pub const RAM_SIZE: usize = 0x100_0000;

    /// Cycles the driver waits for a response before reporting a stall.
    pub const STALL_BUDGET: u64 = 10_000;
}

/// Power-on contents of the translation cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum InitialMapping {
    /// Line `i` maps frame `i` with every permission, so the low half of the
    /// address space is identity-mapped before any page table exists.
    #[default]
    Identity,
    /// Every line is absent; the first access to each index misses.
    Empty,
}

/// Root configuration structure.
///
/// # Examples
///
/// ```
/// use mmusim_core::config::{Config, InitialMapping};
///
/// let json = r#"{
///     "mmu": { "index_bits": 12, "page_table_base": 8192, "initial_mapping": "Empty" },
///     "bus": { "latency": 3 }
/// }"#;
///
/// let config: Config = serde_json::from_str(json).unwrap();
/// assert_eq!(config.mmu.index_bits, 12);
/// assert_eq!(config.mmu.initial_mapping, InitialMapping::Empty);
/// assert!(config.mmu.identity_region);
/// assert_eq!(config.bus.latency, 3);
/// assert_eq!(config.general.stall_budget, 10_000);
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Translation unit settings
    #[serde(default)]
    pub mmu: MmuConfig,
    /// Backing-store bus and RAM
    #[serde(default)]
    pub bus: BusConfig,
    /// Driver and logging settings
    #[serde(default)]
    pub general: GeneralConfig,
}

impl Config {
    /// Checks the configuration for values no unit could be built from.
    ///
    /// # Errors
    ///
    /// Returns `MmuError::InvalidConfig` describing the first bad field.
    pub fn validate(&self) -> Result<(), MmuError> {
        self.mmu.validate()?;
        self.bus.validate()
    }
}

/// Translation unit configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct MmuConfig {
    /// Width of the cache index in bits; the cache has `1 << index_bits` lines
    #[serde(default = "MmuConfig::default_index_bits")]
    pub index_bits: u32,

    /// Page-table base pointer at reset (only the low 24 bits address bytes)
    #[serde(default = "MmuConfig::default_page_table_base")]
    pub page_table_base: u32,

    /// Treat addresses with the top bit set as an identity-mapped region
    #[serde(default = "MmuConfig::default_identity_region")]
    pub identity_region: bool,

    /// Power-on contents of the translation cache
    #[serde(default)]
    pub initial_mapping: InitialMapping,
}

impl MmuConfig {
    /// Returns the default cache index width.
    fn default_index_bits() -> u32 {
        defaults::INDEX_BITS
    }

    /// Returns the default page-table base pointer.
    fn default_page_table_base() -> u32 {
        defaults::PAGE_TABLE_BASE
    }

    /// The identity region is on unless a deployment disables it.
    fn default_identity_region() -> bool {
        true
    }

    /// Returns the number of cache lines this configuration describes.
    pub const fn lines(&self) -> usize {
        1 << self.index_bits
    }

    /// Checks the index width.
    ///
    /// # Errors
    ///
    /// Returns `MmuError::InvalidConfig` when `index_bits` is outside `1..=12`.
    pub fn validate(&self) -> Result<(), MmuError> {
        if self.index_bits == 0 || self.index_bits > MAX_INDEX_BITS {
            return Err(MmuError::InvalidConfig(format!(
                "index_bits must be in 1..={MAX_INDEX_BITS}, got {}",
                self.index_bits
            )));
        }
        Ok(())
    }
}

impl Default for MmuConfig {
    fn default() -> Self {
        Self {
            index_bits: defaults::INDEX_BITS,
            page_table_base: defaults::PAGE_TABLE_BASE,
            identity_region: true,
            initial_mapping: InitialMapping::Identity,
        }
    }
}

/// Backing-store bus configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct BusConfig {
    /// Cycles between a read being asserted and its acknowledge
    #[serde(default = "BusConfig::default_latency")]
    pub latency: u64,

    /// Base address of RAM
    #[serde(default = "BusConfig::default_ram_base")]
    pub ram_base: u32,

    /// RAM size in bytes
    #[serde(default = "BusConfig::default_ram_size")]
    pub ram_size: usize,
}

impl BusConfig {
    /// Returns the default bus latency.
    fn default_latency() -> u64 {
        defaults::BUS_LATENCY
    }

    /// Returns the default RAM base address.
    fn default_ram_base() -> u32 {
        defaults::RAM_BASE
    }

    /// Returns the default RAM size.
    fn default_ram_size() -> usize {
        defaults::RAM_SIZE
    }

    /// Checks that RAM is non-empty and fits in the 24-bit address space.
    ///
    /// # Errors
    ///
    /// Returns `MmuError::InvalidConfig` for an empty or oversized RAM region.
    pub fn validate(&self) -> Result<(), MmuError> {
        if self.ram_size == 0 {
            return Err(MmuError::InvalidConfig("ram_size must be non-zero".into()));
        }
        let end = self.ram_base as u64 + self.ram_size as u64;
        if end > 1u64 << ADDR_BITS {
            return Err(MmuError::InvalidConfig(format!(
                "RAM {:#x}+{:#x} extends past the 24-bit address space",
                self.ram_base, self.ram_size
            )));
        }
        Ok(())
    }
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            latency: defaults::BUS_LATENCY,
            ram_base: defaults::RAM_BASE,
            ram_size: defaults::RAM_SIZE,
        }
    }
}

/// Driver and logging settings.
#[derive(Debug, Clone, Deserialize)]
pub struct GeneralConfig {
    /// Log every response at `info` level
    #[serde(default)]
    pub trace_translations: bool,

    /// Cycles the driver waits for a response before reporting `MmuError::Stalled`
    #[serde(default = "GeneralConfig::default_stall_budget")]
    pub stall_budget: u64,
}

impl GeneralConfig {
    /// Returns the default stall budget.
    fn default_stall_budget() -> u64 {
        defaults::STALL_BUDGET
    }
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            trace_translations: false,
            stall_budget: defaults::STALL_BUDGET,
        }
    }
}
