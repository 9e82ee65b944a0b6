//! Backing-store interconnect.
//!
//! This module implements the bus fabric the translation unit reads page
//! tables through. It provides:
//! 1. **Device registration:** Devices are added by address range and sorted for lookup.
//! 2. **Access routing:** Host-side byte reads and writes by address.
//! 3. **Handshake timing:** A fixed number of wait ticks before each acknowledge.
//!
//! An address no device decodes is never acknowledged. A read of such an
//! address stalls its requester forever, exactly as an unterminated
//! transaction on the real fabric would.

use tracing::warn;

use super::traits::{BackingBus, Device};
use crate::common::constants::{ADDR_MASK, PTE_SIZE};
use crate::core::units::mmu::pte::PageTableEntry;

/// An outstanding read transaction.
#[derive(Clone, Copy, Debug)]
struct Transaction {
    /// Address being read.
    addr: u32,
    /// Wait ticks left before the acknowledge.
    remaining: u64,
    /// The undecoded-address warning was already emitted.
    warned: bool,
}

/// Backing-store bus; routes accesses by physical address.
pub struct Bus {
    /// Registered devices, sorted by base address.
    devices: Vec<Box<dyn Device>>,
    /// Wait ticks between a read being asserted and its acknowledge.
    pub latency_cycles: u64,
    /// Transaction currently held by the requester, if any.
    pending: Option<Transaction>,
}

impl std::fmt::Debug for Bus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bus")
            .field(
                "devices",
                &self.devices.iter().map(|d| d.name()).collect::<Vec<_>>(),
            )
            .field("latency_cycles", &self.latency_cycles)
            .field("pending", &self.pending)
            .finish()
    }
}

impl Bus {
    /// Creates an empty bus; add devices with `add_device`.
    pub fn new(latency_cycles: u64) -> Self {
        Self {
            devices: Vec::new(),
            latency_cycles,
            pending: None,
        }
    }

    /// Registers a device; devices are kept sorted by base address.
    pub fn add_device(&mut self, dev: Box<dyn Device>) {
        self.devices.push(dev);
        self.devices.sort_by_key(|d| d.address_range().0);
    }

    /// Returns the device decoding `addr` and the device-relative offset.
    fn find_device(&mut self, addr: u32) -> Option<(&mut Box<dyn Device>, u32)> {
        self.devices
            .iter_mut()
            .find(|d| d.contains(addr))
            .map(|d| {
                let base = d.address_range().0;
                (d, addr - base)
            })
    }

    /// Returns true if some device decodes `addr`.
    pub fn is_decoded(&self, addr: u32) -> bool {
        self.devices.iter().any(|d| d.contains(addr & ADDR_MASK))
    }

    /// Host-side byte read without handshake timing; undecoded addresses read as `None`.
    pub fn peek_u8(&mut self, addr: u32) -> Option<u8> {
        self.find_device(addr & ADDR_MASK)
            .map(|(dev, offset)| dev.read_u8(offset))
    }

    /// Host-side byte write; writes to undecoded addresses are dropped.
    pub fn write_u8(&mut self, addr: u32, val: u8) {
        if let Some((dev, offset)) = self.find_device(addr & ADDR_MASK) {
            dev.write_u8(offset, val);
        }
    }

    /// Writes a blob starting at `addr`, byte-by-byte through the decoder.
    pub fn load_bytes(&mut self, addr: u32, data: &[u8]) {
        for (i, byte) in data.iter().enumerate() {
            self.write_u8(addr.wrapping_add(i as u32), *byte);
        }
    }

    /// Stores a mapping descriptor as entry `index` of the page table at `base`.
    pub fn write_pte(&mut self, base: u32, index: usize, pte: PageTableEntry) {
        let addr = base.wrapping_add((index as u32).wrapping_mul(PTE_SIZE));
        self.load_bytes(addr, &pte.to_bytes());
    }

    /// Returns true while a read transaction is outstanding.
    pub const fn is_busy(&self) -> bool {
        self.pending.is_some()
    }
}

impl BackingBus for Bus {
    fn read_byte(&mut self, addr: u32) -> Option<u8> {
        let addr = addr & ADDR_MASK;
        let mut txn = match self.pending {
            Some(txn) if txn.addr == addr => txn,
            _ => Transaction {
                addr,
                remaining: self.latency_cycles,
                warned: false,
            },
        };

        if txn.remaining > 0 {
            txn.remaining -= 1;
            self.pending = Some(txn);
            return None;
        }

        let Some((dev, offset)) = self.find_device(addr) else {
            if !txn.warned {
                warn!("read of undecoded address {addr:#08x}; no acknowledge");
                txn.warned = true;
            }
            self.pending = Some(txn);
            return None;
        };

        let data = dev.read_u8(offset);
        self.pending = None;
        Some(data)
    }
}
