//! Translation Lookaside Buffer (TLB).
//!
//! A direct-mapped cache of mapping descriptors. The line for a request is
//! selected solely by the index slice of its virtual address; there is no tag,
//! no associativity and no replacement policy. Filling a line unconditionally
//! overwrites whatever it held, and an absent line is a miss.

use crate::common::constants::MAX_INDEX_BITS;
use crate::common::{MmuError, VirtAddr};
use crate::config::InitialMapping;

use super::pte::PageTableEntry;

/// Translation Lookaside Buffer structure.
#[derive(Clone, Debug)]
pub struct Tlb {
    /// One descriptor per index value.
    entries: Vec<PageTableEntry>,
    /// Mask used for indexing (lines - 1).
    mask: usize,
    /// Width of the index in bits.
    index_bits: u32,
}

impl Tlb {
    /// Creates a TLB with `1 << index_bits` lines in the given power-on state.
    ///
    /// # Arguments
    ///
    /// * `index_bits` - Width of the index, clamped to `1..=12`.
    /// * `initial` - Power-on contents.
    pub fn new(index_bits: u32, initial: InitialMapping) -> Self {
        let index_bits = index_bits.clamp(1, MAX_INDEX_BITS);
        let lines = 1usize << index_bits;
        let entries = match initial {
            InitialMapping::Identity => (0..lines)
                .map(|i| PageTableEntry::full_access(i as u16))
                .collect(),
            InitialMapping::Empty => vec![PageTableEntry::absent(); lines],
        };

        Self {
            entries,
            mask: lines - 1,
            index_bits,
        }
    }

    /// Creates a TLB from a caller-supplied mapping set.
    ///
    /// # Errors
    ///
    /// Returns `MmuError::InvalidConfig` unless the set has a power-of-two
    /// length between 2 and 4096 lines.
    pub fn from_entries(entries: Vec<PageTableEntry>) -> Result<Self, MmuError> {
        let lines = entries.len();
        if !lines.is_power_of_two() || lines < 2 || lines > 1 << MAX_INDEX_BITS {
            return Err(MmuError::InvalidConfig(format!(
                "initial mapping set must have a power-of-two length in 2..=4096, got {lines}"
            )));
        }

        Ok(Self {
            entries,
            mask: lines - 1,
            index_bits: lines.trailing_zeros(),
        })
    }

    /// Returns the number of lines.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// A TLB always has at least two lines.
    pub const fn is_empty(&self) -> bool {
        false
    }

    /// Returns the width of the index in bits.
    pub const fn index_bits(&self) -> u32 {
        self.index_bits
    }

    /// Returns the line a virtual address selects.
    #[inline(always)]
    pub const fn index_of(&self, vaddr: VirtAddr) -> usize {
        vaddr.index(self.index_bits)
    }

    /// Reads the descriptor held by line `index`.
    ///
    /// Never fails: out-of-range bits are masked away, and a line that was
    /// never filled or was invalidated reads as the absent descriptor.
    #[inline(always)]
    pub fn lookup(&self, index: usize) -> PageTableEntry {
        self.entries[index & self.mask]
    }

    /// Overwrites line `index` with `pte`.
    #[inline(always)]
    pub fn fill(&mut self, index: usize, pte: PageTableEntry) {
        self.entries[index & self.mask] = pte;
    }

    /// Marks line `index` as not present.
    pub fn invalidate(&mut self, index: usize) {
        self.fill(index, PageTableEntry::absent());
    }

    /// Marks every line as not present.
    pub fn invalidate_all(&mut self) {
        self.entries.fill(PageTableEntry::absent());
    }

    /// Iterates over `(index, descriptor)` for every present line.
    pub fn present_entries(&self) -> impl Iterator<Item = (usize, PageTableEntry)> + '_ {
        self.entries
            .iter()
            .copied()
            .enumerate()
            .filter(|(_, pte)| pte.is_present())
    }
}
