/// Translation unit tests.
pub mod mmu;
