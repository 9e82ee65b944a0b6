use mockall::mock;
use mmusim_core::soc::{BackingBus, Bus};

mock! {
    pub Backing {}
    impl BackingBus for Backing {
        fn read_byte(&mut self, addr: u32) -> Option<u8>;
    }
}

/// Wraps a real bus and records every acknowledged read.
#[derive(Debug)]
pub struct RecordingBus {
    pub inner: Bus,
    /// Addresses of acknowledged reads, in order.
    pub acked: Vec<u32>,
    /// Ticks a read was asserted, acknowledged or not.
    pub polls: u64,
}

impl RecordingBus {
    pub fn new(inner: Bus) -> Self {
        Self {
            inner,
            acked: Vec::new(),
            polls: 0,
        }
    }

    /// Forgets everything recorded so far.
    pub fn clear(&mut self) {
        self.acked.clear();
        self.polls = 0;
    }
}

impl BackingBus for RecordingBus {
    fn read_byte(&mut self, addr: u32) -> Option<u8> {
        self.polls += 1;
        let data = self.inner.read_byte(addr);
        if data.is_some() {
            self.acked.push(addr);
        }
        data
    }
}

/// A bus that never acknowledges anything.
#[derive(Debug, Default)]
pub struct SilentBus {
    pub polls: u64,
}

impl BackingBus for SilentBus {
    fn read_byte(&mut self, _addr: u32) -> Option<u8> {
        self.polls += 1;
        None
    }
}
