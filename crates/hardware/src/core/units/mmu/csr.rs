//! Configuration and diagnostic register window.
//!
//! The unit exposes three registers on a byte-wide register bus:
//!
//! | Offset | Register    | Access | Layout                                                  |
//! |--------|-------------|--------|---------------------------------------------------------|
//! | `0x0`  | FaultReason | R      | `[23:0]` addr, `28` user, `29` ifetch, `30` write, `31` non-present |
//! | `0x4`  | PtPointer   | RW     | `[31:0]` page-table base (low 24 bits address bytes)     |
//! | `0x8`  | TlbFlush    | W      | `0` full, `[15:4]` index                                 |
//!
//! Registers wider than the bus are accessed a byte at a time. Reading byte 0
//! snapshots the whole register so later bytes are coherent; written bytes are
//! staged and the register takes effect when its highest byte is written.

/// Offset of the FaultReason register.
pub const FAULT_REASON_OFFSET: u8 = 0x0;
/// Offset of the PtPointer register.
pub const PT_POINTER_OFFSET: u8 = 0x4;
/// Offset of the TlbFlush register.
pub const TLB_FLUSH_OFFSET: u8 = 0x8;
/// Size of the register window in bytes.
pub const WINDOW_SIZE: u8 = 0x10;

/// TlbFlush bit requesting a full sweep.
const FLUSH_FULL_BIT: u32 = 1;
/// Shift of the TlbFlush index field.
const FLUSH_INDEX_SHIFT: u32 = 4;
/// Width mask of the TlbFlush index field.
const FLUSH_INDEX_MASK: u32 = 0xFFF;

/// A register in the window.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Register {
    /// Most recent fault (read-only).
    FaultReason,
    /// Page-table base pointer.
    PtPointer,
    /// Invalidation trigger (write-only).
    TlbFlush,
}

impl Register {
    const ALL: [Self; 3] = [Self::FaultReason, Self::PtPointer, Self::TlbFlush];

    /// Offset of the register's first byte.
    pub const fn offset(self) -> u8 {
        match self {
            Self::FaultReason => FAULT_REASON_OFFSET,
            Self::PtPointer => PT_POINTER_OFFSET,
            Self::TlbFlush => TLB_FLUSH_OFFSET,
        }
    }

    /// Register width in bytes.
    pub const fn width(self) -> u8 {
        match self {
            Self::FaultReason | Self::PtPointer => 4,
            Self::TlbFlush => 2,
        }
    }

    const fn slot(self) -> usize {
        self as usize
    }

    /// Decodes a window offset into a register and a byte lane.
    pub fn decode(offset: u8) -> Option<(Self, u8)> {
        Self::ALL.into_iter().find_map(|reg| {
            let lane = offset.checked_sub(reg.offset())?;
            (lane < reg.width()).then_some((reg, lane))
        })
    }
}

/// A register write that took effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CsrWrite {
    /// New page-table base pointer.
    PtPointer(u32),
    /// Invalidation request; `index` selects the line when `full` is false.
    TlbFlush {
        /// Sweep every line.
        full: bool,
        /// Line to invalidate.
        index: usize,
    },
}

/// Current register values the window reads from.
#[derive(Clone, Copy, Debug, Default)]
pub struct RegisterValues {
    /// FaultReason image.
    pub fault_reason: u32,
    /// PtPointer value.
    pub pt_pointer: u32,
}

/// Byte-lane shadows for the register window.
#[derive(Clone, Copy, Debug, Default)]
pub struct CsrWindow {
    read_shadow: [u32; 3],
    write_shadow: [u32; 3],
}

impl CsrWindow {
    /// Reads one byte of the window.
    ///
    /// Unmapped offsets and write-only registers read as zero.
    pub fn read(&mut self, offset: u8, values: RegisterValues) -> u8 {
        let Some((reg, lane)) = Register::decode(offset) else {
            return 0;
        };

        if lane == 0 {
            self.read_shadow[reg.slot()] = match reg {
                Register::FaultReason => values.fault_reason,
                Register::PtPointer => values.pt_pointer,
                Register::TlbFlush => 0,
            };
        }
        (self.read_shadow[reg.slot()] >> (8 * u32::from(lane))) as u8
    }

    /// Writes one byte of the window.
    ///
    /// Returns the register write once the highest byte of a writable
    /// register lands; writes to unmapped or read-only offsets are dropped.
    pub fn write(&mut self, offset: u8, val: u8) -> Option<CsrWrite> {
        let (reg, lane) = Register::decode(offset)?;
        if reg == Register::FaultReason {
            return None;
        }

        let shift = 8 * u32::from(lane);
        let shadow = &mut self.write_shadow[reg.slot()];
        *shadow = (*shadow & !(0xFF << shift)) | (u32::from(val) << shift);

        if lane + 1 < reg.width() {
            return None;
        }

        let value = *shadow;
        Some(match reg {
            Register::PtPointer => CsrWrite::PtPointer(value),
            _ => CsrWrite::TlbFlush {
                full: value & FLUSH_FULL_BIT != 0,
                index: ((value >> FLUSH_INDEX_SHIFT) & FLUSH_INDEX_MASK) as usize,
            },
        })
    }
}

/// Encodes a TlbFlush register value.
pub const fn flush_value(full: bool, index: usize) -> u16 {
    let mut value = ((index as u32 & FLUSH_INDEX_MASK) << FLUSH_INDEX_SHIFT) as u16;
    if full {
        value |= FLUSH_FULL_BIT as u16;
    }
    value
}
