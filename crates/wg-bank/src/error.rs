//! Error types for bank resolution.

use core::fmt;
use thiserror::Error;

/// Which fixed-layout record an offset was supposed to point at.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RecordKind {
    Header,
    PatchMap,
    Patch,
    DrumTable,
    Split,
    SampleHeader,
    SampleData,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RecordKind::Header => "bank header",
            RecordKind::PatchMap => "patch map",
            RecordKind::Patch => "patch",
            RecordKind::DrumTable => "drum table",
            RecordKind::Split => "split",
            RecordKind::SampleHeader => "sample header",
            RecordKind::SampleData => "sample data",
        };
        f.write_str(name)
    }
}

/// An offset (or a range derived from offsets) that does not fit the bank.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoundsError {
    /// `offset + size` runs past the end of the buffer.
    #[error("{record} at {offset:#010x} (+{size} bytes) runs past the end of the bank ({bank_len:#x} bytes)")]
    OutOfRange {
        record: RecordKind,
        offset: usize,
        size: usize,
        bank_len: usize,
    },
    /// Sample end lies before sample start.
    #[error("sample data range {start:#010x}..{end:#010x} is inverted")]
    InvertedRange { start: u32, end: u32 },
    /// A nonzero loop point outside `start..=end`.
    #[error("loop point {loop_point:#010x} lies outside sample data {start:#010x}..{end:#010x}")]
    LoopOutsideSample { start: u32, loop_point: u32, end: u32 },
}

impl BoundsError {
    pub(crate) fn out_of_range(record: RecordKind, offset: usize, size: usize, bank_len: usize) -> Self {
        BoundsError::OutOfRange {
            record,
            offset,
            size,
            bank_len,
        }
    }
}

/// Fatal errors raised while opening a bank.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    /// The first eight bytes are not the bank magic.
    #[error("not a WinGroove bank (bad magic)")]
    BadMagic,
    /// The header declares more bytes than the buffer holds.
    #[error("bank is truncated: header declares {declared} bytes, buffer holds {actual}")]
    Truncated { declared: u32, actual: usize },
    /// Header or patch map does not fit the buffer.
    #[error(transparent)]
    Bounds(#[from] BoundsError),
}
