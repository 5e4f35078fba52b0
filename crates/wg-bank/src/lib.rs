//! WinGroove soundbank model for wgknife.
//!
//! A bank is one flat buffer: a 16-byte header, sixteen unused waveform
//! tables, a 256-entry patch map, and then patches, splits, sample headers
//! and 8-bit encoded sample data, all addressed by byte offsets from the
//! start of the buffer.
//!
//! [`Bank::open`] validates the header and patch map. Everything below that
//! is resolved lazily through bounds-checked views; an offset that does not
//! fit the buffer becomes a [`BoundsError`] instead of a panic.

mod bank;
#[cfg(any(test, feature = "builder"))]
pub mod builder;
mod decode;
mod error;
mod names;
mod records;
mod sample;
mod slot;

pub use bank::{
    Bank, DrumTable, Envelope, LoopFrames, Patch, PatchLayout, SampleHeader, SlotEntry, Split,
    Splits,
};
pub use decode::{decode, decode_block, PCM_TABLE};
pub use error::{BoundsError, FormatError, RecordKind};
pub use names::{
    default_patch_label, sanitize_file_stem, synthesized_sample_name, NameTable, GM_PROGRAM_NAMES,
};
pub use records::{HeaderRecord, PatchRecord, SampleHeaderRecord, SplitRecord};
pub use sample::{LoopType, SampleData, SampleFlags};
pub use slot::Slot;

/// Bank file magic.
pub const MAGIC: &[u8; 8] = b"WgTPDHdr";

/// Size of the bank header.
pub const HEADER_LEN: usize = 16;

/// Number of unused waveform tables after the header.
pub const WAVEFORM_TABLES: usize = 16;

/// Length of one waveform table.
pub const WAVEFORM_LEN: usize = 256;

/// Header plus waveform tables.
pub const HEADER_AREA_LEN: usize = HEADER_LEN + WAVEFORM_TABLES * WAVEFORM_LEN;

/// Offset of the patch map.
pub const PATCH_MAP_OFFSET: usize = HEADER_AREA_LEN;

/// First byte after the patch map and the filler map that follows it.
pub const PATCH_AREA_OFFSET: usize = PATCH_MAP_OFFSET + 2 * Slot::COUNT * 4;

/// Length of a drum kit's note table.
pub const DRUM_TABLE_LEN: usize = 128;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_constants() {
        assert_eq!(MAGIC.len(), 8);
        assert_eq!(PATCH_MAP_OFFSET, 4112);
        assert_eq!(PATCH_AREA_OFFSET, 6160);
    }
}
