//! Fixed-layout bank records.
//!
//! Each record is decoded with `binrw` from a sub-slice that the arena has
//! already bounds-checked, so a decode here never reaches past the bank.

use binrw::BinRead;

use crate::error::RecordKind;

/// A fixed-size record that can be read out of the arena.
pub(crate) trait Record: for<'r> BinRead<Args<'r> = ()> {
    const KIND: RecordKind;
    const SIZE: usize;
}

/// Bank file header (16 bytes).
#[derive(BinRead, Clone, Copy, Debug, PartialEq, Eq)]
#[br(little)]
pub struct HeaderRecord {
    pub magic: [u8; 8],
    /// Low 24 bits: declared file size. High 8 bits: unknown flag.
    pub size_and_flag: u32,
    pub version: u16,
    pub reserved: [u8; 2],
}

impl HeaderRecord {
    /// Byte offset of the flag byte inside the header.
    pub const FLAG_OFFSET: usize = 11;
    /// Byte offset of `reserved` inside the header.
    pub const RESERVED_OFFSET: usize = 14;

    /// Declared bank size in bytes (24 bits).
    pub fn declared_size(&self) -> u32 {
        self.size_and_flag & 0x00FF_FFFF
    }

    /// The byte packed above the size field.
    pub fn flag(&self) -> u8 {
        (self.size_and_flag >> 24) as u8
    }
}

impl Record for HeaderRecord {
    const KIND: RecordKind = RecordKind::Header;
    const SIZE: usize = 16;
}

/// Patch record (16 bytes), followed in the bank by an optional drum table
/// and `split_count` split records.
#[derive(BinRead, Clone, Copy, Debug, PartialEq, Eq)]
#[br(little)]
pub struct PatchRecord {
    /// 0 marks a dummy patch.
    pub volume: u16,
    /// 8.8 fixed point, 256 per semitone.
    pub tuning: i16,
    /// 8.8 fixed point pitch randomization range.
    pub rand_pitch: i16,
    pub drum_kit: u8,
    pub reserved: [u8; 7],
    pub split_count: u16,
}

impl PatchRecord {
    /// Byte offset of `reserved` inside the record.
    pub const RESERVED_OFFSET: usize = 7;
}

impl Record for PatchRecord {
    const KIND: RecordKind = RecordKind::Patch;
    const SIZE: usize = 16;
}

/// Split record (12 bytes).
#[derive(BinRead, Clone, Copy, Debug, PartialEq, Eq)]
#[br(little)]
pub struct SplitRecord {
    pub low_key: u8,
    pub high_key: u8,
    pub drum_index: u8,
    pub pan: i8,
    pub reserved: [u8; 2],
    pub tuning: i16,
    pub sample_header: u32,
}

impl SplitRecord {
    /// Byte offset of `reserved` inside the record.
    pub const RESERVED_OFFSET: usize = 4;
}

impl Record for SplitRecord {
    const KIND: RecordKind = RecordKind::Split;
    const SIZE: usize = 12;
}

/// Sample header record (28 bytes).
#[derive(BinRead, Clone, Copy, Debug, PartialEq, Eq)]
#[br(little)]
pub struct SampleHeaderRecord {
    pub start: u32,
    /// 0 means no loop.
    pub loop_point: u32,
    pub end: u32,
    pub volume: u16,
    pub tuning: i16,
    pub attack: u16,
    pub decay: u16,
    pub sustain: u16,
    pub release: u16,
    pub flags: u8,
    pub reserved: [u8; 3],
}

impl SampleHeaderRecord {
    /// Byte offset of `reserved` inside the record.
    pub const RESERVED_OFFSET: usize = 25;
}

impl Record for SampleHeaderRecord {
    const KIND: RecordKind = RecordKind::SampleHeader;
    const SIZE: usize = 28;
}

#[cfg(test)]
mod tests {
    use super::*;
    use binrw::BinReaderExt;
    use std::io::Cursor;

    #[test]
    fn split_record_field_order() {
        let bytes = [
            36, 59, 7, 0x80, 0xAA, 0xBB, 0x00, 0xFF, 0x78, 0x56, 0x34, 0x12,
        ];
        let split: SplitRecord = Cursor::new(&bytes[..]).read_le().unwrap();
        assert_eq!(split.low_key, 36);
        assert_eq!(split.high_key, 59);
        assert_eq!(split.drum_index, 7);
        assert_eq!(split.pan, -128);
        assert_eq!(split.reserved, [0xAA, 0xBB]);
        assert_eq!(split.tuning, -256);
        assert_eq!(split.sample_header, 0x1234_5678);
    }

    #[test]
    fn sample_header_record_is_28_bytes() {
        let mut bytes = [0u8; SampleHeaderRecord::SIZE];
        bytes[24] = 0x20;
        bytes[27] = 0x99;
        let rec: SampleHeaderRecord = Cursor::new(&bytes[..]).read_le().unwrap();
        assert_eq!(rec.flags, 0x20);
        assert_eq!(rec.reserved, [0, 0, 0x99]);
    }

    #[test]
    fn header_size_and_flag_share_a_word() {
        let mut bytes = [0u8; HeaderRecord::SIZE];
        bytes[..8].copy_from_slice(b"WgTPDHdr");
        bytes[8..12].copy_from_slice(&0x7F12_3456u32.to_le_bytes());
        let rec: HeaderRecord = Cursor::new(&bytes[..]).read_le().unwrap();
        assert_eq!(rec.declared_size(), 0x12_3456);
        assert_eq!(rec.flag(), 0x7F);
    }

    #[test]
    fn patch_record_split_count_is_last() {
        let mut bytes = [0u8; PatchRecord::SIZE];
        bytes[0] = 100;
        bytes[6] = 1;
        bytes[14] = 3;
        let rec: PatchRecord = Cursor::new(&bytes[..]).read_le().unwrap();
        assert_eq!(rec.volume, 100);
        assert_eq!(rec.drum_kit, 1);
        assert_eq!(rec.split_count, 3);
    }
}
