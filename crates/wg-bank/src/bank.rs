//! Offset-addressed view over a loaded bank.
//!
//! Nothing here owns memory beyond the caller's buffer. Patches, splits and
//! sample headers are small `Copy` views that carry the byte offset they were
//! resolved from and re-read the buffer on demand.

use std::io::Cursor;
use std::ops::RangeInclusive;

use binrw::{BinRead, Endian};
use tracing::warn;

use crate::decode::decode_block;
use crate::error::{BoundsError, FormatError, RecordKind};
use crate::records::{HeaderRecord, PatchRecord, Record, SampleHeaderRecord, SplitRecord};
use crate::sample::{LoopType, SampleData, SampleFlags};
use crate::slot::Slot;
use crate::{DRUM_TABLE_LEN, MAGIC, PATCH_MAP_OFFSET};

// ---------------------------------------------------------------------------
// Arena: bounds-checked access to the raw bytes
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, Debug)]
struct Arena<'a> {
    data: &'a [u8],
}

impl<'a> Arena<'a> {
    fn len(self) -> usize {
        self.data.len()
    }

    fn slice(self, offset: usize, size: usize, record: RecordKind) -> Result<&'a [u8], BoundsError> {
        match offset.checked_add(size) {
            Some(end) if end <= self.data.len() => Ok(&self.data[offset..end]),
            _ => Err(BoundsError::out_of_range(record, offset, size, self.data.len())),
        }
    }

    fn record<T: Record>(self, offset: usize) -> Result<T, BoundsError> {
        let bytes = self.slice(offset, T::SIZE, T::KIND)?;
        <T as BinRead>::read_options(&mut Cursor::new(bytes), Endian::Little, ())
            .map_err(|_| BoundsError::out_of_range(T::KIND, offset, T::SIZE, self.len()))
    }
}

// ---------------------------------------------------------------------------
// Bank
// ---------------------------------------------------------------------------

/// A validated bank: magic checked, declared size checked, patch map in range.
#[derive(Clone, Copy, Debug)]
pub struct Bank<'a> {
    arena: Arena<'a>,
    header: HeaderRecord,
    patch_map: &'a [u8],
}

impl<'a> Bank<'a> {
    /// Validate the header and patch map of `data`.
    pub fn open(data: &'a [u8]) -> Result<Self, FormatError> {
        if data.get(..MAGIC.len()) != Some(&MAGIC[..]) {
            return Err(FormatError::BadMagic);
        }

        let arena = Arena { data };
        let header: HeaderRecord = arena.record(0)?;
        let declared = header.declared_size();
        if declared as usize > data.len() {
            return Err(FormatError::Truncated {
                declared,
                actual: data.len(),
            });
        }

        let patch_map = arena.slice(PATCH_MAP_OFFSET, Slot::COUNT * 4, RecordKind::PatchMap)?;

        Ok(Self {
            arena,
            header,
            patch_map,
        })
    }

    pub fn header(&self) -> &HeaderRecord {
        &self.header
    }

    /// Length of the underlying buffer.
    pub fn byte_len(&self) -> usize {
        self.arena.len()
    }

    /// Raw bytes of any range in the bank.
    pub fn raw(&self, offset: usize, len: usize, record: RecordKind) -> Result<&'a [u8], BoundsError> {
        self.arena.slice(offset, len, record)
    }

    /// Patch map entry for `slot`. 0 means the slot is unused.
    pub fn patch_offset(&self, slot: Slot) -> u32 {
        let at = slot.index() * 4;
        let b = &self.patch_map[at..at + 4];
        u32::from_le_bytes([b[0], b[1], b[2], b[3]])
    }

    /// Resolve what a patch map slot holds.
    pub fn slot_entry(&self, slot: Slot) -> Result<SlotEntry<'a>, BoundsError> {
        let offset = self.patch_offset(slot) as usize;
        if offset == 0 {
            return Ok(SlotEntry::Empty);
        }

        let record: PatchRecord = self.arena.record(offset)?;
        if record.volume == 0 {
            return Ok(SlotEntry::Dummy { offset, record });
        }

        let body = offset + PatchRecord::SIZE;
        let layout = if record.drum_kit != 0 {
            let map = self.arena.slice(body, DRUM_TABLE_LEN, RecordKind::DrumTable)?;
            PatchLayout::DrumKit(DrumTable { offset: body, map })
        } else {
            PatchLayout::Melodic
        };

        Ok(SlotEntry::Active(Patch {
            arena: self.arena,
            slot,
            offset,
            record,
            layout,
        }))
    }

    /// The playable patch in `slot`, or `None` for empty and dummy slots.
    pub fn patch(&self, slot: Slot) -> Result<Option<Patch<'a>>, BoundsError> {
        Ok(match self.slot_entry(slot)? {
            SlotEntry::Active(patch) => Some(patch),
            SlotEntry::Empty | SlotEntry::Dummy { .. } => None,
        })
    }

    /// Every playable patch in slot order. Patches that do not resolve are
    /// logged and skipped.
    pub fn active_patches(&self) -> impl Iterator<Item = Patch<'a>> + 'a {
        let bank = *self;
        Slot::all().filter_map(move |slot| match bank.patch(slot) {
            Ok(patch) => patch,
            Err(err) => {
                warn!(%slot, %err, "skipping patch");
                None
            }
        })
    }
}

/// What a patch map slot resolves to.
#[derive(Clone, Copy, Debug)]
pub enum SlotEntry<'a> {
    /// Patch map offset is 0.
    Empty,
    /// Patch record with volume 0. Its splits are never visited.
    Dummy { offset: usize, record: PatchRecord },
    Active(Patch<'a>),
}

// ---------------------------------------------------------------------------
// Patch
// ---------------------------------------------------------------------------

/// Whether a patch carries a drum table ahead of its splits.
#[derive(Clone, Copy, Debug)]
pub enum PatchLayout<'a> {
    Melodic,
    DrumKit(DrumTable<'a>),
}

/// A non-dummy patch.
#[derive(Clone, Copy, Debug)]
pub struct Patch<'a> {
    arena: Arena<'a>,
    slot: Slot,
    offset: usize,
    record: PatchRecord,
    layout: PatchLayout<'a>,
}

impl<'a> Patch<'a> {
    pub fn slot(&self) -> Slot {
        self.slot
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn record(&self) -> &PatchRecord {
        &self.record
    }

    pub fn volume(&self) -> u16 {
        self.record.volume
    }

    pub fn tuning(&self) -> i16 {
        self.record.tuning
    }

    pub fn rand_pitch(&self) -> i16 {
        self.record.rand_pitch
    }

    pub fn split_count(&self) -> u16 {
        self.record.split_count
    }

    pub fn layout(&self) -> PatchLayout<'a> {
        self.layout
    }

    pub fn drum_table(&self) -> Option<DrumTable<'a>> {
        match self.layout {
            PatchLayout::DrumKit(table) => Some(table),
            PatchLayout::Melodic => None,
        }
    }

    /// Offset of the first split record.
    pub fn splits_offset(&self) -> usize {
        let drum = match self.layout {
            PatchLayout::DrumKit(_) => DRUM_TABLE_LEN,
            PatchLayout::Melodic => 0,
        };
        self.offset + PatchRecord::SIZE + drum
    }

    /// Splits in record order. Each one is bounds-checked on its own.
    pub fn splits(&self) -> Splits<'a> {
        Splits {
            arena: self.arena,
            base: self.splits_offset(),
            next: 0,
            count: self.record.split_count,
        }
    }
}

/// 128-entry MIDI note to drum map index table.
#[derive(Clone, Copy, Debug)]
pub struct DrumTable<'a> {
    offset: usize,
    map: &'a [u8],
}

impl<'a> DrumTable<'a> {
    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn entries(&self) -> &'a [u8] {
        self.map
    }

    /// Drum map index for a MIDI note (0..128).
    pub fn get(&self, note: u8) -> Option<u8> {
        self.map.get(note as usize).copied()
    }
}

/// Iterator over a patch's split records.
#[derive(Clone, Debug)]
pub struct Splits<'a> {
    arena: Arena<'a>,
    base: usize,
    next: u16,
    count: u16,
}

impl<'a> Iterator for Splits<'a> {
    type Item = Result<Split<'a>, BoundsError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.count {
            return None;
        }
        let index = self.next;
        self.next += 1;

        let offset = self.base + index as usize * SplitRecord::SIZE;
        let arena = self.arena;
        Some(arena.record(offset).map(|record| Split {
            arena,
            index,
            offset,
            record,
        }))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = (self.count - self.next) as usize;
        (left, Some(left))
    }
}

impl ExactSizeIterator for Splits<'_> {}

// ---------------------------------------------------------------------------
// Split
// ---------------------------------------------------------------------------

/// A key range inside a patch, pointing at one sample header.
#[derive(Clone, Copy, Debug)]
pub struct Split<'a> {
    arena: Arena<'a>,
    index: u16,
    offset: usize,
    record: SplitRecord,
}

impl<'a> Split<'a> {
    /// Position within the patch.
    pub fn index(&self) -> u16 {
        self.index
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn record(&self) -> &SplitRecord {
        &self.record
    }

    pub fn key_range(&self) -> RangeInclusive<u8> {
        self.record.low_key..=self.record.high_key
    }

    pub fn drum_index(&self) -> u8 {
        self.record.drum_index
    }

    /// Native pan, -128 (left) to 127 (right).
    pub fn pan(&self) -> i8 {
        self.record.pan
    }

    /// 8.8 fixed point, added to the sample's own tuning.
    pub fn tuning(&self) -> i16 {
        self.record.tuning
    }

    pub fn sample_header_offset(&self) -> u32 {
        self.record.sample_header
    }

    /// Resolve and validate the referenced sample header.
    pub fn sample_header(&self) -> Result<SampleHeader<'a>, BoundsError> {
        SampleHeader::resolve(self.arena, self.record.sample_header as usize)
    }
}

// ---------------------------------------------------------------------------
// SampleHeader
// ---------------------------------------------------------------------------

/// Amplitude envelope, all fields in bank ticks.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Envelope {
    pub attack: u16,
    pub decay: u16,
    pub sustain: u16,
    pub release: u16,
}

/// Loop bounds in frames from the start of the sample.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoopFrames {
    pub start: u32,
    pub end: u32,
}

/// A sample header whose data range and loop point have been validated.
#[derive(Clone, Copy, Debug)]
pub struct SampleHeader<'a> {
    offset: usize,
    record: SampleHeaderRecord,
    codes: &'a [u8],
}

impl<'a> SampleHeader<'a> {
    fn resolve(arena: Arena<'a>, offset: usize) -> Result<Self, BoundsError> {
        let record: SampleHeaderRecord = arena.record(offset)?;
        let (start, end) = (record.start, record.end);
        if start > end {
            return Err(BoundsError::InvertedRange { start, end });
        }
        let codes = arena.slice(
            start as usize,
            (end - start) as usize,
            RecordKind::SampleData,
        )?;
        let loop_point = record.loop_point;
        if loop_point != 0 && !(start..=end).contains(&loop_point) {
            return Err(BoundsError::LoopOutsideSample {
                start,
                loop_point,
                end,
            });
        }

        Ok(Self {
            offset,
            record,
            codes,
        })
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn record(&self) -> &SampleHeaderRecord {
        &self.record
    }

    pub fn start(&self) -> u32 {
        self.record.start
    }

    pub fn end(&self) -> u32 {
        self.record.end
    }

    /// Loop point as a bank offset, `None` when the sample does not loop.
    pub fn loop_point(&self) -> Option<u32> {
        match self.record.loop_point {
            0 => None,
            point => Some(point),
        }
    }

    /// `(start, end)`: the key used for sample naming and de-duplication.
    pub fn identity(&self) -> (u32, u32) {
        (self.record.start, self.record.end)
    }

    pub fn volume(&self) -> u16 {
        self.record.volume
    }

    pub fn tuning(&self) -> i16 {
        self.record.tuning
    }

    pub fn envelope(&self) -> Envelope {
        Envelope {
            attack: self.record.attack,
            decay: self.record.decay,
            sustain: self.record.sustain,
            release: self.record.release,
        }
    }

    pub fn flags(&self) -> SampleFlags {
        SampleFlags(self.record.flags)
    }

    pub fn channels(&self) -> u16 {
        if self.flags().is_stereo() { 2 } else { 1 }
    }

    /// Whole frames in the data range.
    pub fn frames(&self) -> u32 {
        (self.record.end - self.record.start) / self.channels() as u32
    }

    pub fn loop_type(&self) -> LoopType {
        match self.loop_point() {
            Some(_) => LoopType::Forward,
            None => LoopType::None,
        }
    }

    pub fn loop_frames(&self) -> Option<LoopFrames> {
        let channels = self.channels() as u32;
        self.loop_point().map(|point| LoopFrames {
            start: (point - self.record.start) / channels,
            end: (self.record.end - self.record.start) / channels,
        })
    }

    /// Raw sample codes, `start..end`.
    pub fn codes(&self) -> &'a [u8] {
        self.codes
    }

    /// Expand the codes to 16-bit PCM.
    pub fn decode(&self) -> SampleData {
        decode_block(self.codes, self.flags().is_stereo())
    }
}
