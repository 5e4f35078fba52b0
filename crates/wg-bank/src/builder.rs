//! Synthetic bank construction for tests.
//!
//! Lays records out the same way real banks do: header, waveform tables,
//! patch map, filler map, patches with their splits, sample headers, an
//! 8-byte gap, then sample data.

use crate::bank::Envelope;
use crate::slot::Slot;
use crate::{DRUM_TABLE_LEN, HEADER_AREA_LEN, MAGIC, PATCH_AREA_OFFSET, PATCH_MAP_OFFSET};

/// Handle returned by [`BankBuilder::add_sample`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SampleId(usize);

/// What a split points at.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SampleRef {
    /// A sample added to the builder.
    Sample(SampleId),
    /// A literal offset, valid or not.
    Raw(u32),
}

impl Default for SampleRef {
    fn default() -> Self {
        SampleRef::Raw(0)
    }
}

impl From<SampleId> for SampleRef {
    fn from(id: SampleId) -> Self {
        SampleRef::Sample(id)
    }
}

impl From<u32> for SampleRef {
    fn from(offset: u32) -> Self {
        SampleRef::Raw(offset)
    }
}

#[derive(Clone, Debug)]
pub struct SampleSpec {
    pub codes: Vec<u8>,
    /// Loop point as an index into `codes`.
    pub loop_start: Option<u32>,
    pub volume: u16,
    pub tuning: i16,
    pub envelope: Envelope,
    pub flags: u8,
    pub reserved: [u8; 3],
}

impl Default for SampleSpec {
    fn default() -> Self {
        Self {
            codes: vec![0; 4],
            loop_start: None,
            volume: 256,
            tuning: 0,
            envelope: Envelope::default(),
            flags: 0,
            reserved: [0; 3],
        }
    }
}

#[derive(Clone, Debug)]
pub struct SplitSpec {
    pub low_key: u8,
    pub high_key: u8,
    pub drum_index: u8,
    pub pan: i8,
    pub reserved: [u8; 2],
    pub tuning: i16,
    pub sample: SampleRef,
}

impl Default for SplitSpec {
    fn default() -> Self {
        Self {
            low_key: 0,
            high_key: 127,
            drum_index: 0,
            pan: 0,
            reserved: [0; 2],
            tuning: 0,
            sample: SampleRef::default(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct PatchSpec {
    pub volume: u16,
    pub tuning: i16,
    pub rand_pitch: i16,
    pub drum_table: Option<[u8; DRUM_TABLE_LEN]>,
    pub reserved: [u8; 7],
    pub splits: Vec<SplitSpec>,
}

impl Default for PatchSpec {
    fn default() -> Self {
        Self {
            volume: 256,
            tuning: 0,
            rand_pitch: 0,
            drum_table: None,
            reserved: [0; 7],
            splits: Vec::new(),
        }
    }
}

impl PatchSpec {
    fn encoded_len(&self) -> usize {
        let drum = if self.drum_table.is_some() { DRUM_TABLE_LEN } else { 0 };
        16 + drum + self.splits.len() * 12
    }
}

#[derive(Clone, Debug)]
enum SlotContent {
    Patch(PatchSpec),
    Raw(u32),
}

/// Builds a bank byte image.
#[derive(Clone, Debug)]
pub struct BankBuilder {
    version: u16,
    flag: u8,
    slots: Vec<Option<SlotContent>>,
    samples: Vec<SampleSpec>,
}

impl Default for BankBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl BankBuilder {
    pub fn new() -> Self {
        Self {
            version: 0x0100,
            flag: 0,
            slots: vec![None; Slot::COUNT],
            samples: Vec::new(),
        }
    }

    pub fn version(&mut self, version: u16) -> &mut Self {
        self.version = version;
        self
    }

    pub fn flag(&mut self, flag: u8) -> &mut Self {
        self.flag = flag;
        self
    }

    pub fn add_sample(&mut self, sample: SampleSpec) -> SampleId {
        self.samples.push(sample);
        SampleId(self.samples.len() - 1)
    }

    pub fn set_patch(&mut self, slot: Slot, patch: PatchSpec) -> &mut Self {
        self.slots[slot.index()] = Some(SlotContent::Patch(patch));
        self
    }

    /// Point a patch map entry at an arbitrary offset.
    pub fn set_raw_patch_offset(&mut self, slot: Slot, offset: u32) -> &mut Self {
        self.slots[slot.index()] = Some(SlotContent::Raw(offset));
        self
    }

    pub fn build(&self) -> Vec<u8> {
        // Pass 1: assign offsets.
        let mut cursor = PATCH_AREA_OFFSET;
        let mut patch_offsets = vec![0u32; Slot::COUNT];
        for (i, content) in self.slots.iter().enumerate() {
            match content {
                Some(SlotContent::Patch(patch)) => {
                    patch_offsets[i] = cursor as u32;
                    cursor += patch.encoded_len();
                }
                Some(SlotContent::Raw(offset)) => patch_offsets[i] = *offset,
                None => {}
            }
        }

        let headers_offset = cursor;
        let data_offset = headers_offset + self.samples.len() * 28 + 8;
        let mut sample_starts = Vec::with_capacity(self.samples.len());
        let mut data_cursor = data_offset;
        for sample in &self.samples {
            sample_starts.push(data_cursor as u32);
            data_cursor += sample.codes.len();
        }
        let total = data_cursor;

        // Pass 2: emit.
        let mut out = Vec::with_capacity(total);
        out.extend_from_slice(MAGIC);
        put_u32(&mut out, (total as u32 & 0x00FF_FFFF) | (self.flag as u32) << 24);
        put_u16(&mut out, self.version);
        out.extend_from_slice(&[0, 0]);
        out.resize(HEADER_AREA_LEN, 0);

        debug_assert_eq!(out.len(), PATCH_MAP_OFFSET);
        for offset in &patch_offsets {
            put_u32(&mut out, *offset);
        }
        out.resize(PATCH_AREA_OFFSET, 0);

        let sample_header_offset = |r: SampleRef| match r {
            SampleRef::Sample(SampleId(i)) => (headers_offset + i * 28) as u32,
            SampleRef::Raw(offset) => offset,
        };

        for content in &self.slots {
            let Some(SlotContent::Patch(patch)) = content else {
                continue;
            };
            put_u16(&mut out, patch.volume);
            put_u16(&mut out, patch.tuning as u16);
            put_u16(&mut out, patch.rand_pitch as u16);
            out.push(patch.drum_table.is_some() as u8);
            out.extend_from_slice(&patch.reserved);
            put_u16(&mut out, patch.splits.len() as u16);
            if let Some(table) = &patch.drum_table {
                out.extend_from_slice(table);
            }
            for split in &patch.splits {
                out.push(split.low_key);
                out.push(split.high_key);
                out.push(split.drum_index);
                out.push(split.pan as u8);
                out.extend_from_slice(&split.reserved);
                put_u16(&mut out, split.tuning as u16);
                put_u32(&mut out, sample_header_offset(split.sample));
            }
        }

        debug_assert_eq!(out.len(), headers_offset);
        for (sample, &start) in self.samples.iter().zip(&sample_starts) {
            let end = start + sample.codes.len() as u32;
            put_u32(&mut out, start);
            put_u32(&mut out, sample.loop_start.map_or(0, |k| start + k));
            put_u32(&mut out, end);
            put_u16(&mut out, sample.volume);
            put_u16(&mut out, sample.tuning as u16);
            put_u16(&mut out, sample.envelope.attack);
            put_u16(&mut out, sample.envelope.decay);
            put_u16(&mut out, sample.envelope.sustain);
            put_u16(&mut out, sample.envelope.release);
            out.push(sample.flags);
            out.extend_from_slice(&sample.reserved);
        }
        out.extend_from_slice(&[0; 8]);

        for sample in &self.samples {
            out.extend_from_slice(&sample.codes);
        }
        debug_assert_eq!(out.len(), total);
        out
    }
}

fn put_u16(out: &mut Vec<u8>, v: u16) {
    out.extend_from_slice(&v.to_le_bytes());
}

fn put_u32(out: &mut Vec<u8>, v: u32) {
    out.extend_from_slice(&v.to_le_bytes());
}
