//! Human-readable tree dump of a whole bank.
//!
//! Every field is printed with its storage type. Reserved bytes are printed
//! raw as hex, unsigned and signed, with a 16-bit reading for pairs that
//! start on an even bank offset. Offsets that do not resolve are reported in
//! place and the dump carries on.

use std::fmt;
use std::io::{self, Write};

use wg_bank::{
    Bank, HeaderRecord, NameTable, Patch, PatchLayout, PatchRecord, SampleFlags, SampleHeader,
    SampleHeaderRecord, Slot, SlotEntry, Split, SplitRecord,
};

/// Spaces per nesting level.
pub const TAB_WIDTH: usize = 4;

/// Drum table entries per printed row.
const DRUM_ROW: usize = 8;

pub fn describe_bank(out: &mut impl Write, bank: &Bank<'_>, names: &NameTable) -> io::Result<()> {
    let mut tree = Tree { out };
    tree.header(bank.header())?;

    for slot in Slot::all() {
        tree.line(0, format_args!("Preset: {slot} {}", names.patch_label(slot)))?;
        tree.line(
            0,
            format_args!("U32 structure offset: {:08X}h", bank.patch_offset(slot)),
        )?;
        match bank.slot_entry(slot) {
            Ok(SlotEntry::Empty) | Ok(SlotEntry::Dummy { .. }) => {
                tree.line(1, format_args!("DUMMY PATCH"))?
            }
            Ok(SlotEntry::Active(patch)) => tree.patch(1, &patch, names)?,
            Err(err) => tree.unresolved(1, &err)?,
        }
        tree.out.write_all(b"\n\n\n\n")?;
    }
    Ok(())
}

struct Tree<'w, W: Write> {
    out: &'w mut W,
}

impl<W: Write> Tree<'_, W> {
    fn indent(&mut self, depth: usize) -> io::Result<()> {
        write!(self.out, "{:1$}", "", depth * TAB_WIDTH)
    }

    fn line(&mut self, depth: usize, args: fmt::Arguments<'_>) -> io::Result<()> {
        self.indent(depth)?;
        self.out.write_fmt(args)?;
        self.out.write_all(b"\n")
    }

    fn unresolved(&mut self, depth: usize, err: &dyn std::error::Error) -> io::Result<()> {
        self.line(depth, format_args!("!! {err}"))
    }

    /// `bytes` lives at bank offset `offset`.
    fn unknown_bytes(&mut self, depth: usize, offset: usize, bytes: &[u8]) -> io::Result<()> {
        for (i, &b) in bytes.iter().enumerate() {
            self.indent(depth)?;
            write!(self.out, "???? {b:02X}h, U8 {b:3}, I8 {:4} ", b as i8)?;
            if (offset + i) % 2 == 0 && bytes.len() - i >= 2 {
                let pair = u16::from_le_bytes([b, bytes[i + 1]]);
                write!(
                    self.out,
                    "-┬-> {pair:04X}h, U16 {pair:5}, I16 {:6}",
                    pair as i16
                )?;
            } else if i != 0 {
                write!(self.out, "-┘")?;
            }
            self.out.write_all(b"\n")?;
        }
        Ok(())
    }

    fn header(&mut self, header: &HeaderRecord) -> io::Result<()> {
        self.line(0, format_args!("Wingroove bank"))?;
        self.line(
            0,
            format_args!("* U24 File size: {:06X}h", header.declared_size()),
        )?;
        self.unknown_bytes(0, HeaderRecord::FLAG_OFFSET, &[header.flag()])?;
        self.line(0, format_args!("* U16 Bank version {:04X}h", header.version))?;
        self.unknown_bytes(0, HeaderRecord::RESERVED_OFFSET, &header.reserved)?;
        self.out.write_all(b"\n")
    }

    fn patch(&mut self, depth: usize, patch: &Patch<'_>, names: &NameTable) -> io::Result<()> {
        let record = patch.record();
        self.line(depth, format_args!("* U16 Volume: {}", record.volume))?;
        self.line(
            depth,
            format_args!("* I16 Relative tuning: {} semitones", semitones(record.tuning)),
        )?;
        self.line(
            depth,
            format_args!(
                "* I16 Pitch randomization: {} semitones",
                semitones(record.rand_pitch)
            ),
        )?;
        self.line(depth, format_args!("* U8  Is drumkit: {}", record.drum_kit))?;
        self.unknown_bytes(
            depth,
            patch.offset() + PatchRecord::RESERVED_OFFSET,
            &record.reserved,
        )?;
        self.line(depth, format_args!("* U16 Split number: {}", record.split_count))?;

        if let PatchLayout::DrumKit(table) = patch.layout() {
            self.indent(depth)?;
            write!(self.out, "Drum map:")?;
            for row in table.entries().chunks(DRUM_ROW) {
                self.out.write_all(b"\n")?;
                self.indent(depth + 1)?;
                for entry in row {
                    write!(self.out, "{entry:3} ")?;
                }
            }
            self.out.write_all(b"\n")?;
        }

        self.line(depth, format_args!("Splits:"))?;
        for (i, split) in patch.splits().enumerate() {
            self.line(depth + 1, format_args!("Split nr: {i}"))?;
            match split {
                Ok(split) => self.split(depth + 1, &split, names)?,
                Err(err) => self.unresolved(depth + 1, &err)?,
            }
            self.out.write_all(b"\n")?;
        }
        Ok(())
    }

    fn split(&mut self, depth: usize, split: &Split<'_>, names: &NameTable) -> io::Result<()> {
        let record = split.record();
        self.line(
            depth,
            format_args!("* 2xU8 Note range: {}-{}", record.low_key, record.high_key),
        )?;
        self.line(depth, format_args!("* U8   Drum map index: {}", record.drum_index))?;
        self.line(depth, format_args!("* I8   Panning: {}", record.pan))?;
        self.unknown_bytes(
            depth,
            split.offset() + SplitRecord::RESERVED_OFFSET,
            &record.reserved,
        )?;
        self.line(
            depth,
            format_args!("* I16  Relative tuning: {} semitones", semitones(record.tuning)),
        )?;
        self.line(
            depth,
            format_args!("* U32  Sample header offset: {:08X}h", record.sample_header),
        )?;

        self.line(depth, format_args!("Sample header:"))?;
        match split.sample_header() {
            Ok(sample) => self.sample_header(depth + 1, &sample, names),
            Err(err) => self.unresolved(depth + 1, &err),
        }
    }

    fn sample_header(
        &mut self,
        depth: usize,
        sample: &SampleHeader<'_>,
        names: &NameTable,
    ) -> io::Result<()> {
        let record = sample.record();
        let channels = sample.channels() as u32;

        self.line(
            depth,
            format_args!("Sample known as \"{}.wav\"", names.sample_name(sample)),
        )?;
        self.line(depth, format_args!("* U32 Sample start: {:08X}h", record.start))?;
        match sample.loop_point() {
            None => self.line(depth, format_args!("* U32 Sample loop:  DISABLED"))?,
            Some(point) => self.line(
                depth,
                format_args!(
                    "* U32 Sample loop:  {point:08X}h (loop len {} samples)",
                    (record.end - point) / channels
                ),
            )?,
        }
        self.line(
            depth,
            format_args!(
                "* U32 Sample end:   {:08X}h (samp len {} samples)",
                record.end,
                sample.frames()
            ),
        )?;
        self.line(depth, format_args!("* U16 Volume: {}", record.volume))?;
        self.line(
            depth,
            format_args!("* I16 Relative tuning: {} semitones", semitones(record.tuning)),
        )?;
        self.line(
            depth,
            format_args!("* U16 Envelope attack  len: {:.6}", ticks(record.attack)),
        )?;
        self.line(
            depth,
            format_args!("* U16 Envelope decay   len: {:.6}", ticks(record.decay)),
        )?;
        self.line(
            depth,
            format_args!("* U16 Envelope sustain volume: {}", record.sustain),
        )?;
        self.line(
            depth,
            format_args!("* U16 Envelope release len: {:.6}", ticks(record.release)),
        )?;
        self.line(depth, format_args!("* U8  Flags:"))?;
        for name in SampleFlags(record.flags).names() {
            self.line(depth + 1, format_args!("{name}"))?;
        }
        self.unknown_bytes(
            depth,
            sample.offset() + SampleHeaderRecord::RESERVED_OFFSET,
            &record.reserved,
        )
    }
}

/// 8.8 tuning as semitones, two decimals.
fn semitones(tuning: i16) -> String {
    format!("{:.2}", tuning as f32 / 256.0)
}

fn ticks(value: u16) -> f32 {
    crate::sfz::envelope_seconds(value)
}
