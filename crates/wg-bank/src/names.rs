//! Human-readable names for patches and samples.
//!
//! Banks carry no names. Patches are labelled by slot and samples by their
//! `(start, end)` data range; anything not in the table gets a generated name.

use std::collections::HashMap;

use crate::bank::SampleHeader;
use crate::slot::Slot;

/// General MIDI level 1 program names, bank 0.
#[rustfmt::skip]
pub const GM_PROGRAM_NAMES: [&str; 128] = [
    "Acoustic Grand Piano", "Bright Acoustic Piano", "Electric Grand Piano", "Honky-tonk Piano",
    "Electric Piano 1", "Electric Piano 2", "Harpsichord", "Clavi",
    "Celesta", "Glockenspiel", "Music Box", "Vibraphone",
    "Marimba", "Xylophone", "Tubular Bells", "Dulcimer",
    "Drawbar Organ", "Percussive Organ", "Rock Organ", "Church Organ",
    "Reed Organ", "Accordion", "Harmonica", "Tango Accordion",
    "Acoustic Guitar (nylon)", "Acoustic Guitar (steel)", "Electric Guitar (jazz)", "Electric Guitar (clean)",
    "Electric Guitar (muted)", "Overdriven Guitar", "Distortion Guitar", "Guitar Harmonics",
    "Acoustic Bass", "Electric Bass (finger)", "Electric Bass (pick)", "Fretless Bass",
    "Slap Bass 1", "Slap Bass 2", "Synth Bass 1", "Synth Bass 2",
    "Violin", "Viola", "Cello", "Contrabass",
    "Tremolo Strings", "Pizzicato Strings", "Orchestral Harp", "Timpani",
    "String Ensemble 1", "String Ensemble 2", "SynthStrings 1", "SynthStrings 2",
    "Choir Aahs", "Voice Oohs", "Synth Voice", "Orchestra Hit",
    "Trumpet", "Trombone", "Tuba", "Muted Trumpet",
    "French Horn", "Brass Section", "SynthBrass 1", "SynthBrass 2",
    "Soprano Sax", "Alto Sax", "Tenor Sax", "Baritone Sax",
    "Oboe", "English Horn", "Bassoon", "Clarinet",
    "Piccolo", "Flute", "Recorder", "Pan Flute",
    "Blown Bottle", "Shakuhachi", "Whistle", "Ocarina",
    "Lead 1 (square)", "Lead 2 (sawtooth)", "Lead 3 (calliope)", "Lead 4 (chiff)",
    "Lead 5 (charang)", "Lead 6 (voice)", "Lead 7 (fifths)", "Lead 8 (bass + lead)",
    "Pad 1 (new age)", "Pad 2 (warm)", "Pad 3 (polysynth)", "Pad 4 (choir)",
    "Pad 5 (bowed)", "Pad 6 (metallic)", "Pad 7 (halo)", "Pad 8 (sweep)",
    "FX 1 (rain)", "FX 2 (soundtrack)", "FX 3 (crystal)", "FX 4 (atmosphere)",
    "FX 5 (brightness)", "FX 6 (goblins)", "FX 7 (echoes)", "FX 8 (sci-fi)",
    "Sitar", "Banjo", "Shamisen", "Koto",
    "Kalimba", "Bag pipe", "Fiddle", "Shanai",
    "Tinkle Bell", "Agogo", "Steel Drums", "Woodblock",
    "Taiko Drum", "Melodic Tom", "Synth Drum", "Reverse Cymbal",
    "Guitar Fret Noise", "Breath Noise", "Seashore", "Bird Tweet",
    "Telephone Ring", "Helicopter", "Applause", "Gunshot",
];

/// GS drum kit names by program, bank 128.
const GS_DRUM_KITS: [(u8, &str); 10] = [
    (0, "Standard Kit"),
    (8, "Room Kit"),
    (16, "Power Kit"),
    (24, "Electronic Kit"),
    (25, "TR-808 Kit"),
    (32, "Jazz Kit"),
    (40, "Brush Kit"),
    (48, "Orchestra Kit"),
    (56, "SFX Kit"),
    (127, "CM-64 Kit"),
];

/// Default label for a slot with no table entry.
pub fn default_patch_label(slot: Slot) -> String {
    if slot.is_drum() {
        GS_DRUM_KITS
            .iter()
            .find(|(program, _)| *program == slot.program())
            .map(|(_, name)| (*name).to_string())
            .unwrap_or_else(|| format!("Drumkit {:03}", slot.program()))
    } else {
        GM_PROGRAM_NAMES[slot.program() as usize].to_string()
    }
}

/// Name generated from a sample's data range.
pub fn synthesized_sample_name(start: u32, end: u32) -> String {
    format!("{start:010}-{end:010}-{start:08X}-{end:08X}")
}

/// Make a label safe to use as a file name component.
pub fn sanitize_file_stem(label: &str) -> String {
    let cleaned: String = label
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    let trimmed = cleaned.trim_matches(|c: char| c == '.' || c.is_whitespace());
    if trimmed.is_empty() {
        "_".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Patch labels and sample names for one bank.
#[derive(Clone, Debug, Default)]
pub struct NameTable {
    patches: HashMap<Slot, String>,
    samples: HashMap<(u32, u32), String>,
}

impl NameTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_patch(&mut self, slot: Slot, label: impl Into<String>) {
        self.patches.insert(slot, label.into());
    }

    pub fn insert_sample(&mut self, start: u32, end: u32, name: impl Into<String>) {
        self.samples.insert((start, end), name.into());
    }

    pub fn patch_count(&self) -> usize {
        self.patches.len()
    }

    pub fn sample_count(&self) -> usize {
        self.samples.len()
    }

    /// Table entry for `slot`, falling back to the General MIDI / GS name.
    pub fn patch_label(&self, slot: Slot) -> String {
        self.patches
            .get(&slot)
            .cloned()
            .unwrap_or_else(|| default_patch_label(slot))
    }

    /// Table entry for the sample's data range, or a name built from it.
    pub fn sample_name(&self, sample: &SampleHeader<'_>) -> String {
        let (start, end) = sample.identity();
        self.sample_name_for(start, end)
    }

    pub fn sample_name_for(&self, start: u32, end: u32) -> String {
        self.samples
            .get(&(start, end))
            .cloned()
            .unwrap_or_else(|| synthesized_sample_name(start, end))
    }
}
