//! SFZ instrument text for bank patches.
//!
//! The unit conversions mirror how WinGroove itself plays a split; they are
//! approximations of the synth's behaviour, kept bit-exact so that exported
//! instruments stay stable between releases.

use std::fmt;

use wg_bank::{Envelope, LoopFrames, SampleFlags, SampleHeader, Split};

/// Envelope ticks per second.
pub const ENVELOPE_TICKS_PER_SECOND: f32 = 64.0;

/// Sustain level of 100%.
pub const SUSTAIN_FULL_SCALE: f32 = 256.0;

/// Directory of the audio files, relative to a definition file.
pub const SAMPLE_DIR_FROM_DEFINITION: &str = "../samples";

// ---------------------------------------------------------------------------
// Unit conversions
// ---------------------------------------------------------------------------

/// `pitch_keytrack` in cents per key.
pub fn keytrack(flags: SampleFlags) -> u8 {
    if flags.is_fixed_note() {
        0
    } else if flags.is_atonal() {
        50
    } else {
        100
    }
}

/// Native pan (-128..=127) to SFZ pan (-100..=100).
pub fn pan_percent(pan: i8) -> f32 {
    let divisor = if pan >= 0 { 127.0 } else { 128.0 };
    (pan as f32 * 100.0) / divisor
}

/// Split and sample tuning added in 16 bits, as the synth does.
pub fn combined_tuning(sample: i16, split: i16) -> i16 {
    sample.wrapping_add(split)
}

/// Whole-semitone part of an 8.8 tuning, biased by an octave. The division
/// truncates toward zero.
pub fn transpose(tuning: i16) -> i32 {
    12 + (tuning as i32 - 1) / 256
}

/// Sub-semitone part of an 8.8 tuning in cents, carrying the tuning's sign.
pub fn tune_cents(tuning: i16) -> i32 {
    let sign = if tuning >= 0 { 1 } else { -1 };
    ((tuning as i32 & 0xFF) * sign) * 100 / 256
}

pub fn envelope_seconds(ticks: u16) -> f32 {
    ticks as f32 / ENVELOPE_TICKS_PER_SECOND
}

pub fn sustain_percent(level: u16) -> f32 {
    level as f32 * 100.0 / SUSTAIN_FULL_SCALE
}

// ---------------------------------------------------------------------------
// Regions
// ---------------------------------------------------------------------------

/// One `<region>` block, already converted to SFZ units.
#[derive(Clone, Debug, PartialEq)]
pub struct Region {
    pub sample_name: String,
    pub low_key: u8,
    pub high_key: u8,
    pub keytrack: u8,
    pub transpose: i32,
    pub tune: i32,
    pub pan: f32,
    pub loop_frames: Option<LoopFrames>,
    pub envelope: Envelope,
}

impl Region {
    /// Convert a split and its resolved sample header.
    pub fn new(split: &Split<'_>, sample: &SampleHeader<'_>, sample_name: impl Into<String>) -> Self {
        let tuning = combined_tuning(sample.tuning(), split.tuning());
        let keys = split.key_range();
        Self {
            sample_name: sample_name.into(),
            low_key: *keys.start(),
            high_key: *keys.end(),
            keytrack: keytrack(sample.flags()),
            transpose: transpose(tuning),
            tune: tune_cents(tuning),
            pan: pan_percent(split.pan()),
            loop_frames: sample.loop_frames(),
            envelope: sample.envelope(),
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "<region>")?;
        writeln!(f, "sample={SAMPLE_DIR_FROM_DEFINITION}/{}.wav", self.sample_name)?;
        writeln!(f, "lokey={} hikey={}", self.low_key, self.high_key)?;
        writeln!(f, "pitch_keytrack={}", self.keytrack)?;
        writeln!(f, "transpose={}", self.transpose)?;
        writeln!(f, "tune={}", self.tune)?;
        writeln!(f, "pan={:.6}", self.pan)?;
        match self.loop_frames {
            Some(frames) => {
                writeln!(f, "loop_mode=loop_continuous")?;
                writeln!(f, "loop_start={} loop_end={}", frames.start, frames.end)?;
            }
            None => writeln!(f, "loop_mode=no_loop")?,
        }

        let env = self.envelope;
        if env.attack != 0 {
            writeln!(f, "ampeg_attack={:.6}", envelope_seconds(env.attack))?;
        }
        if env.decay != 0 {
            writeln!(f, "ampeg_decay={:.6}", envelope_seconds(env.decay))?;
        }
        if env.sustain != 0 {
            writeln!(f, "ampeg_sustain={:.6}", sustain_percent(env.sustain))?;
        }
        if env.release != 0 {
            writeln!(f, "ampeg_release={:.6}", envelope_seconds(env.release))?;
        }
        writeln!(f)
    }
}

/// File preamble: tool comment and the `<group>` block.
pub fn preamble() -> String {
    format!(
        "// SFZ exported by wgknife {}\n\n<group>\n//-----\n\n\n",
        env!("CARGO_PKG_VERSION")
    )
}

/// Complete definition file text.
pub fn render_definition(regions: &[Region]) -> String {
    let mut text = preamble();
    for region in regions {
        text.push_str(&region.to_string());
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn pan_boundaries() {
        assert_eq!(pan_percent(127), 100.0);
        assert_eq!(pan_percent(-128), -100.0);
        assert_eq!(pan_percent(0), 0.0);
        assert_eq!(pan_percent(64), 6400.0 / 127.0);
    }

    #[test]
    fn one_semitone_up() {
        assert_eq!(transpose(256), 12);
        assert_eq!(tune_cents(256), 0);
    }

    #[test]
    fn zero_tuning_is_semitone_zero() {
        // (0 - 1) / 256 truncates to 0.
        assert_eq!(transpose(0), 12);
        assert_eq!(tune_cents(0), 0);
    }

    #[test]
    fn negative_whole_semitones() {
        assert_eq!(transpose(-256), 11);
        assert_eq!(tune_cents(-256), 0);
        assert_eq!(transpose(-512), 10);
        assert_eq!(transpose(-255), 11);
        assert_eq!(transpose(1), 12);
        assert_eq!(transpose(512), 13);
    }

    #[test]
    fn fractional_tuning() {
        assert_eq!(transpose(128), 12);
        assert_eq!(tune_cents(128), 50);
        assert_eq!(transpose(-1), 12);
        assert_eq!(tune_cents(-1), -99);
        assert_eq!(transpose(-384), 11);
        assert_eq!(tune_cents(-384), -50);
    }

    #[test]
    fn combined_tuning_wraps() {
        assert_eq!(combined_tuning(i16::MAX, 1), i16::MIN);
        assert_eq!(combined_tuning(256, -128), 128);
    }

    #[test]
    fn keytrack_priority() {
        assert_eq!(keytrack(SampleFlags(0)), 100);
        assert_eq!(keytrack(SampleFlags(SampleFlags::ATONAL)), 50);
        assert_eq!(
            keytrack(SampleFlags(SampleFlags::ATONAL | SampleFlags::FIXED_NOTE)),
            0
        );
    }

    #[test]
    fn envelope_units() {
        assert_eq!(envelope_seconds(64), 1.0);
        assert_eq!(envelope_seconds(32), 0.5);
        assert_eq!(sustain_percent(128), 50.0);
    }

    fn region() -> Region {
        Region {
            sample_name: "Piano C4".into(),
            low_key: 0,
            high_key: 127,
            keytrack: 100,
            transpose: 12,
            tune: 0,
            pan: 0.0,
            loop_frames: None,
            envelope: Envelope::default(),
        }
    }

    #[test]
    fn unlooped_region_without_envelope() {
        assert_eq!(
            region().to_string(),
            "<region>\n\
             sample=../samples/Piano C4.wav\n\
             lokey=0 hikey=127\n\
             pitch_keytrack=100\n\
             transpose=12\n\
             tune=0\n\
             pan=0.000000\n\
             loop_mode=no_loop\n\
             \n"
        );
    }

    #[test]
    fn looped_region_with_partial_envelope() {
        let r = Region {
            pan: pan_percent(-128),
            loop_frames: Some(LoopFrames { start: 10, end: 20 }),
            envelope: Envelope {
                attack: 0,
                decay: 16,
                sustain: 64,
                release: 0,
            },
            ..region()
        };
        assert_eq!(
            r.to_string(),
            "<region>\n\
             sample=../samples/Piano C4.wav\n\
             lokey=0 hikey=127\n\
             pitch_keytrack=100\n\
             transpose=12\n\
             tune=0\n\
             pan=-100.000000\n\
             loop_mode=loop_continuous\n\
             loop_start=10 loop_end=20\n\
             ampeg_decay=0.250000\n\
             ampeg_sustain=25.000000\n\
             \n"
        );
    }

    #[test]
    fn definition_starts_with_group() {
        let text = render_definition(&[region()]);
        assert!(text.starts_with("// SFZ exported by wgknife "));
        let body = text.split_once("\n\n").unwrap().1;
        assert!(body.starts_with("<group>\n"));
        assert_eq!(text.matches("<region>").count(), 1);
    }
}
