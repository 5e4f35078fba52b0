//! Decoded sample data and sample header flag bits.

/// Decoded 16-bit PCM, one vector per channel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SampleData {
    /// 16-bit mono samples
    Mono16(Vec<i16>),
    /// 16-bit stereo samples (left, right)
    Stereo16(Vec<i16>, Vec<i16>),
}

impl SampleData {
    /// Get the number of sample frames.
    pub fn len(&self) -> usize {
        match self {
            SampleData::Mono16(v) => v.len(),
            SampleData::Stereo16(l, _) => l.len(),
        }
    }

    /// Returns true if empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of channels in the sample data.
    pub fn num_channels(&self) -> u16 {
        match self {
            SampleData::Mono16(_) => 1,
            SampleData::Stereo16(_, _) => 2,
        }
    }

    /// Size of the decoded data in bytes.
    pub fn byte_len(&self) -> usize {
        self.len() * self.num_channels() as usize * 2
    }

    /// Samples in file order: frame by frame, left before right.
    pub fn interleaved(&self) -> Vec<i16> {
        match self {
            SampleData::Mono16(v) => v.clone(),
            SampleData::Stereo16(l, r) => {
                let mut out = Vec::with_capacity(l.len() * 2);
                for (&left, &right) in l.iter().zip(r) {
                    out.push(left);
                    out.push(right);
                }
                out
            }
        }
    }
}

/// Sample loop type.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LoopType {
    /// No loop
    #[default]
    None,
    /// Forward loop
    Forward,
}

/// Sample header flag byte.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct SampleFlags(pub u8);

impl SampleFlags {
    /// Plays at its root pitch regardless of key.
    pub const FIXED_NOTE: u8 = 1 << 2;
    /// Codes are interleaved left/right pairs.
    pub const STEREO: u8 = 1 << 5;
    /// Non-musical tuning, reduced key tracking.
    pub const ATONAL: u8 = 1 << 6;

    /// Names for each bit, LSB first. Unknown bits keep a positional name.
    pub const BIT_NAMES: [&'static str; 8] = [
        "BIT1", "BIT2", "FIXED_NOTE", "BIT4", "BIT5", "STEREO", "ATONAL", "BIT8",
    ];

    pub fn bits(self) -> u8 {
        self.0
    }

    pub fn contains(self, bit: u8) -> bool {
        self.0 & bit != 0
    }

    pub fn is_stereo(self) -> bool {
        self.contains(Self::STEREO)
    }

    pub fn is_fixed_note(self) -> bool {
        self.contains(Self::FIXED_NOTE)
    }

    pub fn is_atonal(self) -> bool {
        self.contains(Self::ATONAL)
    }

    /// Names of the set bits, LSB first.
    pub fn names(self) -> impl Iterator<Item = &'static str> {
        (0..8)
            .filter(move |bit| self.0 & (1 << bit) != 0)
            .map(|bit| Self::BIT_NAMES[bit])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interleave_stereo() {
        let data = SampleData::Stereo16(vec![1, 3], vec![2, 4]);
        assert_eq!(data.interleaved(), vec![1, 2, 3, 4]);
        assert_eq!(data.byte_len(), 8);
    }

    #[test]
    fn mono_byte_len() {
        let data = SampleData::Mono16(vec![0; 5]);
        assert_eq!(data.byte_len(), 10);
        assert_eq!(data.num_channels(), 1);
        assert!(!data.is_empty());
    }

    #[test]
    fn flag_names_in_bit_order() {
        let flags = SampleFlags(SampleFlags::STEREO | SampleFlags::FIXED_NOTE | 0x80);
        let names: Vec<_> = flags.names().collect();
        assert_eq!(names, vec!["FIXED_NOTE", "STEREO", "BIT8"]);
        assert!(flags.is_stereo());
        assert!(flags.is_fixed_note());
        assert!(!flags.is_atonal());
    }
}
