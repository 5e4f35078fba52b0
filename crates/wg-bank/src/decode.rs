//! 8-bit sample code expansion.
//!
//! Bank audio is stored as one byte per sample. Codes map through a fixed
//! 256-entry curve that looks like u-law with the lower half's sign flipped:
//! codes `0x00..=0x7F` climb from 0 to +32767, codes `0x80..=0xFF` climb from
//! -32768 back towards zero.

use crate::sample::SampleData;

/// Code to 16-bit PCM table. These are measured values; do not regenerate.
#[rustfmt::skip]
pub const PCM_TABLE: [i16; 256] = [
         0,     16,     32,     48,     64,     80,     96,    112,
       128,    144,    160,    176,    192,    208,    224,    240,
       256,    272,    288,    304,    320,    336,    352,    368,
       384,    400,    416,    432,    448,    464,    480,    496,
       512,    544,    576,    608,    640,    672,    704,    736,
       768,    800,    832,    864,    896,    928,    960,    992,
      1026,   1090,   1154,   1218,   1282,   1346,   1410,   1474,
      1539,   1603,   1667,   1731,   1795,   1859,   1923,   1987,
      2056,   2184,   2313,   2441,   2570,   2698,   2827,   2955,
      3084,   3212,   3341,   3469,   3598,   3726,   3855,   3983,
      4129,   4387,   4645,   4903,   5161,   5419,   5677,   5935,
      6193,   6451,   6709,   6967,   7225,   7483,   7741,   7999,
      8327,   8847,   9367,   9887,  10407,  10927,  11447,  11967,
     12487,  13007,  13527,  14047,  14567,  15087,  15607,  16127,
     16927,  17983,  19039,  20095,  21151,  22207,  23263,  24319,
     25375,  26431,  27487,  28543,  29599,  30655,  31711,  32767,
    -32768, -31744, -30720, -29696, -28672, -27648, -26624, -25600,
    -24576, -23552, -22528, -21504, -20480, -19456, -18432, -17408,
    -16384, -15872, -15360, -14848, -14336, -13824, -13312, -12800,
    -12288, -11776, -11264, -10752, -10240,  -9728,  -9216,  -8704,
     -8192,  -7936,  -7680,  -7424,  -7168,  -6912,  -6656,  -6400,
     -6144,  -5888,  -5632,  -5376,  -5120,  -4864,  -4608,  -4352,
     -4096,  -3968,  -3840,  -3712,  -3584,  -3456,  -3328,  -3200,
     -3072,  -2944,  -2816,  -2688,  -2560,  -2432,  -2304,  -2176,
     -2048,  -1984,  -1920,  -1856,  -1792,  -1728,  -1664,  -1600,
     -1536,  -1472,  -1408,  -1344,  -1280,  -1216,  -1152,  -1088,
     -1024,   -992,   -960,   -928,   -896,   -864,   -832,   -800,
      -768,   -736,   -704,   -672,   -640,   -608,   -576,   -544,
      -512,   -496,   -480,   -464,   -448,   -432,   -416,   -400,
      -384,   -368,   -352,   -336,   -320,   -304,   -288,   -272,
      -256,   -240,   -224,   -208,   -192,   -176,   -160,   -144,
      -128,   -112,    -96,    -80,    -64,    -48,    -32,    -16,
];

/// Expand one sample code.
#[inline]
pub fn decode(code: u8) -> i16 {
    PCM_TABLE[code as usize]
}

/// Expand a run of codes into channel-separated PCM.
///
/// Stereo codes alternate left/right. A trailing code that does not complete
/// a frame is dropped.
pub fn decode_block(codes: &[u8], stereo: bool) -> SampleData {
    if stereo {
        let frames = codes.len() / 2;
        let mut left = Vec::with_capacity(frames);
        let mut right = Vec::with_capacity(frames);
        for pair in codes.chunks_exact(2) {
            left.push(decode(pair[0]));
            right.push(decode(pair[1]));
        }
        SampleData::Stereo16(left, right)
    } else {
        SampleData::Mono16(codes.iter().map(|&c| decode(c)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_endpoints() {
        assert_eq!(decode(0x00), 0);
        assert_eq!(decode(0x7F), 32767);
        assert_eq!(decode(0x80), -32768);
        assert_eq!(decode(0xFF), -16);
    }

    #[test]
    fn table_spot_values() {
        assert_eq!(decode(0x30), 1026);
        assert_eq!(decode(0x38), 1539);
        assert_eq!(decode(0x40), 2056);
        assert_eq!(decode(0x50), 4129);
        assert_eq!(decode(0x60), 8327);
        assert_eq!(decode(0x70), 16927);
        assert_eq!(decode(0x90), -16384);
        assert_eq!(decode(0xC8), -1536);
        assert_eq!(decode(0xE0), -512);
    }

    #[test]
    fn upper_half_ascends_lower_half_ascends() {
        for code in 1..128usize {
            assert!(PCM_TABLE[code] > PCM_TABLE[code - 1], "code {code}");
        }
        for code in 129..256usize {
            assert!(PCM_TABLE[code] > PCM_TABLE[code - 1], "code {code}");
        }
    }

    #[test]
    fn decode_is_stable_across_calls() {
        for code in 0..=255u8 {
            assert_eq!(decode(code), decode(code));
            assert_eq!(decode(code), PCM_TABLE[code as usize]);
        }
    }

    #[test]
    fn mono_block_keeps_every_code() {
        let data = decode_block(&[0x00, 0x7F, 0x80], false);
        assert_eq!(data, SampleData::Mono16(vec![0, 32767, -32768]));
        assert_eq!(data.len(), 3);
    }

    #[test]
    fn stereo_block_splits_channels() {
        let data = decode_block(&[0x10, 0x90, 0x20, 0xA0], true);
        assert_eq!(
            data,
            SampleData::Stereo16(vec![256, 512], vec![-16384, -8192])
        );
        assert_eq!(data.len(), 2);
        assert_eq!(data.num_channels(), 2);
    }

    #[test]
    fn stereo_block_drops_partial_frame() {
        let data = decode_block(&[0x01, 0x02, 0x03], true);
        assert_eq!(data.len(), 1);
    }
}
