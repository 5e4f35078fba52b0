//! Bank samples through the WAV writer.

use wg_bank::builder::{BankBuilder, PatchSpec, SampleSpec, SplitSpec};
use wg_bank::{decode, Bank, SampleFlags, SampleHeader, Slot};
use wg_formats::{sample_to_wav, write_audio};

fn u32_at(buf: &[u8], at: usize) -> u32 {
    u32::from_le_bytes(buf[at..at + 4].try_into().unwrap())
}

fn bank_with(sample: SampleSpec) -> Vec<u8> {
    let mut b = BankBuilder::new();
    let id = b.add_sample(sample);
    b.set_patch(
        Slot::new(0),
        PatchSpec {
            splits: vec![SplitSpec {
                sample: id.into(),
                ..SplitSpec::default()
            }],
            ..PatchSpec::default()
        },
    );
    b.build()
}

fn first_sample<'a>(bank: &Bank<'a>) -> SampleHeader<'a> {
    let patch = bank.patch(Slot::new(0)).unwrap().unwrap();
    patch.splits().next().unwrap().unwrap().sample_header().unwrap()
}

#[test]
fn mono_sample_decodes_through_table() {
    let codes = vec![0x00, 0x7F, 0x80, 0xFF];
    let data = bank_with(SampleSpec {
        codes: codes.clone(),
        ..SampleSpec::default()
    });
    let bank = Bank::open(&data).unwrap();
    let wav = sample_to_wav(&first_sample(&bank)).unwrap();

    assert_eq!(u32_at(&wav, 40), 8);
    let pcm: Vec<i16> = wav[44..52]
        .chunks_exact(2)
        .map(|c| i16::from_le_bytes([c[0], c[1]]))
        .collect();
    let expected: Vec<i16> = codes.iter().map(|&c| decode(c)).collect();
    assert_eq!(pcm, expected);
    // No loop: sampler chunk with zero loops.
    assert_eq!(&wav[52..56], b"smpl");
    assert_eq!(u32_at(&wav, 88), 0);
}

#[test]
fn stereo_loop_is_in_frames() {
    let data = bank_with(SampleSpec {
        codes: vec![1; 12],
        loop_start: Some(4),
        flags: SampleFlags::STEREO,
        ..SampleSpec::default()
    });
    let bank = Bank::open(&data).unwrap();
    let wav = sample_to_wav(&first_sample(&bank)).unwrap();

    let smpl = 44 + 12 * 2;
    assert_eq!(&wav[smpl..smpl + 4], b"smpl");
    assert_eq!(u32_at(&wav, smpl + 36), 1);
    assert_eq!(u32_at(&wav, smpl + 44 + 8), 2);
    assert_eq!(u32_at(&wav, smpl + 44 + 12), 6);
}

#[test]
fn write_audio_reports_missing_directory() {
    let data = bank_with(SampleSpec::default());
    let bank = Bank::open(&data).unwrap();
    let dir = tempfile::tempdir().unwrap();

    let ok = dir.path().join("a.wav");
    write_audio(&first_sample(&bank), &ok).unwrap();
    assert!(ok.exists());

    let missing = dir.path().join("nope").join("a.wav");
    assert!(write_audio(&first_sample(&bank), &missing).is_err());
    assert!(!missing.exists());
}
