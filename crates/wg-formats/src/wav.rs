//! WAV encoding for decoded bank samples.
//!
//! Chunk order is RIFF header, `fmt `, `data`, then `smpl`. The sampler chunk
//! comes after the audio data and is always present, with zero or one loop.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use wg_bank::{LoopFrames, SampleData, SampleHeader};

/// Playback rate of every bank sample.
pub const SAMPLE_RATE: u32 = 22050;

/// Bits per output sample.
pub const BITS_PER_SAMPLE: u16 = 16;

/// MIDI unity note written to the sampler chunk. Sample tuning is not folded in.
pub const BASE_NOTE: u32 = 60;

const FMT_CHUNK_LEN: u32 = 16;
const SMPL_HEADER_LEN: u32 = 36;
const SMPL_LOOP_LEN: u32 = 24;

/// Decode `sample` and write it as a WAV file at `destination`.
///
/// The file is encoded in memory first, so a failed create leaves nothing
/// behind.
pub fn write_audio(sample: &SampleHeader<'_>, destination: &Path) -> io::Result<()> {
    fs::write(destination, sample_to_wav(sample)?)
}

/// Encode a bank sample as a complete WAV image.
pub fn sample_to_wav(sample: &SampleHeader<'_>) -> io::Result<Vec<u8>> {
    let data = sample.decode();
    let mut buf = Vec::with_capacity(wav_len(&data, sample.loop_frames()));
    write_wav(&mut buf, &data, sample.loop_frames())?;
    Ok(buf)
}

/// Total file length for `data` with an optional loop.
pub fn wav_len(data: &SampleData, loop_frames: Option<LoopFrames>) -> usize {
    8 + riff_size(data.byte_len() as u32, loop_frames.is_some()) as usize
}

fn riff_size(data_size: u32, looped: bool) -> u32 {
    4 + (8 + FMT_CHUNK_LEN) + (8 + data_size) + 8 + smpl_len(looped)
}

fn smpl_len(looped: bool) -> u32 {
    SMPL_HEADER_LEN + if looped { SMPL_LOOP_LEN } else { 0 }
}

pub fn write_wav(
    w: &mut impl Write,
    data: &SampleData,
    loop_frames: Option<LoopFrames>,
) -> io::Result<()> {
    let num_channels = data.num_channels();
    let block_align = num_channels * (BITS_PER_SAMPLE / 8);
    let data_size = data.byte_len() as u32;

    write_riff_header(w, riff_size(data_size, loop_frames.is_some()))?;
    write_fmt_chunk(w, num_channels, SAMPLE_RATE, block_align, BITS_PER_SAMPLE)?;
    write_data_chunk(w, data, data_size)?;
    write_smpl_chunk(w, SAMPLE_RATE, loop_frames)
}

fn write_riff_header(w: &mut impl Write, riff_size: u32) -> io::Result<()> {
    w.write_all(b"RIFF")?;
    w.write_all(&riff_size.to_le_bytes())?;
    w.write_all(b"WAVE")
}

fn write_fmt_chunk(
    w: &mut impl Write,
    num_channels: u16,
    sample_rate: u32,
    block_align: u16,
    bits_per_sample: u16,
) -> io::Result<()> {
    w.write_all(b"fmt ")?;
    w.write_all(&FMT_CHUNK_LEN.to_le_bytes())?;
    w.write_all(&1u16.to_le_bytes())?;
    w.write_all(&num_channels.to_le_bytes())?;
    w.write_all(&sample_rate.to_le_bytes())?;
    w.write_all(&(sample_rate * block_align as u32).to_le_bytes())?;
    w.write_all(&block_align.to_le_bytes())?;
    w.write_all(&bits_per_sample.to_le_bytes())
}

fn write_data_chunk(w: &mut impl Write, data: &SampleData, data_size: u32) -> io::Result<()> {
    w.write_all(b"data")?;
    w.write_all(&data_size.to_le_bytes())?;
    match data {
        SampleData::Mono16(samples) => {
            for s in samples {
                w.write_all(&s.to_le_bytes())?;
            }
        }
        SampleData::Stereo16(left, right) => {
            for (l, r) in left.iter().zip(right) {
                w.write_all(&l.to_le_bytes())?;
                w.write_all(&r.to_le_bytes())?;
            }
        }
    }
    Ok(())
}

fn write_smpl_chunk(
    w: &mut impl Write,
    sample_rate: u32,
    loop_frames: Option<LoopFrames>,
) -> io::Result<()> {
    let num_loops = u32::from(loop_frames.is_some());

    w.write_all(b"smpl")?;
    w.write_all(&smpl_len(loop_frames.is_some()).to_le_bytes())?;
    w.write_all(&0u32.to_le_bytes())?; // manufacturer
    w.write_all(&0u32.to_le_bytes())?; // product
    w.write_all(&(1_000_000_000 / sample_rate).to_le_bytes())?;
    w.write_all(&BASE_NOTE.to_le_bytes())?;
    w.write_all(&0u32.to_le_bytes())?; // pitch fraction
    w.write_all(&0u32.to_le_bytes())?; // SMPTE format
    w.write_all(&0u32.to_le_bytes())?; // SMPTE offset
    w.write_all(&num_loops.to_le_bytes())?;
    w.write_all(&0u32.to_le_bytes())?; // sampler data

    if let Some(frames) = loop_frames {
        w.write_all(&0u32.to_le_bytes())?; // cue point id
        w.write_all(&0u32.to_le_bytes())?; // forward
        w.write_all(&frames.start.to_le_bytes())?;
        w.write_all(&frames.end.to_le_bytes())?;
        w.write_all(&0u32.to_le_bytes())?; // fraction
        w.write_all(&0u32.to_le_bytes())?; // play count, 0 = infinite
    }
    Ok(())
}
