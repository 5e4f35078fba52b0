//! Output formats for wgknife.
//!
//! WAV files for decoded samples, SFZ text for patches, and the plain text
//! bank dump.

pub mod describe;
pub mod sfz;
pub mod wav;

pub use describe::describe_bank;
pub use sfz::{render_definition, Region};
pub use wav::{sample_to_wav, write_audio, write_wav};
