//! Command-line arguments.

use std::fmt;
use std::path::PathBuf;

use clap::Parser;

/// Process exit codes.
pub mod exit {
    pub const USAGE: u8 = 1;
    pub const OPEN: u8 = 2;
    pub const BAD_HEADER: u8 = 3;
    pub const DESCRIBE: u8 = 4;
    pub const INCOMPLETE_EXPORT: u8 = 5;
    pub const NAME_TABLE: u8 = 6;
}

/// What to do with the bank.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    /// `-d`: text dump of every record.
    Describe,
    /// `-sd`: every referenced sample as WAV.
    SampleDump,
    /// `-sfz`: one SFZ file per patch plus its samples.
    Sfz,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Mode::Describe => "-d",
            Mode::SampleDump => "-sd",
            Mode::Sfz => "-sfz",
        })
    }
}

fn parse_mode(arg: &str) -> Result<Mode, String> {
    match arg {
        "-d" => Ok(Mode::Describe),
        "-sd" => Ok(Mode::SampleDump),
        "-sfz" => Ok(Mode::Sfz),
        other => Err(format!("unknown mode `{other}`, expected -d, -sd or -sfz")),
    }
}

#[derive(Debug, Parser)]
#[command(name = "wgknife")]
#[command(about = "Describe WinGroove soundbanks and export their samples and instruments")]
#[command(version)]
pub struct Cli {
    /// -d: describe the bank, -sd: dump samples, -sfz: export SFZ instruments
    #[arg(allow_hyphen_values = true, value_parser = parse_mode)]
    pub mode: Mode,

    /// Bank file
    pub path: PathBuf,

    /// TOML file with patch and sample names
    #[arg(long)]
    pub names: Option<PathBuf>,

    /// Directory to create the output folder in (default: next to the bank)
    #[arg(long)]
    pub out_dir: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long)]
    pub verbose: bool,
}
