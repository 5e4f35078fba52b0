//! Export pipeline for wgknife.
//!
//! Ties the bank model to the output formats: where files go, how a rerun
//! replaces an earlier export, and which artifacts were skipped.

mod export;
mod layout;
mod names;

pub use export::{
    dump_samples, export_instruments, Artifact, ExportError, ExportReport, SkipReason,
    SkippedArtifact,
};
pub use layout::{ExportKind, OutputLayout, DUMP_SUFFIX, SFZ_SUFFIX};
pub use names::{load_name_table, parse_name_table, NameTableError};

// Re-export common types so the binary doesn't need wg-bank/wg-formats directly.
pub use wg_bank::{Bank, FormatError, NameTable};
pub use wg_formats::describe_bank;
