//! Sample dump and SFZ instrument export.
//!
//! Both exports walk the bank once to build a plan of every file the bank
//! produces, then run two passes over that plan. The first removes every
//! planned path along with any other `.wav`/`.sfz` file left in the output
//! directories; the second writes the plan. After a run the output holds
//! exactly what the current bank produces, whatever an earlier run left.
//!
//! Audio files are keyed by sample name and written once; a name that is
//! already on disk during the write pass is reused.

use std::collections::HashSet;
use std::ffi::OsStr;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info, warn};
use wg_bank::{Bank, BoundsError, NameTable, Patch, SampleHeader, Slot};
use wg_formats::sfz::{render_definition, Region};
use wg_formats::wav::write_audio;

use crate::layout::{ExportKind, OutputLayout};

/// Failure that stops an export before any file is written.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("cannot create output directory {}: {source}", path.display())]
    CreateDir { path: PathBuf, source: io::Error },
}

/// Why an artifact was left out.
#[derive(Debug, Error)]
pub enum SkipReason {
    #[error(transparent)]
    Bounds(#[from] BoundsError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("definition {} was not written", .0.display())]
    DefinitionNotWritten(PathBuf),
}

/// What was left out.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Artifact {
    /// A split whose record or sample header did not resolve.
    Split { slot: Slot, index: u16 },
    /// An output file that could not be removed or written.
    File(PathBuf),
}

impl fmt::Display for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Artifact::Split { slot, index } => write!(f, "split {index} of patch {slot}"),
            Artifact::File(path) => write!(f, "{}", path.display()),
        }
    }
}

#[derive(Debug)]
pub struct SkippedArtifact {
    pub artifact: Artifact,
    pub reason: SkipReason,
}

/// Outcome of one export run.
#[derive(Debug, Default)]
pub struct ExportReport {
    pub audio_written: usize,
    pub audio_reused: usize,
    pub definitions_written: usize,
    pub skipped: Vec<SkippedArtifact>,
}

impl ExportReport {
    /// True when nothing was skipped.
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }

    fn skip(&mut self, artifact: Artifact, reason: impl Into<SkipReason>) {
        let reason = reason.into();
        warn!(%artifact, %reason, "skipped");
        self.skipped.push(SkippedArtifact { artifact, reason });
    }
}

// ---------------------------------------------------------------------------
// Plan
// ---------------------------------------------------------------------------

struct AudioJob<'a> {
    path: PathBuf,
    sample: SampleHeader<'a>,
}

struct DefinitionJob<'a> {
    slot: Slot,
    path: PathBuf,
    text: String,
    audio: Vec<AudioJob<'a>>,
}

/// Resolved splits of one patch with their file names. Splits that do not
/// resolve are recorded in `report` and left out.
fn patch_samples<'a>(
    patch: &Patch<'a>,
    names: &NameTable,
    layout: &OutputLayout,
    report: &mut ExportReport,
) -> Vec<(Region, AudioJob<'a>)> {
    let mut out = Vec::with_capacity(patch.split_count() as usize);
    for (index, split) in patch.splits().enumerate() {
        let artifact = || Artifact::Split {
            slot: patch.slot(),
            index: index as u16,
        };
        let split = match split {
            Ok(split) => split,
            Err(err) => {
                report.skip(artifact(), err);
                continue;
            }
        };
        let sample = match split.sample_header() {
            Ok(sample) => sample,
            Err(err) => {
                report.skip(artifact(), err);
                continue;
            }
        };

        let name = names.sample_name(&sample);
        let path = layout.audio_path(&name);
        let stem = file_stem(&path);
        out.push((Region::new(&split, &sample, stem), AudioJob { path, sample }));
    }
    out
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn plan_sample_dump<'a>(
    bank: &Bank<'a>,
    names: &NameTable,
    layout: &OutputLayout,
    report: &mut ExportReport,
) -> Vec<AudioJob<'a>> {
    bank.active_patches()
        .flat_map(|patch| patch_samples(&patch, names, layout, report))
        .map(|(_, job)| job)
        .collect()
}

fn plan_instruments<'a>(
    bank: &Bank<'a>,
    names: &NameTable,
    layout: &OutputLayout,
    report: &mut ExportReport,
) -> Vec<DefinitionJob<'a>> {
    let mut jobs = Vec::new();
    for patch in bank.active_patches() {
        let slot = patch.slot();
        let path = layout.definition_path(slot, &names.patch_label(slot));
        let (regions, audio): (Vec<_>, Vec<_>) =
            patch_samples(&patch, names, layout, report).into_iter().unzip();
        jobs.push(DefinitionJob {
            slot,
            path,
            text: render_definition(&regions),
            audio,
        });
    }
    jobs
}

// ---------------------------------------------------------------------------
// Passes
// ---------------------------------------------------------------------------

fn create_dirs(layout: &OutputLayout) -> Result<(), ExportError> {
    for dir in layout.directories() {
        fs::create_dir_all(&dir).map_err(|source| ExportError::CreateDir { path: dir, source })?;
    }
    Ok(())
}

fn remove_stale(path: &Path, report: &mut ExportReport) {
    match fs::remove_file(path) {
        Ok(()) => debug!(path = %path.display(), "removed"),
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(err) => report.skip(Artifact::File(path.to_path_buf()), err),
    }
}

/// Remove files with extension `ext` in `dir` that are not in `planned`.
fn sweep_unplanned(dir: &Path, ext: &str, planned: &HashSet<&Path>, report: &mut ExportReport) {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) => {
            report.skip(Artifact::File(dir.to_path_buf()), err);
            return;
        }
    };
    for entry in entries.flatten() {
        let path = entry.path();
        let is_file = entry.file_type().map(|t| t.is_file()).unwrap_or(false);
        if is_file && path.extension() == Some(OsStr::new(ext)) && !planned.contains(path.as_path()) {
            remove_stale(&path, report);
        }
    }
}

fn emit_audio(job: &AudioJob<'_>, report: &mut ExportReport) {
    if job.path.exists() {
        report.audio_reused += 1;
        return;
    }
    match write_audio(&job.sample, &job.path) {
        Ok(()) => {
            debug!(path = %job.path.display(), frames = job.sample.frames(), "wrote sample");
            report.audio_written += 1;
        }
        Err(err) => report.skip(Artifact::File(job.path.clone()), err),
    }
}

/// Write every referenced sample of every active patch into a flat directory.
pub fn dump_samples(
    bank: &Bank<'_>,
    names: &NameTable,
    layout: &OutputLayout,
) -> Result<ExportReport, ExportError> {
    debug_assert_eq!(layout.kind(), ExportKind::SampleDump);
    create_dirs(layout)?;

    let mut report = ExportReport::default();
    let jobs = plan_sample_dump(bank, names, layout, &mut report);

    let mut planned = HashSet::new();
    for job in &jobs {
        remove_stale(&job.path, &mut report);
        planned.insert(job.path.as_path());
    }
    sweep_unplanned(&layout.audio_dir(), "wav", &planned, &mut report);

    for job in &jobs {
        emit_audio(job, &mut report);
    }

    info!(
        root = %layout.root().display(),
        written = report.audio_written,
        reused = report.audio_reused,
        skipped = report.skipped.len(),
        "sample dump finished"
    );
    Ok(report)
}

/// Write one SFZ file per active patch plus the samples they reference.
///
/// A definition that cannot be written skips its patch's samples too; each
/// sample no other patch wrote is recorded as skipped.
pub fn export_instruments(
    bank: &Bank<'_>,
    names: &NameTable,
    layout: &OutputLayout,
) -> Result<ExportReport, ExportError> {
    debug_assert_eq!(layout.kind(), ExportKind::Instruments);
    create_dirs(layout)?;

    let mut report = ExportReport::default();
    let jobs = plan_instruments(bank, names, layout, &mut report);

    let mut planned = HashSet::new();
    for job in &jobs {
        remove_stale(&job.path, &mut report);
        planned.insert(job.path.as_path());
        for audio in &job.audio {
            remove_stale(&audio.path, &mut report);
            planned.insert(audio.path.as_path());
        }
    }
    sweep_unplanned(&layout.audio_dir(), "wav", &planned, &mut report);
    sweep_unplanned(&layout.melodic_dir(), "sfz", &planned, &mut report);
    sweep_unplanned(&layout.drum_dir(), "sfz", &planned, &mut report);

    let mut orphaned = Vec::new();
    for job in &jobs {
        if let Err(err) = fs::write(&job.path, &job.text) {
            report.skip(Artifact::File(job.path.clone()), err);
            orphaned.extend(job.audio.iter().map(|audio| (&audio.path, &job.path)));
            continue;
        }
        debug!(slot = %job.slot, path = %job.path.display(), "wrote definition");
        report.definitions_written += 1;
        for audio in &job.audio {
            emit_audio(audio, &mut report);
        }
    }
    // Audio shared with a patch that did get written is not lost.
    let mut seen = HashSet::new();
    for (audio, definition) in orphaned {
        if seen.insert(audio) && !audio.exists() {
            report.skip(
                Artifact::File(audio.clone()),
                SkipReason::DefinitionNotWritten(definition.clone()),
            );
        }
    }

    info!(
        root = %layout.root().display(),
        definitions = report.definitions_written,
        samples_written = report.audio_written,
        samples_reused = report.audio_reused,
        skipped = report.skipped.len(),
        "instrument export finished"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wg_bank::builder::{BankBuilder, PatchSpec, SampleId, SampleSpec, SplitSpec};

    #[test]
    fn bad_split_is_skipped_and_siblings_kept() {
        let mut b = BankBuilder::new();
        let id = b.add_sample(SampleSpec::default());
        b.set_patch(
            Slot::new(2),
            PatchSpec {
                splits: vec![
                    SplitSpec {
                        sample: 0xFFFF_FF00u32.into(),
                        ..SplitSpec::default()
                    },
                    SplitSpec {
                        sample: id.into(),
                        ..SplitSpec::default()
                    },
                ],
                ..PatchSpec::default()
            },
        );
        let data = b.build();
        let bank = Bank::open(&data).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let layout = OutputLayout::at(ExportKind::SampleDump, dir.path());

        let report = dump_samples(&bank, &NameTable::new(), &layout).unwrap();
        assert!(!report.is_complete());
        assert_eq!(report.audio_written, 1);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(
            report.skipped[0].artifact,
            Artifact::Split {
                slot: Slot::new(2),
                index: 0
            }
        );
        assert!(matches!(report.skipped[0].reason, SkipReason::Bounds(_)));
    }

    #[test]
    fn failed_definition_records_its_samples() {
        let mut b = BankBuilder::new();
        let own = b.add_sample(SampleSpec::default());
        let shared = b.add_sample(SampleSpec {
            codes: vec![0x40; 8],
            ..SampleSpec::default()
        });
        let split = |id: SampleId| SplitSpec {
            sample: id.into(),
            ..SplitSpec::default()
        };
        b.set_patch(
            Slot::new(0),
            PatchSpec {
                splits: vec![split(own), split(shared)],
                ..PatchSpec::default()
            },
        );
        b.set_patch(
            Slot::new(1),
            PatchSpec {
                splits: vec![split(shared)],
                ..PatchSpec::default()
            },
        );
        let data = b.build();
        let bank = Bank::open(&data).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let layout = OutputLayout::at(ExportKind::Instruments, dir.path());
        let names = NameTable::new();

        // A directory where the first definition should go.
        let blocked = layout.definition_path(Slot::new(0), &names.patch_label(Slot::new(0)));
        fs::create_dir_all(&blocked).unwrap();

        let report = export_instruments(&bank, &names, &layout).unwrap();
        assert!(!report.is_complete());
        assert_eq!(report.definitions_written, 1);
        assert_eq!(report.audio_written, 1);

        let orphaned: Vec<_> = report
            .skipped
            .iter()
            .filter_map(|s| match &s.reason {
                SkipReason::DefinitionNotWritten(def) => Some((&s.artifact, def)),
                _ => None,
            })
            .collect();
        assert_eq!(orphaned.len(), 1);
        let Artifact::File(audio) = orphaned[0].0 else {
            panic!("expected a file artifact");
        };
        assert_eq!(orphaned[0].1, &blocked);
        assert!(!audio.exists());
        assert_eq!(fs::read_dir(layout.audio_dir()).unwrap().count(), 1);
    }

    #[test]
    fn uncreatable_root_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        fs::write(&blocker, b"x").unwrap();
        let layout = OutputLayout::at(ExportKind::Instruments, blocker.join("out"));

        let data = BankBuilder::new().build();
        let bank = Bank::open(&data).unwrap();
        let err = export_instruments(&bank, &NameTable::new(), &layout).unwrap_err();
        assert!(matches!(err, ExportError::CreateDir { .. }));
    }

    #[test]
    fn artifact_display() {
        let split = Artifact::Split {
            slot: Slot::new(129),
            index: 3,
        };
        assert_eq!(split.to_string(), "split 3 of patch 128:001");
    }
}
