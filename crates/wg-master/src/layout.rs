//! Where exported files go.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use wg_bank::{sanitize_file_stem, Slot};

/// Suffix of the sample dump directory.
pub const DUMP_SUFFIX: &str = "_dmp";
/// Suffix of the instrument export directory.
pub const SFZ_SUFFIX: &str = "_sfz";

/// Which export a layout describes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportKind {
    /// Flat directory of WAV files.
    SampleDump,
    /// `samples/`, `mel/` and `drm/` with one SFZ file per patch.
    Instruments,
}

/// Output paths for one export of one bank.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutputLayout {
    kind: ExportKind,
    root: PathBuf,
}

impl OutputLayout {
    /// Root is `<input file name><suffix>`, next to the input or inside
    /// `out_dir` when one is given.
    pub fn new(kind: ExportKind, input: &Path, out_dir: Option<&Path>) -> Self {
        let suffix = match kind {
            ExportKind::SampleDump => DUMP_SUFFIX,
            ExportKind::Instruments => SFZ_SUFFIX,
        };
        let mut name: OsString = input
            .file_name()
            .map(OsString::from)
            .unwrap_or_else(|| OsString::from("bank"));
        name.push(suffix);

        let parent = match out_dir {
            Some(dir) => dir.to_path_buf(),
            None => input.parent().map(Path::to_path_buf).unwrap_or_default(),
        };
        Self {
            kind,
            root: parent.join(name),
        }
    }

    /// Layout rooted at an exact directory.
    pub fn at(kind: ExportKind, root: impl Into<PathBuf>) -> Self {
        Self {
            kind,
            root: root.into(),
        }
    }

    pub fn kind(&self) -> ExportKind {
        self.kind
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding the WAV files.
    pub fn audio_dir(&self) -> PathBuf {
        match self.kind {
            ExportKind::SampleDump => self.root.clone(),
            ExportKind::Instruments => self.root.join("samples"),
        }
    }

    pub fn melodic_dir(&self) -> PathBuf {
        self.root.join("mel")
    }

    pub fn drum_dir(&self) -> PathBuf {
        self.root.join("drm")
    }

    /// Every directory the export needs, parents first.
    pub fn directories(&self) -> Vec<PathBuf> {
        match self.kind {
            ExportKind::SampleDump => vec![self.root.clone()],
            ExportKind::Instruments => vec![
                self.root.clone(),
                self.audio_dir(),
                self.melodic_dir(),
                self.drum_dir(),
            ],
        }
    }

    /// WAV path for a sample name.
    pub fn audio_path(&self, sample_name: &str) -> PathBuf {
        self.audio_dir()
            .join(format!("{}.wav", sanitize_file_stem(sample_name)))
    }

    /// SFZ path for a patch: `<program> <program> <label>.sfz` under `mel/` or `drm/`.
    pub fn definition_path(&self, slot: Slot, label: &str) -> PathBuf {
        let dir = if slot.is_drum() {
            self.drum_dir()
        } else {
            self.melodic_dir()
        };
        dir.join(format!(
            "{:03} {:03} {}.sfz",
            slot.program(),
            slot.program(),
            sanitize_file_stem(label)
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_sits_next_to_input() {
        let layout = OutputLayout::new(ExportKind::Instruments, Path::new("/banks/gm.wgb"), None);
        assert_eq!(layout.root(), Path::new("/banks/gm.wgb_sfz"));
        assert_eq!(layout.audio_dir(), Path::new("/banks/gm.wgb_sfz/samples"));

        let dump = OutputLayout::new(ExportKind::SampleDump, Path::new("gm.wgb"), None);
        assert_eq!(dump.root(), Path::new("gm.wgb_dmp"));
        assert_eq!(dump.audio_dir(), dump.root());
    }

    #[test]
    fn out_dir_overrides_parent() {
        let layout = OutputLayout::new(
            ExportKind::SampleDump,
            Path::new("/banks/gm.wgb"),
            Some(Path::new("/tmp/out")),
        );
        assert_eq!(layout.root(), Path::new("/tmp/out/gm.wgb_dmp"));
    }

    #[test]
    fn definition_names() {
        let layout = OutputLayout::at(ExportKind::Instruments, "/x");
        assert_eq!(
            layout.definition_path(Slot::new(5), "Electric Piano 2"),
            Path::new("/x/mel/005 005 Electric Piano 2.sfz")
        );
        assert_eq!(
            layout.definition_path(Slot::new(128 + 25), "TR-808 Kit"),
            Path::new("/x/drm/025 025 TR-808 Kit.sfz")
        );
        assert_eq!(
            layout.definition_path(Slot::new(0), "A/B"),
            Path::new("/x/mel/000 000 A_B.sfz")
        );
    }

    #[test]
    fn sample_dump_needs_only_root() {
        let layout = OutputLayout::at(ExportKind::SampleDump, "/d");
        assert_eq!(layout.directories(), vec![PathBuf::from("/d")]);
        assert_eq!(layout.audio_path("Kick"), Path::new("/d/Kick.wav"));
    }
}
