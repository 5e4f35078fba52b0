//! Name table files.
//!
//! ```toml
//! [[patch]]
//! slot = 0
//! name = "Grand Piano"
//!
//! [[sample]]
//! start = 4660
//! end = 9320
//! name = "Piano C4"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;
use wg_bank::{NameTable, Slot};

#[derive(Debug, Error)]
pub enum NameTableError {
    #[error("cannot read name table {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid name table {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct NameFile {
    #[serde(default, rename = "patch")]
    patches: Vec<PatchName>,
    #[serde(default, rename = "sample")]
    samples: Vec<SampleName>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct PatchName {
    slot: u8,
    name: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SampleName {
    start: u32,
    end: u32,
    name: String,
}

/// Parse name table text. Entries are applied in file order, so a later
/// entry for the same key wins.
pub fn parse_name_table(text: &str) -> Result<NameTable, toml::de::Error> {
    let file: NameFile = toml::from_str(text)?;
    let mut table = NameTable::new();
    for patch in file.patches {
        table.insert_patch(Slot::new(patch.slot), patch.name);
    }
    for sample in file.samples {
        table.insert_sample(sample.start, sample.end, sample.name);
    }
    Ok(table)
}

/// Load a name table file.
pub fn load_name_table(path: &Path) -> Result<NameTable, NameTableError> {
    let text = fs::read_to_string(path).map_err(|source| NameTableError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let table = parse_name_table(&text).map_err(|source| NameTableError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(
        path = %path.display(),
        patches = table.patch_count(),
        samples = table.sample_count(),
        "loaded name table"
    );
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_patches_and_samples() {
        let table = parse_name_table(
            r#"
            [[patch]]
            slot = 0
            name = "Grand Piano"

            [[patch]]
            slot = 128
            name = "House Kit"

            [[sample]]
            start = 4660
            end = 9320
            name = "Piano C4"
            "#,
        )
        .unwrap();
        assert_eq!(table.patch_label(Slot::new(0)), "Grand Piano");
        assert_eq!(table.patch_label(Slot::new(128)), "House Kit");
        assert_eq!(table.patch_label(Slot::new(1)), "Bright Acoustic Piano");
        assert_eq!(table.sample_name_for(4660, 9320), "Piano C4");
    }

    #[test]
    fn empty_file_is_empty_table() {
        let table = parse_name_table("").unwrap();
        assert_eq!(table.patch_count(), 0);
        assert_eq!(table.sample_count(), 0);
    }

    #[test]
    fn rejects_unknown_keys() {
        assert!(parse_name_table("[[patch]]\nslot = 1\nname = \"x\"\ncolor = 3\n").is_err());
        assert!(parse_name_table("[[instrument]]\nslot = 1\n").is_err());
    }

    #[test]
    fn rejects_slot_out_of_range() {
        assert!(parse_name_table("[[patch]]\nslot = 256\nname = \"x\"\n").is_err());
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_name_table(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, NameTableError::Io { .. }));
    }

    #[test]
    fn bad_toml_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("names.toml");
        fs::write(&path, "[[patch]]\nslot = \"zero\"\n").unwrap();
        let err = load_name_table(&path).unwrap_err();
        assert!(matches!(err, NameTableError::Parse { .. }));
        assert!(err.to_string().contains("names.toml"));
    }
}
