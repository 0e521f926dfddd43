//! Locating split directories, patient files and outcome files.

use std::path::{Path, PathBuf};

use icu_model::Split;

use crate::error::{IngestError, Result};

/// Suffix of development sample directories (`set-a-test`).
pub const SAMPLE_SUFFIX: &str = "-test";

/// Parses `set-a` or `set-a-test` into its split.
pub fn split_from_dir_name(name: &str) -> Option<Split> {
    let key = name.strip_prefix("set-")?;
    let key = key.strip_suffix(SAMPLE_SUFFIX).unwrap_or(key);
    Split::from_key(key)
}

/// Returns the `set-<key>` directory of every requested split.
///
/// A missing directory is an error; a run never silently drops a split.
pub fn resolve_split_dirs(raw_root: &Path, splits: &[Split]) -> Result<Vec<(Split, PathBuf)>> {
    splits
        .iter()
        .map(|split| {
            let dir = raw_root.join(split.dir_name());
            if dir.is_dir() {
                Ok((*split, dir))
            } else {
                Err(IngestError::DirectoryNotFound { path: dir })
            }
        })
        .collect()
}

/// Lists the `.txt` patient files in a directory, sorted by file name.
pub fn list_patient_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(IngestError::DirectoryNotFound {
            path: dir.to_path_buf(),
        });
    }

    let entries = std::fs::read_dir(dir).map_err(|e| IngestError::DirectoryRead {
        path: dir.to_path_buf(),
        source: e,
    })?;

    let mut files = Vec::new();
    for entry_result in entries {
        let entry = entry_result.map_err(|e| IngestError::DirectoryRead {
            path: dir.to_path_buf(),
            source: e,
        })?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let is_txt = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext == "txt");
        if is_txt {
            files.push(path);
        }
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

/// Returns the path of `Outcomes-<key>.txt` under `raw_root`.
pub fn outcome_file(raw_root: &Path, split: Split) -> Result<PathBuf> {
    let path = raw_root.join(split.outcome_file_name());
    if path.is_file() {
        Ok(path)
    } else {
        Err(IngestError::OutcomeFileNotFound { path })
    }
}
