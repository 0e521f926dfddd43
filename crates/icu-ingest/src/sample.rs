//! Development samples: the first N patient files of a split.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::discovery::{SAMPLE_SUFFIX, list_patient_files};
use crate::error::{IngestError, Result};

/// Result of [`create_sample`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleDir {
    pub path: PathBuf,
    /// False when an existing sample directory was reused.
    pub created: bool,
    /// Files copied by this call.
    pub copied: usize,
}

/// Copies the first `size` patient files (by file name) of `source_dir` into
/// its `-test` sibling, e.g. `set-a` into `set-a-test`.
///
/// An existing sample directory is reused untouched, whatever it contains.
/// A directory this call created is removed again if copying fails.
pub fn create_sample(source_dir: &Path, size: usize) -> Result<SampleDir> {
    let path = sample_dir_for(source_dir);
    match std::fs::create_dir(&path) {
        Ok(()) => {}
        Err(err) if err.kind() == ErrorKind::AlreadyExists => {
            info!(
                path = %path.display(),
                "sample directory already exists, using existing data"
            );
            return Ok(SampleDir {
                path,
                created: false,
                copied: 0,
            });
        }
        Err(source) => return Err(IngestError::DirectoryCreate { path, source }),
    }

    let files = match list_patient_files(source_dir) {
        Ok(files) => files,
        Err(err) => {
            discard_partial(&path);
            return Err(err);
        }
    };
    let take = size.min(files.len());
    let copied = populate_sample(&path, &files[..take])?;

    info!(
        path = %path.display(),
        copied,
        available = files.len(),
        "sample directory created"
    );
    Ok(SampleDir {
        path,
        created: true,
        copied,
    })
}

/// Copies `files` into the freshly created `dir`. On failure `dir` is
/// removed, so a later run never reuses a partial sample.
fn populate_sample(dir: &Path, files: &[PathBuf]) -> Result<usize> {
    let mut copied = 0;
    for from in files {
        let Some(name) = from.file_name() else {
            continue;
        };
        let to = dir.join(name);
        if let Err(source) = std::fs::copy(from, &to) {
            discard_partial(dir);
            return Err(IngestError::FileCopy {
                from: from.clone(),
                to,
                source,
            });
        }
        copied += 1;
    }
    Ok(copied)
}

fn discard_partial(dir: &Path) {
    if let Err(err) = std::fs::remove_dir_all(dir) {
        warn!(path = %dir.display(), error = %err, "failed to remove partial sample directory");
    }
}

/// `<dir>-test` next to `dir`.
pub fn sample_dir_for(source_dir: &Path) -> PathBuf {
    let mut name = source_dir
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(SAMPLE_SUFFIX);
    source_dir.with_file_name(name)
}
