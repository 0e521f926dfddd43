//! Parquet files for cohort and outcome tables.

use std::fs::File;
use std::path::{Path, PathBuf};

use polars::prelude::*;
use tracing::debug;

use icu_model::{LongTable, OutputCompression, SchemaRegistry, Split};

use crate::error::{OutputError, Result};
use crate::frame::{frame_to_long_table, long_table_to_frame};

/// The two artefacts written for a split.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitOutputs {
    pub split: Split,
    /// `set-<key>.parquet.gzip`
    pub table: PathBuf,
    /// `set-<key>-outcomes.parquet.gzip`
    pub outcomes: PathBuf,
}

impl SplitOutputs {
    pub fn for_split(data_dir: &Path, split: Split) -> Self {
        Self {
            split,
            table: data_dir.join(split.table_file_name()),
            outcomes: data_dir.join(split.outcomes_table_file_name()),
        }
    }
}

/// Creates the output directory and its parents.
pub fn ensure_output_dir(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir).map_err(|source| OutputError::CreateDir {
        path: dir.to_path_buf(),
        source,
    })
}

fn parquet_compression(compression: OutputCompression) -> ParquetCompression {
    match compression {
        OutputCompression::Gzip => ParquetCompression::Gzip(None),
        OutputCompression::Zstd => ParquetCompression::Zstd(None),
        OutputCompression::Snappy => ParquetCompression::Snappy,
        OutputCompression::Uncompressed => ParquetCompression::Uncompressed,
    }
}

/// Writes a frame as a single Parquet file, replacing any existing file.
pub fn write_frame(frame: &mut DataFrame, path: &Path, compression: OutputCompression) -> Result<()> {
    let file = File::create(path).map_err(|source| OutputError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    ParquetWriter::new(file)
        .with_compression(parquet_compression(compression))
        .finish(frame)
        .map_err(|source| OutputError::Parquet {
            path: path.to_path_buf(),
            source,
        })?;
    debug!(
        path = %path.display(),
        rows = frame.height(),
        columns = frame.width(),
        compression = %compression,
        "parquet written"
    );
    Ok(())
}

pub fn read_frame(path: &Path) -> Result<DataFrame> {
    let file = File::open(path).map_err(|source| OutputError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    ParquetReader::new(file)
        .finish()
        .map_err(|source| OutputError::Parquet {
            path: path.to_path_buf(),
            source,
        })
}

pub fn write_long_table(table: &LongTable, path: &Path, compression: OutputCompression) -> Result<()> {
    let mut frame = long_table_to_frame(table)?;
    write_frame(&mut frame, path, compression)
}

/// Reads a table written by [`write_long_table`], re-typing columns from the registry.
pub fn read_long_table(path: &Path, registry: &SchemaRegistry) -> Result<LongTable> {
    let frame = read_frame(path)?;
    frame_to_long_table(&frame, registry)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_names() {
        let outputs = SplitOutputs::for_split(Path::new("/data"), Split::Validation);
        assert_eq!(outputs.table, PathBuf::from("/data/set-b.parquet.gzip"));
        assert_eq!(
            outputs.outcomes,
            PathBuf::from("/data/set-b-outcomes.parquet.gzip")
        );
    }

    #[test]
    fn read_missing_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let result = read_frame(&dir.path().join("set-a.parquet.gzip"));
        assert!(matches!(result, Err(OutputError::Open { .. })));
    }

    #[test]
    fn ensure_output_dir_creates_parents() {
        let dir = tempfile::TempDir::new().unwrap();
        let nested = dir.path().join("a").join("data");
        ensure_output_dir(&nested).unwrap();
        assert!(nested.is_dir());
        ensure_output_dir(&nested).unwrap();
    }
}
