//! Error types for patient-file ingestion.

use std::path::PathBuf;
use thiserror::Error;

use icu_model::ModelError;

/// File-level and directory-level ingestion failures.
///
/// Problems confined to a single line are not errors; they are collected as
/// [`crate::LineIssue`]s and the file keeps being read.
#[derive(Debug, Error)]
pub enum IngestError {
    // === File System Errors ===
    #[error("directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    #[error("failed to read directory {path}: {source}")]
    DirectoryRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to copy {from} to {to}: {source}")]
    FileCopy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("outcome file not found: {path}")]
    OutcomeFileNotFound { path: PathBuf },

    // === Parsing Errors ===
    #[error("failed to parse {path}: {message}")]
    CsvParse { path: PathBuf, message: String },

    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },

    #[error(transparent)]
    Model(#[from] ModelError),
}

impl From<polars::prelude::PolarsError> for IngestError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;
