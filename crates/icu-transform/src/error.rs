use thiserror::Error;

use icu_ingest::IngestError;
use icu_model::{ModelError, Split};

#[derive(Debug, Error)]
pub enum TransformError {
    #[error("column '{column}' not found in outcome table")]
    MissingColumn { column: String },
    #[error("{split}: aborted after unreadable patient file: {source}")]
    Aborted {
        split: Split,
        #[source]
        source: IngestError,
    },
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error("DataFrame operation failed: {0}")]
    DataFrame(#[from] polars::prelude::PolarsError),
}

pub type Result<T> = std::result::Result<T, TransformError>;
