use thiserror::Error;

use crate::enums::ScalarType;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("unknown variable: {0}")]
    UnknownVariable(String),
    #[error("unknown split key: {0}")]
    UnknownSplit(String),
    #[error("column {name} expects {expected} values, got {actual}")]
    ColumnType {
        name: String,
        expected: ScalarType,
        actual: ScalarType,
    },
    #[error("column layout mismatch: expected {expected:?}, got {actual:?}")]
    ColumnLayout {
        expected: Vec<String>,
        actual: Vec<String>,
    },
    #[error("column {name} has {actual} rows, table has {expected}")]
    ColumnLength {
        name: String,
        expected: usize,
        actual: usize,
    },
}

pub type Result<T> = std::result::Result<T, ModelError>;
