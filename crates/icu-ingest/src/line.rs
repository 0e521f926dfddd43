//! Splitting patient-file lines into raw observations.

use thiserror::Error;

use crate::timestamp::TimestampError;

/// Number of fields on a well-formed line: time, parameter, value.
pub const FIELD_COUNT: usize = 3;

/// One `(timestamp, variable, value)` line, fields trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawObservation {
    pub timestamp: String,
    pub variable: String,
    pub value: String,
}

/// A line that cannot be turned into an observation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LineError {
    #[error("expected {expected} fields, found {actual}")]
    FieldCount { expected: usize, actual: usize },
    #[error("line is not valid UTF-8")]
    InvalidUtf8,
    #[error(transparent)]
    Timestamp(#[from] TimestampError),
}

/// Builds an observation from already split fields.
pub fn parse_fields<'a, I>(fields: I) -> Result<RawObservation, LineError>
where
    I: IntoIterator<Item = &'a str>,
{
    let fields: Vec<&str> = fields.into_iter().map(str::trim).collect();
    match fields.as_slice() {
        [timestamp, variable, value] => Ok(RawObservation {
            timestamp: (*timestamp).to_string(),
            variable: (*variable).to_string(),
            value: (*value).to_string(),
        }),
        other => Err(LineError::FieldCount {
            expected: FIELD_COUNT,
            actual: other.len(),
        }),
    }
}

/// Splits a raw text line on commas and builds an observation.
pub fn parse_line(line: &str) -> Result<RawObservation, LineError> {
    parse_fields(line.trim().split(','))
}
