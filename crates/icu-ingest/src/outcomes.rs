//! Outcome file loading.

use std::path::Path;

use polars::prelude::*;
use tracing::debug;

use crate::error::{IngestError, Result};

/// Reads a comma-separated outcome file with a header row
/// (`RecordID,SAPS-I,SOFA,Length_of_stay,Survival,In-hospital_death`).
pub fn read_outcomes(path: &Path) -> Result<DataFrame> {
    if !path.is_file() {
        return Err(IngestError::OutcomeFileNotFound {
            path: path.to_path_buf(),
        });
    }

    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(1000))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?
        .finish()
        .map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    debug!(
        path = %path.display(),
        rows = df.height(),
        columns = df.width(),
        "outcomes loaded"
    );
    Ok(df)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn reads_outcome_table() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("Outcomes-a.txt");
        std::fs::write(
            &path,
            "RecordID,SAPS-I,SOFA,Length_of_stay,Survival,In-hospital_death\n\
             132539,6,1,5,-1,0\n\
             132540,16,8,8,-1,0\n",
        )
        .unwrap();

        let df = read_outcomes(&path).unwrap();
        assert_eq!(df.height(), 2);
        assert_eq!(df.width(), 6);
        assert_eq!(df.get_column_names()[0].as_str(), "RecordID");
    }

    #[test]
    fn missing_outcome_file() {
        let dir = TempDir::new().unwrap();
        let result = read_outcomes(&dir.path().join("Outcomes-c.txt"));
        assert!(matches!(result, Err(IngestError::OutcomeFileNotFound { .. })));
    }
}
