//! Concatenation of patient tables into one table per split.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, error, info, info_span};

use icu_ingest::{IngestError, IssueCounts, PatientTable, read_patient_file};
use icu_model::{FileFailurePolicy, LongTable, PrepareOptions, RECORD_ID, Split, schema_registry};

use crate::error::{Result, TransformError};

/// A patient file that could not be read.
#[derive(Debug, Clone, Serialize)]
pub struct FileFailure {
    pub path: PathBuf,
    pub message: String,
}

/// All patient tables of one split, in processing order.
#[derive(Debug, Clone)]
pub struct CohortTable {
    pub split: Split,
    pub table: LongTable,
    pub patient_count: usize,
    pub issues: IssueCounts,
    pub failures: Vec<FileFailure>,
}

impl CohortTable {
    pub fn new(split: Split) -> Self {
        Self {
            split,
            table: LongTable::empty(schema_registry()),
            patient_count: 0,
            issues: IssueCounts::default(),
            failures: Vec::new(),
        }
    }

    /// Appends one patient's rows after the rows already present.
    pub fn push(&mut self, patient: PatientTable) -> Result<()> {
        self.issues.merge(IssueCounts::from_issues(&patient.issues));
        self.table.append(patient.table)?;
        self.patient_count += 1;
        Ok(())
    }

    pub fn row_count(&self) -> usize {
        self.table.height()
    }

    /// Distinct record identifiers in first-seen order.
    pub fn record_ids(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.table
            .string_values(RECORD_ID)
            .unwrap_or_default()
            .iter()
            .flatten()
            .filter(|id| seen.insert(id.as_str()))
            .cloned()
            .collect()
    }

    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }
}

/// Reads every file of a split and concatenates the patient tables.
///
/// `progress` is called once per file after it has been handled. Under
/// [`FileFailurePolicy::Skip`] an unreadable file is recorded and skipped;
/// under [`FileFailurePolicy::Abort`] it ends the split with an error.
pub fn assemble_cohort<F>(
    split: Split,
    files: &[PathBuf],
    options: &PrepareOptions,
    mut progress: F,
) -> Result<CohortTable>
where
    F: FnMut(&Path),
{
    let span = info_span!("cohort", split = %split, files = files.len());
    let _guard = span.enter();

    let assembly = options.assembly();
    let mut cohort = CohortTable::new(split);
    for path in files {
        match read_patient_file(path, assembly) {
            Ok(patient) => {
                debug!(
                    file = %path.display(),
                    record_id = %patient.record_id,
                    rows = patient.height(),
                    "patient file read"
                );
                cohort.push(patient)?;
            }
            Err(err) => {
                error!(file = %path.display(), error = %err, "unreadable patient file");
                if options.file_failure == FileFailurePolicy::Abort {
                    return Err(TransformError::Aborted { split, source: err });
                }
                cohort.failures.push(failure(path, &err));
            }
        }
        progress(path);
    }

    info!(
        patients = cohort.patient_count,
        rows = cohort.row_count(),
        issues = cohort.issues.total(),
        failures = cohort.failures.len(),
        "cohort assembled"
    );
    Ok(cohort)
}

fn failure(path: &Path, err: &IngestError) -> FileFailure {
    FileFailure {
        path: path.to_path_buf(),
        message: err.to_string(),
    }
}
