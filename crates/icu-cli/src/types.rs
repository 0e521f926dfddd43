//! Result types of CLI runs; serialized into the run manifest.

use std::path::PathBuf;

use serde::Serialize;

use icu_ingest::IssueCounts;
use icu_model::{GapFillPolicy, OutputCompression, RunMode, Split};
use icu_output::SplitOutputs;
use icu_transform::FileFailure;

/// Files written for one split.
#[derive(Debug, Clone, Serialize)]
pub struct OutputPaths {
    pub table: PathBuf,
    pub outcomes: PathBuf,
}

impl From<SplitOutputs> for OutputPaths {
    fn from(outputs: SplitOutputs) -> Self {
        Self {
            table: outputs.table,
            outcomes: outputs.outcomes,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SplitSummary {
    pub split: Split,
    /// Directory the patient files were read from (`set-a` or `set-a-test`).
    pub source_dir: PathBuf,
    pub patient_files: usize,
    pub patients: usize,
    pub rows: usize,
    pub outcome_rows: usize,
    pub matched_outcome_rows: usize,
    pub issues: IssueCounts,
    pub failures: Vec<FileFailure>,
    pub outputs: Option<OutputPaths>,
    /// Set when the split stopped before producing its tables.
    pub error: Option<String>,
}

impl SplitSummary {
    pub fn has_errors(&self) -> bool {
        self.error.is_some() || !self.failures.is_empty()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PrepareResult {
    pub raw_root: PathBuf,
    pub data_dir: PathBuf,
    pub mode: RunMode,
    pub gap_fill: GapFillPolicy,
    pub compression: OutputCompression,
    pub dry_run: bool,
    pub started_at: String,
    pub finished_at: String,
    pub splits: Vec<SplitSummary>,
    /// Path of the written manifest; unset on dry runs.
    #[serde(skip)]
    pub manifest: Option<PathBuf>,
}

impl PrepareResult {
    pub fn has_errors(&self) -> bool {
        self.splits.iter().any(SplitSummary::has_errors)
    }

    pub fn total_rows(&self) -> usize {
        self.splits.iter().map(|s| s.rows).sum()
    }
}

/// Sample directory state for one split, as reported by `sample`.
#[derive(Debug, Clone)]
pub struct SampleSummary {
    pub split: Split,
    pub path: PathBuf,
    pub created: bool,
    pub copied: usize,
}
