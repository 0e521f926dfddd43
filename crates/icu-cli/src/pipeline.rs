//! Preparation pipeline with explicit stages.
//!
//! The pipeline follows these stages in order:
//! 1. **Discover**: resolve split directories (sampling them in development
//!    mode), list patient files, locate outcome files
//! 2. **Assemble**: read every patient file into the split's cohort table
//! 3. **Match**: load the outcome table and restrict it to the cohort
//! 4. **Output**: write both tables as Parquet and the run manifest
//!
//! Discovery runs for every requested split before any file is read, so a
//! missing directory or outcome file fails the run up front.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{SecondsFormat, Utc};
use indicatif::ProgressBar;
use polars::prelude::DataFrame;
use tracing::{error, info, info_span};

use icu_ingest::{create_sample, list_patient_files, outcome_file, read_outcomes, resolve_split_dirs};
use icu_model::{PrepareOptions, RunMode, Split};
use icu_output::{SplitOutputs, ensure_output_dir, write_frame, write_long_table};
use icu_transform::{CohortTable, TransformError, assemble_cohort, match_outcomes};

use crate::types::{OutputPaths, PrepareResult, SampleSummary, SplitSummary};

/// File name of the run manifest inside the data directory.
pub const MANIFEST_FILE_NAME: &str = "prepare-manifest.json";

/// Inputs of a `prepare` run.
#[derive(Debug, Clone)]
pub struct PrepareRequest {
    pub raw_root: PathBuf,
    pub data_dir: PathBuf,
    pub splits: Vec<Split>,
    pub options: PrepareOptions,
}

impl PrepareRequest {
    /// Request for every split with `<raw_root>/data` as output directory.
    pub fn new(raw_root: impl Into<PathBuf>) -> Self {
        let raw_root = raw_root.into();
        Self {
            data_dir: raw_root.join("data"),
            raw_root,
            splits: Split::ALL.to_vec(),
            options: PrepareOptions::default(),
        }
    }
}

// ============================================================================
// Stage 1: Discover
// ============================================================================

/// Where the inputs of one split live.
#[derive(Debug, Clone)]
pub struct SplitSource {
    pub split: Split,
    pub dir: PathBuf,
    pub files: Vec<PathBuf>,
    pub outcome_file: PathBuf,
}

/// Resolves the inputs of every requested split.
///
/// In sample mode the patient files come from the `-test` sibling directory,
/// which is created from the first N files when it does not exist yet.
pub fn discover(raw_root: &Path, splits: &[Split], mode: RunMode) -> Result<Vec<SplitSource>> {
    let dirs = resolve_split_dirs(raw_root, splits).context("resolve split directories")?;
    let mut sources = Vec::with_capacity(dirs.len());
    for (split, dir) in dirs {
        let dir = match mode {
            RunMode::Full => dir,
            RunMode::Sample { size } => {
                create_sample(&dir, size)
                    .with_context(|| format!("create sample for {split}"))?
                    .path
            }
        };
        let files = list_patient_files(&dir)
            .with_context(|| format!("list patient files in {}", dir.display()))?;
        let outcome_file =
            outcome_file(raw_root, split).with_context(|| format!("outcome file for {split}"))?;
        info!(split = %split, dir = %dir.display(), files = files.len(), "split discovered");
        sources.push(SplitSource {
            split,
            dir,
            files,
            outcome_file,
        });
    }
    Ok(sources)
}

/// Builds the development sample of each split without preparing anything.
pub fn sample_splits(raw_root: &Path, splits: &[Split], size: usize) -> Result<Vec<SampleSummary>> {
    let dirs = resolve_split_dirs(raw_root, splits).context("resolve split directories")?;
    dirs.into_iter()
        .map(|(split, dir)| {
            let sample =
                create_sample(&dir, size).with_context(|| format!("create sample for {split}"))?;
            Ok(SampleSummary {
                split,
                path: sample.path,
                created: sample.created,
                copied: sample.copied,
            })
        })
        .collect()
}

// ============================================================================
// Stages 2 and 3: Assemble and Match
// ============================================================================

/// Cohort and matched outcome table of one split.
#[derive(Debug)]
pub struct PreparedSplit {
    pub cohort: CohortTable,
    pub outcomes: DataFrame,
    /// Outcome rows before matching.
    pub outcome_rows: usize,
}

/// Assembles the cohort of a split and matches its outcomes.
///
/// `progress` is called after each patient file. An aborted split surfaces
/// as [`TransformError::Aborted`] at the root of the returned error.
pub fn prepare_split<F>(source: &SplitSource, options: &PrepareOptions, progress: F) -> Result<PreparedSplit>
where
    F: FnMut(&Path),
{
    let cohort = assemble_cohort(source.split, &source.files, options, progress)?;
    let outcomes = read_outcomes(&source.outcome_file)
        .with_context(|| format!("read outcomes for {}", source.split))?;
    let outcome_rows = outcomes.height();
    let outcomes = match_outcomes(outcomes, &cohort.record_ids(), options.mode)
        .with_context(|| format!("match outcomes for {}", source.split))?;
    Ok(PreparedSplit {
        cohort,
        outcomes,
        outcome_rows,
    })
}

// ============================================================================
// Stage 4: Output
// ============================================================================

/// Writes the cohort table and the outcome table of a split.
pub fn write_split_outputs(
    prepared: &mut PreparedSplit,
    data_dir: &Path,
    options: &PrepareOptions,
) -> Result<SplitOutputs> {
    let outputs = SplitOutputs::for_split(data_dir, prepared.cohort.split);
    write_long_table(&prepared.cohort.table, &outputs.table, options.compression)
        .with_context(|| format!("write {}", outputs.table.display()))?;
    write_frame(&mut prepared.outcomes, &outputs.outcomes, options.compression)
        .with_context(|| format!("write {}", outputs.outcomes.display()))?;
    info!(
        split = %prepared.cohort.split,
        table = %outputs.table.display(),
        outcomes = %outputs.outcomes.display(),
        "split outputs written"
    );
    Ok(outputs)
}

/// Writes the run manifest as pretty-printed JSON.
pub fn write_manifest(result: &PrepareResult, path: &Path) -> Result<()> {
    let file = File::create(path).with_context(|| format!("create {}", path.display()))?;
    serde_json::to_writer_pretty(BufWriter::new(file), result)
        .with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

// ============================================================================
// Whole run
// ============================================================================

/// Runs every stage for every requested split.
///
/// An aborted split is recorded in its summary and the run moves on to the
/// next split. Discovery problems and write failures end the run.
pub fn run_prepare(request: &PrepareRequest, progress: &ProgressBar) -> Result<PrepareResult> {
    let span = info_span!(
        "prepare",
        raw_root = %request.raw_root.display(),
        mode = %request.options.mode
    );
    let _guard = span.enter();
    let started_at = timestamp();
    let options = &request.options;

    let sources = discover(&request.raw_root, &request.splits, options.mode)?;
    if !options.dry_run {
        ensure_output_dir(&request.data_dir).context("create data directory")?;
    }

    let mut splits = Vec::with_capacity(sources.len());
    for source in &sources {
        splits.push(run_split(source, request, progress)?);
    }
    progress.finish_and_clear();

    let mut result = PrepareResult {
        raw_root: request.raw_root.clone(),
        data_dir: request.data_dir.clone(),
        mode: options.mode,
        gap_fill: options.gap_fill,
        compression: options.compression,
        dry_run: options.dry_run,
        started_at,
        finished_at: timestamp(),
        splits,
        manifest: None,
    };
    if !options.dry_run {
        let path = request.data_dir.join(MANIFEST_FILE_NAME);
        write_manifest(&result, &path)?;
        result.manifest = Some(path);
    }
    info!(
        splits = result.splits.len(),
        rows = result.total_rows(),
        errors = result.has_errors(),
        "prepare finished"
    );
    Ok(result)
}

fn run_split(source: &SplitSource, request: &PrepareRequest, progress: &ProgressBar) -> Result<SplitSummary> {
    progress.reset();
    progress.set_length(source.files.len() as u64);
    progress.set_message(source.split.to_string());

    let mut summary = SplitSummary {
        split: source.split,
        source_dir: source.dir.clone(),
        patient_files: source.files.len(),
        patients: 0,
        rows: 0,
        outcome_rows: 0,
        matched_outcome_rows: 0,
        issues: Default::default(),
        failures: Vec::new(),
        outputs: None,
        error: None,
    };

    let mut prepared = match prepare_split(source, &request.options, |_| progress.inc(1)) {
        Ok(prepared) => prepared,
        Err(err) if is_aborted(&err) => {
            error!(split = %source.split, error = %err, "split aborted");
            summary.error = Some(err.to_string());
            return Ok(summary);
        }
        Err(err) => return Err(err.context(format!("prepare {}", source.split))),
    };

    summary.patients = prepared.cohort.patient_count;
    summary.rows = prepared.cohort.row_count();
    summary.outcome_rows = prepared.outcome_rows;
    summary.matched_outcome_rows = prepared.outcomes.height();
    summary.issues = prepared.cohort.issues;
    summary.failures = prepared.cohort.failures.clone();

    if !request.options.dry_run {
        let outputs = write_split_outputs(&mut prepared, &request.data_dir, &request.options)?;
        summary.outputs = Some(OutputPaths::from(outputs));
    }
    Ok(summary)
}

fn is_aborted(err: &anyhow::Error) -> bool {
    matches!(
        err.downcast_ref::<TransformError>(),
        Some(TransformError::Aborted { .. })
    )
}

fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}
