//! Cohort assembly followed by outcome matching.

use std::fs;
use std::path::PathBuf;

use polars::prelude::*;
use tempfile::TempDir;

use icu_model::{GapFillPolicy, PrepareOptions, RECORD_ID, RunMode, Split};
use icu_transform::{assemble_cohort, match_outcomes};

fn write_patients(dir: &TempDir) -> Vec<PathBuf> {
    let bodies = [
        ("140001.txt", "00:00,RecordID,140001\n02:00,HR,70\n05:00,HR,71\n"),
        ("140002.txt", "00:00,RecordID,140002\n00:00,Age,61\n01:30,Temp,37.2\n"),
    ];
    bodies
        .iter()
        .map(|(name, body)| {
            let path = dir.path().join(name);
            fs::write(&path, format!("Time,Parameter,Value\n{body}")).unwrap();
            path
        })
        .collect()
}

fn outcomes() -> DataFrame {
    DataFrame::new(vec![
        Series::new(RECORD_ID.into(), &[140000_i64, 140001, 140002, 140003]).into(),
        Series::new("In-hospital_death".into(), &[0_i64, 1, 0, 1]).into(),
    ])
    .unwrap()
}

#[test]
fn sample_cohort_keeps_only_its_outcomes() {
    let dir = TempDir::new().unwrap();
    let files = write_patients(&dir);
    let options = PrepareOptions::default().with_mode(RunMode::Sample { size: 2 });
    let cohort = assemble_cohort(Split::Training, &files, &options, |_| {}).unwrap();

    // 0..=5 and 0..=2
    assert_eq!(cohort.row_count(), 9);
    let matched = match_outcomes(outcomes(), &cohort.record_ids(), options.mode).unwrap();
    let ids: Vec<Option<i64>> = matched
        .column(RECORD_ID)
        .unwrap()
        .i64()
        .unwrap()
        .into_iter()
        .collect();
    assert_eq!(ids, vec![Some(140001), Some(140002)]);
}

#[test]
fn full_mode_passes_outcomes_through() {
    let dir = TempDir::new().unwrap();
    let files = write_patients(&dir);
    let options = PrepareOptions::default().with_gap_fill(GapFillPolicy::Admission);
    let cohort = assemble_cohort(Split::Training, &files, &options, |_| {}).unwrap();
    let matched = match_outcomes(outcomes(), &cohort.record_ids(), options.mode).unwrap();
    assert_eq!(matched.height(), 4);
}
