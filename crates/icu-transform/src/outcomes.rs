//! Restricting outcome tables to the patients of a cohort.

use std::collections::HashSet;

use polars::prelude::*;
use tracing::{info, warn};

use icu_common::column_to_strings;
use icu_model::{RECORD_ID, RunMode};

use crate::error::{Result, TransformError};

/// Matches an outcome table against the record ids of a cohort.
///
/// In [`RunMode::Full`] the table is returned unchanged. In
/// [`RunMode::Sample`] the `RecordID` column is rendered as text (so `132539`
/// and `132539.0` compare equal) and only rows whose id is in `cohort_ids`
/// are kept, in their original order. Matching an already matched table
/// returns the same rows.
pub fn match_outcomes(outcomes: DataFrame, cohort_ids: &[String], mode: RunMode) -> Result<DataFrame> {
    if !mode.is_sample() {
        return Ok(outcomes);
    }

    let column = outcomes
        .column(RECORD_ID)
        .map_err(|_| TransformError::MissingColumn {
            column: RECORD_ID.to_string(),
        })?;
    let ids = column_to_strings(column)?;
    // An empty id is a missing one on either side and never matches.
    let wanted: HashSet<&str> = cohort_ids
        .iter()
        .map(String::as_str)
        .filter(|id| !id.is_empty())
        .collect();
    let keep: Vec<bool> = ids.iter().map(|id| wanted.contains(id.as_str())).collect();
    let mask = BooleanChunked::from_slice("keep".into(), &keep);
    let matched = outcomes.filter(&mask)?;

    if matched.height() == 0 {
        warn!(
            outcomes = outcomes.height(),
            cohort = cohort_ids.len(),
            "no outcome rows match the cohort"
        );
    } else {
        info!(
            kept = matched.height(),
            dropped = outcomes.height() - matched.height(),
            "outcomes matched to cohort"
        );
    }
    Ok(matched)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcomes() -> DataFrame {
        DataFrame::new(vec![
            Series::new("RecordID".into(), &[132539_i64, 132540, 132541]).into(),
            Series::new("In-hospital_death".into(), &[0_i64, 1, 0]).into(),
        ])
        .unwrap()
    }

    fn ids(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| (*v).to_string()).collect()
    }

    #[test]
    fn full_mode_passes_through() {
        let matched = match_outcomes(outcomes(), &[], RunMode::Full).unwrap();
        assert_eq!(matched.height(), 3);
    }

    #[test]
    fn sample_mode_keeps_cohort_rows_in_order() {
        let matched = match_outcomes(
            outcomes(),
            &ids(&["132541", "132539", "999"]),
            RunMode::Sample { size: 2 },
        )
        .unwrap();
        let kept: Vec<Option<i64>> = matched
            .column("RecordID")
            .unwrap()
            .i64()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(kept, vec![Some(132539), Some(132541)]);
    }

    #[test]
    fn float_ids_match_textual_ids() {
        let frame =
            DataFrame::new(vec![Series::new("RecordID".into(), &[132539.0_f64, 132540.0]).into()])
                .unwrap();
        let matched =
            match_outcomes(frame, &ids(&["132540"]), RunMode::Sample { size: 1 }).unwrap();
        assert_eq!(matched.height(), 1);
    }

    #[test]
    fn matching_is_idempotent() {
        let cohort = ids(&["132540"]);
        let mode = RunMode::Sample { size: 1 };
        let once = match_outcomes(outcomes(), &cohort, mode).unwrap();
        let twice = match_outcomes(once.clone(), &cohort, mode).unwrap();
        assert!(once.equals_missing(&twice));
    }

    #[test]
    fn empty_match_is_not_an_error() {
        let matched =
            match_outcomes(outcomes(), &ids(&["1"]), RunMode::Sample { size: 1 }).unwrap();
        assert_eq!(matched.height(), 0);
        assert_eq!(matched.width(), 2);
    }

    #[test]
    fn null_outcome_id_never_matches_a_missing_cohort_id() {
        let frame = DataFrame::new(vec![
            Series::new("RecordID".into(), &[None, Some(132540_i64)]).into(),
            Series::new("In-hospital_death".into(), &[1_i64, 0]).into(),
        ])
        .unwrap();
        let matched =
            match_outcomes(frame, &ids(&["", "132540"]), RunMode::Sample { size: 2 }).unwrap();
        let kept: Vec<Option<i64>> = matched
            .column("RecordID")
            .unwrap()
            .i64()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(kept, vec![Some(132540)]);
    }

    #[test]
    fn missing_record_id_column() {
        let frame = DataFrame::new(vec![Series::new("id".into(), &[1_i64]).into()]).unwrap();
        let err = match_outcomes(frame, &[], RunMode::Sample { size: 1 }).unwrap_err();
        insta::assert_snapshot!(err.to_string(), @"column 'RecordID' not found in outcome table");
    }
}
