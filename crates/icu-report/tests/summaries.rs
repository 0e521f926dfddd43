//! Summaries over a frame laid out like a prepared cohort table.

use icu_model::{HOUR, RECORD_ID, schema_registry};
use icu_report::{hourly_missingness, median_centered_spread, profile_variables};
use polars::prelude::*;

fn cohort_frame() -> DataFrame {
    let registry = schema_registry();
    let mut columns: Vec<Column> = vec![
        Series::new(RECORD_ID.into(), &["1", "1", "2"]).into(),
        Series::new(HOUR.into(), &[0_i64, 1, 0]).into(),
    ];
    for name in registry.static_variables() {
        columns.push(Series::new((*name).into(), &[Some("1"), Some("1"), None]).into());
    }
    for name in registry.time_series_variables() {
        let values = if *name == "HR" {
            [Some(72.0), Some(75.0), Some(90.0)]
        } else {
            [None, None, None]
        };
        columns.push(Series::new((*name).into(), &values).into());
    }
    DataFrame::new(columns).unwrap()
}

#[test]
fn profiles_every_series_variable() {
    let frame = cohort_frame();
    let variables = schema_registry().time_series_variables();
    let profiles = profile_variables(&frame, variables).unwrap();
    assert_eq!(profiles.len(), 37);
    let hr = profiles.iter().find(|p| p.variable == "HR").unwrap();
    assert_eq!((hr.observed, hr.missing), (3, 0));
    assert_eq!(hr.median, Some(75.0));
    assert!(
        profiles
            .iter()
            .filter(|p| p.variable != "HR")
            .all(|p| p.missing_fraction == 1.0)
    );
}

#[test]
fn statics_stored_as_text_profile_as_numbers() {
    let frame = cohort_frame();
    let profiles = profile_variables(&frame, &["Gender"]).unwrap();
    assert_eq!(profiles[0].observed, 2);
    assert_eq!(profiles[0].max, Some(1.0));
}

#[test]
fn missingness_and_spread_share_hours() {
    let frame = cohort_frame();
    let missing = hourly_missingness(&frame, &["HR", "pH"]).unwrap();
    let spread = median_centered_spread(&frame, "HR").unwrap();
    assert_eq!(missing.height(), spread.len());
    assert_eq!(spread[0].median, 81.0);
    assert_eq!(spread[1].observed, 1);
}
