//! Per-variable distribution profiles.

use anyhow::{Context, Result};
use polars::prelude::*;
use serde::Serialize;

use crate::stats::{median, sorted_values};

/// Observed/missing counts and range of one numeric variable.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariableProfile {
    pub variable: String,
    pub observed: usize,
    pub missing: usize,
    pub missing_fraction: f64,
    pub min: Option<f64>,
    pub median: Option<f64>,
    pub max: Option<f64>,
}

/// Reads a column as `f64` values; text that does not parse becomes unset.
pub(crate) fn float_column(frame: &DataFrame, name: &str) -> Result<Vec<Option<f64>>> {
    let column = frame
        .column(name)
        .with_context(|| format!("column {name} not found"))?;
    let cast = column
        .cast(&DataType::Float64)
        .with_context(|| format!("column {name} is not numeric"))?;
    Ok(cast.f64()?.into_iter().collect())
}

/// Profiles every listed variable of a prepared cohort frame.
pub fn profile_variables(frame: &DataFrame, variables: &[&str]) -> Result<Vec<VariableProfile>> {
    let rows = frame.height();
    variables
        .iter()
        .map(|name| {
            let values = float_column(frame, name)?;
            let sorted = sorted_values(&values);
            let missing = rows - sorted.len();
            Ok(VariableProfile {
                variable: (*name).to_string(),
                observed: sorted.len(),
                missing,
                missing_fraction: if rows == 0 {
                    0.0
                } else {
                    missing as f64 / rows as f64
                },
                min: sorted.first().copied(),
                median: median(&sorted),
                max: sorted.last().copied(),
            })
        })
        .collect()
}
