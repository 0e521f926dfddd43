//! Hour-by-hour missingness.

use anyhow::{Context, Result};
use polars::prelude::*;

use icu_model::HOUR;

/// One row per hour; for each variable the fraction of rows at that hour
/// where the variable is unset.
pub fn hourly_missingness(frame: &DataFrame, variables: &[&str]) -> Result<DataFrame> {
    frame
        .column(HOUR)
        .with_context(|| format!("column {HOUR} not found"))?;
    for name in variables {
        frame
            .column(name)
            .with_context(|| format!("column {name} not found"))?;
    }

    let fractions: Vec<Expr> = variables
        .iter()
        .map(|name| {
            col(*name)
                .is_null()
                .cast(DataType::Float64)
                .mean()
                .alias(*name)
        })
        .collect();

    let out = frame
        .clone()
        .lazy()
        .group_by([col(HOUR)])
        .agg(fractions)
        .sort([HOUR], SortMultipleOptions::default())
        .collect()?;
    Ok(out)
}
