//! Hourly spread of a variable around its hourly median.

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use polars::prelude::*;
use serde::Serialize;

use icu_model::HOUR;

use crate::profile::float_column;
use crate::stats::{median, quantile, sorted_values};

/// Lower and upper quantiles of the median-centred values.
pub const SPREAD_QUANTILES: (f64, f64) = (0.025, 0.975);

/// Spread of one variable within one hour.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourSpread {
    pub hour: i64,
    pub observed: usize,
    pub median: f64,
    /// 2.5% quantile of `value - median`.
    pub lower: f64,
    /// 97.5% quantile of `value - median`.
    pub upper: f64,
}

/// For each hour with at least one observation, centres the values on their
/// hourly median and reports the inner 95% range. Hours without observations
/// are omitted.
pub fn median_centered_spread(frame: &DataFrame, variable: &str) -> Result<Vec<HourSpread>> {
    let hours = frame
        .column(HOUR)
        .with_context(|| format!("column {HOUR} not found"))?
        .cast(&DataType::Int64)?;
    let hours: Vec<Option<i64>> = hours.i64()?.into_iter().collect();
    let values = float_column(frame, variable)?;

    let mut by_hour: BTreeMap<i64, Vec<Option<f64>>> = BTreeMap::new();
    for (hour, value) in hours.into_iter().zip(values) {
        if let Some(hour) = hour {
            by_hour.entry(hour).or_default().push(value);
        }
    }

    let (low_q, high_q) = SPREAD_QUANTILES;
    let mut spreads = Vec::with_capacity(by_hour.len());
    for (hour, values) in by_hour {
        let sorted = sorted_values(&values);
        let Some(center) = median(&sorted) else {
            continue;
        };
        let centred: Vec<f64> = sorted.iter().map(|v| v - center).collect();
        let (Some(lower), Some(upper)) = (quantile(&centred, low_q), quantile(&centred, high_q))
        else {
            continue;
        };
        spreads.push(HourSpread {
            hour,
            observed: sorted.len(),
            median: center,
            lower,
            upper,
        });
    }
    Ok(spreads)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centres_on_hourly_median() {
        let frame = DataFrame::new(vec![
            Series::new(HOUR.into(), &[0_i64, 0, 0, 1, 1, 2]).into(),
            Series::new(
                "HR".into(),
                &[Some(70.0), Some(80.0), Some(90.0), Some(100.0), None, None],
            )
            .into(),
        ])
        .unwrap();

        let spread = median_centered_spread(&frame, "HR").unwrap();
        assert_eq!(spread.len(), 2);
        assert_eq!(spread[0].hour, 0);
        assert_eq!(spread[0].median, 80.0);
        assert!((spread[0].lower - -9.5).abs() < 1e-9);
        assert!((spread[0].upper - 9.5).abs() < 1e-9);
        assert_eq!(spread[1].hour, 1);
        assert_eq!(spread[1].observed, 1);
        assert_eq!(spread[1].lower, 0.0);
    }
}
