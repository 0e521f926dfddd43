//! Order statistics over plain slices.

/// Quantile with linear interpolation between closest ranks.
///
/// `sorted` must be ascending and free of NaN. Returns `None` when empty.
pub fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let q = q.clamp(0.0, 1.0);
    let pos = q * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let weight = pos - lower as f64;
    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * weight)
}

pub fn median(sorted: &[f64]) -> Option<f64> {
    quantile(sorted, 0.5)
}

/// Non-null, non-NaN values in ascending order.
pub fn sorted_values(values: &[Option<f64>]) -> Vec<f64> {
    let mut out: Vec<f64> = values
        .iter()
        .flatten()
        .copied()
        .filter(|v| !v.is_nan())
        .collect();
    out.sort_by(f64::total_cmp);
    out
}
