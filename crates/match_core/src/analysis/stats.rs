//! Small numeric helpers shared by the analysis components.
//!
//! Empty inputs resolve to 0.0 rather than NaN.

/// Median of a slice. Even-length inputs average the two middle values.
pub fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

pub fn min(values: &[f64]) -> f64 {
    values.iter().copied().reduce(f64::min).unwrap_or(0.0)
}

pub fn max(values: &[f64]) -> f64 {
    values.iter().copied().reduce(f64::max).unwrap_or(0.0)
}

/// Round to two decimals, ties away from zero.
///
/// Values sitting exactly on a tie (`0.125`, `0.625`) therefore differ by
/// one hundredth from half-to-even rounding as done by numpy's `round`. Ties
/// are rare in practice since most decimal inputs are not exact in binary.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// `numerator / denominator`, or 0 when the denominator is 0.
pub fn ratio_or_zero(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

/// Percentage split of a count pair, rounded to 2 decimals. A zero total gives (0, 0).
pub fn percentage_split(home: usize, away: usize) -> (f64, f64) {
    let total = (home + away) as f64;
    (
        round2(ratio_or_zero(home as f64, total) * 100.0),
        round2(ratio_or_zero(away as f64, total) * 100.0),
    )
}
