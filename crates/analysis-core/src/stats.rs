//! Small descriptive statistics shared by the indicator and forecast engines.

fn is_constant(data: &[f64]) -> bool {
    data.split_first()
        .map_or(false, |(first, rest)| rest.iter().all(|x| x == first))
}

/// Compute the mean of a data slice.
///
/// A constant slice returns its value exactly rather than a rounded sum.
pub fn mean(data: &[f64]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    if is_constant(data) {
        return data[0];
    }
    data.iter().sum::<f64>() / data.len() as f64
}

/// Compute sample standard deviation (n - 1 denominator). Exactly zero for a constant slice.
pub fn std_dev(data: &[f64]) -> f64 {
    if data.len() < 2 || is_constant(data) {
        return 0.0;
    }
    let m = mean(data);
    let variance = data.iter().map(|x| (x - m).powi(2)).sum::<f64>() / (data.len() - 1) as f64;
    variance.sqrt()
}

/// Smallest and largest value, or `None` for an empty slice.
pub fn min_max(data: &[f64]) -> Option<(f64, f64)> {
    if data.is_empty() {
        return None;
    }
    let min = data.iter().copied().fold(f64::INFINITY, f64::min);
    let max = data.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    Some((min, max))
}

/// Percentage change from `base` to `value`, e.g. 110 vs 100 -> 10.0.
pub fn pct_change(value: f64, base: f64) -> f64 {
    (value / base - 1.0) * 100.0
}
