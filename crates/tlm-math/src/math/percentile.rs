//! Averages and percentiles over sample values.
//!
//! The weighted percentile walks value-sorted samples accumulating the values
//! themselves, so it answers "which frame time accounts for p of the total
//! time spent" rather than "which frame is at rank p". It assumes
//! non-negative, duration-like samples.

/// Arithmetic mean, 0.0 for an empty slice.
pub fn average(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sort values ascending. NaN sorts last.
pub fn sort_ascending(values: &mut [f64]) {
    values.sort_by(|a, b| a.total_cmp(b));
}

/// Weighted percentile over ascending-sorted values.
///
/// Returns the first value whose running sum reaches `p * total`, or the
/// last value if rounding keeps the running sum below the threshold.
/// `p` is clamped to `[0, 1]`. Returns 0.0 for an empty slice.
pub fn weighted_percentile(sorted: &[f64], p: f64) -> f64 {
    let last = match sorted.last() {
        Some(last) => *last,
        None => return 0.0,
    };

    let total: f64 = sorted.iter().sum();
    let needle = total * p.clamp(0.0, 1.0);

    let mut running = 0.0;
    for value in sorted {
        running += value;
        if running >= needle {
            return *value;
        }
    }

    last
}

/// Rank percentile over ascending-sorted values.
///
/// Picks index `floor(len * p) - 1`, clamped into the slice.
/// Returns 0.0 for an empty slice.
pub fn rank_percentile(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }

    let index = ((sorted.len() as f64 * p.clamp(0.0, 1.0)) as usize)
        .saturating_sub(1)
        .min(sorted.len() - 1);

    sorted[index]
}
