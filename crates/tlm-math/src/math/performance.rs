//! Frame-time statistics over a time window of a field.
//!
//! [`PerformanceCalculator`] copies the samples inside `[start, end]` and
//! sorts the copy by value, so the caller's chronological series is never
//! reordered. Non-numeric samples contribute their scalar projection.

use serde::Serialize;
use tlm_common::DataPoint;

use crate::error::{MathError, Result};
use crate::math::percentile::{rank_percentile, weighted_percentile};

/// Value-sorted snapshot of a field's samples in a time window.
#[derive(Debug, Clone, Default)]
pub struct PerformanceCalculator {
    samples: Vec<DataPoint>,
    values: Vec<f64>,
}

impl PerformanceCalculator {
    /// Snapshot the samples with `start <= timestamp <= end`.
    pub fn new(points: &[DataPoint], start: f64, end: f64) -> Self {
        Self::from_samples(
            points
                .iter()
                .filter(|p| p.timestamp >= start && p.timestamp <= end)
                .cloned(),
        )
    }

    /// Build from an arbitrary set of samples.
    pub fn from_samples(samples: impl IntoIterator<Item = DataPoint>) -> Self {
        let mut samples: Vec<DataPoint> = samples.into_iter().collect();
        samples.sort_by(|a, b| a.scalar().total_cmp(&b.scalar()));

        let values = samples.iter().map(DataPoint::scalar).collect();
        PerformanceCalculator { samples, values }
    }

    pub fn sample_count(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Value-sorted samples.
    pub fn samples(&self) -> &[DataPoint] {
        &self.samples
    }

    /// Scalar value at `index` in value order.
    pub fn sample(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied()
    }

    /// Arithmetic mean, 0.0 when empty.
    pub fn average(&self) -> f64 {
        crate::math::percentile::average(&self.values)
    }

    /// Weighted percentile, see [`weighted_percentile`].
    pub fn percentile(&self, p: f64) -> f64 {
        weighted_percentile(&self.values, p)
    }

    /// Rank percentile, see [`rank_percentile`].
    pub fn rank_percentile(&self, p: f64) -> f64 {
        rank_percentile(&self.values, p)
    }

    /// Smallest value, 0.0 when empty.
    pub fn minimum(&self) -> f64 {
        self.values.first().copied().unwrap_or(0.0)
    }

    /// Largest value, 0.0 when empty.
    pub fn maximum(&self) -> f64 {
        self.values.last().copied().unwrap_or(0.0)
    }

    /// Median of the value-sorted half-open range `start..end`.
    ///
    /// An odd count larger than one averages the element at the midpoint
    /// with its left neighbour; an even (or unit) count returns the single
    /// element at `start + count / 2`. Charts are calibrated against this
    /// rule, so it is kept as is.
    ///
    /// # Panics
    ///
    /// Panics if `start >= len`, `end > len` or the range is empty. Use
    /// [`try_median`](Self::try_median) for a checked variant.
    pub fn median(&self, start: usize, end: usize) -> f64 {
        match self.try_median(start, end) {
            Ok(value) => value,
            Err(err) => panic!("{}", err),
        }
    }

    /// Checked variant of [`median`](Self::median).
    pub fn try_median(&self, start: usize, end: usize) -> Result<f64> {
        let len = self.values.len();
        if start >= len || end > len || end <= start {
            return Err(MathError::MedianRange { start, end, len });
        }

        let count = end - start;
        let half = count / 2;

        if count % 2 == 1 && count > 1 {
            let right = self.values[start + half];
            let left = self.values[start + half - 1];
            return Ok((right + left) / 2.0);
        }

        Ok(self.values[start + half])
    }

    /// Median over all samples, 0.0 when empty.
    pub fn median_all(&self) -> f64 {
        self.try_median(0, self.values.len()).unwrap_or(0.0)
    }

    /// Summary with the requested weighted percentiles.
    pub fn summary(&self, percentiles: &[f64]) -> PerformanceSummary {
        PerformanceSummary {
            samples: self.sample_count(),
            minimum: self.minimum(),
            maximum: self.maximum(),
            average: self.average(),
            median: self.median_all(),
            percentiles: percentiles
                .iter()
                .map(|p| (*p, self.percentile(*p)))
                .collect(),
        }
    }
}

/// Serializable snapshot of the common statistics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformanceSummary {
    pub samples: usize,
    pub minimum: f64,
    pub maximum: f64,
    pub average: f64,
    pub median: f64,
    /// `(p, weighted percentile)` pairs.
    pub percentiles: Vec<(f64, f64)>,
}
