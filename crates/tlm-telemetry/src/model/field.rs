//! A single typed channel of a provider.

use serde::Serialize;
use tlm_common::{field_color, DataPoint, RawString, Unit, ValueError, ValueType};

use crate::error::Result;

/// Typed, timestamped sample series declared by a provider.
///
/// Samples are kept in non-decreasing timestamp order; every range query
/// below relies on it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Field {
    pub id: u8,
    pub provider_id: u16,
    pub title: RawString,
    pub value_type: ValueType,
    pub unit: Unit,
    /// Display color derived from the title.
    pub color: String,
    samples: Vec<DataPoint>,
}

impl Field {
    pub fn new(
        id: u8,
        provider_id: u16,
        title: RawString,
        value_type: ValueType,
        unit: Unit,
    ) -> Self {
        let color = field_color(title.as_bytes());
        Field {
            id,
            provider_id,
            title,
            value_type,
            unit,
            color,
            samples: Vec::new(),
        }
    }

    pub fn samples(&self) -> &[DataPoint] {
        &self.samples
    }

    pub fn sample_count(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn push(&mut self, point: DataPoint) {
        self.samples.push(point);
    }

    /// Replace the whole series, e.g. with a decimated copy.
    ///
    /// The replacement is re-sorted by timestamp if needed; returns `true`
    /// when that happened.
    pub fn set_samples(&mut self, samples: Vec<DataPoint>) -> bool {
        self.samples = samples;
        self.ensure_sorted()
    }

    /// Stable re-sort by timestamp if the series arrived out of order.
    ///
    /// Returns `true` when a sort was needed.
    pub fn ensure_sorted(&mut self) -> bool {
        let sorted = self
            .samples
            .windows(2)
            .all(|w| w[0].timestamp <= w[1].timestamp);
        if !sorted {
            self.samples
                .sort_by(|a, b| a.timestamp.total_cmp(&b.timestamp));
        }
        !sorted
    }

    /// Smallest and largest timestamp, `None` when empty.
    pub fn time_bounds(&self) -> Option<(f64, f64)> {
        let first = self.samples.first()?;
        let last = self.samples.last()?;
        Some((first.timestamp, last.timestamp))
    }

    /// Samples with `start <= timestamp <= end`.
    pub fn data_points_in_range(&self, start: f64, end: f64) -> &[DataPoint] {
        let lo = self.samples.partition_point(|p| p.timestamp < start);
        let hi = self.samples.partition_point(|p| p.timestamp <= end);
        if lo >= hi {
            return &[];
        }
        &self.samples[lo..hi]
    }

    /// Sample nearest to `time`, looking at the first sample at or after
    /// `time` and its predecessor. Ties go to the later sample.
    ///
    /// `None` if every sample lies before `time`.
    pub fn closest_to_time(&self, time: f64) -> Option<&DataPoint> {
        let index = self.samples.partition_point(|p| p.timestamp < time);
        let candidate = self.samples.get(index)?;

        if index > 0 {
            let previous = &self.samples[index - 1];
            if (candidate.timestamp - time).abs() > (previous.timestamp - time).abs() {
                return Some(previous);
            }
        }

        Some(candidate)
    }

    /// Last sample strictly before the first sample at or after `time`
    /// (or that first sample itself if nothing precedes it).
    ///
    /// This is the "value in effect" lookup used for event-style fields.
    /// `None` if every sample lies before `time`.
    pub fn point_before_time(&self, time: f64) -> Option<&DataPoint> {
        let index = self.samples.partition_point(|p| p.timestamp < time);
        self.samples.get(index)?;

        if index > 0 {
            return self.samples.get(index - 1);
        }
        self.samples.get(index)
    }

    /// Minimum and maximum sample by value in `[start, end]`.
    ///
    /// Ties keep the earliest sample. An empty window falls back to the
    /// sample closest to `start` for both ends; `Ok(None)` if there is no
    /// such sample either. String and vector fields have no ordering and
    /// are rejected.
    pub fn extremes_in_range(
        &self,
        start: f64,
        end: f64,
    ) -> Result<Option<(&DataPoint, &DataPoint)>> {
        if matches!(
            self.value_type,
            ValueType::String | ValueType::Vec2 | ValueType::DVec2
        ) {
            return Err(ValueError::UnsupportedValueConversion {
                from: self.value_type,
                to: "ordered scalar",
            }
            .into());
        }

        let window = self.data_points_in_range(start, end);
        let Some(first) = window.first() else {
            return Ok(self.closest_to_time(start).map(|p| (p, p)));
        };

        let (mut min, mut max) = (first, first);
        for point in &window[1..] {
            if point.scalar() < min.scalar() {
                min = point;
            }
            if point.scalar() > max.scalar() {
                max = point;
            }
        }

        Ok(Some((min, max)))
    }
}
