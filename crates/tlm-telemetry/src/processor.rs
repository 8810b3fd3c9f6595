//! Chart-oriented post-processing of decoded fields.

use tlm_common::{DataPoint, Unit};
use tlm_math::{decimate, decimate_by};

use crate::model::{Container, Field, Provider};
use crate::parser::SampleProcessor;

/// Default point budget per field.
pub const DEFAULT_DECIMATION_TARGET: usize = 1000;

/// Decimates every field to a point budget and optionally stretches the
/// result over the container's full time range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecimatingProcessor {
    /// Point budget; 0 disables decimation.
    pub target: usize,
    pub pad_to_range: bool,
}

impl Default for DecimatingProcessor {
    fn default() -> Self {
        DecimatingProcessor {
            target: DEFAULT_DECIMATION_TARGET,
            pad_to_range: true,
        }
    }
}

impl DecimatingProcessor {
    pub fn new(target: usize, pad_to_range: bool) -> Self {
        DecimatingProcessor {
            target,
            pad_to_range,
        }
    }
}

impl SampleProcessor for DecimatingProcessor {
    fn process(
        &self,
        container: &Container,
        _provider: &Provider,
        field: &Field,
        samples: &[DataPoint],
    ) -> Vec<DataPoint> {
        // Duration pairs are charted by their length.
        let mut result = if field.unit == Unit::Duration {
            decimate_by(samples, self.target, |p| {
                p.value.span().unwrap_or_else(|| p.scalar())
            })
        } else {
            decimate(samples, self.target)
        };

        if self.pad_to_range {
            pad_to_range(&mut result, container.start_time, container.end_time);
        }
        result
    }
}

/// Duplicate the first and last sample at `start` and `end` if the series
/// does not already reach them.
pub fn pad_to_range(samples: &mut Vec<DataPoint>, start: f64, end: f64) {
    if let Some(first) = samples.first() {
        if first.timestamp > start {
            let padded = first.at(start);
            samples.insert(0, padded);
        }
    }

    if let Some(last) = samples.last() {
        if last.timestamp < end {
            let padded = last.at(end);
            samples.push(padded);
        }
    }
}
