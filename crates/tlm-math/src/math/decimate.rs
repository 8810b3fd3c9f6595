//! Visual downsampling with Largest-Triangle-Three-Buckets.
//!
//! Reduces a time-ordered series to a point budget while keeping the samples
//! that shape the curve (spikes and dips), rather than averaging them away.
//! The first and last samples are always kept verbatim.

use tlm_common::DataPoint;

/// Downsample `input` to at most `threshold` points using the default
/// scalar projection of each value.
///
/// Returns the input unchanged when `threshold` is 0 or not smaller than the
/// input length.
pub fn decimate(input: &[DataPoint], threshold: usize) -> Vec<DataPoint> {
    decimate_by(input, threshold, DataPoint::scalar)
}

/// Downsample with a caller-supplied projection for the y axis.
///
/// Ties on triangle area keep the earliest sample in the bucket, so the
/// output is a pure function of the input order and `threshold`.
pub fn decimate_by<F>(input: &[DataPoint], threshold: usize, project: F) -> Vec<DataPoint>
where
    F: Fn(&DataPoint) -> f64,
{
    let len = input.len();
    if threshold == 0 || threshold >= len {
        return input.to_vec();
    }

    let (first, last) = match (input.first(), input.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => return input.to_vec(),
    };

    if threshold <= 2 {
        return vec![first.clone(), last.clone()];
    }

    let ys: Vec<f64> = input.iter().map(&project).collect();
    let buckets = threshold - 2;
    let every = (len - 2) as f64 / buckets as f64;

    let mut result = Vec::with_capacity(threshold);
    result.push(first.clone());

    let mut a = 0usize;

    for i in 0..buckets {
        // Centroid of the next bucket is the third triangle vertex.
        let next_start = bucket_edge(i + 1, every);
        let next_end = bucket_edge(i + 2, every).min(len);

        let (avg_x, avg_y) = if next_start < next_end {
            let n = (next_end - next_start) as f64;
            let (sx, sy) = (next_start..next_end).fold((0.0, 0.0), |(sx, sy), j| {
                (sx + input[j].timestamp, sy + ys[j])
            });
            (sx / n, sy / n)
        } else {
            (last.timestamp, ys[len - 1])
        };

        let start = bucket_edge(i, every);
        let end = bucket_edge(i + 1, every).min(len - 1);

        let point_a_x = input[a].timestamp;
        let point_a_y = ys[a];

        let mut max_area = -1.0;
        let mut chosen = None;

        for j in start..end {
            let area = ((point_a_x - avg_x) * (ys[j] - point_a_y)
                - (point_a_x - input[j].timestamp) * (avg_y - point_a_y))
                .abs()
                * 0.5;

            if area > max_area {
                max_area = area;
                chosen = Some(j);
            }
        }

        if let Some(j) = chosen {
            result.push(input[j].clone());
            a = j;
        }
    }

    result.push(last.clone());
    result
}

fn bucket_edge(bucket: usize, every: f64) -> usize {
    (bucket as f64 * every).floor() as usize + 1
}
