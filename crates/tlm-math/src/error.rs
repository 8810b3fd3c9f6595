//! Error types for telemetry math.

use thiserror::Error;

/// Precondition failures on already-decoded sample data.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MathError {
    /// Median requested over a range that does not fit the sample set.
    #[error("invalid median range {start}..{end} for {len} samples")]
    MedianRange { start: usize, end: usize, len: usize },
}

/// Result type alias for math operations.
pub type Result<T> = std::result::Result<T, MathError>;
