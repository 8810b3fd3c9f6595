//! Telemetry math utilities.

pub mod error;
pub mod math;

pub use error::{MathError, Result};
pub use math::decimate::*;
pub use math::percentile::*;
pub use math::performance::{PerformanceCalculator, PerformanceSummary};
pub use math::running::RunningAverage;
