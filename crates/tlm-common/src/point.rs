//! Timestamped samples.

use serde::{Deserialize, Serialize};

use crate::value::TypedValue;

/// One sample of a field: a value at a point in time (seconds).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    pub timestamp: f64,
    pub value: TypedValue,
}

impl DataPoint {
    pub fn new(timestamp: f64, value: TypedValue) -> Self {
        DataPoint { timestamp, value }
    }

    /// Shorthand for [`TypedValue::scalar`].
    pub fn scalar(&self) -> f64 {
        self.value.scalar()
    }

    /// Copy of this sample moved to another timestamp.
    pub fn at(&self, timestamp: f64) -> Self {
        DataPoint {
            timestamp,
            value: self.value.clone(),
        }
    }
}
