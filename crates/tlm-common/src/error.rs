//! Error types for value projections.

use thiserror::Error;

use crate::value::ValueType;

/// Errors raised when a typed value is read as an incompatible type.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValueError {
    /// The value cannot be projected to the requested representation.
    #[error("unsupported value conversion from {from} to {to}")]
    UnsupportedValueConversion { from: ValueType, to: &'static str },
}

/// Result type alias for value operations.
pub type Result<T> = std::result::Result<T, ValueError>;
