//! Shared telemetry types.
//!
//! This crate provides the leaf types every other telemetry crate builds on:
//! - Typed sample values and their wire type tags
//! - Measurement units
//! - Raw (not UTF-8 validated) strings as found in the stream
//! - Timestamped data points
//! - Deterministic field colors

pub mod color;
pub mod error;
pub mod point;
pub mod string;
pub mod unit;
pub mod value;

pub use color::{field_color, FIELD_LIGHTNESS, FIELD_SATURATION};
pub use error::{Result, ValueError};
pub use point::DataPoint;
pub use string::RawString;
pub use unit::Unit;
pub use value::{TypedValue, ValueType};
