//! Core math modules.

pub mod decimate;
pub mod percentile;
pub mod performance;
pub mod running;
