//! Decoder and data model for simulator telemetry streams.
//!
//! A telemetry file is an append-only binary log written by the simulator:
//! providers declare typed fields and then stream timestamped packets,
//! statistics snapshots record key/value pairs, and begin/end event records
//! describe nested timed spans.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use tlm_telemetry::{DecimatingProcessor, ParserOptions, TelemetryDocument};
//!
//! let options = ParserOptions::new().with_processor(DecimatingProcessor::default());
//! let document = TelemetryDocument::open(Path::new("session.tlm"), &options).unwrap();
//!
//! for provider in document.container().providers() {
//!     println!("{} ({} fields)", provider.title, provider.fields().len());
//! }
//! ```

pub mod cursor;
pub mod document;
pub mod error;
pub mod event_tree;
pub mod model;
pub mod parser;
pub mod performance;
pub mod processor;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use cursor::ByteCursor;
pub use document::TelemetryDocument;
pub use error::{Result, TelemetryError};
pub use event_tree::{EventTable, StagedEvent, MAX_EVENT_DEPTH, PARENT_ATTRIBUTE};
pub use model::{Attribute, Container, Event, Field, Provider, Statistic};
pub use parser::{
    parse_telemetry, Command, EventKind, ParserOptions, SampleProcessor, HEADER_LENGTH,
    STREAM_VERSION,
};
pub use performance::{PerformanceData, TimeDomain, TIMING_PROVIDER};
pub use processor::{pad_to_range, DecimatingProcessor, DEFAULT_DECIMATION_TARGET};
