//! Error types for telemetry decoding.

use thiserror::Error;
use tlm_common::ValueError;

/// Errors that abort decoding of a telemetry stream.
///
/// Decoding is whole-document strict: any error discards the partially
/// built container.
#[derive(Error, Debug)]
pub enum TelemetryError {
    /// A read ran past the end of the buffer.
    #[error("unexpected end of stream at offset {offset}: needed {needed} bytes, {remaining} remaining")]
    UnexpectedEndOfStream {
        offset: usize,
        needed: usize,
        remaining: usize,
    },

    /// Header does not declare the supported stream version.
    #[error("unsupported telemetry format: version {version}, header length {header_length}")]
    UnsupportedFormat { version: u32, header_length: u32 },

    /// Input exceeds the configured size bound.
    #[error("telemetry input is {size} bytes, limit is {limit}")]
    FileTooLarge { size: u64, limit: u64 },

    /// Opcode byte is not a known command.
    #[error("unknown command {opcode} at offset {offset}")]
    UnknownCommand { opcode: u8, offset: usize },

    /// Value type tag is not a known type.
    #[error("unknown value type tag {tag} at offset {offset}")]
    UnknownValueType { tag: u8, offset: usize },

    /// Unit tag is not a known unit.
    #[error("unknown unit tag {tag} at offset {offset}")]
    UnknownUnit { tag: u8, offset: usize },

    /// Event kind byte is not begin, end or meta.
    #[error("unknown event kind {kind:#04x} at offset {offset}")]
    UnknownEventKind { kind: u8, offset: usize },

    /// A command referenced a provider that was never registered.
    #[error("unknown provider {id}")]
    UnknownProvider { id: u16 },

    /// A packet referenced a field its provider never declared.
    #[error("unknown field {field} in provider {provider}")]
    UnknownField { provider: u16, field: u8 },

    /// A provider runtime id was registered twice.
    #[error("provider {id} registered twice")]
    DuplicateProvider { id: u16 },

    /// A provider identifier was registered twice under different ids.
    #[error("provider identifier '{identifier}' registered twice")]
    DuplicateProviderIdentifier { identifier: String },

    /// A length-delimited span was overrun by its contents.
    #[error("span at offset {offset} declared {declared} bytes but consumed {consumed}")]
    SpanOverrun {
        offset: usize,
        declared: usize,
        consumed: usize,
    },

    /// An event's parent does not exist (or is part of a cycle).
    #[error("event {id} references missing parent {parent}")]
    OrphanedEvent { id: u64, parent: u64 },

    /// Event parent links nest deeper than the supported limit.
    #[error("event {id} is nested deeper than {limit} levels")]
    EventNestingTooDeep { id: u64, limit: usize },

    /// An event ends before it starts.
    #[error("event {id} ends at {end} before it starts at {start}")]
    InvalidEventTiming { id: u64, start: f64, end: f64 },

    /// A value could not be projected to the type a command needs.
    #[error(transparent)]
    Value(#[from] ValueError),

    /// I/O error while loading or saving a document.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for telemetry operations.
pub type Result<T> = std::result::Result<T, TelemetryError>;
