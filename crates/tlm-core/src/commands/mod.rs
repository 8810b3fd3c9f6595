//! Command implementations for the `tlm` binary.
//!
//! Every command writes its result to the supplied writer (stdout in the
//! binary) and returns a [`CommandError`] that carries its exit code.

pub mod check;
pub mod events;
pub mod inspect;
pub mod stats;

use std::path::Path;

use thiserror::Error;
use tlm_telemetry::{ParserOptions, TelemetryDocument, TelemetryError};
use tracing::debug;

use crate::config::ViewerConfig;
use crate::exit_codes::ExitCode;
use crate::output::OutputFormat;

/// Errors surfaced by commands.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Telemetry(#[from] TelemetryError),

    #[error("provider '{identifier}' not found")]
    ProviderNotFound { identifier: String },

    #[error("field {field} not found in provider '{provider}'")]
    FieldNotFound { provider: String, field: u8 },

    #[error("recording has no timing provider; pass --provider and --field")]
    NoTimingProvider,

    #[error("invalid time window: start {start} is after end {end}")]
    InvalidRange { start: f64, end: f64 },

    #[error("failed to write output: {0}")]
    Output(#[from] std::io::Error),
}

impl CommandError {
    pub fn exit_code(&self) -> ExitCode {
        match self {
            CommandError::Telemetry(err) => ExitCode::from(err),
            CommandError::ProviderNotFound { .. }
            | CommandError::FieldNotFound { .. }
            | CommandError::NoTimingProvider
            | CommandError::InvalidRange { .. } => ExitCode::ArgsError,
            CommandError::Output(_) => ExitCode::IoError,
        }
    }
}

/// Settings shared by all commands.
#[derive(Debug, Clone, Default)]
pub struct CommandContext {
    pub config: ViewerConfig,
    pub format: OutputFormat,
}

impl CommandContext {
    pub fn new(config: ViewerConfig, format: OutputFormat) -> Self {
        CommandContext { config, format }
    }
}

pub(crate) fn open_document(
    path: &Path,
    options: &ParserOptions,
) -> Result<TelemetryDocument, CommandError> {
    let document = TelemetryDocument::open(path, options)?;
    let container = document.container();
    debug!(
        path = %path.display(),
        providers = container.providers().len(),
        events = container.event_count(),
        "opened recording"
    );
    Ok(document)
}
