//! tlm core library.
//!
//! Application shell for the `tlm` binary: configuration resolution,
//! logging setup, exit codes and the command implementations that sit on
//! top of `tlm-telemetry`.

pub mod commands;
pub mod config;
pub mod exit_codes;
pub mod logging;
pub mod output;

pub use exit_codes::ExitCode;
