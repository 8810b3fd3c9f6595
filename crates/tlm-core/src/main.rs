//! tlm - simulator telemetry inspector
//!
//! The main entry point for the `tlm` binary, handling:
//! - Decoding telemetry recordings
//! - Field statistics over raw samples
//! - Event forest listing and validity checks

use std::io::Write;
use std::path::PathBuf;

use clap::error::ErrorKind;
use clap::{Args, Parser, Subcommand};
use tlm_core::commands::check::CheckArgs;
use tlm_core::commands::events::EventsArgs;
use tlm_core::commands::inspect::InspectArgs;
use tlm_core::commands::stats::StatsArgs;
use tlm_core::commands::{self, CommandContext, CommandError};
use tlm_core::config::{load_config, ConfigOptions};
use tlm_core::exit_codes::ExitCode;
use tlm_core::logging::{init_logging, LogConfig, LogFormat, LogLevel};
use tlm_core::output::OutputFormat;

/// Inspect simulator telemetry recordings
#[derive(Parser)]
#[command(name = "tlm")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    global: GlobalOpts,
}

/// Global options available to all commands
#[derive(Args, Debug)]
struct GlobalOpts {
    /// Config file (overrides TLM_CONFIG and the XDG config)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "summary")]
    format: OutputFormat,

    /// Log level (overrides TLM_LOG and RUST_LOG)
    #[arg(long, global = true)]
    log_level: Option<LogLevel>,

    /// Log format on stderr (overrides TLM_LOG_FORMAT)
    #[arg(long, global = true)]
    log_format: Option<LogFormat>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Decode a recording and list providers, fields, statistics and events
    Inspect(InspectArgs),

    /// Statistics for one field, or for the simulator timing channels
    Stats(StatsArgs),

    /// Print the event forest
    Events(EventsArgs),

    /// Decode only; the exit code reports whether the recording is valid
    Check(CheckArgs),
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let code = match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::Clean,
                _ => ExitCode::ArgsError,
            };
            let _ = err.print();
            std::process::exit(code.as_i32());
        }
    };

    init_logging(&LogConfig::from_env(cli.global.log_level, cli.global.log_format));

    let exit_code = run(&cli);
    std::process::exit(exit_code.as_i32());
}

fn run(cli: &Cli) -> ExitCode {
    let options = ConfigOptions {
        config_path: cli.global.config.clone(),
    };
    let resolved = match load_config(&options) {
        Ok(resolved) => resolved,
        Err(err) => {
            report_error(cli.global.format, ExitCode::ConfigError, &err.to_string());
            return ExitCode::ConfigError;
        }
    };
    tracing::debug!(source = ?resolved.source, "resolved config");

    let ctx = CommandContext::new(resolved.config, cli.global.format);
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    let result = match &cli.command {
        Commands::Inspect(args) => commands::inspect::run(&ctx, args, &mut out),
        Commands::Stats(args) => commands::stats::run(&ctx, args, &mut out),
        Commands::Events(args) => commands::events::run(&ctx, args, &mut out),
        Commands::Check(args) => commands::check::run(&ctx, args, &mut out),
    };
    let _ = out.flush();

    match result {
        Ok(()) => ExitCode::Clean,
        Err(err) => {
            let code = err.exit_code();
            report_command_error(cli.global.format, code, &err);
            code
        }
    }
}

fn report_command_error(format: OutputFormat, code: ExitCode, err: &CommandError) {
    tracing::debug!(error = ?err, code = %code, "command failed");
    report_error(format, code, &err.to_string());
}

/// Error message on stderr; JSON output also gets a machine-readable record
/// on stdout.
fn report_error(format: OutputFormat, code: ExitCode, message: &str) {
    eprintln!("tlm: error: {}", message);
    if format == OutputFormat::Json {
        let record = serde_json::json!({
            "error": {
                "code": code.code_name(),
                "exit_code": code.as_i32(),
                "message": message,
            }
        });
        println!("{}", record);
    }
}
