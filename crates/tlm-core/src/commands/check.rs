//! `tlm check`: decode only and report whether the recording is valid.

use std::io::Write;
use std::path::PathBuf;

use serde::Serialize;

use super::{open_document, CommandContext, CommandError};
use crate::output::{write_json, OutputFormat};

#[derive(Debug, Clone, clap::Args)]
pub struct CheckArgs {
    /// Telemetry recording to decode
    pub file: PathBuf,
}

#[derive(Debug, Serialize)]
pub struct CheckReport {
    pub status: &'static str,
    pub path: String,
    pub fingerprint: String,
    pub providers: usize,
    pub fields: usize,
    pub samples: usize,
    pub events: usize,
    pub statistics: usize,
    pub start_time: f64,
    pub end_time: f64,
}

pub fn run(ctx: &CommandContext, args: &CheckArgs, out: &mut dyn Write) -> Result<(), CommandError> {
    let document = open_document(&args.file, &ctx.config.raw_parser_options())?;
    let container = document.container();

    let fields = container.providers().iter().flat_map(|p| p.fields());
    let report = CheckReport {
        status: "ok",
        path: args.file.display().to_string(),
        fingerprint: document.fingerprint(),
        providers: container.providers().len(),
        fields: fields.clone().count(),
        samples: fields.map(|f| f.sample_count()).sum(),
        events: container.event_count(),
        statistics: container.statistics().len(),
        start_time: container.start_time,
        end_time: container.end_time,
    };

    match ctx.format {
        OutputFormat::Json => write_json(out, &report)?,
        OutputFormat::Summary => writeln!(
            out,
            "ok: {}: {} providers, {} fields, {} samples, {} events, {} statistics, [{:.3}, {:.3}]",
            report.path,
            report.providers,
            report.fields,
            report.samples,
            report.events,
            report.statistics,
            report.start_time,
            report.end_time
        )?,
    }
    Ok(())
}
