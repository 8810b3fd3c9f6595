//! `tlm inspect`: decode a recording and describe its contents.

use std::io::Write;
use std::path::PathBuf;

use serde::Serialize;
use tlm_common::{Unit, ValueType};
use tlm_telemetry::{Container, Field, Provider, Statistic};

use super::{open_document, CommandContext, CommandError};
use crate::output::{write_json, OutputFormat};

#[derive(Debug, Clone, clap::Args)]
pub struct InspectArgs {
    /// Telemetry recording to decode
    pub file: PathBuf,
}

#[derive(Debug, Serialize)]
pub struct InspectReport<'a> {
    pub path: String,
    pub fingerprint: String,
    pub version: u32,
    pub start_time: f64,
    pub end_time: f64,
    pub providers: Vec<ProviderReport>,
    pub statistics: &'a [Statistic],
    pub event_count: usize,
}

#[derive(Debug, Serialize)]
pub struct ProviderReport {
    pub id: u16,
    pub identifier: String,
    pub title: String,
    pub version: u16,
    pub fields: Vec<FieldReport>,
}

#[derive(Debug, Serialize)]
pub struct FieldReport {
    pub id: u8,
    pub title: String,
    pub value_type: ValueType,
    pub unit: Unit,
    pub color: String,
    pub samples: usize,
}

impl From<&Field> for FieldReport {
    fn from(field: &Field) -> Self {
        FieldReport {
            id: field.id,
            title: field.title.to_string(),
            value_type: field.value_type,
            unit: field.unit,
            color: field.color.clone(),
            samples: field.sample_count(),
        }
    }
}

impl From<&Provider> for ProviderReport {
    fn from(provider: &Provider) -> Self {
        ProviderReport {
            id: provider.id,
            identifier: provider.identifier.to_string(),
            title: provider.title.to_string(),
            version: provider.version,
            fields: provider.fields().iter().map(FieldReport::from).collect(),
        }
    }
}

pub fn run(
    ctx: &CommandContext,
    args: &InspectArgs,
    out: &mut dyn Write,
) -> Result<(), CommandError> {
    let document = open_document(&args.file, &ctx.config.parser_options())?;
    let container = document.container();

    let report = InspectReport {
        path: args.file.display().to_string(),
        fingerprint: document.fingerprint(),
        version: container.version,
        start_time: container.start_time,
        end_time: container.end_time,
        providers: container.providers().iter().map(ProviderReport::from).collect(),
        statistics: container.statistics(),
        event_count: container.event_count(),
    };

    match ctx.format {
        OutputFormat::Json => write_json(out, &report)?,
        OutputFormat::Summary => write_summary(out, &report, container)?,
    }
    Ok(())
}

fn write_summary(
    out: &mut dyn Write,
    report: &InspectReport<'_>,
    container: &Container,
) -> std::io::Result<()> {
    writeln!(out, "{} (format v{})", report.path, report.version)?;
    writeln!(out, "sha256 {}", report.fingerprint)?;
    writeln!(
        out,
        "time range [{:.3}, {:.3}] ({})",
        report.start_time,
        report.end_time,
        Unit::Time.format_value(container.duration())
    )?;

    for provider in &report.providers {
        writeln!(
            out,
            "provider {} {} \"{}\" v{}",
            provider.id, provider.identifier, provider.title, provider.version
        )?;
        for field in &provider.fields {
            writeln!(
                out,
                "  field {:>3} {:<24} {:<6} {:<8} {:>8} samples  {}",
                field.id,
                field.title,
                field.value_type.name(),
                field.unit.name(),
                field.samples,
                field.color
            )?;
        }
    }

    for statistic in report.statistics {
        writeln!(out, "statistic \"{}\"", statistic.title)?;
        for entry in &statistic.entries {
            writeln!(out, "  {} = {}", entry.key, entry.value)?;
        }
    }

    writeln!(out, "{} events", report.event_count)
}
