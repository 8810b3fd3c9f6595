//! `tlm stats`: frame-time style statistics for one field.
//!
//! Statistics are computed over the raw samples, never over the decimated
//! series. Without `--provider`/`--field` the simulator's timing channels
//! are reported instead.

use std::io::Write;
use std::path::PathBuf;

use serde::Serialize;
use tlm_common::{DataPoint, Unit};
use tlm_math::{PerformanceCalculator, PerformanceSummary, RunningAverage};
use tlm_telemetry::performance::field_for_domain;
use tlm_telemetry::{Container, Field, PerformanceData, TIMING_PROVIDER};
use tracing::{debug, warn};

use super::{open_document, CommandContext, CommandError};
use crate::output::{write_json, OutputFormat};

/// Default moving-average window, in samples.
pub const DEFAULT_WINDOW: usize = 30;

#[derive(Debug, Clone, clap::Args)]
pub struct StatsArgs {
    /// Telemetry recording to decode
    pub file: PathBuf,

    /// Provider identifier, e.g. com.laminarresearch.test_main_class
    #[arg(long, requires = "field")]
    pub provider: Option<String>,

    /// Field id within the provider
    #[arg(long, requires = "provider")]
    pub field: Option<u8>,

    /// Window start in seconds (default: recording start)
    #[arg(long)]
    pub start: Option<f64>,

    /// Window end in seconds (default: recording end)
    #[arg(long)]
    pub end: Option<f64>,

    /// Moving-average window used for the smoothed peak
    #[arg(long, default_value_t = DEFAULT_WINDOW)]
    pub window: usize,
}

/// Statistics for one field over a time window.
#[derive(Debug, Serialize)]
pub struct FieldStats {
    pub provider: String,
    pub field: u8,
    pub title: String,
    pub unit: Unit,
    pub start: f64,
    pub end: f64,
    #[serde(flatten)]
    pub summary: PerformanceSummary,
    /// `(p, value at rank)` pairs.
    pub rank_percentiles: Vec<(f64, f64)>,
    pub window: usize,
    /// Highest moving average over the chronological series.
    pub smoothed_peak: f64,
}

impl FieldStats {
    fn new(
        provider: &str,
        field: &Field,
        calculator: &PerformanceCalculator,
        (start, end): (f64, f64),
        percentiles: &[f64],
        window: usize,
    ) -> Self {
        FieldStats {
            provider: provider.to_string(),
            field: field.id,
            title: field.title.to_string(),
            unit: field.unit,
            start,
            end,
            summary: calculator.summary(percentiles),
            rank_percentiles: percentiles
                .iter()
                .map(|&p| (p, calculator.rank_percentile(p)))
                .collect(),
            window,
            smoothed_peak: smoothed_peak(field.data_points_in_range(start, end), window),
        }
    }
}

/// Peak of the moving average over `points` in timestamp order, 0.0 when empty.
pub fn smoothed_peak(points: &[DataPoint], window: usize) -> f64 {
    let mut running = RunningAverage::new(window);
    points
        .iter()
        .map(|p| running.update(p.scalar()))
        .fold(None, |peak: Option<f64>, avg| Some(peak.map_or(avg, |p| p.max(avg))))
        .unwrap_or(0.0)
}

pub fn run(ctx: &CommandContext, args: &StatsArgs, out: &mut dyn Write) -> Result<(), CommandError> {
    let document = open_document(&args.file, &ctx.config.raw_parser_options())?;
    let container = document.container();

    let start = args.start.unwrap_or(container.start_time);
    let end = args.end.unwrap_or(container.end_time);
    if start > end {
        return Err(CommandError::InvalidRange { start, end });
    }

    let stats = match (&args.provider, args.field) {
        (Some(identifier), Some(field_id)) => vec![field_stats(
            ctx,
            container,
            identifier,
            field_id,
            (start, end),
            args.window,
        )?],
        _ => timing_stats(ctx, container, (start, end), args.window)?,
    };

    match ctx.format {
        OutputFormat::Json => write_json(out, &stats)?,
        OutputFormat::Summary => {
            for entry in &stats {
                write_summary(out, entry)?;
            }
        }
    }
    Ok(())
}

fn field_stats(
    ctx: &CommandContext,
    container: &Container,
    identifier: &str,
    field_id: u8,
    range: (f64, f64),
    window: usize,
) -> Result<FieldStats, CommandError> {
    let provider = container
        .provider_by_identifier(identifier)
        .ok_or_else(|| CommandError::ProviderNotFound {
            identifier: identifier.to_string(),
        })?;
    let field = provider
        .field(field_id)
        .ok_or_else(|| CommandError::FieldNotFound {
            provider: identifier.to_string(),
            field: field_id,
        })?;

    let calculator = PerformanceCalculator::new(field.samples(), range.0, range.1);
    debug!(
        provider = identifier,
        field = field_id,
        samples = calculator.sample_count(),
        "computed field statistics"
    );
    Ok(FieldStats::new(
        identifier,
        field,
        &calculator,
        range,
        &ctx.config.percentiles,
        window,
    ))
}

fn timing_stats(
    ctx: &CommandContext,
    container: &Container,
    range: (f64, f64),
    window: usize,
) -> Result<Vec<FieldStats>, CommandError> {
    if container.provider_by_identifier(TIMING_PROVIDER).is_none() {
        return Err(CommandError::NoTimingProvider);
    }

    let data = PerformanceData::new(container, range.0, range.1);
    if !data.contains_data() {
        warn!(start = range.0, end = range.1, "no cpu/gpu timings in window");
    }

    let stats = data
        .domains()
        .filter_map(|domain| {
            let calculator = data.calculator(domain)?;
            let field = field_for_domain(container, domain)?;
            Some(FieldStats::new(
                TIMING_PROVIDER,
                field,
                calculator,
                range,
                &ctx.config.percentiles,
                window,
            ))
        })
        .collect();
    Ok(stats)
}

fn write_summary(out: &mut dyn Write, stats: &FieldStats) -> std::io::Result<()> {
    let unit = stats.unit;
    writeln!(
        out,
        "{} [{}] {} field {} over [{:.3}, {:.3}]",
        stats.title, unit, stats.provider, stats.field, stats.start, stats.end
    )?;
    writeln!(out, "  samples  {}", stats.summary.samples)?;
    writeln!(out, "  min      {}", unit.format_value(stats.summary.minimum))?;
    writeln!(out, "  max      {}", unit.format_value(stats.summary.maximum))?;
    writeln!(out, "  average  {}", unit.format_value(stats.summary.average))?;
    writeln!(out, "  median   {}", unit.format_value(stats.summary.median))?;
    for ((p, weighted), (_, ranked)) in stats
        .summary
        .percentiles
        .iter()
        .zip(&stats.rank_percentiles)
    {
        writeln!(
            out,
            "  p{:<7} {} (rank {})",
            p * 100.0,
            unit.format_value(*weighted),
            unit.format_value(*ranked)
        )?;
    }
    writeln!(
        out,
        "  peak of {}-sample average  {}",
        stats.window,
        unit.format_value(stats.smoothed_peak)
    )
}
