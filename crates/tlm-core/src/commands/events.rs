//! `tlm events`: print the event forest.

use std::io::Write;
use std::path::PathBuf;

use serde::Serialize;
use tlm_telemetry::Event;

use super::{open_document, CommandContext, CommandError};
use crate::output::{write_json, OutputFormat};

#[derive(Debug, Clone, clap::Args)]
pub struct EventsArgs {
    /// Telemetry recording to decode
    pub file: PathBuf,
}

#[derive(Debug, Serialize)]
struct EventsReport<'a> {
    count: usize,
    events: &'a [Event],
}

pub fn run(ctx: &CommandContext, args: &EventsArgs, out: &mut dyn Write) -> Result<(), CommandError> {
    // Sample post-processing does not affect events.
    let document = open_document(&args.file, &ctx.config.raw_parser_options())?;
    let container = document.container();

    match ctx.format {
        OutputFormat::Json => write_json(
            out,
            &EventsReport {
                count: container.event_count(),
                events: container.events(),
            },
        )?,
        OutputFormat::Summary => {
            for event in container.events() {
                write_event(out, event, 0)?;
            }
            writeln!(out, "{} events", container.event_count())?;
        }
    }
    Ok(())
}

fn write_event(out: &mut dyn Write, event: &Event, depth: usize) -> std::io::Result<()> {
    write!(
        out,
        "{:indent$}#{} [{:.3}, {:.3}] {:.3}s",
        "",
        event.id,
        event.start_time,
        event.end_time,
        event.duration(),
        indent = depth * 2
    )?;
    for attribute in &event.attributes {
        write!(out, " {}={}", attribute.key, attribute.value)?;
    }
    writeln!(out)?;

    for child in event.children() {
        write_event(out, child, depth + 1)?;
    }
    Ok(())
}
