//! Single-pass decoder for version 2 telemetry streams.
//!
//! # Wire format
//!
//! An 8-byte header (`u32` version = 2, `u32` header length = 8) followed
//! by commands, each introduced by one opcode byte. Integers are little
//! endian and strings carry a one-byte length prefix.
//!
//! | opcode | command             | payload |
//! |--------|---------------------|---------|
//! | 0      | `register_provider` | identifier, title, version `u16`, runtime id `u16`, field count `u32`, field declarations |
//! | 1      | `packet`            | runtime id `u16`, packet count `u32`, then per packet: timestamp `f64`, span length `u32`, `(field id u8, value)` pairs |
//! | 2      | `statistic`         | title, span length `u32`, `(type u8, key, value)` triples |
//! | 3      | `amend_provider`    | runtime id `u16`, field count `u32`, field declarations |
//! | 4      | `event`             | id `u64`, timestamp `f64`, kind `u8` (`b`/`e`/`m`), span length `u32`, `(type u8, key, value)` triples |
//!
//! A field declaration is `id u8, type u8, unit u8, title`.
//!
//! Decoding is strict: the first malformed record aborts the whole parse.

use std::fmt;

use tlm_common::{DataPoint, RawString, Unit, ValueType};
use tracing::{debug, info, trace, warn};

use crate::cursor::ByteCursor;
use crate::error::{Result, TelemetryError};
use crate::event_tree::{EventTable, PARENT_ATTRIBUTE};
use crate::model::{Attribute, Container, Field, Provider, Statistic};

/// The only stream version understood by this decoder.
pub const STREAM_VERSION: u32 = 2;

/// Declared header length for [`STREAM_VERSION`].
pub const HEADER_LENGTH: u32 = 8;

/// Parent value meaning "no parent".
const NO_PARENT: u64 = u64::MAX;

/// Command opcodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Command {
    RegisterProvider = 0,
    Packet = 1,
    Statistic = 2,
    AmendProvider = 3,
    Event = 4,
}

impl Command {
    pub fn from_opcode(opcode: u8) -> Option<Self> {
        match opcode {
            0 => Some(Command::RegisterProvider),
            1 => Some(Command::Packet),
            2 => Some(Command::Statistic),
            3 => Some(Command::AmendProvider),
            4 => Some(Command::Event),
            _ => None,
        }
    }

    pub fn opcode(self) -> u8 {
        self as u8
    }
}

/// What an `event` command does to the event's timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum EventKind {
    /// Sets the start time.
    Begin = b'b',
    /// Sets the end time.
    End = b'e',
    /// Attributes only.
    Meta = b'm',
}

impl EventKind {
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            b'b' => Some(EventKind::Begin),
            b'e' => Some(EventKind::End),
            b'm' => Some(EventKind::Meta),
            _ => None,
        }
    }

    pub fn byte(self) -> u8 {
        self as u8
    }
}

/// Per-field post-processing hook run after decoding.
///
/// Receives the container as decoded (raw samples, raw time range) and
/// returns the replacement series for `field`. Closures with the same
/// signature implement this trait.
pub trait SampleProcessor {
    fn process(
        &self,
        container: &Container,
        provider: &Provider,
        field: &Field,
        samples: &[DataPoint],
    ) -> Vec<DataPoint>;
}

impl<F> SampleProcessor for F
where
    F: Fn(&Container, &Provider, &Field, &[DataPoint]) -> Vec<DataPoint>,
{
    fn process(
        &self,
        container: &Container,
        provider: &Provider,
        field: &Field,
        samples: &[DataPoint],
    ) -> Vec<DataPoint> {
        self(container, provider, field, samples)
    }
}

/// Decoder options.
#[derive(Default)]
pub struct ParserOptions {
    /// Hook applied to every non-empty field once decoding finished.
    pub processor: Option<Box<dyn SampleProcessor + Send + Sync>>,
    /// Reject inputs larger than this many bytes.
    pub max_input_size: Option<u64>,
}

impl ParserOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_processor(mut self, processor: impl SampleProcessor + Send + Sync + 'static) -> Self {
        self.processor = Some(Box::new(processor));
        self
    }

    pub fn with_max_input_size(mut self, limit: u64) -> Self {
        self.max_input_size = Some(limit);
        self
    }
}

impl fmt::Debug for ParserOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParserOptions")
            .field("processor", &self.processor.as_ref().map(|_| "<processor>"))
            .field("max_input_size", &self.max_input_size)
            .finish()
    }
}

/// Check the size bound in `options` against an input of `size` bytes.
pub fn check_input_size(size: u64, options: &ParserOptions) -> Result<()> {
    match options.max_input_size {
        Some(limit) if size > limit => Err(TelemetryError::FileTooLarge { size, limit }),
        _ => Ok(()),
    }
}

/// Decode a complete telemetry stream.
pub fn parse_telemetry(data: &[u8], options: &ParserOptions) -> Result<Container> {
    check_input_size(data.len() as u64, options)?;

    let mut cursor = ByteCursor::new(data);
    let version = cursor.read_u32()?;
    let header_length = cursor.read_u32()?;
    if version != STREAM_VERSION || header_length != HEADER_LENGTH {
        return Err(TelemetryError::UnsupportedFormat {
            version,
            header_length,
        });
    }

    debug!(bytes = data.len(), version, "Decoding telemetry stream");

    let mut decoder = Decoder {
        cursor,
        container: Container::new(version),
        events: EventTable::new(),
    };
    decoder.run()?;
    decoder.finish(options)
}

struct FieldDeclaration {
    id: u8,
    value_type: ValueType,
    unit: Unit,
    title: RawString,
}

impl FieldDeclaration {
    fn read(cursor: &mut ByteCursor<'_>) -> Result<Self> {
        Ok(FieldDeclaration {
            id: cursor.read_u8()?,
            value_type: cursor.read_value_type()?,
            unit: cursor.read_unit()?,
            title: cursor.read_string()?,
        })
    }

    fn into_field(self, provider: u16) -> Field {
        Field::new(self.id, provider, self.title, self.value_type, self.unit)
    }
}

struct Decoder<'a> {
    cursor: ByteCursor<'a>,
    container: Container,
    events: EventTable,
}

impl<'a> Decoder<'a> {
    fn run(&mut self) -> Result<()> {
        while !self.cursor.is_at_end() {
            let offset = self.cursor.position();
            let opcode = self.cursor.read_u8()?;
            let command = Command::from_opcode(opcode)
                .ok_or(TelemetryError::UnknownCommand { opcode, offset })?;

            trace!(?command, offset, "Command");

            match command {
                Command::RegisterProvider => self.register_provider()?,
                Command::AmendProvider => self.amend_provider()?,
                Command::Packet => self.packet()?,
                Command::Statistic => self.statistic()?,
                Command::Event => self.event()?,
            }
        }
        Ok(())
    }

    fn register_provider(&mut self) -> Result<()> {
        let identifier = self.cursor.read_string()?;
        let title = self.cursor.read_string()?;
        let version = self.cursor.read_u16()?;
        let id = self.cursor.read_u16()?;

        if self.container.provider(id).is_some() {
            return Err(TelemetryError::DuplicateProvider { id });
        }
        if self
            .container
            .providers()
            .iter()
            .any(|p| p.identifier == identifier)
        {
            return Err(TelemetryError::DuplicateProviderIdentifier {
                identifier: identifier.to_string_lossy().into_owned(),
            });
        }

        let mut provider = Provider::new(id, version, identifier, title);
        let count = self.cursor.read_u32()?;
        for _ in 0..count {
            let decl = FieldDeclaration::read(&mut self.cursor)?;
            let field_id = decl.id;
            if !provider.add_field(decl.into_field(id)) {
                debug!(provider = id, field = field_id, "Duplicate field declaration ignored");
            }
        }

        debug!(
            provider = id,
            identifier = %provider.identifier,
            fields = provider.fields().len(),
            "Provider registered"
        );
        self.container.add_provider(provider);
        Ok(())
    }

    fn amend_provider(&mut self) -> Result<()> {
        let id = self.cursor.read_u16()?;
        let provider = self
            .container
            .provider_mut(id)
            .ok_or(TelemetryError::UnknownProvider { id })?;

        let count = self.cursor.read_u32()?;
        for _ in 0..count {
            let decl = FieldDeclaration::read(&mut self.cursor)?;
            let field_id = decl.id;
            if !provider.add_field(decl.into_field(id)) {
                warn!(provider = id, field = field_id, "Amended field already declared, keeping first");
            }
        }

        debug!(provider = id, fields = provider.fields().len(), "Provider amended");
        Ok(())
    }

    fn packet(&mut self) -> Result<()> {
        let id = self.cursor.read_u16()?;
        let count = self.cursor.read_u32()?;
        let provider = self
            .container
            .provider_mut(id)
            .ok_or(TelemetryError::UnknownProvider { id })?;

        for _ in 0..count {
            let timestamp = self.cursor.read_f64()?;
            let declared = self.cursor.read_u32()? as usize;
            let start = self.cursor.position();

            while self.cursor.position() - start < declared {
                let field_id = self.cursor.read_u8()?;
                let field = provider
                    .field_mut(field_id)
                    .ok_or(TelemetryError::UnknownField {
                        provider: id,
                        field: field_id,
                    })?;
                let value = self.cursor.read_value(field.value_type)?;
                field.push(DataPoint::new(timestamp, value));
            }

            check_span(start, declared, self.cursor.position())?;
        }

        trace!(provider = id, packets = count, "Packets decoded");
        Ok(())
    }

    /// Read `(type, key, value)` triples filling a span of `declared` bytes.
    fn attributes(&mut self, declared: usize) -> Result<Vec<Attribute>> {
        let start = self.cursor.position();
        let mut attributes = Vec::new();

        while self.cursor.position() - start < declared {
            let value_type = self.cursor.read_value_type()?;
            let key = self.cursor.read_string()?;
            let value = self.cursor.read_value(value_type)?;
            attributes.push(Attribute { key, value });
        }

        check_span(start, declared, self.cursor.position())?;
        Ok(attributes)
    }

    fn statistic(&mut self) -> Result<()> {
        let title = self.cursor.read_string()?;
        let declared = self.cursor.read_u32()? as usize;

        let mut statistic = Statistic::new(title);
        statistic.entries = self.attributes(declared)?;

        trace!(title = %statistic.title, entries = statistic.entries.len(), "Statistic decoded");
        self.container.add_statistic(statistic);
        Ok(())
    }

    fn event(&mut self) -> Result<()> {
        let id = self.cursor.read_u64()?;
        let timestamp = self.cursor.read_f64()?;
        let offset = self.cursor.position();
        let kind_byte = self.cursor.read_u8()?;
        let kind = EventKind::from_byte(kind_byte).ok_or(TelemetryError::UnknownEventKind {
            kind: kind_byte,
            offset,
        })?;
        let declared = self.cursor.read_u32()? as usize;
        let attributes = self.attributes(declared)?;

        let staged = self.events.entry(id);
        match kind {
            EventKind::Begin => staged.start_time = timestamp,
            EventKind::End => staged.end_time = timestamp,
            EventKind::Meta => {}
        }

        for attribute in attributes {
            if attribute.key == PARENT_ATTRIBUTE {
                let parent = attribute.value.as_u64()?;
                staged.parent = (parent != NO_PARENT).then_some(parent);
                continue;
            }
            staged.attributes.push(attribute);
        }

        trace!(event = id, ?kind, timestamp, "Event decoded");
        Ok(())
    }

    fn finish(self, options: &ParserOptions) -> Result<Container> {
        let Decoder {
            mut container,
            events,
            ..
        } = self;

        container.set_events(events.build()?);

        for provider in container.providers_mut() {
            let provider_id = provider.id;
            for field in provider.fields_mut() {
                if field.ensure_sorted() {
                    warn!(
                        provider = provider_id,
                        field = field.id,
                        "Samples arrived out of order, re-sorted by timestamp"
                    );
                }
            }
        }

        container.update_time_range();

        if let Some(processor) = options.processor.as_deref() {
            apply_processor(&mut container, processor);
            container.update_time_range();
        }

        info!(
            providers = container.providers().len(),
            events = container.event_count(),
            statistics = container.statistics().len(),
            start = container.start_time,
            end = container.end_time,
            "Telemetry decoded"
        );

        Ok(container)
    }
}

fn check_span(start: usize, declared: usize, end: usize) -> Result<()> {
    let consumed = end - start;
    if consumed != declared {
        return Err(TelemetryError::SpanOverrun {
            offset: start,
            declared,
            consumed,
        });
    }
    Ok(())
}

/// Run `processor` over every non-empty field.
///
/// All replacements are computed against the unmodified container first,
/// so every call observes the same raw data and time range.
fn apply_processor(container: &mut Container, processor: &(dyn SampleProcessor + Send + Sync)) {
    let mut replacements = Vec::new();

    for (p, provider) in container.providers().iter().enumerate() {
        for (f, field) in provider.fields().iter().enumerate() {
            if field.is_empty() {
                continue;
            }
            let samples = processor.process(container, provider, field, field.samples());
            trace!(
                provider = provider.id,
                field = field.id,
                before = field.sample_count(),
                after = samples.len(),
                "Field post-processed"
            );
            replacements.push((p, f, samples));
        }
    }

    for (p, f, samples) in replacements {
        if let Some(field) = container
            .providers_mut()
            .get_mut(p)
            .and_then(|provider| provider.fields_mut().get_mut(f))
        {
            if field.set_samples(samples) {
                warn!(
                    provider = field.provider_id,
                    field = field.id,
                    "Processor returned samples out of order, re-sorted by timestamp"
                );
            }
        }
    }
}
