//! Test utilities for tlm-telemetry.
//!
//! [`StreamBuilder`] encodes telemetry streams command by command so tests
//! can describe inputs at the record level instead of as byte soup.

use tlm_common::{TypedValue, Unit, ValueType};

use crate::parser::{Command, EventKind, HEADER_LENGTH, STREAM_VERSION};

/// Field declaration: `(id, type, unit, title)`.
pub type FieldSpec<'a> = (u8, ValueType, Unit, &'a str);

/// Incremental encoder for telemetry streams.
#[derive(Debug, Clone)]
pub struct StreamBuilder {
    bytes: Vec<u8>,
}

impl Default for StreamBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl StreamBuilder {
    /// Start a stream with the supported header.
    pub fn new() -> Self {
        Self::with_header(STREAM_VERSION, HEADER_LENGTH)
    }

    /// Start a stream with an arbitrary header.
    pub fn with_header(version: u32, header_length: u32) -> Self {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&version.to_le_bytes());
        bytes.extend_from_slice(&header_length.to_le_bytes());
        StreamBuilder { bytes }
    }

    /// Append bytes verbatim.
    pub fn raw(&mut self, bytes: &[u8]) -> &mut Self {
        self.bytes.extend_from_slice(bytes);
        self
    }

    pub fn register_provider(
        &mut self,
        id: u16,
        identifier: &str,
        title: &str,
        version: u16,
        fields: &[FieldSpec<'_>],
    ) -> &mut Self {
        self.bytes.push(Command::RegisterProvider.opcode());
        put_string(&mut self.bytes, identifier.as_bytes());
        put_string(&mut self.bytes, title.as_bytes());
        self.bytes.extend_from_slice(&version.to_le_bytes());
        self.bytes.extend_from_slice(&id.to_le_bytes());
        self.put_fields(fields);
        self
    }

    pub fn amend_provider(&mut self, id: u16, fields: &[FieldSpec<'_>]) -> &mut Self {
        self.bytes.push(Command::AmendProvider.opcode());
        self.bytes.extend_from_slice(&id.to_le_bytes());
        self.put_fields(fields);
        self
    }

    /// One packet command carrying a single timestamped packet.
    pub fn packet(&mut self, provider: u16, timestamp: f64, values: &[(u8, TypedValue)]) -> &mut Self {
        self.packets(provider, &[(timestamp, values)])
    }

    /// One packet command carrying several packets.
    pub fn packets(&mut self, provider: u16, packets: &[(f64, &[(u8, TypedValue)])]) -> &mut Self {
        self.bytes.push(Command::Packet.opcode());
        self.bytes.extend_from_slice(&provider.to_le_bytes());
        self.bytes
            .extend_from_slice(&(packets.len() as u32).to_le_bytes());

        for (timestamp, values) in packets {
            let mut span = Vec::new();
            for (field, value) in values.iter() {
                span.push(*field);
                put_value(&mut span, value);
            }
            self.bytes.extend_from_slice(&timestamp.to_le_bytes());
            self.put_span(&span);
        }
        self
    }

    pub fn statistic(&mut self, title: &str, entries: &[(&str, TypedValue)]) -> &mut Self {
        self.bytes.push(Command::Statistic.opcode());
        put_string(&mut self.bytes, title.as_bytes());
        let span = encode_attributes(entries);
        self.put_span(&span);
        self
    }

    pub fn event(
        &mut self,
        id: u64,
        timestamp: f64,
        kind: EventKind,
        attributes: &[(&str, TypedValue)],
    ) -> &mut Self {
        self.bytes.push(Command::Event.opcode());
        self.bytes.extend_from_slice(&id.to_le_bytes());
        self.bytes.extend_from_slice(&timestamp.to_le_bytes());
        self.bytes.push(kind.byte());
        let span = encode_attributes(attributes);
        self.put_span(&span);
        self
    }

    /// Begin and end records for one event, with an optional parent link.
    pub fn span_event(&mut self, id: u64, start: f64, end: f64, parent: Option<u64>) -> &mut Self {
        let attributes: Vec<(&str, TypedValue)> = parent
            .map(|p| vec![("parent", TypedValue::U64(p))])
            .unwrap_or_default();
        self.event(id, start, EventKind::Begin, &attributes)
            .event(id, end, EventKind::End, &[])
    }

    /// Encoded stream so far.
    pub fn finish(&self) -> Vec<u8> {
        self.bytes.clone()
    }

    fn put_fields(&mut self, fields: &[FieldSpec<'_>]) {
        self.bytes
            .extend_from_slice(&(fields.len() as u32).to_le_bytes());
        for (id, value_type, unit, title) in fields {
            self.bytes.push(*id);
            self.bytes.push(value_type.tag());
            self.bytes.push(unit.tag());
            put_string(&mut self.bytes, title.as_bytes());
        }
    }

    fn put_span(&mut self, span: &[u8]) {
        self.bytes
            .extend_from_slice(&(span.len() as u32).to_le_bytes());
        self.bytes.extend_from_slice(span);
    }
}

fn encode_attributes(entries: &[(&str, TypedValue)]) -> Vec<u8> {
    let mut span = Vec::new();
    for (key, value) in entries {
        span.push(value.value_type().tag());
        put_string(&mut span, key.as_bytes());
        put_value(&mut span, value);
    }
    span
}

/// Length-prefixed string; input longer than 255 bytes is truncated.
pub fn put_string(out: &mut Vec<u8>, bytes: &[u8]) {
    let len = bytes.len().min(u8::MAX as usize);
    out.push(len as u8);
    out.extend_from_slice(&bytes[..len]);
}

/// Wire encoding of a value, without its type tag.
pub fn put_value(out: &mut Vec<u8>, value: &TypedValue) {
    match value {
        TypedValue::Bool(v) => out.push(u8::from(*v)),
        TypedValue::U8(v) => out.push(*v),
        TypedValue::U16(v) => out.extend_from_slice(&v.to_le_bytes()),
        TypedValue::U32(v) => out.extend_from_slice(&v.to_le_bytes()),
        TypedValue::U64(v) => out.extend_from_slice(&v.to_le_bytes()),
        TypedValue::I32(v) => out.extend_from_slice(&v.to_le_bytes()),
        TypedValue::I64(v) => out.extend_from_slice(&v.to_le_bytes()),
        TypedValue::F32(v) => out.extend_from_slice(&v.to_le_bytes()),
        TypedValue::F64(v) => out.extend_from_slice(&v.to_le_bytes()),
        TypedValue::Vec2([x, y]) => {
            out.extend_from_slice(&x.to_le_bytes());
            out.extend_from_slice(&y.to_le_bytes());
        }
        TypedValue::DVec2([x, y]) => {
            out.extend_from_slice(&x.to_le_bytes());
            out.extend_from_slice(&y.to_le_bytes());
        }
        TypedValue::String(s) => put_string(out, s.as_bytes()),
    }
}
