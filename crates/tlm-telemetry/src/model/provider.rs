//! Named producer of telemetry fields.

use serde::Serialize;
use tlm_common::RawString;

use super::Field;

/// A telemetry source registered in the stream (e.g. the frame timer).
///
/// `id` is the runtime id used by packets; `identifier` is the stable
/// reverse-DNS name the simulator uses across sessions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Provider {
    pub id: u16,
    pub version: u16,
    pub identifier: RawString,
    pub title: RawString,
    fields: Vec<Field>,
}

impl Provider {
    pub fn new(id: u16, version: u16, identifier: RawString, title: RawString) -> Self {
        Provider {
            id,
            version,
            identifier,
            title,
            fields: Vec::new(),
        }
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn fields_mut(&mut self) -> &mut [Field] {
        &mut self.fields
    }

    pub fn has_field(&self, id: u8) -> bool {
        self.field(id).is_some()
    }

    pub fn field(&self, id: u8) -> Option<&Field> {
        self.fields.iter().find(|field| field.id == id)
    }

    pub fn field_mut(&mut self, id: u8) -> Option<&mut Field> {
        self.fields.iter_mut().find(|field| field.id == id)
    }

    /// Add a field unless one with the same id exists.
    ///
    /// Returns `false` (and drops `field`) on a duplicate id.
    pub fn add_field(&mut self, field: Field) -> bool {
        if self.has_field(field.id) {
            return false;
        }
        self.fields.push(field);
        true
    }
}
