//! In-memory model of a decoded telemetry stream.
//!
//! A [`Container`] owns everything: providers with their fields and samples,
//! statistics snapshots and the root events of the event forest.

mod container;
mod event;
mod field;
mod provider;
mod statistic;

pub use container::Container;
pub use event::Event;
pub use field::Field;
pub use provider::Provider;
pub use statistic::Statistic;

use serde::Serialize;
use tlm_common::{RawString, TypedValue};

/// Key/value pair attached to an event or a statistic.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Attribute {
    pub key: RawString,
    pub value: TypedValue,
}

impl Attribute {
    pub fn new(key: impl Into<RawString>, value: TypedValue) -> Self {
        Attribute {
            key: key.into(),
            value,
        }
    }
}

/// First attribute whose key matches `key`.
pub(crate) fn find_attribute<'a>(attributes: &'a [Attribute], key: &str) -> Option<&'a TypedValue> {
    attributes
        .iter()
        .find(|attr| attr.key == key)
        .map(|attr| &attr.value)
}
