//! Free-form key/value snapshots.

use serde::Serialize;
use tlm_common::{RawString, TypedValue};

use super::{find_attribute, Attribute};

/// One `statistic` record: a title and its ordered entries.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Statistic {
    pub title: RawString,
    pub entries: Vec<Attribute>,
}

impl Statistic {
    pub fn new(title: RawString) -> Self {
        Statistic {
            title,
            entries: Vec::new(),
        }
    }

    /// First entry with `key`.
    pub fn get(&self, key: &str) -> Option<&TypedValue> {
        find_attribute(&self.entries, key)
    }
}
