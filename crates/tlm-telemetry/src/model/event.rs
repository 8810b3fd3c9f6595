//! Timed spans with attributes and nested children.

use serde::Serialize;
use tlm_common::TypedValue;

use super::{find_attribute, Attribute};
use crate::error::{Result, TelemetryError};

/// A begin/end span in the event forest.
///
/// Children are owned by their parent and kept in ascending id order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Event {
    pub id: u64,
    pub start_time: f64,
    pub end_time: f64,
    pub attributes: Vec<Attribute>,
    children: Vec<Event>,
}

impl Event {
    /// Create a childless event. Fails if `end_time < start_time`.
    pub fn new(id: u64, start_time: f64, end_time: f64, attributes: Vec<Attribute>) -> Result<Self> {
        if end_time < start_time {
            return Err(TelemetryError::InvalidEventTiming {
                id,
                start: start_time,
                end: end_time,
            });
        }

        Ok(Event {
            id,
            start_time,
            end_time,
            attributes,
            children: Vec::new(),
        })
    }

    pub fn duration(&self) -> f64 {
        self.end_time - self.start_time
    }

    pub fn children(&self) -> &[Event] {
        &self.children
    }

    pub(crate) fn add_child(&mut self, child: Event) {
        self.children.push(child);
    }

    pub fn attribute(&self, key: &str) -> Option<&TypedValue> {
        find_attribute(&self.attributes, key)
    }

    /// Whether `id` is a direct or indirect child.
    pub fn has_child(&self, id: u64) -> bool {
        self.find_child(id).is_some()
    }

    /// Depth-first search of all descendants.
    pub fn find_child(&self, id: u64) -> Option<&Event> {
        let mut stack: Vec<&Event> = self.children.iter().rev().collect();
        while let Some(event) = stack.pop() {
            if event.id == id {
                return Some(event);
            }
            stack.extend(event.children.iter().rev());
        }
        None
    }

    /// Number of events in this subtree, including `self`.
    pub fn subtree_len(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(event) = stack.pop() {
            count += 1;
            stack.extend(event.children.iter());
        }
        count
    }
}
