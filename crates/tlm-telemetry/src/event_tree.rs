//! Assembly of the flat event log into a forest.
//!
//! Event commands only ever touch a staging record keyed by id: begin and end
//! set the timestamps, every command may add attributes, and a `parent`
//! attribute links the record to another id. Once the stream is exhausted
//! [`EventTable::build`] resolves the links.
//!
//! Resolution does not depend on id order. A child may carry a smaller id
//! than its parent; only dangling parents, self-references and cycles are
//! reported as [`TelemetryError::OrphanedEvent`]. Chains nested deeper than
//! [`MAX_EVENT_DEPTH`] are rejected with
//! [`TelemetryError::EventNestingTooDeep`].

use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};

use tracing::debug;

use crate::error::{Result, TelemetryError};
use crate::model::{Attribute, Event};

/// Attribute key reserved for the parent link.
pub const PARENT_ATTRIBUTE: &str = "parent";

/// Deepest nesting accepted, counting a root as level 1.
///
/// Walking, comparing and dropping an [`Event`] recurse once per level.
pub const MAX_EVENT_DEPTH: usize = 256;

/// Partially assembled event.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StagedEvent {
    pub start_time: f64,
    pub end_time: f64,
    pub parent: Option<u64>,
    pub attributes: Vec<Attribute>,
}

/// Staging table of events seen so far, keyed by id.
#[derive(Debug, Default)]
pub struct EventTable {
    staged: BTreeMap<u64, StagedEvent>,
}

impl EventTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Staging record for `id`, created on first use.
    pub fn entry(&mut self, id: u64) -> &mut StagedEvent {
        self.staged.entry(id).or_default()
    }

    pub fn len(&self) -> usize {
        self.staged.len()
    }

    pub fn is_empty(&self) -> bool {
        self.staged.is_empty()
    }

    /// Resolve parent links and return the root events in ascending id
    /// order, each with its children in ascending id order.
    pub fn build(mut self) -> Result<Vec<Event>> {
        let mut children: HashMap<u64, Vec<u64>> = HashMap::new();
        let mut roots = Vec::new();

        for (&id, staged) in &self.staged {
            if staged.end_time < staged.start_time {
                return Err(TelemetryError::InvalidEventTiming {
                    id,
                    start: staged.start_time,
                    end: staged.end_time,
                });
            }

            match staged.parent {
                None => roots.push(id),
                Some(parent) if parent == id || !self.staged.contains_key(&parent) => {
                    return Err(TelemetryError::OrphanedEvent { id, parent });
                }
                Some(parent) => children.entry(parent).or_default().push(id),
            }
        }

        // Breadth-first from the roots; anything unreached sits on a cycle.
        let mut order = Vec::with_capacity(self.staged.len());
        let mut queue: VecDeque<(u64, usize)> = roots.iter().map(|&id| (id, 1)).collect();
        while let Some((id, depth)) = queue.pop_front() {
            if depth > MAX_EVENT_DEPTH {
                return Err(TelemetryError::EventNestingTooDeep {
                    id,
                    limit: MAX_EVENT_DEPTH,
                });
            }
            order.push(id);
            if let Some(ids) = children.get(&id) {
                queue.extend(ids.iter().map(|&child| (child, depth + 1)));
            }
        }

        if order.len() < self.staged.len() {
            let reached: HashSet<u64> = order.iter().copied().collect();
            if let Some((&id, staged)) = self.staged.iter().find(|(id, _)| !reached.contains(*id)) {
                return Err(TelemetryError::OrphanedEvent {
                    id,
                    parent: staged.parent.unwrap_or(id),
                });
            }
        }

        // Children always come after their parent in `order`.
        let mut built: HashMap<u64, Event> = HashMap::with_capacity(order.len());
        for &id in order.iter().rev() {
            let Some(staged) = self.staged.remove(&id) else {
                continue;
            };
            let mut event = Event::new(id, staged.start_time, staged.end_time, staged.attributes)?;
            for child_id in children.get(&id).into_iter().flatten() {
                if let Some(child) = built.remove(child_id) {
                    event.add_child(child);
                }
            }
            built.insert(id, event);
        }

        let forest: Vec<Event> = roots.iter().filter_map(|id| built.remove(id)).collect();

        debug!(
            roots = forest.len(),
            events = order.len(),
            "Event forest assembled"
        );

        Ok(forest)
    }
}
