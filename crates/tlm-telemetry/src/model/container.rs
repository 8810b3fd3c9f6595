//! Root of the decoded model.

use serde::Serialize;

use super::{Event, Provider, Statistic};

/// Everything decoded from one telemetry stream.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Container {
    pub version: u32,
    /// Floor of the earliest sample timestamp.
    pub start_time: f64,
    /// Ceiling of the latest sample timestamp.
    pub end_time: f64,
    providers: Vec<Provider>,
    events: Vec<Event>,
    statistics: Vec<Statistic>,
}

impl Container {
    pub fn new(version: u32) -> Self {
        Container {
            version,
            start_time: 0.0,
            end_time: 0.0,
            providers: Vec::new(),
            events: Vec::new(),
            statistics: Vec::new(),
        }
    }

    pub fn providers(&self) -> &[Provider] {
        &self.providers
    }

    pub(crate) fn providers_mut(&mut self) -> &mut [Provider] {
        &mut self.providers
    }

    /// Provider by runtime id.
    pub fn provider(&self, id: u16) -> Option<&Provider> {
        self.providers.iter().find(|p| p.id == id)
    }

    pub(crate) fn provider_mut(&mut self, id: u16) -> Option<&mut Provider> {
        self.providers.iter_mut().find(|p| p.id == id)
    }

    /// Provider by its stable identifier.
    pub fn provider_by_identifier(&self, identifier: &str) -> Option<&Provider> {
        self.providers.iter().find(|p| p.identifier == identifier)
    }

    pub(crate) fn add_provider(&mut self, provider: Provider) {
        self.providers.push(provider);
    }

    /// Root events in ascending id order.
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub(crate) fn set_events(&mut self, events: Vec<Event>) {
        self.events = events;
    }

    /// Search the whole forest for `id`.
    pub fn find_event(&self, id: u64) -> Option<&Event> {
        self.events.iter().find_map(|root| {
            if root.id == id {
                Some(root)
            } else {
                root.find_child(id)
            }
        })
    }

    /// Total number of events including nested ones.
    pub fn event_count(&self) -> usize {
        self.events.iter().map(Event::subtree_len).sum()
    }

    pub fn statistics(&self) -> &[Statistic] {
        &self.statistics
    }

    pub(crate) fn add_statistic(&mut self, statistic: Statistic) {
        self.statistics.push(statistic);
    }

    pub fn duration(&self) -> f64 {
        self.end_time - self.start_time
    }

    /// Recompute `[start_time, end_time]` from the current samples.
    ///
    /// Empty fields do not contribute; with no samples at all the range
    /// is `[0, 0]`.
    pub fn update_time_range(&mut self) {
        let bounds = self
            .providers
            .iter()
            .flat_map(Provider::fields)
            .filter_map(|field| field.time_bounds())
            .reduce(|(lo, hi), (start, end)| (lo.min(start), hi.max(end)));

        let (start, end) = match bounds {
            Some((lo, hi)) => (lo.floor(), hi.ceil()),
            None => (0.0, 0.0),
        };
        self.start_time = start;
        self.end_time = end;
    }
}
