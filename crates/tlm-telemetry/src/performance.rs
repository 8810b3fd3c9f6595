//! Frame timing statistics for the simulator's timing provider.

use tlm_math::PerformanceCalculator;

use crate::model::{Container, Field};

/// Identifier of the provider that reports per-frame timings.
pub const TIMING_PROVIDER: &str = "com.laminarresearch.test_main_class";

/// Timing channels of [`TIMING_PROVIDER`], keyed by field id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TimeDomain {
    Cpu = 0,
    Gpu = 1,
    Fps = 2,
    FrameTime = 3,
}

impl TimeDomain {
    pub const ALL: [TimeDomain; 4] = [
        TimeDomain::Cpu,
        TimeDomain::Gpu,
        TimeDomain::Fps,
        TimeDomain::FrameTime,
    ];

    pub fn field_id(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        match self {
            TimeDomain::Cpu => "cpu",
            TimeDomain::Gpu => "gpu",
            TimeDomain::Fps => "fps",
            TimeDomain::FrameTime => "frame_time",
        }
    }
}

/// Timing field for `domain`, if the stream has one.
pub fn field_for_domain(container: &Container, domain: TimeDomain) -> Option<&Field> {
    container
        .provider_by_identifier(TIMING_PROVIDER)?
        .field(domain.field_id())
}

/// One calculator per timing domain present in a container.
#[derive(Debug, Clone, Default)]
pub struct PerformanceData {
    entries: Vec<(TimeDomain, PerformanceCalculator)>,
}

impl PerformanceData {
    /// Snapshot every present domain over `[start, end]`.
    pub fn new(container: &Container, start: f64, end: f64) -> Self {
        let entries = TimeDomain::ALL
            .iter()
            .filter_map(|&domain| {
                let field = field_for_domain(container, domain)?;
                Some((domain, PerformanceCalculator::new(field.samples(), start, end)))
            })
            .collect();

        PerformanceData { entries }
    }

    pub fn calculator(&self, domain: TimeDomain) -> Option<&PerformanceCalculator> {
        self.entries
            .iter()
            .find(|(d, _)| *d == domain)
            .map(|(_, calc)| calc)
    }

    /// Domains with a field in the container.
    pub fn domains(&self) -> impl Iterator<Item = TimeDomain> + '_ {
        self.entries.iter().map(|(domain, _)| *domain)
    }

    /// Whether both CPU and GPU timings have samples in range.
    pub fn contains_data(&self) -> bool {
        [TimeDomain::Cpu, TimeDomain::Gpu]
            .iter()
            .all(|&d| self.calculator(d).is_some_and(|c| !c.is_empty()))
    }
}
