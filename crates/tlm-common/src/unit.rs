//! Measurement units declared by telemetry fields.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Unit a field's samples are expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Unit {
    /// Plain number, boolean or string.
    #[default]
    Value = 0,
    /// Frames per second.
    Fps = 1,
    /// Seconds.
    Time = 2,
    /// Bytes.
    Memory = 3,
    /// `[begin, end]` pair in seconds.
    Duration = 4,
}

impl Unit {
    /// Decode a wire tag. Returns `None` for unknown tags.
    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            0 => Some(Unit::Value),
            1 => Some(Unit::Fps),
            2 => Some(Unit::Time),
            3 => Some(Unit::Memory),
            4 => Some(Unit::Duration),
            _ => None,
        }
    }

    pub fn tag(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        match self {
            Unit::Value => "Value",
            Unit::Fps => "FPS",
            Unit::Time => "Time",
            Unit::Memory => "Memory",
            Unit::Duration => "Duration",
        }
    }

    /// Render a scalar in this unit for human output.
    pub fn format_value(self, value: f64) -> String {
        match self {
            Unit::Value => format!("{:.3}", value),
            Unit::Fps => format!("{:.2}FPS", value),
            Unit::Time | Unit::Duration => format_seconds(value),
            Unit::Memory => format_bytes(value),
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn format_seconds(value: f64) -> String {
    if value < 0.001 {
        format!("{:.0}us", value * 1_000_000.0)
    } else if value < 1.0 {
        format!("{:.2}ms", value * 1000.0)
    } else {
        format!("{:.2}s", value)
    }
}

fn format_bytes(value: f64) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = KB * 1024.0;
    const GB: f64 = MB * 1024.0;

    if value >= GB {
        format!("{:.2}Gb", value / GB)
    } else if value >= MB {
        format!("{:.2}Mb", value / MB)
    } else if value >= KB {
        format!("{:.2}Kb", value / KB)
    } else {
        format!("{:.0}b", value)
    }
}
