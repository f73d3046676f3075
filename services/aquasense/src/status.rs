//! Parameter status classification and cartridge tiers

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::api::Reading;

/// Severity of a single parameter reading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Good,
    Warning,
    Critical,
}

impl Status {
    /// Icon class shown next to the parameter
    pub fn icon(&self) -> &'static str {
        match self {
            Status::Good => "fas fa-check-circle",
            Status::Warning => "fas fa-exclamation-triangle",
            Status::Critical => "fas fa-times-circle",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Good => write!(f, "good"),
            Status::Warning => write!(f, "warning"),
            Status::Critical => write!(f, "critical"),
        }
    }
}

/// Acceptable range for a parameter.
///
/// With `reverse` set only the upper bound matters: higher is worse and
/// `min` is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Band {
    pub min: f64,
    pub max: f64,
    #[serde(default)]
    pub reverse: bool,
}

impl Band {
    pub const fn new(min: f64, max: f64) -> Self {
        Self {
            min,
            max,
            reverse: false,
        }
    }

    pub const fn reversed(max: f64) -> Self {
        Self {
            min: 0.0,
            max,
            reverse: true,
        }
    }

    /// Classify a value against this band
    pub fn classify(&self, value: f64) -> Status {
        if self.reverse {
            if value > self.max {
                Status::Critical
            } else if value > self.max * 0.8 {
                Status::Warning
            } else {
                Status::Good
            }
        } else if value < self.min || value > self.max {
            Status::Critical
        } else if value < self.min * 1.1 || value > self.max * 0.9 {
            Status::Warning
        } else {
            Status::Good
        }
    }
}

/// The five monitored water-quality parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Parameter {
    Ph,
    DissolvedOxygen,
    Ammonia,
    Temperature,
    MineralContent,
}

impl Parameter {
    pub const ALL: [Parameter; 5] = [
        Parameter::Ph,
        Parameter::DissolvedOxygen,
        Parameter::Ammonia,
        Parameter::Temperature,
        Parameter::MineralContent,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Parameter::Ph => "pH",
            Parameter::DissolvedOxygen => "Dissolved Oxygen",
            Parameter::Ammonia => "Ammonia",
            Parameter::Temperature => "Temperature",
            Parameter::MineralContent => "Mineral Content",
        }
    }

    pub fn unit(&self) -> Option<&'static str> {
        match self {
            Parameter::Ph => None,
            Parameter::DissolvedOxygen | Parameter::Ammonia => Some("mg/L"),
            Parameter::Temperature => Some("°C"),
            Parameter::MineralContent => Some("%"),
        }
    }

    pub fn value(&self, reading: &Reading) -> f64 {
        match self {
            Parameter::Ph => reading.ph,
            Parameter::DissolvedOxygen => reading.dissolved_oxygen,
            Parameter::Ammonia => reading.ammonia,
            Parameter::Temperature => reading.temperature,
            Parameter::MineralContent => reading.mineral_content,
        }
    }

    /// Value with its unit, e.g. `6.5 mg/L`
    pub fn display_value(&self, value: f64) -> String {
        match self.unit() {
            Some(unit) => format!("{} {}", value, unit),
            None => value.to_string(),
        }
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Fill tier of a mineral cartridge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CartridgeTier {
    Low,
    Medium,
    High,
}

impl CartridgeTier {
    pub fn for_level(level: f64) -> Self {
        if level < 20.0 {
            CartridgeTier::Low
        } else if level < 50.0 {
            CartridgeTier::Medium
        } else {
            CartridgeTier::High
        }
    }

    /// Bar fill used for the tier (red, amber, green)
    pub fn gradient(&self) -> &'static str {
        match self {
            CartridgeTier::Low => "linear-gradient(90deg, #ef4444, #dc2626)",
            CartridgeTier::Medium => "linear-gradient(90deg, #f59e0b, #d97706)",
            CartridgeTier::High => "linear-gradient(90deg, #10b981, #059669)",
        }
    }
}
