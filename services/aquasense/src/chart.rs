//! Historical trend chart model

use chrono::{DateTime, NaiveDateTime};
use serde::Serialize;

use crate::api::HistoricalPoint;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One line on the trend chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub label: &'static str,
    pub border_color: &'static str,
    pub background_color: &'static str,
    pub data: Vec<f64>,
}

impl Series {
    fn empty(label: &'static str, border_color: &'static str, background_color: &'static str) -> Self {
        Self {
            label,
            border_color,
            background_color,
            data: Vec::new(),
        }
    }
}

/// Three-series line chart of pH, dissolved oxygen and temperature
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendChart {
    pub labels: Vec<String>,
    pub ph: Series,
    pub dissolved_oxygen: Series,
    pub temperature: Series,
}

impl Default for TrendChart {
    fn default() -> Self {
        Self {
            labels: Vec::new(),
            ph: Series::empty("pH", "#8b5cf6", "rgba(139, 92, 246, 0.1)"),
            dissolved_oxygen: Series::empty(
                "Dissolved Oxygen (mg/L)",
                "#06b6d4",
                "rgba(6, 182, 212, 0.1)",
            ),
            temperature: Series::empty("Temperature (°C)", "#ef4444", "rgba(239, 68, 68, 0.1)"),
        }
    }
}

impl TrendChart {
    /// Replace every series and the label set with `points`
    pub fn replace(&mut self, points: &[HistoricalPoint]) {
        self.labels = points.iter().map(|p| time_label(&p.timestamp)).collect();
        self.ph.data = points.iter().map(|p| p.ph).collect();
        self.dissolved_oxygen.data = points.iter().map(|p| p.dissolved_oxygen).collect();
        self.temperature.data = points.iter().map(|p| p.temperature).collect();
    }

    pub fn series(&self) -> [&Series; 3] {
        [&self.ph, &self.dissolved_oxygen, &self.temperature]
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// `HH:MM` label for a timestamp; unparseable timestamps are kept as-is
pub fn time_label(timestamp: &str) -> String {
    if let Ok(naive) = NaiveDateTime::parse_from_str(timestamp, TIMESTAMP_FORMAT) {
        return naive.format("%H:%M").to_string();
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(timestamp) {
        return dt.format("%H:%M").to_string();
    }
    timestamp.to_string()
}
