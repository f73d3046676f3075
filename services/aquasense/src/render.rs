//! Applies fetched monitoring data to a view

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::api::{
    Alert, AlertType, CartridgeLevel, CurrentData, DispensingRequest, HistoricalPoint,
    PendingDispensing, Reading,
};
use crate::chart::TrendChart;
use crate::config::ThresholdConfig;
use crate::status::{CartridgeTier, Parameter};
use crate::view::{
    AlertBanner, AlertItem, AlertList, CartridgeBar, DispensingPrompt, ParameterDisplay, View,
};

/// What happened to a fetched current-data response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// The response was rendered
    Applied { sequence: u64 },
    /// A newer response had already been rendered; this one was dropped
    Stale { sequence: u64, latest: u64 },
}

/// Renders current data and history onto a [`View`].
///
/// Current-data responses carry the sequence number of the request that
/// produced them. A response older than the last one rendered is dropped,
/// so a slow request can never overwrite fresher data.
#[derive(Debug)]
pub struct Renderer {
    view: Arc<dyn View>,
    thresholds: ThresholdConfig,
    last_applied: Mutex<u64>,
    chart: Mutex<TrendChart>,
}

impl Renderer {
    pub fn new(view: Arc<dyn View>, thresholds: ThresholdConfig) -> Self {
        Self {
            view,
            thresholds,
            last_applied: Mutex::new(0),
            chart: Mutex::new(TrendChart::default()),
        }
    }

    pub fn view(&self) -> &Arc<dyn View> {
        &self.view
    }

    /// Render `current` unless a newer response was already rendered
    pub async fn apply_current(&self, sequence: u64, current: &CurrentData) -> CycleOutcome {
        let mut last_applied = self.last_applied.lock().await;
        if sequence <= *last_applied {
            tracing::debug!(
                "Discarding stale current data #{} (latest applied #{})",
                sequence,
                *last_applied
            );
            return CycleOutcome::Stale {
                sequence,
                latest: *last_applied,
            };
        }
        *last_applied = sequence;

        self.update_parameters(&current.data);
        self.update_alerts(&current.alerts);
        self.update_cartridges(current.cartridges.iter());
        self.update_dispensing_prompt(current.pending_dispensing.as_ref());
        self.view.set_last_updated(&last_updated_text());
        self.view.commit();

        CycleOutcome::Applied { sequence }
    }

    /// Replace the trend chart with `points`
    pub async fn replace_history(&self, points: &[HistoricalPoint]) {
        let mut chart = self.chart.lock().await;
        chart.replace(points);
        tracing::debug!("Chart replaced with {} points", points.len());
        self.view.set_chart(&chart);
        self.view.commit();
    }

    /// Copy of the chart as last rendered
    pub async fn chart(&self) -> TrendChart {
        self.chart.lock().await.clone()
    }

    fn update_parameters(&self, reading: &Reading) {
        for parameter in Parameter::ALL {
            let value = parameter.value(reading);
            let display = ParameterDisplay {
                value,
                text: parameter.display_value(value),
                status: self.thresholds.band(parameter).classify(value),
            };
            self.view.set_parameter(parameter, &display);
        }
    }

    fn update_alerts(&self, alerts: &[Alert]) {
        if alerts.is_empty() {
            self.view.hide_alert_banner();
        } else if let Some(banner) = critical_banner(alerts) {
            self.view.show_alert_banner(&banner);
        }
        self.view.set_alert_list(&alert_list(alerts));
    }

    fn update_cartridges<'a>(
        &self,
        cartridges: impl Iterator<Item = (&'a String, &'a CartridgeLevel)>,
    ) {
        for (mineral, cartridge) in cartridges {
            self.view.set_cartridge(&cartridge_bar(mineral, cartridge.level));
        }
    }

    fn update_dispensing_prompt(&self, pending: Option<&PendingDispensing>) {
        match pending {
            Some(pending) => self.view.show_dispensing_prompt(&dispensing_prompt(pending)),
            None => self.view.hide_dispensing_prompt(),
        }
    }
}

/// Banner for the first critical alert in list order
pub fn critical_banner(alerts: &[Alert]) -> Option<AlertBanner> {
    alerts
        .iter()
        .find(|a| a.alert_type == AlertType::Critical)
        .map(|a| AlertBanner {
            title: format!("{} Alert", a.parameter),
            message: a.message.clone(),
        })
}

pub fn alert_list(alerts: &[Alert]) -> AlertList {
    if alerts.is_empty() {
        return AlertList::default();
    }
    AlertList::Items(
        alerts
            .iter()
            .map(|a| AlertItem {
                alert_type: a.alert_type,
                heading: format!("{}: {}", a.parameter, a.value),
                message: a.message.clone(),
                recommendation: a.recommendation.clone(),
                action: DispensingRequest {
                    mineral: a.mineral_needed.clone(),
                    reason: a.message.clone(),
                },
                timestamp: a.timestamp.clone(),
            })
            .collect(),
    )
}

pub fn cartridge_bar(mineral: &str, level: f64) -> CartridgeBar {
    CartridgeBar {
        mineral: mineral.to_string(),
        name: format_mineral_name(mineral),
        level,
        width: format!("{}%", level),
        tier: CartridgeTier::for_level(level),
    }
}

pub fn dispensing_prompt(pending: &PendingDispensing) -> DispensingPrompt {
    DispensingPrompt {
        mineral: format_mineral_name(&pending.mineral),
        reason: pending.reason.clone(),
        timestamp: pending.timestamp.clone(),
        amount: pending.amount.clone(),
    }
}

/// `oxygen_tablets` -> `Oxygen Tablets`
pub fn format_mineral_name(mineral: &str) -> String {
    let mut out = String::with_capacity(mineral.len());
    let mut at_word_start = true;
    for c in mineral.chars() {
        let c = if c == '_' { ' ' } else { c };
        if c.is_alphanumeric() {
            if at_word_start {
                out.extend(c.to_uppercase());
            } else {
                out.push(c);
            }
            at_word_start = false;
        } else {
            out.push(c);
            at_word_start = true;
        }
    }
    out
}

fn last_updated_text() -> String {
    format!("Last updated: {}", chrono::Local::now().format("%H:%M:%S"))
}
