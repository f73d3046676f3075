//! View binding: semantic render targets for the dashboard
//!
//! The renderer never touches a concrete display. It talks to a [`View`],
//! which maps each semantic target (a parameter field, the alert banner,
//! a cartridge bar, ...) onto whatever actually draws it. [`MemoryView`]
//! keeps the result in a plain [`Document`] so rendering can be inspected
//! without any display at all.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use serde::Serialize;

use crate::api::{AlertType, DispensingRequest};
use crate::chart::TrendChart;
use crate::notification::{Notification, NotificationId};
use crate::status::{CartridgeTier, Parameter, Status};

pub const NO_ALERTS_MESSAGE: &str = "No recent alerts. System running normally.";

/// Rendered value and status of one parameter
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParameterDisplay {
    pub value: f64,
    pub text: String,
    pub status: Status,
}

/// Banner shown for a critical alert
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlertBanner {
    pub title: String,
    pub message: String,
}

/// One entry of the alert list
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlertItem {
    pub alert_type: AlertType,
    pub heading: String,
    pub message: String,
    pub recommendation: String,
    /// Dispensing request issued when the recommendation is chosen
    pub action: DispensingRequest,
    pub timestamp: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum AlertList {
    Empty { message: String },
    Items(Vec<AlertItem>),
}

impl Default for AlertList {
    fn default() -> Self {
        AlertList::Empty {
            message: NO_ALERTS_MESSAGE.to_string(),
        }
    }
}

/// Fill bar of one mineral cartridge
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CartridgeBar {
    pub mineral: String,
    pub name: String,
    pub level: f64,
    pub width: String,
    pub tier: CartridgeTier,
}

/// Confirmation prompt for a pending dispensing action
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DispensingPrompt {
    pub mineral: String,
    pub reason: String,
    pub timestamp: String,
    pub amount: Option<String>,
}

/// Render targets of the dashboard
pub trait View: Send + Sync + std::fmt::Debug {
    fn set_parameter(&self, parameter: Parameter, display: &ParameterDisplay);

    fn show_alert_banner(&self, banner: &AlertBanner);

    fn hide_alert_banner(&self);

    fn set_alert_list(&self, list: &AlertList);

    fn set_cartridge(&self, bar: &CartridgeBar);

    fn show_dispensing_prompt(&self, prompt: &DispensingPrompt);

    fn hide_dispensing_prompt(&self);

    fn set_last_updated(&self, text: &str);

    fn set_chart(&self, chart: &TrendChart);

    fn show_notification(&self, notification: &Notification);

    fn remove_notification(&self, id: NotificationId);

    /// Called once a batch of updates is complete
    fn commit(&self) {}
}

/// Everything currently on screen
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Document {
    pub parameters: BTreeMap<Parameter, ParameterDisplay>,
    pub alert_banner: Option<AlertBanner>,
    pub alert_list: AlertList,
    pub cartridges: BTreeMap<String, CartridgeBar>,
    pub dispensing_prompt: Option<DispensingPrompt>,
    pub last_updated: Option<String>,
    pub chart: TrendChart,
    pub notifications: Vec<Notification>,
    pub commits: u64,
}

/// View that renders into an in-memory [`Document`]
#[derive(Debug, Default)]
pub struct MemoryView {
    document: Mutex<Document>,
}

impl MemoryView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the current document
    pub fn snapshot(&self) -> Document {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, Document> {
        self.document.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl View for MemoryView {
    fn set_parameter(&self, parameter: Parameter, display: &ParameterDisplay) {
        self.lock().parameters.insert(parameter, display.clone());
    }

    fn show_alert_banner(&self, banner: &AlertBanner) {
        self.lock().alert_banner = Some(banner.clone());
    }

    fn hide_alert_banner(&self) {
        self.lock().alert_banner = None;
    }

    fn set_alert_list(&self, list: &AlertList) {
        self.lock().alert_list = list.clone();
    }

    fn set_cartridge(&self, bar: &CartridgeBar) {
        self.lock().cartridges.insert(bar.mineral.clone(), bar.clone());
    }

    fn show_dispensing_prompt(&self, prompt: &DispensingPrompt) {
        self.lock().dispensing_prompt = Some(prompt.clone());
    }

    fn hide_dispensing_prompt(&self) {
        self.lock().dispensing_prompt = None;
    }

    fn set_last_updated(&self, text: &str) {
        self.lock().last_updated = Some(text.to_string());
    }

    fn set_chart(&self, chart: &TrendChart) {
        self.lock().chart = chart.clone();
    }

    fn show_notification(&self, notification: &Notification) {
        self.lock().notifications.push(notification.clone());
    }

    fn remove_notification(&self, id: NotificationId) {
        self.lock().notifications.retain(|n| n.id != id);
    }

    fn commit(&self) {
        self.lock().commits += 1;
    }
}
