//! Console view: prints a text frame of the dashboard after each update

use std::fmt::Write as _;
use std::io::Write as _;

use crate::chart::TrendChart;
use crate::notification::{Notification, NotificationId};
use crate::status::Parameter;
use crate::view::{
    AlertBanner, AlertList, CartridgeBar, DispensingPrompt, Document, MemoryView,
    ParameterDisplay, View,
};

/// Renders into a [`MemoryView`] and prints the whole document on commit
#[derive(Debug, Default)]
pub struct ConsoleView {
    inner: MemoryView,
}

impl ConsoleView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> Document {
        self.inner.snapshot()
    }
}

impl View for ConsoleView {
    fn set_parameter(&self, parameter: Parameter, display: &ParameterDisplay) {
        self.inner.set_parameter(parameter, display);
    }

    fn show_alert_banner(&self, banner: &AlertBanner) {
        self.inner.show_alert_banner(banner);
    }

    fn hide_alert_banner(&self) {
        self.inner.hide_alert_banner();
    }

    fn set_alert_list(&self, list: &AlertList) {
        self.inner.set_alert_list(list);
    }

    fn set_cartridge(&self, bar: &CartridgeBar) {
        self.inner.set_cartridge(bar);
    }

    fn show_dispensing_prompt(&self, prompt: &DispensingPrompt) {
        self.inner.show_dispensing_prompt(prompt);
    }

    fn hide_dispensing_prompt(&self) {
        self.inner.hide_dispensing_prompt();
    }

    fn set_last_updated(&self, text: &str) {
        self.inner.set_last_updated(text);
    }

    fn set_chart(&self, chart: &TrendChart) {
        self.inner.set_chart(chart);
    }

    fn show_notification(&self, notification: &Notification) {
        self.inner.show_notification(notification);
    }

    fn remove_notification(&self, id: NotificationId) {
        self.inner.remove_notification(id);
    }

    fn commit(&self) {
        self.inner.commit();
        let frame = render_text(&self.inner.snapshot());
        let mut stdout = std::io::stdout().lock();
        if let Err(e) = writeln!(stdout, "{}", frame).and_then(|_| stdout.flush()) {
            tracing::debug!("Failed to write console frame: {}", e);
        }
    }
}

/// Plain-text rendering of a document
pub fn render_text(doc: &Document) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "==== AquaSense ====");
    if let Some(updated) = &doc.last_updated {
        let _ = writeln!(out, "{}", updated);
    }

    if let Some(banner) = &doc.alert_banner {
        let _ = writeln!(out, "!! {}: {}", banner.title, banner.message);
    }

    let _ = writeln!(out, "-- Parameters");
    for (parameter, display) in &doc.parameters {
        let _ = writeln!(
            out,
            "{:<18} {:>12}  [{}]",
            parameter.label(),
            display.text,
            display.status
        );
    }

    let _ = writeln!(out, "-- Alerts");
    match &doc.alert_list {
        AlertList::Empty { message } => {
            let _ = writeln!(out, "{}", message);
        }
        AlertList::Items(items) => {
            for (index, item) in items.iter().enumerate() {
                let _ = writeln!(
                    out,
                    "{:>2}. [{:?}] {} {} - {} ({})",
                    index + 1,
                    item.alert_type,
                    item.timestamp,
                    item.heading,
                    item.message,
                    item.recommendation
                );
            }
        }
    }

    if !doc.cartridges.is_empty() {
        let _ = writeln!(out, "-- Cartridges");
        for bar in doc.cartridges.values() {
            let filled = (bar.level.clamp(0.0, 100.0) / 5.0).round() as usize;
            let _ = writeln!(
                out,
                "{:<20} [{:<20}] {:>4} ({:?})",
                bar.name,
                "#".repeat(filled),
                bar.width,
                bar.tier
            );
        }
    }

    if !doc.chart.is_empty() {
        let _ = writeln!(
            out,
            "-- Trend {} .. {} ({} points)",
            doc.chart.labels.first().map(String::as_str).unwrap_or(""),
            doc.chart.labels.last().map(String::as_str).unwrap_or(""),
            doc.chart.labels.len()
        );
        for series in doc.chart.series() {
            let (min, max) = series
                .data
                .iter()
                .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                    (lo.min(*v), hi.max(*v))
                });
            let _ = writeln!(out, "{:<24} min {} max {}", series.label, min, max);
        }
    }

    if let Some(prompt) = &doc.dispensing_prompt {
        let _ = writeln!(out, "-- Dispensing pending: {} at {}", prompt.mineral, prompt.timestamp);
        let _ = writeln!(out, "   Reason: {}", prompt.reason);
        if let Some(amount) = &prompt.amount {
            let _ = writeln!(out, "   Amount: {}", amount);
        }
        let _ = writeln!(out, "   Type 'approve' or 'cancel'");
    }

    for notification in &doc.notifications {
        let _ = writeln!(out, ">> {}", notification.message);
    }

    out
}

/// A line typed into the console dashboard
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    Approve,
    Cancel,
    /// Follow the recommendation of the n-th listed alert (1-based)
    Request(usize),
    Dismiss,
    Refresh,
    Quit,
}

impl ConsoleCommand {
    pub fn parse(line: &str) -> Option<Self> {
        let mut words = line.split_whitespace();
        let command = match words.next()?.to_ascii_lowercase().as_str() {
            "approve" | "a" => ConsoleCommand::Approve,
            "cancel" | "c" => ConsoleCommand::Cancel,
            "request" | "r" => {
                let index = words.next()?.parse().ok().filter(|n: &usize| *n > 0)?;
                ConsoleCommand::Request(index)
            }
            "dismiss" | "d" => ConsoleCommand::Dismiss,
            "refresh" => ConsoleCommand::Refresh,
            "quit" | "q" | "exit" => ConsoleCommand::Quit,
            _ => return None,
        };
        if words.next().is_some() {
            return None;
        }
        Some(command)
    }
}
