//! Simulated monitoring service
//!
//! Serves the same five endpoints as a real AquaSense controller, backed by
//! drifting in-memory sensor values, so the dashboard can run without
//! hardware.

use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{Duration as ChronoDuration, Local};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::net::TcpListener;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;

use crate::api::{
    ActionResponse, Alert, AlertType, CartridgeLevel, CurrentData, DispensingRequest,
    HistoricalPoint, PendingDispensing, Reading, APPROVE_DISPENSING_PATH, CANCEL_DISPENSING_PATH,
    CURRENT_DATA_PATH, HISTORICAL_DATA_PATH, REQUEST_DISPENSING_PATH,
};

const MAX_ALERTS: usize = 10;
const HISTORY_HOURS: i64 = 24;
const DEFAULT_AMOUNT: &str = "50ml";

/// In-memory state of the simulated pond
#[derive(Debug)]
pub struct SimulatedSystem {
    pub current: Reading,
    pub alerts: Vec<Alert>,
    pub cartridges: BTreeMap<String, CartridgeLevel>,
    pub pending_dispensing: Option<PendingDispensing>,
    pub historical: Vec<HistoricalPoint>,
    rng: StdRng,
}

impl SimulatedSystem {
    /// Fresh system; a seed makes every drift reproducible
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let cartridges = [
            ("lime", 85.0),
            ("oxygen_tablets", 72.0),
            ("ph_buffer", 91.0),
            ("ammonia_neutralizer", 68.0),
        ]
        .into_iter()
        .map(|(name, level)| {
            (
                name.to_string(),
                CartridgeLevel {
                    level,
                    unit: Some("%".to_string()),
                },
            )
        })
        .collect();

        let mut system = Self {
            current: Reading {
                ph: 7.2,
                dissolved_oxygen: 6.5,
                ammonia: 0.3,
                temperature: 24.5,
                mineral_content: 85.0,
            },
            alerts: Vec::new(),
            cartridges,
            pending_dispensing: None,
            historical: Vec::new(),
            rng,
        };
        system.historical = system.generate_history();
        system
    }

    /// Hourly points for the last day, oldest first
    fn generate_history(&mut self) -> Vec<HistoricalPoint> {
        let now = Local::now();
        let mut points: Vec<HistoricalPoint> = (0..HISTORY_HOURS)
            .map(|i| {
                let timestamp = now - ChronoDuration::hours(i);
                HistoricalPoint {
                    timestamp: timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
                    ph: round_to(7.0 + self.rng.gen_range(-0.5..=0.5), 1),
                    dissolved_oxygen: round_to(6.0 + self.rng.gen_range(-1.0..=2.0), 1),
                    temperature: round_to(24.0 + self.rng.gen_range(-2.0..=3.0), 1),
                    ammonia: Some(round_to(0.2 + self.rng.gen_range(0.0..=0.3), 2)),
                    mineral_content: Some((80.0 + self.rng.gen_range(-10.0..=15.0_f64)).round()),
                }
            })
            .collect();
        points.reverse();
        points
    }

    /// Drift every reading, clamp to realistic ranges and re-check alerts
    pub fn update_sensors(&mut self) {
        let r = &mut self.current;
        r.ph = drift(&mut self.rng, r.ph, 0.1, 6.0, 8.5, 1);
        r.dissolved_oxygen = drift(&mut self.rng, r.dissolved_oxygen, 0.2, 3.0, 10.0, 1);
        r.ammonia = drift(&mut self.rng, r.ammonia, 0.05, 0.0, 1.0, 2);
        r.temperature = drift(&mut self.rng, r.temperature, 0.3, 20.0, 30.0, 1);
        r.mineral_content = drift(&mut self.rng, r.mineral_content, 2.0, 60.0, 100.0, 1);

        self.check_alerts();
    }

    /// Append alerts for the current reading, keeping the newest ten
    pub fn check_alerts(&mut self) {
        let timestamp = Local::now().format("%H:%M:%S").to_string();
        let r = &self.current;
        let mut new_alerts = Vec::new();

        let alert = |alert_type: AlertType,
                     parameter: &str,
                     value: f64,
                     message: &str,
                     recommendation: &str,
                     mineral: &str| Alert {
            alert_type,
            parameter: parameter.to_string(),
            value,
            message: message.to_string(),
            recommendation: recommendation.to_string(),
            mineral_needed: mineral.to_string(),
            timestamp: timestamp.clone(),
        };

        if r.ph < 6.5 {
            new_alerts.push(alert(
                AlertType::Critical,
                "pH",
                r.ph,
                "pH too low - Risk of fish stress",
                "Add lime to increase pH",
                "lime",
            ));
        } else if r.ph > 8.0 {
            new_alerts.push(alert(
                AlertType::Critical,
                "pH",
                r.ph,
                "pH too high - Risk of fish stress",
                "Add pH buffer to stabilize",
                "ph_buffer",
            ));
        }

        if r.dissolved_oxygen < 5.0 {
            new_alerts.push(alert(
                AlertType::Critical,
                "Dissolved Oxygen",
                r.dissolved_oxygen,
                "Low oxygen levels - Fish may suffocate",
                "Add oxygen tablets immediately",
                "oxygen_tablets",
            ));
        }

        if r.ammonia > 0.5 {
            new_alerts.push(alert(
                AlertType::Warning,
                "Ammonia",
                r.ammonia,
                "High ammonia levels detected",
                "Add ammonia neutralizer",
                "ammonia_neutralizer",
            ));
        }

        if !new_alerts.is_empty() {
            tracing::debug!("Raised {} alerts", new_alerts.len());
        }
        self.alerts.extend(new_alerts);
        if self.alerts.len() > MAX_ALERTS {
            let excess = self.alerts.len() - MAX_ALERTS;
            self.alerts.drain(..excess);
        }
    }

    pub fn current_data(&self) -> CurrentData {
        CurrentData {
            data: self.current.clone(),
            alerts: self.alerts.clone(),
            cartridges: self.cartridges.clone(),
            pending_dispensing: self.pending_dispensing.clone(),
        }
    }

    pub fn request_dispensing(&mut self, request: DispensingRequest) -> ActionResponse {
        tracing::info!(
            "Dispensing requested: {} ({})",
            request.mineral,
            request.reason
        );
        self.pending_dispensing = Some(PendingDispensing {
            mineral: request.mineral,
            reason: request.reason,
            timestamp: Local::now().format("%H:%M:%S").to_string(),
            amount: Some(DEFAULT_AMOUNT.to_string()),
        });
        ActionResponse::success("Dispensing request created")
    }

    /// Dispense the pending mineral, drawing 5 to 15 points from its cartridge
    pub fn approve_dispensing(&mut self) -> ActionResponse {
        let Some(pending) = self.pending_dispensing.take() else {
            return ActionResponse::error("No pending dispensing request");
        };
        if let Some(cartridge) = self.cartridges.get_mut(&pending.mineral) {
            let used = self.rng.gen_range(5..=15_u32);
            cartridge.level = (cartridge.level - f64::from(used)).max(0.0);
            tracing::info!(
                "Dispensed {}: cartridge at {}%",
                pending.mineral,
                cartridge.level
            );
        }
        ActionResponse::success("Mineral dispensed successfully")
    }

    pub fn cancel_dispensing(&mut self) -> ActionResponse {
        if self.pending_dispensing.take().is_some() {
            tracing::info!("Dispensing request cancelled");
        }
        ActionResponse::success("Dispensing request cancelled")
    }
}

fn drift(rng: &mut StdRng, value: f64, step: f64, min: f64, max: f64, decimals: i32) -> f64 {
    let moved = value + rng.gen_range(-step..=step);
    round_to(moved.clamp(min, max), decimals)
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Thread-safe simulator handle
pub type SimulatorHandle = Arc<RwLock<SimulatedSystem>>;

pub fn new_simulator_handle(seed: Option<u64>) -> SimulatorHandle {
    Arc::new(RwLock::new(SimulatedSystem::new(seed)))
}

/// Build the simulator axum router
pub fn build_router(handle: SimulatorHandle) -> Router {
    Router::new()
        .route(CURRENT_DATA_PATH, get(current_data_handler))
        .route(HISTORICAL_DATA_PATH, get(historical_data_handler))
        .route(REQUEST_DISPENSING_PATH, post(request_dispensing_handler))
        .route(APPROVE_DISPENSING_PATH, post(approve_dispensing_handler))
        .route(CANCEL_DISPENSING_PATH, post(cancel_dispensing_handler))
        .route("/health", get(health_handler))
        .with_state(handle)
}

async fn current_data_handler(State(handle): State<SimulatorHandle>) -> Json<CurrentData> {
    let mut system = handle.write().await;
    system.update_sensors();
    Json(system.current_data())
}

async fn historical_data_handler(
    State(handle): State<SimulatorHandle>,
) -> Json<Vec<HistoricalPoint>> {
    Json(handle.read().await.historical.clone())
}

async fn request_dispensing_handler(
    State(handle): State<SimulatorHandle>,
    Json(request): Json<DispensingRequest>,
) -> Json<ActionResponse> {
    Json(handle.write().await.request_dispensing(request))
}

async fn approve_dispensing_handler(State(handle): State<SimulatorHandle>) -> Json<ActionResponse> {
    Json(handle.write().await.approve_dispensing())
}

async fn cancel_dispensing_handler(State(handle): State<SimulatorHandle>) -> Json<ActionResponse> {
    Json(handle.write().await.cancel_dispensing())
}

async fn health_handler() -> &'static str {
    "OK"
}

/// Bind the simulator on all interfaces at `port`
pub async fn bind(port: u16) -> crate::Result<TcpListener> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    TcpListener::bind(addr).await.map_err(|e| {
        crate::AquaSenseError::Simulator(format!("Failed to bind port {}: {}", port, e))
    })
}

/// Serve the simulator until `cancel` fires
pub async fn serve(
    listener: TcpListener,
    handle: SimulatorHandle,
    cancel: CancellationToken,
) -> crate::Result<()> {
    let addr = listener.local_addr()?;
    tracing::info!("Simulator listening on http://{}", addr);

    axum::serve(listener, build_router(handle))
        .with_graceful_shutdown(async move {
            cancel.cancelled().await;
        })
        .await?;

    tracing::debug!("Simulator stopped");
    Ok(())
}
