//! Monitoring service API: wire types and a typed client
//!
//! These types mirror the JSON bodies served by the monitoring service and
//! are shared by the dashboard client and the simulator.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::io::{HttpClient, HttpResponse};

pub const CURRENT_DATA_PATH: &str = "/api/current-data";
pub const HISTORICAL_DATA_PATH: &str = "/api/historical-data";
pub const REQUEST_DISPENSING_PATH: &str = "/api/request-dispensing";
pub const APPROVE_DISPENSING_PATH: &str = "/api/approve-dispensing";
pub const CANCEL_DISPENSING_PATH: &str = "/api/cancel-dispensing";

/// One snapshot of the five monitored parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub ph: f64,
    pub dissolved_oxygen: f64,
    pub ammonia: f64,
    pub temperature: f64,
    pub mineral_content: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertType {
    Critical,
    Warning,
}

/// Server-flagged out-of-range condition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    #[serde(rename = "type")]
    pub alert_type: AlertType,
    pub parameter: String,
    pub value: f64,
    pub message: String,
    pub recommendation: String,
    pub mineral_needed: String,
    pub timestamp: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartridgeLevel {
    pub level: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

/// A proposed mineral addition awaiting confirmation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingDispensing {
    pub mineral: String,
    pub reason: String,
    pub timestamp: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<String>,
}

/// Body of GET /api/current-data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentData {
    pub data: Reading,
    #[serde(default)]
    pub alerts: Vec<Alert>,
    #[serde(default)]
    pub cartridges: BTreeMap<String, CartridgeLevel>,
    #[serde(default)]
    pub pending_dispensing: Option<PendingDispensing>,
}

/// One entry of GET /api/historical-data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalPoint {
    pub timestamp: String,
    pub ph: f64,
    pub dissolved_oxygen: f64,
    pub temperature: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ammonia: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mineral_content: Option<f64>,
}

/// Body of POST /api/request-dispensing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispensingRequest {
    pub mineral: String,
    pub reason: String,
}

/// Response of the dispensing endpoints
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionResponse {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ActionResponse {
    pub fn success(message: &str) -> Self {
        Self {
            status: "success".to_string(),
            message: Some(message.to_string()),
        }
    }

    pub fn error(message: &str) -> Self {
        Self {
            status: "error".to_string(),
            message: Some(message.to_string()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == "success"
    }
}

/// Typed client for the monitoring service
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    http: Arc<dyn HttpClient>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl ApiClient {
    pub fn new(base_url: &str, http: Arc<dyn HttpClient>) -> Self {
        let base_url = base_url.trim_end_matches('/').to_string();
        tracing::debug!("Created ApiClient for {}", base_url);
        Self { base_url, http }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn current_data(&self) -> crate::Result<CurrentData> {
        let response = self.http.get(&self.url(CURRENT_DATA_PATH)).await?;
        parse_body(response)
    }

    pub async fn historical_data(&self) -> crate::Result<Vec<HistoricalPoint>> {
        let response = self.http.get(&self.url(HISTORICAL_DATA_PATH)).await?;
        parse_body(response)
    }

    pub async fn request_dispensing(
        &self,
        request: &DispensingRequest,
    ) -> crate::Result<ActionResponse> {
        let body = serde_json::to_string(request)?;
        let response = self
            .http
            .post_json(&self.url(REQUEST_DISPENSING_PATH), Some(body))
            .await?;
        parse_body(response)
    }

    pub async fn approve_dispensing(&self) -> crate::Result<ActionResponse> {
        let response = self
            .http
            .post_json(&self.url(APPROVE_DISPENSING_PATH), None)
            .await?;
        parse_body(response)
    }

    pub async fn cancel_dispensing(&self) -> crate::Result<ActionResponse> {
        let response = self
            .http
            .post_json(&self.url(CANCEL_DISPENSING_PATH), None)
            .await?;
        parse_body(response)
    }
}

fn parse_body<T: DeserializeOwned>(response: HttpResponse) -> crate::Result<T> {
    if !response.is_success() {
        return Err(crate::AquaSenseError::Status {
            status: response.status,
            body: response.body,
        });
    }
    Ok(serde_json::from_str(&response.body)?)
}
