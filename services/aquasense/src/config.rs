//! Configuration types for the aquasense dashboard and simulator

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::status::{Band, Parameter};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub polling: PollingConfig,
    #[serde(default)]
    pub notifications: NotificationConfig,
    #[serde(default)]
    pub thresholds: ThresholdConfig,
    #[serde(default)]
    pub simulator: SimulatorConfig,
}

/// Where the monitoring service lives
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollingConfig {
    #[serde(default = "default_polling_interval")]
    pub interval_seconds: u64,
    #[serde(default = "default_true")]
    pub load_history_on_start: bool,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            interval_seconds: default_polling_interval(),
            load_history_on_start: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationConfig {
    #[serde(default = "default_display_ms")]
    pub display_ms: u64,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            display_ms: default_display_ms(),
        }
    }
}

/// Status bands for each parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdConfig {
    #[serde(default = "default_ph_band")]
    pub ph: Band,
    #[serde(default = "default_oxygen_band")]
    pub dissolved_oxygen: Band,
    #[serde(default = "default_ammonia_band")]
    pub ammonia: Band,
    #[serde(default = "default_temperature_band")]
    pub temperature: Band,
    #[serde(default = "default_mineral_band")]
    pub mineral_content: Band,
}

impl ThresholdConfig {
    /// Band for `parameter`; ammonia always uses the reverse rule
    pub fn band(&self, parameter: Parameter) -> Band {
        match parameter {
            Parameter::Ph => self.ph,
            Parameter::DissolvedOxygen => self.dissolved_oxygen,
            Parameter::Ammonia => Band {
                reverse: true,
                ..self.ammonia
            },
            Parameter::Temperature => self.temperature,
            Parameter::MineralContent => self.mineral_content,
        }
    }
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            ph: default_ph_band(),
            dissolved_oxygen: default_oxygen_band(),
            ammonia: default_ammonia_band(),
            temperature: default_temperature_band(),
            mineral_content: default_mineral_band(),
        }
    }
}

/// Settings for the simulated monitoring service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulatorConfig {
    #[serde(default = "default_simulator_port")]
    pub port: u16,
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            port: default_simulator_port(),
            seed: None,
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:5000".to_string()
}

fn default_polling_interval() -> u64 {
    5
}

fn default_true() -> bool {
    true
}

fn default_display_ms() -> u64 {
    3000
}

fn default_ph_band() -> Band {
    Band::new(6.5, 8.0)
}

fn default_oxygen_band() -> Band {
    Band::new(5.0, 10.0)
}

fn default_ammonia_band() -> Band {
    Band::reversed(0.5)
}

fn default_temperature_band() -> Band {
    Band::new(22.0, 28.0)
}

fn default_mineral_band() -> Band {
    Band::new(70.0, 95.0)
}

fn default_simulator_port() -> u16 {
    5000
}

/// Environment variable read by `simulate` when no port is given
pub const PORT_ENV: &str = "PORT";

/// Simulator port from the `PORT` environment variable, if set
pub fn port_from_env() -> crate::Result<Option<u16>> {
    parse_port(std::env::var(PORT_ENV).ok().as_deref())
}

fn parse_port(raw: Option<&str>) -> crate::Result<Option<u16>> {
    raw.map(|value| {
        value.trim().parse::<u16>().map_err(|e| {
            crate::AquaSenseError::Config(format!("Invalid {} {:?}: {}", PORT_ENV, value, e))
        })
    })
    .transpose()
}

/// Load configuration from a JSON file
pub fn load_config(path: &Path) -> crate::Result<Config> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        crate::AquaSenseError::Config(format!("Failed to read config file {:?}: {}", path, e))
    })?;
    let config: Config = serde_json::from_str(&content)?;
    config.validate()?;
    Ok(config)
}

impl Config {
    /// Reject values the session cannot run with
    pub fn validate(&self) -> crate::Result<()> {
        if self.polling.interval_seconds == 0 {
            return Err(crate::AquaSenseError::Config(
                "polling.interval_seconds must be greater than zero".to_string(),
            ));
        }
        let base = &self.server.base_url;
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(crate::AquaSenseError::Config(format!(
                "server.base_url must be an http(s) URL, got {:?}",
                base
            )));
        }
        Ok(())
    }
}
