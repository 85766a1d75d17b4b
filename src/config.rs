use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use crate::models::calculator::Preset;
use crate::services::presets::builtin_presets;

fn default_base_url() -> String { "https://api.open-meteo.com/v1/forecast".to_string() }
fn default_timeout_s() -> u64 { 8 }
fn default_refresh_interval_s() -> u64 { 600 }
fn default_retry_interval_s() -> u64 { 120 }
fn default_forecast_days() -> u8 { 7 }
fn default_peak_power_w() -> f64 { 3150.0 }

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub site: SiteConfig,
    #[serde(default)]
    pub weather: WeatherConfig,
    #[serde(default = "builtin_presets")]
    pub presets: Vec<Preset>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

/// The installation whose weather the dashboard shows.
#[derive(Debug, Deserialize, Serialize, Clone, ToSchema)]
pub struct SiteConfig {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    /// IANA zone handed to the forecast API, e.g. "Europe/Warsaw"
    pub timezone: String,
    /// Installed PV peak power (W)
    #[serde(default = "default_peak_power_w")]
    pub peak_power_w: f64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WeatherConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_s")]
    pub timeout_s: u64,
    #[serde(default = "default_refresh_interval_s")]
    pub refresh_interval_s: u64,
    #[serde(default = "default_retry_interval_s")]
    pub retry_interval_s: u64,
    #[serde(default = "default_forecast_days")]
    pub forecast_days: u8,
    #[serde(default)]
    pub offline_mode: bool,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_s: default_timeout_s(),
            refresh_interval_s: default_refresh_interval_s(),
            retry_interval_s: default_retry_interval_s(),
            forecast_days: default_forecast_days(),
            offline_mode: false,
        }
    }
}

impl WeatherConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_s)
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_s)
    }

    pub fn retry_interval(&self) -> Duration {
        Duration::from_secs(self.retry_interval_s)
    }
}

impl Config {
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_string(),
            source,
        })?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.site.peak_power_w <= 0.0 {
            return Err(ConfigError::Invalid("site.peak_power_w must be > 0".into()));
        }
        let w = &self.weather;
        if w.timeout_s == 0 || w.refresh_interval_s == 0 || w.retry_interval_s == 0 {
            return Err(ConfigError::Invalid(
                "weather timeout and intervals must be > 0".into(),
            ));
        }
        if !(1..=16).contains(&w.forecast_days) {
            return Err(ConfigError::Invalid(format!(
                "weather.forecast_days must be 1..=16, got {}",
                w.forecast_days
            )));
        }
        Ok(())
    }
}
