use std::time::Duration;

use chrono::{Local, NaiveDateTime, Utc};
use tracing::debug;

use crate::config::{SiteConfig, WeatherConfig};
use crate::error::WeatherError;
use crate::models::solar::{ForecastResponse, WeatherSnapshot};

const CURRENT_FIELDS: &str =
    "shortwave_radiation,cloudcover,is_day,temperature_2m,weather_code,relative_humidity_2m";
const DAILY_FIELDS: &str =
    "shortwave_radiation_sum,temperature_2m_max,temperature_2m_min,sunrise,sunset";

/// Open-Meteo forecast client with a hard per-request timeout.
#[derive(Clone, Debug)]
pub struct WeatherClient {
    http: reqwest::Client,
    base_url: String,
    timeout: Duration,
    forecast_days: u8,
}

impl WeatherClient {
    pub fn new(cfg: &WeatherConfig) -> Result<Self, WeatherError> {
        let http = reqwest::Client::builder()
            .timeout(cfg.timeout())
            .build()
            .map_err(|e| WeatherError::Network(e.to_string()))?;
        Ok(Self {
            http,
            base_url: cfg.base_url.clone(),
            timeout: cfg.timeout(),
            forecast_days: cfg.forecast_days,
        })
    }

    /// Fetch current conditions and the daily series for `site`.
    pub async fn fetch(&self, site: &SiteConfig) -> Result<WeatherSnapshot, WeatherError> {
        debug!(site = %site.name, url = %self.base_url, "fetching forecast");

        let response = self
            .http
            .get(&self.base_url)
            .query(&[
                ("latitude", site.latitude.to_string()),
                ("longitude", site.longitude.to_string()),
                ("current", CURRENT_FIELDS.to_string()),
                ("daily", DAILY_FIELDS.to_string()),
                ("timezone", site.timezone.clone()),
                ("forecast_days", self.forecast_days.to_string()),
            ])
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(WeatherError::Http { status: status.as_u16() });
        }

        let body = response.text().await.map_err(|e| self.classify(e))?;
        let parsed: ForecastResponse = serde_json::from_str(&body)
            .map_err(|e| WeatherError::Malformed(e.to_string()))?;

        snapshot_from_response(parsed, Local::now().naive_local())
    }

    fn classify(&self, e: reqwest::Error) -> WeatherError {
        if e.is_timeout() {
            WeatherError::Timeout { seconds: self.timeout.as_secs() }
        } else {
            WeatherError::Network(e.to_string())
        }
    }
}

/// Open-Meteo sends sunrise/sunset as local wall-clock time without an
/// offset ("2026-02-16T07:15"). Keep them on that axis: no UTC conversion.
pub fn parse_local_time(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S"))
        .ok()
}

/// Wall-clock time as milliseconds on a fixed axis, comparable with other
/// values produced the same way.
pub fn wall_clock_ms(t: NaiveDateTime) -> i64 {
    t.and_utc().timestamp_millis()
}

/// "07:15" from "2026-02-16T07:15", or "--:--".
pub fn format_clock(iso: &str) -> String {
    match iso.split_once('T') {
        Some((_, time)) => time.get(..5).unwrap_or("--:--").to_string(),
        None => "--:--".to_string(),
    }
}

pub fn snapshot_from_response(
    resp: ForecastResponse,
    local_now: NaiveDateTime,
) -> Result<WeatherSnapshot, WeatherError> {
    let daily = resp.daily.ok_or(WeatherError::MissingSunTimes)?;
    let sunrise = daily.sunrise.first().cloned().ok_or(WeatherError::MissingSunTimes)?;
    let sunset = daily.sunset.first().cloned().ok_or(WeatherError::MissingSunTimes)?;
    if sunrise.is_empty() || sunset.is_empty() {
        return Err(WeatherError::MissingSunTimes);
    }

    let sunrise_t = parse_local_time(&sunrise)
        .ok_or_else(|| WeatherError::Malformed(format!("bad sunrise '{}'", sunrise)))?;
    let sunset_t = parse_local_time(&sunset)
        .ok_or_else(|| WeatherError::Malformed(format!("bad sunset '{}'", sunset)))?;

    // Without a current block the day curve can still be drawn; readings fall back to 0.
    let current = resp.current.unwrap_or_default();

    Ok(WeatherSnapshot {
        fetched_at: Utc::now(),
        local_now,
        sunrise,
        sunset,
        sunrise_ms: wall_clock_ms(sunrise_t),
        sunset_ms: wall_clock_ms(sunset_t),
        radiation_w_m2: current.shortwave_radiation.unwrap_or(0.0).round(),
        cloud_cover_pct: current.cloudcover.unwrap_or(0.0).round(),
        is_day: current.is_day == Some(1),
        temperature_c: current.temperature_2m.unwrap_or(0.0).round(),
        humidity_pct: current.relative_humidity_2m.unwrap_or(0.0).round(),
        weather_code: current.weather_code.unwrap_or(0),
        daily,
    })
}
