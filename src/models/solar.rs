use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// ─── Curve model ─────────────────────────────────────────────────────────────

/// Daylight window and conditions for one day-curve evaluation.
/// Timestamps are wall-clock milliseconds on the site's local axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CurveModelInput {
    pub sunrise_epoch_ms: i64,
    pub sunset_epoch_ms: i64,
    pub now_epoch_ms: i64,
    /// Cloud cover (%, 0..100)
    pub cloud_cover_pct: f64,
    /// Installed peak power (W)
    pub peak_power_w: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CurveSample {
    /// Position in the daylight window, 0 = sunrise, 1 = sunset
    pub normalized_time: f64,
    pub instantaneous_power_w: f64,
}

/// Pointer position on the curve resolved to a time and a power value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct HoverPoint {
    pub normalized_time: f64,
    pub timestamp_ms: i64,
    pub power_w: f64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CurveResponse {
    pub sunrise: String,
    pub sunset: String,
    pub cloud_cover_pct: f64,
    pub cloud_factor: f64,
    pub is_daylight: bool,
    /// Position of "now" in the window, present only during daylight
    pub now_ratio: Option<f64>,
    pub now_power_w: Option<f64>,
    pub samples: Vec<CurveSample>,
}

// ─── Open-Meteo wire types ───────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ForecastResponse {
    #[serde(default)]
    pub current: Option<CurrentData>,
    #[serde(default)]
    pub daily: Option<DailyData>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CurrentData {
    pub shortwave_radiation: Option<f64>,
    pub cloudcover: Option<f64>,
    pub is_day: Option<u8>,
    pub temperature_2m: Option<f64>,
    pub weather_code: Option<u16>,
    pub relative_humidity_2m: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
pub struct DailyData {
    #[serde(default)]
    pub time: Vec<String>,
    /// MJ/m² per day
    #[serde(default)]
    pub shortwave_radiation_sum: Vec<Option<f64>>,
    #[serde(default)]
    pub temperature_2m_max: Vec<Option<f64>>,
    #[serde(default)]
    pub temperature_2m_min: Vec<Option<f64>>,
    /// Local wall-clock ISO8601 without offset, e.g. "2026-02-16T07:15"
    #[serde(default)]
    pub sunrise: Vec<String>,
    #[serde(default)]
    pub sunset: Vec<String>,
}

// ─── Internal weather snapshot ───────────────────────────────────────────────

/// Latest successful fetch, already normalised for the models.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct WeatherSnapshot {
    pub fetched_at: DateTime<Utc>,
    /// Local wall-clock time at fetch
    #[schema(value_type = String)]
    pub local_now: NaiveDateTime,
    pub sunrise: String,
    pub sunset: String,
    pub sunrise_ms: i64,
    pub sunset_ms: i64,
    /// W/m², rounded
    pub radiation_w_m2: f64,
    /// %, rounded
    pub cloud_cover_pct: f64,
    pub is_day: bool,
    pub temperature_c: f64,
    pub humidity_pct: f64,
    pub weather_code: u16,
    pub daily: DailyData,
}

// ─── Dashboard ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum WeatherCondition {
    Clear,
    PartlyCloudy,
    Overcast,
    Fog,
    Rain,
    Snow,
    Showers,
    Thunderstorm,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Season {
    Spring,
    Summer,
    Autumn,
    Winter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    Timeout,
    Api,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct FetchFailure {
    pub kind: FailureKind,
    pub message: String,
    pub at: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SolarStatusResponse {
    pub site: String,
    pub snapshot: WeatherSnapshot,
    /// "HH:MM", or "--:--" when unparseable
    pub sunrise_clock: String,
    pub sunset_clock: String,
    pub panel_output_w: f64,
    pub produced_today_kwh: f64,
    pub now_ratio: f64,
    pub daylight_hours: f64,
    pub condition: WeatherCondition,
    pub foggy: bool,
    pub season: Season,
    pub season_factor: f64,
    /// Lunar phase bucket 0..=7, only at night
    pub moon_phase: Option<u8>,
    pub fetches_ok: u64,
    pub fetches_failed: u64,
    /// Set when the most recent refresh failed and the snapshot is stale
    pub last_failure: Option<FetchFailure>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ForecastDay {
    pub date: String,
    pub production_kwh: f64,
    /// Bar height relative to the chart scale (%, 0..100)
    pub bar_pct: f64,
    pub temperature_max_c: Option<f64>,
    pub temperature_min_c: Option<f64>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductionForecast {
    /// Chart scale, never below 5 kWh
    pub scale_kwh: f64,
    pub days: Vec<ForecastDay>,
}
