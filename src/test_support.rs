//! Fixtures shared by unit tests.

use std::sync::Arc;

use chrono::Utc;

use crate::config::{Config, ServerConfig, SiteConfig, WeatherConfig};
use crate::models::solar::{DailyData, WeatherSnapshot};
use crate::services::presets::builtin_presets;
use crate::services::weather_service::{parse_local_time, wall_clock_ms};
use crate::shared_state::{AppState, SharedState};

pub fn site() -> SiteConfig {
    SiteConfig {
        name: "Lomza".into(),
        latitude: 53.1789,
        longitude: 22.0593,
        timezone: "Europe/Warsaw".into(),
        peak_power_w: 3150.0,
    }
}

pub fn config() -> Config {
    Config {
        server: ServerConfig { port: 0 },
        site: site(),
        weather: WeatherConfig { offline_mode: true, ..WeatherConfig::default() },
        presets: builtin_presets(),
    }
}

/// Clear noon between a 06:00 sunrise and an 18:00 sunset.
pub fn snapshot() -> WeatherSnapshot {
    let sunrise = "2026-06-21T06:00".to_string();
    let sunset = "2026-06-21T18:00".to_string();
    let sunrise_t = parse_local_time(&sunrise).unwrap();
    let sunset_t = parse_local_time(&sunset).unwrap();
    WeatherSnapshot {
        fetched_at: Utc::now(),
        local_now: parse_local_time("2026-06-21T12:00").unwrap(),
        sunrise_ms: wall_clock_ms(sunrise_t),
        sunset_ms: wall_clock_ms(sunset_t),
        sunrise,
        sunset,
        radiation_w_m2: 800.0,
        cloud_cover_pct: 0.0,
        is_day: true,
        temperature_c: 24.0,
        humidity_pct: 55.0,
        weather_code: 0,
        daily: DailyData {
            time: vec!["2026-06-21".into(), "2026-06-22".into()],
            shortwave_radiation_sum: vec![Some(25.2), Some(10.8)],
            temperature_2m_max: vec![Some(27.0), Some(22.0)],
            temperature_2m_min: vec![Some(14.0), Some(12.0)],
            sunrise: vec!["2026-06-21T06:00".into(), "2026-06-22T06:00".into()],
            sunset: vec!["2026-06-21T18:00".into(), "2026-06-22T18:00".into()],
        },
    }
}

pub fn shared_state(with_snapshot: bool) -> SharedState {
    let app = AppState::new();
    if with_snapshot {
        app.set_snapshot(snapshot());
    }
    SharedState { app, config: Arc::new(config()) }
}
