use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use chrono::{Local, Timelike};
use serde::Deserialize;
use tracing::info;
use utoipa::IntoParams;

use crate::config::Config;
use crate::error::ApiError;
use crate::models::solar::{
    CurveResponse, HoverPoint, ProductionForecast, SolarStatusResponse, WeatherSnapshot,
};
use crate::services::weather_service::format_clock;
use crate::services::{curve_model, dashboard};
use crate::shared_state::AppState;

const DEFAULT_CURVE_STEPS: usize = 300;
const MAX_CURVE_STEPS: usize = 2000;

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CurveQuery {
    /// Number of intervals; the curve has `steps + 1` samples (1..=2000)
    pub steps: Option<usize>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PowerQuery {
    /// Normalised position between sunrise (0) and sunset (1)
    pub t: f64,
}

/// Latest snapshot, or 503 carrying the reason there is none yet and a
/// night flag taken from the local clock.
fn require_snapshot(state: &AppState) -> Result<WeatherSnapshot, ApiError> {
    state.get_snapshot().ok_or_else(|| {
        let reason = state
            .get_failure()
            .map(|f| f.message)
            .unwrap_or_else(|| "weather data not loaded yet".to_string());
        ApiError::NoWeather {
            reason,
            is_night: dashboard::is_night_hour(Local::now().hour()),
        }
    })
}

/// GET /api/solar/status
/// Current conditions and today's production so far
#[utoipa::path(
    get,
    path = "/api/solar/status",
    responses(
        (status = 200, description = "Weather snapshot with derived figures", body = SolarStatusResponse),
        (status = 503, description = "No weather data yet; body carries the timeout or API error and a clock-based is_night flag")
    )
)]
pub async fn get_status(
    State(state): State<AppState>,
    State(config): State<Arc<Config>>,
) -> Result<Json<SolarStatusResponse>, ApiError> {
    let snapshot = require_snapshot(&state)?;
    let peak = config.site.peak_power_w;
    let input = dashboard::curve_input(&snapshot, peak);
    let (season, season_factor) = dashboard::season(snapshot.local_now.date());
    let moon_phase = (!snapshot.is_day).then(|| dashboard::moon_phase(snapshot.local_now.date()));
    let (fetches_ok, fetches_failed) = state.fetch_counts();

    Ok(Json(SolarStatusResponse {
        site: config.site.name.clone(),
        sunrise_clock: format_clock(&snapshot.sunrise),
        sunset_clock: format_clock(&snapshot.sunset),
        panel_output_w: dashboard::panel_output_w(snapshot.radiation_w_m2, peak, snapshot.is_day),
        produced_today_kwh: dashboard::produced_today_kwh(&input),
        now_ratio: curve_model::normalized_time(
            input.now_epoch_ms,
            input.sunrise_epoch_ms,
            input.sunset_epoch_ms,
        ),
        daylight_hours: curve_model::daylight_hours(input.sunrise_epoch_ms, input.sunset_epoch_ms),
        condition: dashboard::classify_weather_code(snapshot.weather_code),
        foggy: dashboard::is_foggy(snapshot.humidity_pct, snapshot.weather_code),
        season,
        season_factor,
        moon_phase,
        fetches_ok,
        fetches_failed,
        last_failure: state.get_failure(),
        snapshot,
    }))
}

/// GET /api/solar/curve
/// Sampled production curve over today's daylight window
#[utoipa::path(
    get,
    path = "/api/solar/curve",
    params(CurveQuery),
    responses(
        (status = 200, description = "Curve samples and the 'now' marker", body = CurveResponse),
        (status = 400, description = "steps out of range"),
        (status = 503, description = "No weather data yet")
    )
)]
pub async fn get_curve(
    Query(q): Query<CurveQuery>,
    State(state): State<AppState>,
    State(config): State<Arc<Config>>,
) -> Result<Json<CurveResponse>, ApiError> {
    let steps = q.steps.unwrap_or(DEFAULT_CURVE_STEPS);
    if !(1..=MAX_CURVE_STEPS).contains(&steps) {
        return Err(ApiError::BadRequest(format!(
            "steps must be 1..={}, got {}",
            MAX_CURVE_STEPS, steps
        )));
    }
    let snapshot = require_snapshot(&state)?;
    let input = dashboard::curve_input(&snapshot, config.site.peak_power_w);
    let cloud_factor = curve_model::cloud_factor(input.cloud_cover_pct);

    let (now_ratio, now_power_w) = if curve_model::is_daylight(&input) {
        let r = curve_model::normalized_time(
            input.now_epoch_ms,
            input.sunrise_epoch_ms,
            input.sunset_epoch_ms,
        );
        (Some(r), Some(curve_model::power_at(r, cloud_factor, input.peak_power_w)))
    } else {
        (None, None)
    };

    Ok(Json(CurveResponse {
        sunrise: snapshot.sunrise.clone(),
        sunset: snapshot.sunset.clone(),
        cloud_cover_pct: input.cloud_cover_pct,
        cloud_factor,
        is_daylight: now_ratio.is_some(),
        now_ratio,
        now_power_w,
        samples: curve_model::sample_curve(&input, steps),
    }))
}

/// GET /api/solar/power
/// Production at a point of the curve (pointer hover)
#[utoipa::path(
    get,
    path = "/api/solar/power",
    params(PowerQuery),
    responses(
        (status = 200, description = "Time and power at t", body = HoverPoint),
        (status = 400, description = "t outside [0, 1]"),
        (status = 503, description = "No weather data yet")
    )
)]
pub async fn get_power_at(
    Query(q): Query<PowerQuery>,
    State(state): State<AppState>,
    State(config): State<Arc<Config>>,
) -> Result<Json<HoverPoint>, ApiError> {
    let snapshot = require_snapshot(&state)?;
    let input = dashboard::curve_input(&snapshot, config.site.peak_power_w);
    curve_model::hover(&input, q.t)
        .map(Json)
        .ok_or_else(|| ApiError::BadRequest(format!("t must be within [0, 1], got {}", q.t)))
}

/// GET /api/solar/forecast
/// Daily production and temperature forecast
#[utoipa::path(
    get,
    path = "/api/solar/forecast",
    responses(
        (status = 200, description = "Per-day forecast", body = ProductionForecast),
        (status = 503, description = "No weather data yet")
    )
)]
pub async fn get_forecast(
    State(state): State<AppState>,
    State(config): State<Arc<Config>>,
) -> Result<Json<ProductionForecast>, ApiError> {
    let snapshot = require_snapshot(&state)?;
    Ok(Json(dashboard::production_forecast(&snapshot.daily, config.site.peak_power_w)))
}

/// POST /api/solar/refresh
/// Fetch weather now instead of waiting for the next scheduled refresh
#[utoipa::path(
    post,
    path = "/api/solar/refresh",
    responses(
        (status = 202, description = "Refresh scheduled"),
        (status = 503, description = "Weather fetching is disabled")
    )
)]
pub async fn post_refresh(
    State(state): State<AppState>,
    State(config): State<Arc<Config>>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    if config.weather.offline_mode {
        return Err(ApiError::Unavailable("weather fetching is disabled (offline mode)".into()));
    }
    info!("manual refresh requested via API");
    state.request_refresh();
    Ok((StatusCode::ACCEPTED, Json(serde_json::json!({ "status": "refresh scheduled" }))))
}
