/// Day production curve: a half-sine over the daylight window, flattened by
/// cloud cover and scaled by the system efficiency.
///
///   power(t) = sin(π·t) · cloud_factor · P_peak · η_sys
///
/// `t` is the normalised position between sunrise (0) and sunset (1).

use std::f64::consts::PI;

use crate::models::solar::{CurveModelInput, CurveSample, HoverPoint};

/// Inverter + wiring losses
pub const SYSTEM_EFFICIENCY: f64 = 0.82;
/// Share of clear-sky output lost under full overcast
const MAX_CLOUD_LOSS: f64 = 0.85;
const MS_PER_HOUR: f64 = 3_600_000.0;

/// 1.0 under a clear sky, 0.15 under full overcast.
pub fn cloud_factor(cloud_cover_pct: f64) -> f64 {
    1.0 - (cloud_cover_pct / 100.0) * MAX_CLOUD_LOSS
}

/// Instantaneous power at normalised time `t`. Only meaningful for
/// `t` in [0, 1]; the caller clamps.
pub fn power_at(t: f64, cloud_fraction: f64, peak_power_w: f64) -> f64 {
    let raw = (PI * t).sin();
    raw * cloud_fraction * peak_power_w * SYSTEM_EFFICIENCY
}

/// `steps + 1` evenly spaced samples from sunrise to sunset.
pub fn sample_curve(input: &CurveModelInput, steps: usize) -> Vec<CurveSample> {
    let cf = cloud_factor(input.cloud_cover_pct);
    if steps == 0 {
        return vec![CurveSample {
            normalized_time: 0.0,
            instantaneous_power_w: power_at(0.0, cf, input.peak_power_w),
        }];
    }
    (0..=steps)
        .map(|i| {
            let t = i as f64 / steps as f64;
            CurveSample {
                normalized_time: t,
                instantaneous_power_w: power_at(t, cf, input.peak_power_w),
            }
        })
        .collect()
}

/// Position of `query_ms` in the daylight window, clamped to [0, 1].
pub fn normalized_time(query_ms: i64, sunrise_ms: i64, sunset_ms: i64) -> f64 {
    let span = (sunset_ms - sunrise_ms) as f64;
    if span <= 0.0 {
        return 0.0;
    }
    ((query_ms - sunrise_ms) as f64 / span).clamp(0.0, 1.0)
}

pub fn daylight_hours(sunrise_ms: i64, sunset_ms: i64) -> f64 {
    (sunset_ms - sunrise_ms) as f64 / MS_PER_HOUR
}

pub fn is_daylight(input: &CurveModelInput) -> bool {
    input.now_epoch_ms >= input.sunrise_epoch_ms && input.now_epoch_ms <= input.sunset_epoch_ms
}

/// Energy produced between sunrise and `now`, from the closed-form
/// antiderivative of the half-sine: ∫₀ʳ sin(πx) dx = (1 − cos(πr)) / π.
pub fn produced_wh(input: &CurveModelInput) -> f64 {
    let now_ratio = normalized_time(
        input.now_epoch_ms,
        input.sunrise_epoch_ms,
        input.sunset_epoch_ms,
    );
    let hours = daylight_hours(input.sunrise_epoch_ms, input.sunset_epoch_ms);
    let integral_factor = (1.0 - (PI * now_ratio).cos()) / PI;
    input.peak_power_w
        * cloud_factor(input.cloud_cover_pct)
        * SYSTEM_EFFICIENCY
        * hours
        * integral_factor
}

/// Resolve a pointer at normalised position `t`. `None` off the curve.
pub fn hover(input: &CurveModelInput, t: f64) -> Option<HoverPoint> {
    if !(0.0..=1.0).contains(&t) {
        return None;
    }
    let span = (input.sunset_epoch_ms - input.sunrise_epoch_ms) as f64;
    let power = power_at(t, cloud_factor(input.cloud_cover_pct), input.peak_power_w);
    Some(HoverPoint {
        normalized_time: t,
        timestamp_ms: input.sunrise_epoch_ms + (t * span).round() as i64,
        power_w: power.round().max(0.0),
    })
}
