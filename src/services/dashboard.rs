use chrono::{Datelike, NaiveDate};

use crate::models::solar::{
    CurveModelInput, DailyData, ForecastDay, ProductionForecast, Season, WeatherCondition,
    WeatherSnapshot,
};
use crate::services::curve_model::{self, SYSTEM_EFFICIENCY};

/// MJ → kWh
const MJ_PER_KWH: f64 = 3.6;
/// Lower bound of the forecast bar chart scale
const MIN_CHART_SCALE_KWH: f64 = 5.0;
const FOG_HUMIDITY_PCT: f64 = 90.0;
/// Mean synodic month, days
const SYNODIC_MONTH_DAYS: f64 = 29.5305882;
/// Local hours treated as night when no weather data is available
const NIGHT_STARTS_AT: u32 = 20;
const NIGHT_ENDS_AT: u32 = 6;

/// Calendar season with the production factor the dashboard shows next to it.
pub fn season(date: NaiveDate) -> (Season, f64) {
    let (m, d) = (date.month(), date.day());
    if (m == 3 && d >= 20) || m == 4 || m == 5 || (m == 6 && d < 21) {
        (Season::Spring, 0.80)
    } else if (m == 6 && d >= 21) || m == 7 || m == 8 || (m == 9 && d < 23) {
        (Season::Summer, 1.00)
    } else if (m == 9 && d >= 23) || m == 10 || m == 11 || (m == 12 && d < 22) {
        (Season::Autumn, 0.55)
    } else {
        (Season::Winter, 0.30)
    }
}

/// WMO weather code → coarse condition. Unknown codes read as overcast.
pub fn classify_weather_code(code: u16) -> WeatherCondition {
    match code {
        0 => WeatherCondition::Clear,
        1 | 2 => WeatherCondition::PartlyCloudy,
        3 => WeatherCondition::Overcast,
        45..=48 => WeatherCondition::Fog,
        51..=67 => WeatherCondition::Rain,
        71..=77 => WeatherCondition::Snow,
        80..=82 => WeatherCondition::Showers,
        95..=u16::MAX => WeatherCondition::Thunderstorm,
        _ => WeatherCondition::Overcast,
    }
}

pub fn is_foggy(humidity_pct: f64, weather_code: u16) -> bool {
    humidity_pct >= FOG_HUMIDITY_PCT || (45..=48).contains(&weather_code)
}

/// Lunar phase bucket 0..=7 (0 new, 2 first quarter, 4 full, 6 last quarter).
/// Approximate Julian-day count; the last half bucket wraps back to new moon.
pub fn moon_phase(date: NaiveDate) -> u8 {
    let (mut year, mut month) = (date.year() as f64, date.month() as f64);
    if month < 3.0 {
        year -= 1.0;
        month += 12.0;
    }
    let days = 365.25 * year + 30.6 * month + date.day() as f64 - 694039.09;
    let cycles = days / SYNODIC_MONTH_DAYS;
    let bucket = ((cycles - cycles.floor()) * 8.0).round() as u8;
    if bucket >= 8 { 0 } else { bucket }
}

/// Night by the local clock, used when there is no `is_day` from the API.
pub fn is_night_hour(hour: u32) -> bool {
    hour < NIGHT_ENDS_AT || hour >= NIGHT_STARTS_AT
}

/// Current PV output from measured irradiance; zero at night.
pub fn panel_output_w(radiation_w_m2: f64, peak_power_w: f64, is_day: bool) -> f64 {
    if !is_day {
        return 0.0;
    }
    ((radiation_w_m2 / 1000.0) * peak_power_w * SYSTEM_EFFICIENCY).round()
}

/// Curve input for "today" built from a snapshot.
pub fn curve_input(snapshot: &WeatherSnapshot, peak_power_w: f64) -> CurveModelInput {
    CurveModelInput {
        sunrise_epoch_ms: snapshot.sunrise_ms,
        sunset_epoch_ms: snapshot.sunset_ms,
        now_epoch_ms: snapshot.local_now.and_utc().timestamp_millis(),
        cloud_cover_pct: snapshot.cloud_cover_pct,
        peak_power_w,
    }
}

/// Energy produced since sunrise, kWh rounded to 2 decimals.
pub fn produced_today_kwh(input: &CurveModelInput) -> f64 {
    (curve_model::produced_wh(input) / 1000.0 * 100.0).round() / 100.0
}

/// Daily production forecast from the radiation sums, plus the temperature
/// series. Days with a missing radiation value count as zero production.
pub fn production_forecast(daily: &DailyData, peak_power_w: f64) -> ProductionForecast {
    let system_kwp = peak_power_w / 1000.0;
    let kwh: Vec<f64> = daily
        .shortwave_radiation_sum
        .iter()
        .map(|mj| (mj.unwrap_or(0.0) / MJ_PER_KWH) * system_kwp * SYSTEM_EFFICIENCY)
        .collect();
    let scale_kwh = kwh.iter().copied().fold(MIN_CHART_SCALE_KWH, f64::max);

    let days = kwh
        .iter()
        .enumerate()
        .map(|(i, &production_kwh)| ForecastDay {
            date: daily.time.get(i).cloned().unwrap_or_default(),
            production_kwh,
            bar_pct: production_kwh / scale_kwh * 100.0,
            temperature_max_c: daily.temperature_2m_max.get(i).copied().flatten(),
            temperature_min_c: daily.temperature_2m_min.get(i).copied().flatten(),
        })
        .collect();

    ProductionForecast { scale_kwh, days }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_season_boundaries() {
        assert_eq!(season(ymd(2026, 3, 19)).0, Season::Winter);
        assert_eq!(season(ymd(2026, 3, 20)), (Season::Spring, 0.80));
        assert_eq!(season(ymd(2026, 6, 20)).0, Season::Spring);
        assert_eq!(season(ymd(2026, 6, 21)), (Season::Summer, 1.00));
        assert_eq!(season(ymd(2026, 9, 23)), (Season::Autumn, 0.55));
        assert_eq!(season(ymd(2026, 12, 21)).0, Season::Autumn);
        assert_eq!(season(ymd(2026, 12, 22)), (Season::Winter, 0.30));
        assert_eq!(season(ymd(2026, 1, 15)).0, Season::Winter);
    }

    #[test]
    fn test_weather_codes() {
        assert_eq!(classify_weather_code(0), WeatherCondition::Clear);
        assert_eq!(classify_weather_code(2), WeatherCondition::PartlyCloudy);
        assert_eq!(classify_weather_code(45), WeatherCondition::Fog);
        assert_eq!(classify_weather_code(63), WeatherCondition::Rain);
        assert_eq!(classify_weather_code(75), WeatherCondition::Snow);
        assert_eq!(classify_weather_code(81), WeatherCondition::Showers);
        assert_eq!(classify_weather_code(99), WeatherCondition::Thunderstorm);
        assert_eq!(classify_weather_code(10), WeatherCondition::Overcast);
    }

    #[test]
    fn test_fog_and_panel_output() {
        assert!(is_foggy(92.0, 0));
        assert!(is_foggy(40.0, 48));
        assert!(!is_foggy(89.0, 3));

        assert_eq!(panel_output_w(500.0, 3150.0, true), (0.5_f64 * 3150.0 * 0.82).round());
        assert_eq!(panel_output_w(500.0, 3150.0, false), 0.0);
    }

    #[test]
    fn test_moon_phase_known_dates() {
        // new moon 2024-01-11, first quarter 01-18, full 01-25, last quarter 02-02
        assert_eq!(moon_phase(ymd(2024, 1, 11)), 0);
        assert_eq!(moon_phase(ymd(2024, 1, 18)), 2);
        assert_eq!(moon_phase(ymd(2024, 1, 25)), 4);
        assert_eq!(moon_phase(ymd(2024, 2, 1)), 6);
        // 7.55 rounds up to 8 and wraps to new moon (eclipse of 2024-04-08)
        assert_eq!(moon_phase(ymd(2024, 4, 8)), 0);
        assert_eq!(moon_phase(ymd(2026, 10, 18)), 2);
    }

    #[test]
    fn test_night_hours() {
        assert!(is_night_hour(0));
        assert!(is_night_hour(5));
        assert!(!is_night_hour(6));
        assert!(!is_night_hour(19));
        assert!(is_night_hour(20));
        assert!(is_night_hour(23));
    }

    #[test]
    fn test_production_forecast_scale() {
        let daily = DailyData {
            time: vec!["2026-10-18".into(), "2026-10-19".into(), "2026-10-20".into()],
            shortwave_radiation_sum: vec![Some(3.6), None, Some(36.0)],
            temperature_2m_max: vec![Some(14.0), Some(12.5)],
            temperature_2m_min: vec![Some(4.0), None],
            ..Default::default()
        };
        let f = production_forecast(&daily, 1000.0);
        assert_eq!(f.days.len(), 3);
        assert!((f.days[0].production_kwh - 0.82).abs() < 1e-12);
        assert_eq!(f.days[1].production_kwh, 0.0);
        assert!((f.scale_kwh - 8.2).abs() < 1e-12);
        assert!((f.days[2].bar_pct - 100.0).abs() < 1e-9);
        assert_eq!(f.days[1].temperature_min_c, None);
        assert_eq!(f.days[2].temperature_max_c, None);

        // small values keep the 5 kWh floor
        let dim = DailyData {
            shortwave_radiation_sum: vec![Some(1.0)],
            ..Default::default()
        };
        assert_eq!(production_forecast(&dim, 1000.0).scale_kwh, 5.0);
    }
}
