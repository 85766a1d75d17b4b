/// ============================================================
///  Solar Water-Heating Estimator
///
///  Pure function of `EstimatorInput`, no state kept between calls.
///
///  Pipeline:
///   1. Daily hot-water demand   – 50 L/person, ΔT = 35 °C
///   2. Standby losses           – 0.8 kWh per 100 L per day
///   3. Yearly energy & cost
///   4. Tilt efficiency          – piecewise linear, optimum 30..45°
///   5. Volume factor            – larger tank stores more sun
///   6. Solar coverage & saving  – unclamped coverage
///   7. Payback                  – fixed 3200 investment
///   8. Reference reheat         – 10 → 55 °C (ΔT = 45 °C)
///   9. Sizing                   – heater, panels, inverter
///  10. Usage                    – showers, daily reheat cycles
/// ============================================================

use crate::models::calculator::{
    EstimatorFlags, EstimatorInput, EstimatorOutput, HeatingDuration, OrientationMode,
};

// ─── Physical constants ──────────────────────────────────────
/// Specific heat of water, kJ/(kg·K)
const WATER_SPECIFIC_HEAT: f64 = 4.186;
const SECONDS_PER_KWH: f64 = 3600.0;
const LITERS_PER_PERSON_DAY: f64 = 50.0;
/// Tap water heated from ~20 °C to ~55 °C
const USAGE_DELTA_T: f64 = 35.0;
/// Reference reheat from 10 °C to 55 °C
const REHEAT_DELTA_T: f64 = 45.0;
const STANDBY_KWH_PER_100L_DAY: f64 = 0.8;
const DAYS_PER_YEAR: f64 = 365.0;

// ─── Economic / sizing constants ─────────────────────────────
pub const INVESTMENT_COST: f64 = 3200.0;
const LITERS_PER_HEATER_KW: f64 = 60.0;
const LITERS_PER_SHOWER: f64 = 40.0;
const UNDERSIZED_CYCLES: f64 = 2.0;
const SMALL_HORIZONTAL_TANK_L: f64 = 60.0;

/// Main entry point.
pub fn estimate(input: &EstimatorInput) -> EstimatorOutput {
    let vol = input.tank_volume_liters;
    let price = input.electricity_price_per_kwh;

    // ── 1-3. Yearly energy & cost ─────────────────────────────
    let liters_per_day = input.occupant_count * LITERS_PER_PERSON_DAY;
    let kwh_usage_per_day =
        (liters_per_day * WATER_SPECIFIC_HEAT * USAGE_DELTA_T) / SECONDS_PER_KWH;
    let standby_per_day = (vol / 100.0) * STANDBY_KWH_PER_100L_DAY;

    let total_per_day = kwh_usage_per_day + standby_per_day;
    let total_per_year = total_per_day * DAYS_PER_YEAR;
    let cost_per_year = total_per_year * price;

    // ── 4-6. Coverage & saving ────────────────────────────────
    let coverage = solar_coverage(
        input.sunny_days_per_year,
        vol,
        input.tilt_degrees,
        input.orientation_factor,
    );
    let saving = cost_per_year * coverage;

    // ── 7. Payback (0 = never) ────────────────────────────────
    let payback_years = if saving > 0.0 { INVESTMENT_COST / saving } else { 0.0 };

    // ── 8. Reference reheat ───────────────────────────────────
    let ex_energy = (vol * WATER_SPECIFIC_HEAT * REHEAT_DELTA_T) / SECONDS_PER_KWH;
    let ex_cost = ex_energy * price;
    let heating_time = heating_duration(ex_energy, input.total_heater_power_kw);

    // ── 9. Sizing ─────────────────────────────────────────────
    let rec_heater_kw = recommended_heater_kw(vol);
    let rec_heater_display = round_to(rec_heater_kw, 1);
    let recommended_panels = panel_count(rec_heater_kw * 1000.0, input.panel_rated_power_w);
    let needed_panels =
        panel_count(input.total_heater_power_kw * 1000.0, input.panel_rated_power_w);
    let rec_array_w = recommended_panels as f64 * input.panel_rated_power_w;

    // ── 10. Usage ─────────────────────────────────────────────
    let usable_volume = vol * input.orientation_mode.usable_volume_factor();
    let shower_count = (usable_volume / LITERS_PER_SHOWER).floor().max(0.0) as u32;
    let daily_need = input.occupant_count * LITERS_PER_PERSON_DAY;
    let reheat_cycles = if vol > 0.0 { daily_need / vol } else { 0.0 };

    let flags = EstimatorFlags {
        heater_below_recommended: input.total_heater_power_kw < rec_heater_display,
        heater_above_recommended: input.total_heater_power_kw > rec_heater_display,
        tank_undersized: reheat_cycles > UNDERSIZED_CYCLES,
        tank_covers_daily_need: daily_need <= vol,
        horizontal_small_tank: input.orientation_mode == OrientationMode::Horizontal
            && vol <= SMALL_HORIZONTAL_TANK_L,
    };

    EstimatorOutput {
        annual_energy_kwh: total_per_year,
        annual_cost: cost_per_year,
        annual_saving: saving,
        payback_years,
        solar_coverage_pct: coverage * 100.0,
        example_energy_kwh: ex_energy,
        example_cost: ex_cost,
        heating_time,
        recommended_heater_kw: rec_heater_kw,
        recommended_heater_kw_display: rec_heater_display,
        recommended_panels,
        needed_panels,
        recommended_array_kwp: rec_array_w / 1000.0,
        recommended_inverter_kw: (rec_array_w / 1000.0).ceil().max(0.0) as u32,
        usable_volume_liters: usable_volume,
        shower_count,
        daily_need_liters: daily_need,
        reheat_cycles,
        flags,
    }
}

/// Derating of solar yield by mounting angle.
/// 0° → 0.85, 30..45° → 1.0, 90° → 0.7.
pub fn tilt_efficiency(tilt_deg: f64) -> f64 {
    if tilt_deg < 30.0 {
        0.85 + (tilt_deg / 30.0) * 0.15
    } else if tilt_deg > 45.0 {
        1.0 - ((tilt_deg - 45.0) / 45.0) * 0.3
    } else {
        1.0
    }
}

/// Accumulation bonus for larger tanks, saturating at 0.95.
pub fn volume_factor(volume_l: f64) -> f64 {
    0.78 + 0.17_f64.min((volume_l - 50.0) / 1500.0)
}

/// Fraction of the yearly heating cost covered by the sun.
/// Deliberately not clamped to [0, 1].
pub fn solar_coverage(sunny_days: f64, volume_l: f64, tilt_deg: f64, orientation: f64) -> f64 {
    (sunny_days / DAYS_PER_YEAR) * volume_factor(volume_l) * tilt_efficiency(tilt_deg) * orientation
}

pub fn recommended_heater_kw(volume_l: f64) -> f64 {
    volume_l / LITERS_PER_HEATER_KW
}

fn panel_count(load_w: f64, panel_w: f64) -> u32 {
    if panel_w <= 0.0 || load_w <= 0.0 {
        return 0;
    }
    (load_w / panel_w).ceil() as u32
}

fn heating_duration(energy_kwh: f64, heater_kw: f64) -> HeatingDuration {
    if heater_kw <= 0.0 || energy_kwh <= 0.0 {
        return HeatingDuration::default();
    }
    let hours_total = energy_kwh / heater_kw;
    let hours = hours_total.floor();
    let minutes = ((hours_total - hours) * 60.0).round();
    HeatingDuration {
        hours: hours as u32,
        minutes: minutes as u32,
    }
}

fn round_to(v: f64, decimals: i32) -> f64 {
    let m = 10f64.powi(decimals);
    (v * m).round() / m
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn reference_input() -> EstimatorInput {
        EstimatorInput {
            tank_volume_liters: 180.0,
            occupant_count: 4.0,
            electricity_price_per_kwh: 1.10,
            sunny_days_per_year: 180.0,
            tilt_degrees: 35.0,
            orientation_factor: 1.0,
            total_heater_power_kw: 2.0,
            panel_rated_power_w: 450.0,
            orientation_mode: OrientationMode::Vertical,
        }
    }

    #[test]
    fn test_reference_household() {
        let r = estimate(&reference_input());
        // 200 L/day → 8.1394 kWh, standby 1.44 kWh → 9.5794 kWh/day
        assert!((r.annual_energy_kwh - 3496.497_222).abs() < 1e-3, "energy {}", r.annual_energy_kwh);
        assert!((r.annual_cost - 3846.146_944).abs() < 1e-3, "cost {}", r.annual_cost);
        assert!((r.solar_coverage_pct - 42.739_726).abs() < 1e-4, "coverage {}", r.solar_coverage_pct);
        assert!((r.annual_saving - 1643.832_667).abs() < 1e-3, "saving {}", r.annual_saving);
        assert!((r.payback_years - 1.946_670).abs() < 1e-5, "payback {}", r.payback_years);
    }

    #[test]
    fn test_reference_household_derived_figures() {
        let r = estimate(&reference_input());
        assert!((r.example_energy_kwh - 9.4185).abs() < EPS);
        assert!((r.example_cost - 10.36035).abs() < 1e-9);
        // 4.709 h at 2 kW
        assert_eq!(r.heating_time, HeatingDuration { hours: 4, minutes: 43 });
        assert_eq!(r.recommended_heater_kw_display, 3.0);
        assert_eq!(r.recommended_panels, 7);
        assert_eq!(r.needed_panels, 5);
        assert!((r.recommended_array_kwp - 3.15).abs() < EPS);
        assert_eq!(r.recommended_inverter_kw, 4);
        assert_eq!(r.shower_count, 4);
        assert_eq!(r.daily_need_liters, 200.0);
        assert!((r.reheat_cycles - 200.0 / 180.0).abs() < EPS);
        assert!(r.flags.heater_below_recommended);
        assert!(!r.flags.heater_above_recommended);
        assert!(!r.flags.tank_undersized);
        assert!(!r.flags.tank_covers_daily_need);
    }

    #[test]
    fn test_tilt_efficiency_breakpoints() {
        assert_eq!(tilt_efficiency(30.0), 1.0);
        assert_eq!(tilt_efficiency(35.0), 1.0);
        assert_eq!(tilt_efficiency(45.0), 1.0);
        assert_eq!(tilt_efficiency(0.0), 0.85);
        assert!((tilt_efficiency(90.0) - 0.7).abs() < EPS);
        assert!((tilt_efficiency(15.0) - 0.925).abs() < EPS);
    }

    #[test]
    fn test_volume_factor_monotonic_and_saturating() {
        let mut prev = volume_factor(0.0);
        for v in (10..=3000).step_by(10) {
            let f = volume_factor(v as f64);
            assert!(f >= prev, "volume factor decreased at {} L", v);
            prev = f;
        }
        assert!((volume_factor(305.5) - 0.95).abs() < EPS);
        assert!((volume_factor(400.0) - 0.95).abs() < EPS);
        assert!((volume_factor(2000.0) - 0.95).abs() < EPS);
        assert!(volume_factor(300.0) < 0.95);
    }

    #[test]
    fn test_energy_linear_in_occupants() {
        let base = reference_input();
        let e = |n: f64| estimate(&EstimatorInput { occupant_count: n, ..base }).annual_energy_kwh;
        let step = e(1.0) - e(0.0);
        for n in 1..8 {
            let n = n as f64;
            assert!((e(n + 1.0) - e(n) - step).abs() < 1e-9);
        }
        assert!(e(0.0) >= 0.0);
    }

    #[test]
    fn test_payback_sentinel() {
        let base = reference_input();
        let no_sun = estimate(&EstimatorInput { sunny_days_per_year: 0.0, ..base });
        assert_eq!(no_sun.solar_coverage_pct, 0.0);
        assert_eq!(no_sun.payback_years, 0.0);

        let free_power = estimate(&EstimatorInput { electricity_price_per_kwh: 0.0, ..base });
        assert_eq!(free_power.payback_years, 0.0);

        let r = estimate(&base);
        assert_eq!(r.payback_years, INVESTMENT_COST / r.annual_saving);
    }

    #[test]
    fn test_coverage_not_clamped() {
        // 365 sunny days, big tank, optimal tilt, orientation bonus
        let input = EstimatorInput {
            sunny_days_per_year: 365.0,
            tank_volume_liters: 1000.0,
            orientation_factor: 1.1,
            ..reference_input()
        };
        let r = estimate(&input);
        assert!(r.solar_coverage_pct > 100.0, "coverage {}", r.solar_coverage_pct);
    }

    #[test]
    fn test_degenerate_inputs_do_not_panic() {
        let input = EstimatorInput {
            tank_volume_liters: 0.0,
            total_heater_power_kw: 0.0,
            panel_rated_power_w: 0.0,
            ..reference_input()
        };
        let r = estimate(&input);
        assert_eq!(r.heating_time, HeatingDuration::default());
        assert_eq!(r.needed_panels, 0);
        assert_eq!(r.recommended_panels, 0);
        assert_eq!(r.reheat_cycles, 0.0);
        assert!(r.annual_energy_kwh.is_finite());
    }

    #[test]
    fn test_orientation_mode_changes_showers() {
        let vertical = estimate(&reference_input());
        let horizontal = estimate(&EstimatorInput {
            orientation_mode: OrientationMode::Horizontal,
            ..reference_input()
        });
        assert_eq!(vertical.shower_count, 4); // 162 L
        assert_eq!(horizontal.shower_count, 2); // 117 L
        assert!(!horizontal.flags.horizontal_small_tank);

        let small = estimate(&EstimatorInput {
            tank_volume_liters: 60.0,
            orientation_mode: OrientationMode::Horizontal,
            ..reference_input()
        });
        assert!(small.flags.horizontal_small_tank);
        assert!(small.flags.tank_undersized); // 200 / 60 = 3.3
    }

    #[test]
    fn test_idempotent() {
        let input = reference_input();
        assert_eq!(estimate(&input), estimate(&input));
    }
}
