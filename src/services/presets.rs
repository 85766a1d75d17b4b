use crate::models::calculator::{EstimatorInput, HeaterBank, Preset, TankMode};

/// Built-in starting points: the boiler and buffer modes, the older
/// 500 W panel variant of the calculator, and the "auto-set" family.
pub fn builtin_presets() -> Vec<Preset> {
    vec![
        Preset {
            name: "boiler".into(),
            mode: TankMode::Boiler,
            tank_volume_liters: 180.0,
            heaters_kw: vec![2.0],
            panel_rated_power_w: 450.0,
            max_volume_liters: 300.0,
            max_heater_kw: 4.0,
            occupant_count: None,
            tilt_degrees: None,
            orientation_factor: None,
        },
        Preset {
            name: "buffer".into(),
            mode: TankMode::Buffer,
            tank_volume_liters: 1000.0,
            heaters_kw: vec![3.0, 4.0],
            panel_rated_power_w: 450.0,
            max_volume_liters: 2000.0,
            max_heater_kw: 9.0,
            occupant_count: None,
            tilt_degrees: None,
            orientation_factor: None,
        },
        Preset {
            name: "legacy-500w".into(),
            mode: TankMode::Boiler,
            tank_volume_liters: 180.0,
            heaters_kw: vec![2.0],
            panel_rated_power_w: 500.0,
            max_volume_liters: 300.0,
            max_heater_kw: 4.0,
            occupant_count: None,
            tilt_degrees: None,
            orientation_factor: None,
        },
        Preset {
            name: "optimal-family".into(),
            mode: TankMode::Boiler,
            tank_volume_liters: 200.0,
            heaters_kw: vec![2.0],
            panel_rated_power_w: 450.0,
            max_volume_liters: 300.0,
            max_heater_kw: 4.0,
            occupant_count: Some(4.0),
            tilt_degrees: Some(35.0),
            orientation_factor: Some(1.0),
        },
    ]
}

pub fn find<'a>(presets: &'a [Preset], name: &str) -> Option<&'a Preset> {
    presets.iter().find(|p| p.name.eq_ignore_ascii_case(name))
}

impl Preset {
    /// Apply this preset on top of `base`. Tank volume is capped at the
    /// preset's slider maximum, each heater at `max_heater_kw`.
    pub fn to_input(&self, base: &EstimatorInput) -> EstimatorInput {
        let heaters = HeaterBank::new(
            self.heaters_kw
                .iter()
                .map(|kw| kw.min(self.max_heater_kw))
                .collect(),
        );
        EstimatorInput {
            tank_volume_liters: self.tank_volume_liters.min(self.max_volume_liters),
            total_heater_power_kw: heaters.total_kw(),
            panel_rated_power_w: self.panel_rated_power_w,
            occupant_count: self.occupant_count.unwrap_or(base.occupant_count),
            tilt_degrees: self.tilt_degrees.unwrap_or(base.tilt_degrees),
            orientation_factor: self.orientation_factor.unwrap_or(base.orientation_factor),
            ..*base
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::estimator::estimate;

    #[test]
    fn test_buffer_preset_sums_heaters() {
        let presets = builtin_presets();
        let buffer = find(&presets, "buffer").unwrap();
        let input = buffer.to_input(&EstimatorInput::default());
        assert_eq!(input.tank_volume_liters, 1000.0);
        assert_eq!(input.total_heater_power_kw, 7.0);
        assert_eq!(input.electricity_price_per_kwh, 1.10);
    }

    #[test]
    fn test_panel_wattage_variants_differ_only_in_panel_counts() {
        let presets = builtin_presets();
        let base = EstimatorInput::default();
        let a = estimate(&find(&presets, "boiler").unwrap().to_input(&base));
        let b = estimate(&find(&presets, "LEGACY-500W").unwrap().to_input(&base));
        assert_eq!(a.annual_saving, b.annual_saving);
        assert_eq!(a.recommended_panels, 7); // 3000 W / 450 W
        assert_eq!(b.recommended_panels, 6); // 3000 W / 500 W
    }

    #[test]
    fn test_optimal_family_overrides_household() {
        let presets = builtin_presets();
        let base = EstimatorInput {
            occupant_count: 2.0,
            tilt_degrees: 70.0,
            ..EstimatorInput::default()
        };
        let input = find(&presets, "optimal-family").unwrap().to_input(&base);
        assert_eq!(input.occupant_count, 4.0);
        assert_eq!(input.tilt_degrees, 35.0);
        assert_eq!(input.tank_volume_liters, 200.0);
    }

    #[test]
    fn test_unknown_preset() {
        assert!(find(&builtin_presets(), "solar-pond").is_none());
    }
}
