use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// ─── Inputs ──────────────────────────────────────────────────────────────────

/// How the tank stands. Stratification in a vertical tank keeps more of the
/// volume usable as hot water.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum OrientationMode {
    #[default]
    Vertical,
    Horizontal,
}

impl OrientationMode {
    /// Fraction of the nominal volume available as usable hot water.
    pub fn usable_volume_factor(self) -> f64 {
        match self {
            OrientationMode::Vertical => 0.90,
            OrientationMode::Horizontal => 0.65,
        }
    }
}

/// Everything the estimator needs, assembled fresh by the caller per call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct EstimatorInput {
    /// Tank capacity (L)
    pub tank_volume_liters: f64,
    pub occupant_count: f64,
    /// Grid electricity price per kWh
    pub electricity_price_per_kwh: f64,
    /// Sunny days per year (0..365)
    pub sunny_days_per_year: f64,
    /// Panel mounting angle (deg, 0..90)
    pub tilt_degrees: f64,
    /// Multiplicative azimuth derating, typically 0.7..1.0
    pub orientation_factor: f64,
    /// Sum of all configured heating elements (kW)
    pub total_heater_power_kw: f64,
    /// Rated power of one PV panel (W)
    pub panel_rated_power_w: f64,
    #[serde(default)]
    pub orientation_mode: OrientationMode,
}

impl Default for EstimatorInput {
    fn default() -> Self {
        Self {
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
}

/// One or more heating elements configured on the tank.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct HeaterBank {
    pub heaters_kw: Vec<f64>,
}

impl HeaterBank {
    pub fn new(heaters_kw: Vec<f64>) -> Self {
        Self { heaters_kw }
    }

    pub fn total_kw(&self) -> f64 {
        self.heaters_kw.iter().sum()
    }
}

// ─── Outputs ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct HeatingDuration {
    pub hours: u32,
    pub minutes: u32,
}

/// Advisory conditions the page turns into warnings and notes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct EstimatorFlags {
    /// Configured heaters are weaker than the recommendation; reheat is slow.
    pub heater_below_recommended: bool,
    /// Configured heaters exceed the recommendation; the inverter must carry them.
    pub heater_above_recommended: bool,
    /// More than two full reheats per day are needed.
    pub tank_undersized: bool,
    /// One tank covers the household's daily need without reheating.
    pub tank_covers_daily_need: bool,
    /// Horizontal tank of 60 L or less: very little usable hot water.
    pub horizontal_small_tank: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct EstimatorOutput {
    // ── Yearly economics ─────────────────────────────────────────────────────
    pub annual_energy_kwh: f64,
    pub annual_cost: f64,
    pub annual_saving: f64,
    /// Years to recover the investment; 0 means "no payback".
    pub payback_years: f64,
    /// Informational, not clamped: may exceed 100.
    pub solar_coverage_pct: f64,

    // ── Single reheat example (10 → 55 °C) ───────────────────────────────────
    pub example_energy_kwh: f64,
    pub example_cost: f64,
    pub heating_time: HeatingDuration,

    // ── Sizing ───────────────────────────────────────────────────────────────
    pub recommended_heater_kw: f64,
    pub recommended_heater_kw_display: f64,
    pub recommended_panels: u32,
    pub needed_panels: u32,
    pub recommended_array_kwp: f64,
    pub recommended_inverter_kw: u32,

    // ── Usage ────────────────────────────────────────────────────────────────
    pub usable_volume_liters: f64,
    pub shower_count: u32,
    pub daily_need_liters: f64,
    pub reheat_cycles: f64,

    pub flags: EstimatorFlags,
}

// ─── Presets ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum TankMode {
    Boiler,
    Buffer,
}

/// Named starting point for the calculator. Overrides only the fields it sets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Preset {
    pub name: String,
    pub mode: TankMode,
    pub tank_volume_liters: f64,
    pub heaters_kw: Vec<f64>,
    pub panel_rated_power_w: f64,
    pub max_volume_liters: f64,
    pub max_heater_kw: f64,
    #[serde(default)]
    pub occupant_count: Option<f64>,
    #[serde(default)]
    pub tilt_degrees: Option<f64>,
    #[serde(default)]
    pub orientation_factor: Option<f64>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PresetEstimate {
    pub preset: Preset,
    pub input: EstimatorInput,
    pub output: EstimatorOutput,
}

// ─── Request body ────────────────────────────────────────────────────────────

/// Body of `POST /api/estimate`. Either `heaters_kw` (summed) or
/// `total_heater_power_kw` may be given; the list wins when both are present.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct EstimateRequest {
    pub tank_volume_liters: Option<f64>,
    pub occupant_count: Option<f64>,
    pub electricity_price_per_kwh: Option<f64>,
    pub sunny_days_per_year: Option<f64>,
    pub tilt_degrees: Option<f64>,
    pub orientation_factor: Option<f64>,
    pub total_heater_power_kw: Option<f64>,
    pub heaters_kw: Option<Vec<f64>>,
    pub panel_rated_power_w: Option<f64>,
    pub orientation_mode: Option<OrientationMode>,
}

impl EstimateRequest {
    /// Fill gaps from the default calculator state.
    pub fn into_input(self) -> EstimatorInput {
        let base = EstimatorInput::default();
        let heater_total = match self.heaters_kw {
            Some(list) if !list.is_empty() => HeaterBank::new(list).total_kw(),
            _ => self.total_heater_power_kw.unwrap_or(base.total_heater_power_kw),
        };
        EstimatorInput {
            tank_volume_liters: self.tank_volume_liters.unwrap_or(base.tank_volume_liters),
            occupant_count: self.occupant_count.unwrap_or(base.occupant_count),
            electricity_price_per_kwh: self
                .electricity_price_per_kwh
                .unwrap_or(base.electricity_price_per_kwh),
            sunny_days_per_year: self.sunny_days_per_year.unwrap_or(base.sunny_days_per_year),
            tilt_degrees: self.tilt_degrees.unwrap_or(base.tilt_degrees),
            orientation_factor: self.orientation_factor.unwrap_or(base.orientation_factor),
            total_heater_power_kw: heater_total,
            panel_rated_power_w: self.panel_rated_power_w.unwrap_or(base.panel_rated_power_w),
            orientation_mode: self.orientation_mode.unwrap_or(base.orientation_mode),
        }
    }
}
