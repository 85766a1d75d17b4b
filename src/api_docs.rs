use utoipa::OpenApi;
use crate::controllers::{calculator_controller, solar_controller};
use crate::models::{calculator, solar};

#[derive(OpenApi)]
#[openapi(
    paths(
        calculator_controller::post_estimate,
        calculator_controller::list_presets,
        calculator_controller::get_preset,
        solar_controller::get_status,
        solar_controller::get_curve,
        solar_controller::get_power_at,
        solar_controller::get_forecast,
        solar_controller::post_refresh
    ),
    components(
        schemas(
            calculator::EstimateRequest,
            calculator::EstimatorInput,
            calculator::EstimatorOutput,
            calculator::EstimatorFlags,
            calculator::HeatingDuration,
            calculator::OrientationMode,
            calculator::Preset,
            calculator::PresetEstimate,
            calculator::TankMode,
            solar::CurveResponse,
            solar::CurveSample,
            solar::HoverPoint,
            solar::SolarStatusResponse,
            solar::WeatherSnapshot,
            solar::ProductionForecast,
            solar::ForecastDay,
            solar::FetchFailure
        )
    ),
    tags(
        (name = "solar-boiler-calc", description = "Solar water-heating calculator and production dashboard API")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_all_routes() {
        let doc = ApiDoc::openapi();
        for path in ["/api/estimate", "/api/presets/{name}", "/api/solar/curve", "/api/solar/refresh"] {
            assert!(doc.paths.paths.contains_key(path), "missing {}", path);
        }
    }
}
