use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};

use crate::config::Config;
use crate::error::ApiError;
use crate::models::calculator::{
    EstimateRequest, EstimatorInput, EstimatorOutput, Preset, PresetEstimate,
};
use crate::services::{estimator, presets};

/// POST /api/estimate
/// Run the solar water-heating estimator
///
/// Missing fields take the calculator's default values. Heaters may be sent
/// as a list (`heaters_kw`) or as a single total.
#[utoipa::path(
    post,
    path = "/api/estimate",
    request_body = EstimateRequest,
    responses(
        (status = 200, description = "Energy, cost, payback and sizing figures", body = EstimatorOutput)
    )
)]
pub async fn post_estimate(Json(req): Json<EstimateRequest>) -> Json<EstimatorOutput> {
    let input = req.into_input();
    Json(estimator::estimate(&input))
}

/// GET /api/presets
/// List calculator presets
#[utoipa::path(
    get,
    path = "/api/presets",
    responses(
        (status = 200, description = "Configured presets", body = Vec<Preset>)
    )
)]
pub async fn list_presets(State(config): State<Arc<Config>>) -> Json<Vec<Preset>> {
    Json(config.presets.clone())
}

/// GET /api/presets/{name}
/// Estimate for the default household with a preset applied
#[utoipa::path(
    get,
    path = "/api/presets/{name}",
    params(
        ("name" = String, Path, description = "Preset name, case-insensitive")
    ),
    responses(
        (status = 200, description = "Preset with its estimate", body = PresetEstimate),
        (status = 404, description = "Preset not found")
    )
)]
pub async fn get_preset(
    Path(name): Path<String>,
    State(config): State<Arc<Config>>,
) -> Result<Json<PresetEstimate>, ApiError> {
    let preset = presets::find(&config.presets, &name)
        .ok_or_else(|| ApiError::NotFound(format!("preset '{}'", name)))?;
    let input = preset.to_input(&EstimatorInput::default());
    Ok(Json(PresetEstimate {
        preset: preset.clone(),
        input,
        output: estimator::estimate(&input),
    }))
}
