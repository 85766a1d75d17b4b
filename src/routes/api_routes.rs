use axum::{
    routing::{get, post},
    Router,
};

use crate::controllers::calculator_controller::{get_preset, list_presets, post_estimate};
use crate::controllers::solar_controller::{
    get_curve, get_forecast, get_power_at, get_status, post_refresh,
};
use crate::shared_state::SharedState;

/// Build the `/api/*` sub-router.
/// Handlers extract `State<AppState>` and/or `State<Arc<Config>>` via
/// `FromRef<SharedState>`, so a single `.with_state(shared)` covers both.
pub fn api_routes(shared: SharedState) -> Router {
    Router::new()
        .route("/estimate",          post(post_estimate))
        .route("/presets",           get(list_presets))
        .route("/presets/{name}",    get(get_preset))
        .route("/solar/status",      get(get_status))
        .route("/solar/curve",       get(get_curve))
        .route("/solar/power",       get(get_power_at))
        .route("/solar/forecast",    get(get_forecast))
        .route("/solar/refresh",     post(post_refresh))
        .with_state(shared)
}
