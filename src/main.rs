use std::net::SocketAddr;
use std::sync::Arc;

use axum::{response::Html, routing::get, Router};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;
use utoipa_scalar::Scalar;

use solar_boiler_calc::api_docs::ApiDoc;
use solar_boiler_calc::config::Config;
use solar_boiler_calc::routes::api_routes::api_routes;
use solar_boiler_calc::services::refresh::run_refresh_loop;
use solar_boiler_calc::services::weather_service::WeatherClient;
use solar_boiler_calc::shared_state::{AppState, SharedState};

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).with_target(false).init();
}

#[tokio::main]
async fn main() {
    init_tracing();

    // 1. Load configuration
    let config_path = std::env::var("SOLAR_CONFIG").unwrap_or_else(|_| "config.json".to_string());
    let config = match Config::load(&config_path) {
        Ok(c) => c,
        Err(e) => {
            error!("failed to load {}: {}", config_path, e);
            return;
        }
    };
    info!(
        site = %config.site.name,
        peak_w = config.site.peak_power_w,
        presets = config.presets.len(),
        "configuration loaded"
    );

    // 2. Initialize shared state
    let state = AppState::new();

    // 3. Start the weather refresh loop
    if config.weather.offline_mode {
        warn!("offline mode: weather fetching disabled");
    } else {
        match WeatherClient::new(&config.weather) {
            Ok(client) => {
                tokio::spawn(run_refresh_loop(
                    client,
                    config.site.clone(),
                    config.weather.clone(),
                    state.clone(),
                ));
            }
            Err(e) => error!("cannot build weather client: {}", e),
        }
    }

    // 4. Start Axum HTTP server
    let server_port = config.server.port;
    let shared = SharedState { app: state, config: Arc::new(config) };
    let app = Router::new()
        .nest("/api", api_routes(shared))
        .route("/scalar", get(|| async {
            Html(Scalar::new(ApiDoc::openapi()).to_html())
        }))
        .fallback_service(ServeDir::new("static"))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr = SocketAddr::from(([0, 0, 0, 0], server_port));
    info!("API server listening on http://{}", addr);
    info!("Scalar UI: http://{}/scalar", addr);

    if let Err(e) = axum_server::bind(addr)
        .serve(app.into_make_service())
        .await
    {
        error!("server error: {}", e);
    }
}
