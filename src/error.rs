use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::solar::FailureKind;

/// Failure of one weather fetch.
#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("server did not respond within {seconds}s")]
    Timeout { seconds: u64 },
    #[error("API HTTP {status}")]
    Http { status: u16 },
    #[error("network error: {0}")]
    Network(String),
    #[error("malformed response: {0}")]
    Malformed(String),
    #[error("response has no sunrise/sunset data")]
    MissingSunTimes,
}

impl WeatherError {
    pub fn kind(&self) -> FailureKind {
        match self {
            WeatherError::Timeout { .. } => FailureKind::Timeout,
            _ => FailureKind::Api,
        }
    }

    /// Text shown in the widget; timeouts read differently from API failures.
    pub fn user_message(&self) -> String {
        match self {
            WeatherError::Timeout { seconds } => {
                format!("Timeout: server did not respond in {}s", seconds)
            }
            other => format!("API error: {}", other),
        }
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0} not found")]
    NotFound(String),
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Unavailable(String),
    /// No weather snapshot yet; `is_night` comes from the local clock.
    #[error("{reason}")]
    NoWeather { reason: String, is_night: bool },
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unavailable(_) | ApiError::NoWeather { .. } => StatusCode::SERVICE_UNAVAILABLE,
        };
        let body = match &self {
            ApiError::NoWeather { reason, is_night } => {
                serde_json::json!({ "error": reason, "is_night": is_night })
            }
            other => serde_json::json!({ "error": other.to_string() }),
        };
        (status, Json(body)).into_response()
    }
}
