use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::scoring::ScoringError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Scoring(#[from] ScoringError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Scoring(e) => {
                let (status, code) = match e {
                    ScoringError::UnknownFactor(_) => (StatusCode::NOT_FOUND, "UNKNOWN_FACTOR"),
                    ScoringError::DuplicateFactor { .. } => {
                        (StatusCode::CONFLICT, "DUPLICATE_FACTOR")
                    }
                    ScoringError::InvalidFactor(_) => (StatusCode::BAD_REQUEST, "INVALID_FACTOR"),
                    ScoringError::InvalidWeight(_) => {
                        (StatusCode::UNPROCESSABLE_ENTITY, "INVALID_WEIGHT")
                    }
                    ScoringError::InvalidScore { .. } => {
                        (StatusCode::UNPROCESSABLE_ENTITY, "INVALID_SCORE")
                    }
                    ScoringError::InvalidBusinessUnit(_) => {
                        (StatusCode::BAD_REQUEST, "INVALID_BUSINESS_UNIT")
                    }
                    ScoringError::ProviderUnavailable(_) => {
                        tracing::warn!("Scoring aborted: {e}");
                        (StatusCode::SERVICE_UNAVAILABLE, "PROVIDER_UNAVAILABLE")
                    }
                };
                (status, code, e.to_string())
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
