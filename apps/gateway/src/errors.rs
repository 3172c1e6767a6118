use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::backend::BackendError;

pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// Gateway error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
/// Every variant renders as `{"error": "<message>"}`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not authenticated")]
    Unauthenticated,

    #[error("Upstream rejected request ({status}): {message}")]
    UpstreamRejected { status: StatusCode, message: String },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Unauthenticated => StatusCode::UNAUTHORIZED,
            AppError::UpstreamRejected { status, .. } => *status,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Backend(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            AppError::Unauthenticated => "Not authenticated".to_string(),
            AppError::UpstreamRejected { status, message } => {
                tracing::warn!("Backend rejected request with {status}: {message}");
                message
            }
            AppError::Validation(msg) => msg,
            AppError::Backend(e) => {
                tracing::error!("Backend error: {e}");
                INTERNAL_ERROR_MESSAGE.to_string()
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                INTERNAL_ERROR_MESSAGE.to_string()
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
