//! Error types for the Papermill API

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use papermill_core::PdfToolError;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error(transparent)]
    Core(#[from] PdfToolError),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::Core(PdfToolError::Validation(msg)) => {
                (StatusCode::BAD_REQUEST, msg.clone())
            }
            ApiError::Core(PdfToolError::Auth(msg)) => (StatusCode::UNAUTHORIZED, msg.clone()),
            ApiError::Core(PdfToolError::Structural(msg)) => {
                (StatusCode::UNPROCESSABLE_ENTITY, msg.clone())
            }
            ApiError::Core(PdfToolError::Subprocess(msg)) => {
                tracing::error!("Subprocess failure: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, msg.clone())
            }
            ApiError::Core(PdfToolError::Resource(e)) => {
                tracing::error!("Temp resource failure: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Temporary storage error".to_string(),
                )
            }
            ApiError::Internal(e) => {
                tracing::error!("Internal error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": message,
            "status": status.as_u16(),
        }));

        (status, body).into_response()
    }
}
