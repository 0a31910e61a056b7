use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::api_client::ApiError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Upstream error: {0}")]
    Upstream(#[from] ApiError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                "Authentication required".to_string(),
            ),
            AppError::Upstream(e) => upstream_parts(e),
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

fn upstream_parts(e: &ApiError) -> (StatusCode, &'static str, String) {
    match e {
        ApiError::MissingToken => (
            StatusCode::UNAUTHORIZED,
            "UNAUTHORIZED",
            "Authentication required".to_string(),
        ),
        ApiError::Status { status: 401, .. } => (
            StatusCode::UNAUTHORIZED,
            "UNAUTHORIZED",
            "Authentication required".to_string(),
        ),
        ApiError::Status { status: 403, .. } => {
            (StatusCode::FORBIDDEN, "FORBIDDEN", "Access denied".to_string())
        }
        ApiError::Status { status: 404, message } => {
            (StatusCode::NOT_FOUND, "NOT_FOUND", message.clone())
        }
        ApiError::Status {
            status: 400 | 422,
            message,
        } => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", message.clone()),
        ApiError::Status { status, message } => {
            tracing::error!("Upstream returned {status}: {message}");
            (
                StatusCode::BAD_GATEWAY,
                "UPSTREAM_ERROR",
                format!("The job tracker backend failed: {message}"),
            )
        }
        ApiError::Decode { .. } => {
            tracing::error!("Upstream decode error: {e}");
            (
                StatusCode::BAD_GATEWAY,
                "UPSTREAM_ERROR",
                "The server returned an invalid response. Please try again later.".to_string(),
            )
        }
        ApiError::Transport(_) | ApiError::InvalidUrl(_) => {
            tracing::error!("Upstream unreachable: {e}");
            (
                StatusCode::BAD_GATEWAY,
                "UPSTREAM_UNAVAILABLE",
                "Could not reach the job tracker backend".to_string(),
            )
        }
    }
}
