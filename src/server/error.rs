use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::error::RenderError;
use crate::links::LinkError;

/// Application-level error type for HTTP handlers.
///
/// Wraps the library errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A rendering failure.
    #[error(transparent)]
    Render(#[from] RenderError),

    /// A dynamic link lookup failure.
    #[error(transparent)]
    Link(#[from] LinkError),

    /// A field is missing or cannot be parsed.
    #[error("Invalid field: {0}")]
    Unprocessable(String),

    /// The request body could not be read.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// The access gate rejected the request.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Render(err) => match err {
                RenderError::MissingField(_)
                | RenderError::InvalidSize { .. }
                | RenderError::Symbol(_) => (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "VALIDATION_ERROR",
                    err.to_string(),
                ),
                RenderError::Image(_) | RenderError::Io(_) => {
                    tracing::error!(error = %err, "Render failed");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL_ERROR",
                        "An internal error occurred".to_string(),
                    )
                }
            },

            AppError::Link(err) => match err {
                LinkError::NotFound => (StatusCode::NOT_FOUND, "NOT_FOUND", err.to_string()),
                LinkError::Expired => (StatusCode::GONE, "EXPIRED", err.to_string()),
            },

            AppError::Unprocessable(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "VALIDATION_ERROR",
                msg.clone(),
            ),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}
