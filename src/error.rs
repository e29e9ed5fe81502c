//! Typed errors and HTTP mapping.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    /// Client payload is structurally valid JSON but fails field validation.
    #[error("{0}")]
    Validation(String),
    /// Malformed request: unparseable JSON, non-object body, bad path parameter.
    #[error("{0}")]
    BadRequest(String),
    /// Body-bearing request without an `application/json` content type.
    #[error("{0}")]
    UnsupportedMediaType(String),
    #[error("{0}")]
    NotFound(String),
    #[error("database: {0}")]
    Db(#[from] sqlx::Error),
}

/// JSON error body: `{"status": 404, "error": "Not Found", "message": "..."}`.
#[derive(Serialize)]
pub struct ErrorBody {
    pub status: u16,
    pub error: &'static str,
    pub message: String,
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::MissingJsonContentType(_) => AppError::UnsupportedMediaType(
                "content type must be application/json".into(),
            ),
            other => AppError::BadRequest(other.body_text()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, reason) = match &self {
            AppError::Validation(_) | AppError::BadRequest(_) => {
                (StatusCode::BAD_REQUEST, "Bad Request")
            }
            AppError::UnsupportedMediaType(_) => {
                (StatusCode::UNSUPPORTED_MEDIA_TYPE, "Unsupported Media Type")
            }
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "Not Found"),
            AppError::Db(e) => {
                tracing::error!(error = %e, "database failure");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
            }
        };
        let message = match &self {
            // Storage failures are surfaced generically; details stay in the log.
            AppError::Db(_) => "internal server error".to_string(),
            other => other.to_string(),
        };
        let body = ErrorBody {
            status: status.as_u16(),
            error: reason,
            message,
        };
        (status, Json(body)).into_response()
    }
}
