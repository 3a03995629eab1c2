//! services/api/src/error.rs
//!
//! Defines the primary error type for the entire API service, and how each
//! failure is turned into the `{success: false, error}` response envelope.

use crate::config::ConfigError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use news_digest_core::ports::PortError;
use serde_json::json;
use tracing::error;

/// Message returned whenever the pipeline has not produced a digest yet.
pub const DIGEST_NOT_AVAILABLE: &str = "No news data available. Service may still be processing.";

/// The primary error type for the `news_api` service.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// No digest has been produced yet.
    #[error("{0}")]
    NotAvailable(String),

    /// A required request field was missing or blank.
    #[error("{0}")]
    Validation(String),

    /// The resource already exists (e.g. a duplicate email on signup).
    #[error("{0}")]
    Conflict(String),

    /// Bad credentials, or a missing or unknown bearer token.
    #[error("{0}")]
    Unauthorized(String),

    /// The session points at a user that no longer exists.
    #[error("{0}")]
    NotFound(String),

    /// Represents an error that occurred during configuration loading.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Represents a standard Input/Output error (e.g., binding to a network socket).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A catch-all for any other unexpected errors.
    #[error("An unexpected internal error occurred: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn digest_not_available() -> Self {
        ApiError::NotAvailable(DIGEST_NOT_AVAILABLE.to_string())
    }

    pub fn unauthorized() -> Self {
        ApiError::Unauthorized("Unauthorized".to_string())
    }

    pub fn user_not_found() -> Self {
        ApiError::NotFound("User not found".to_string())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotAvailable(_) | ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Config(_) | ApiError::Io(_) | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<PortError> for ApiError {
    fn from(err: PortError) -> Self {
        match err {
            PortError::NotFound(msg) => ApiError::NotFound(msg),
            PortError::Conflict(msg) => ApiError::Conflict(msg),
            PortError::Unauthorized => ApiError::unauthorized(),
            PortError::Unexpected(msg) => ApiError::Internal(msg),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!("Request failed: {}", self);
        }
        let body = json!({
            "success": false,
            "error": self.to_string(),
        });
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn taxonomy_maps_to_http_status() {
        assert_eq!(ApiError::digest_not_available().status_code(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::Validation("x".into()).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::Conflict("x".into()).status_code(), StatusCode::CONFLICT);
        assert_eq!(ApiError::unauthorized().status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::user_not_found().status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::Internal("disk".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn port_errors_keep_their_meaning() {
        let err: ApiError = PortError::Conflict("User already exists".into()).into();
        assert!(matches!(err, ApiError::Conflict(ref m) if m == "User already exists"));

        let err: ApiError = PortError::Unexpected("bad json".into()).into();
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
