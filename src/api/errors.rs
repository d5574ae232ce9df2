//! API error types mapped to HTTP status codes.
//!
//! Each [`ApiError`] variant maps to a specific HTTP status code and
//! produces a JSON response body `{"error": "message"}`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::weaviate::WeaviateError;

/// Application-level error type that implements `IntoResponse`.
///
/// - `NotFound` → 404
/// - `ServiceUnavailable` → 503 (Weaviate connection handle absent)
/// - `Internal` → 500 (any other downstream failure, message attached)
#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    ServiceUnavailable(String),
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::ServiceUnavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };
        let body = axum::Json(json!({ "error": message }));
        (status, body).into_response()
    }
}

impl From<WeaviateError> for ApiError {
    fn from(err: WeaviateError) -> Self {
        match err {
            WeaviateError::NotFound(name) => {
                ApiError::NotFound(format!("Collection '{}' not found", name))
            }
            other => ApiError::Internal(other.to_string()),
        }
    }
}
