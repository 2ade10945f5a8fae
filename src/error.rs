//! Error types for the Xero client
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Xero Error Enum ==
/// Unified error type for the CLI, cache, and HTTP layers.
#[derive(Error, Debug)]
pub enum XeroError {
    /// Degenerate cache key (empty or oversized)
    #[error("Invalid cache key: {0}")]
    InvalidKey(String),

    /// Required configuration is missing
    #[error("Missing configuration: {0}")]
    MissingConfig(String),

    /// Token endpoint rejected the client credentials
    #[error("Authentication failed: {0}")]
    AuthFailed(String),

    /// Access token rejected by the API
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Resource does not exist upstream
    #[error("Not found: {0}")]
    NotFound(String),

    /// Xero rate limit hit
    #[error("Rate limited by Xero, retry after {retry_after}s")]
    RateLimited {
        /// Seconds from the Retry-After header (0 when absent)
        retry_after: u64,
    },

    /// Any other non-success API response
    #[error("Xero API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Transport-level failure
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Bad CLI or request input
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// JSON (de)serialization failure
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Internal invariant violation
    #[error("Internal error: {0}")]
    Internal(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for XeroError {
    fn into_response(self) -> Response {
        let status = match &self {
            XeroError::InvalidKey(_) | XeroError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            XeroError::MissingConfig(_) => StatusCode::SERVICE_UNAVAILABLE,
            XeroError::AuthFailed(_) | XeroError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            XeroError::NotFound(_) => StatusCode::NOT_FOUND,
            XeroError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            XeroError::Api { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            XeroError::Http(_) => StatusCode::BAD_GATEWAY,
            XeroError::Serialization(_) | XeroError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the crate.
pub type Result<T> = std::result::Result<T, XeroError>;
