//! Error types
//!
//! Upstream failures (weather / geodata collaborators) are caught at the
//! collaborator boundary and turned into "no data" by callers. They never
//! abort a whole request unless the request's own target city has no data.

use thiserror::Error;

#[cfg(feature = "api")]
use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};

/// Failure talking to an external collaborator
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// Network error, timeout, or connection refused
    #[error("{service} request failed: {message}")]
    Request { service: &'static str, message: String },

    /// Non-success HTTP status
    #[error("{service} returned status {status}")]
    Status { service: &'static str, status: u16 },

    /// Response body had an unexpected shape or lacked a required reading
    #[error("{service} returned a malformed payload: {message}")]
    MalformedPayload { service: &'static str, message: String },
}

impl UpstreamError {
    pub fn malformed(service: &'static str, message: impl Into<String>) -> Self {
        UpstreamError::MalformedPayload { service, message: message.into() }
    }

    /// Whether another attempt could plausibly succeed
    pub fn is_transient(&self) -> bool {
        match self {
            UpstreamError::Request { .. } => true,
            UpstreamError::Status { status, .. } => *status == 429 || *status >= 500,
            UpstreamError::MalformedPayload { .. } => false,
        }
    }

    pub fn service(&self) -> &'static str {
        match self {
            UpstreamError::Request { service, .. }
            | UpstreamError::Status { service, .. }
            | UpstreamError::MalformedPayload { service, .. } => service,
        }
    }
}

// ============================================================================
// HTTP error mapping
// ============================================================================

/// Error returned by API handlers, rendered as `{"error": "<message>"}`
#[cfg(feature = "api")]
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    NotFound(String),

    /// The request's own target has no data
    #[error("{0}")]
    Upstream(#[from] UpstreamError),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Internal(String),
}

#[cfg(feature = "api")]
impl AppError {
    pub fn city_not_found(name: &str) -> Self {
        AppError::NotFound(format!("City not found: {}", name))
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Upstream(_) => StatusCode::BAD_GATEWAY,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[cfg(feature = "api")]
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::warn!("{} {}", status, self);
        }
        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}
