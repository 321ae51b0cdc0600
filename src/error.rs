// src/error.rs

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Errors that can escape a scan request.
///
/// Source-level failures (timeouts, transport errors, malformed payloads) never
/// show up here: every source is wrapped in a bounded task that substitutes a
/// neutral value instead.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("Domain parameter is required")]
    MissingDomain,

    #[error("Invalid domain '{input}': {reason}")]
    InvalidDomain { input: String, reason: String },

    #[error("Scan failed: {0}")]
    Orchestration(String),
}

impl ScanError {
    pub fn invalid(input: &str, reason: impl Into<String>) -> Self {
        ScanError::InvalidDomain {
            input: input.to_string(),
            reason: reason.into(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ScanError::MissingDomain | ScanError::InvalidDomain { .. } => StatusCode::BAD_REQUEST,
            ScanError::Orchestration(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ScanError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(error = %self, "Scan request failed.");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
