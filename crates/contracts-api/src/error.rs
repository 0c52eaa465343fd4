//! # API Error Types
//!
//! Structured error type implementing `axum::response::IntoResponse`.
//! Every error the sidecar can return is a client error; validation
//! failures are not errors and never pass through here.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Structured JSON error response body.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    /// Error code, message and optional details.
    pub error: ErrorDetail,
}

/// Inner error detail.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorDetail {
    /// Machine-readable error code (e.g., "UNKNOWN_SCHEMA", "BAD_REQUEST").
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Additional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Application-level error type that implements [`IntoResponse`] for Axum.
#[derive(Error, Debug)]
pub enum AppError {
    /// The request named a schema that is not in the registry (400).
    #[error("unknown schema '{0}'")]
    UnknownSchema(String),

    /// Request body could not be parsed (400).
    #[error("bad request: {0}")]
    BadRequest(String),
}

impl AppError {
    /// Return the HTTP status code and machine-readable error code for this error.
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::UnknownSchema(_) => (StatusCode::BAD_REQUEST, "UNKNOWN_SCHEMA"),
            Self::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
        }
    }

    fn details(&self) -> Option<serde_json::Value> {
        match self {
            Self::UnknownSchema(name) => Some(serde_json::json!({ "schema": name })),
            Self::BadRequest(_) => None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        tracing::debug!(error = %self, code, "rejecting request");

        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message: self.to_string(),
                details: self.details(),
            },
        };

        (status, Json(body)).into_response()
    }
}
