//! Response types for the Fulfillment Reconciliation Engine API.
//!
//! This module defines the success body of `/reconcile` together with the
//! error response structures and error handling for the HTTP API.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::EngineError;
use crate::models::{BatchSummary, Reconciliation, Table};

/// Engine version reported by the API.
pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Successful response body for `/reconcile`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconcileResponse {
    /// Identifier of this run; also the request's correlation id.
    pub run_id: Uuid,
    /// When the result was produced.
    pub generated_at: DateTime<Utc>,
    /// Version of the engine that produced the result.
    pub engine_version: String,
    /// Batch counts.
    pub summary: BatchSummary,
    /// The enriched delivery table.
    pub table: Table,
}

impl ReconcileResponse {
    /// Wraps a pipeline result for the wire.
    pub fn new(run_id: Uuid, result: Reconciliation) -> Self {
        let table = result.to_table();
        Self {
            run_id,
            generated_at: Utc::now(),
            engine_version: ENGINE_VERSION.to_string(),
            summary: result.summary,
            table,
        }
    }
}

/// Response body for `/health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `"ok"` when the server answers.
    pub status: String,
    /// Version of the running engine.
    pub engine_version: String,
}

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a validation error response.
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }

    /// Creates the error returned when a request body exceeds the limit.
    pub fn payload_too_large(limit_bytes: usize) -> Self {
        Self::new(
            "PAYLOAD_TOO_LARGE",
            format!("Request body exceeds the limit of {} bytes", limit_bytes),
        )
    }

    /// Creates a missing column error response.
    pub fn missing_column(input: &str, field: &str, expected: &[String], found: &[String]) -> Self {
        Self::with_details(
            "MISSING_COLUMN",
            format!("Required column '{}' not found in {}", field, input),
            format!(
                "input: {}; field: {}; expected one of: [{}]; found: [{}]",
                input,
                field,
                expected.join(", "),
                found.join(", ")
            ),
        )
    }
}

/// API error with HTTP status code.
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        match error {
            EngineError::MissingColumn {
                input,
                field,
                expected,
                found,
            } => ApiErrorResponse {
                status: StatusCode::UNPROCESSABLE_ENTITY,
                error: ApiError::missing_column(&input, &field, &expected, &found),
            },
            EngineError::ConfigNotFound { path } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "CONFIG_ERROR",
                    "Configuration error",
                    format!("Configuration file not found: {}", path),
                ),
            },
            EngineError::ConfigParseError { path, message } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "CONFIG_ERROR",
                    "Configuration parse error",
                    format!("Failed to parse {}: {}", path, message),
                ),
            },
            EngineError::InvalidConfig { message } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details("CONFIG_ERROR", "Invalid configuration", message),
            },
        }
    }
}
