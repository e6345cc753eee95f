//! HTTP request handlers for the Fulfillment Reconciliation Engine API.
//!
//! This module contains the handler functions for all API endpoints.

use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::IntoResponse,
    routing::{get, post},
};
use tracing::{info, warn};
use uuid::Uuid;

use crate::pipeline::reconcile;

use super::request::ReconcileRequest;
use super::response::{ApiError, ApiErrorResponse, ENGINE_VERSION, HealthResponse, ReconcileResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
///
/// Request bodies are capped at the configured `server.max_body_bytes`.
pub fn create_router(state: AppState) -> Router {
    let max_body_bytes = state.config().server.max_body_bytes;
    Router::new()
        .route("/reconcile", post(reconcile_handler))
        .route("/health", get(health_handler))
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .with_state(state)
}

/// Handler for GET /health.
async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        engine_version: ENGINE_VERSION.to_string(),
    })
}

/// Handler for POST /reconcile endpoint.
///
/// Accepts the three source tables and returns the enriched delivery table.
async fn reconcile_handler(
    State(state): State<AppState>,
    payload: Result<Json<ReconcileRequest>, JsonRejection>,
) -> impl IntoResponse {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing reconciliation request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE => {
            let limit = state.config().server.max_body_bytes;
            warn!(
                correlation_id = %correlation_id,
                limit_bytes = limit,
                "Request body exceeds limit"
            );
            return (
                StatusCode::PAYLOAD_TOO_LARGE,
                [(header::CONTENT_TYPE, "application/json")],
                Json(ApiError::payload_too_large(limit)),
            )
                .into_response();
        }
        Err(rejection) => {
            let error = match rejection {
                JsonRejection::JsonDataError(err) => {
                    let body_text = err.body_text();
                    warn!(
                        correlation_id = %correlation_id,
                        error = %body_text,
                        "JSON data error"
                    );
                    if body_text.contains("missing field") {
                        ApiError::validation_error(body_text)
                    } else {
                        ApiError::malformed_json(body_text)
                    }
                }
                JsonRejection::JsonSyntaxError(err) => {
                    warn!(
                        correlation_id = %correlation_id,
                        error = %err,
                        "JSON syntax error"
                    );
                    ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
                }
                JsonRejection::MissingJsonContentType(_) => {
                    ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
                }
                other => {
                    warn!(
                        correlation_id = %correlation_id,
                        error = %other.body_text(),
                        "Failed to read request body"
                    );
                    ApiError::malformed_json("Failed to parse request body")
                }
            };
            return (
                StatusCode::BAD_REQUEST,
                [(header::CONTENT_TYPE, "application/json")],
                Json(error),
            )
                .into_response();
        }
    };

    match reconcile(
        &request.shipments,
        &request.picks,
        &request.packs,
        state.config(),
    ) {
        Ok(result) => {
            info!(
                correlation_id = %correlation_id,
                deliveries = result.summary.deliveries,
                late = result.summary.late,
                "Reconciliation request completed"
            );
            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "application/json")],
                Json(ReconcileResponse::new(correlation_id, result)),
            )
                .into_response()
        }
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "Reconciliation failed"
            );
            let api_error: ApiErrorResponse = err.into();
            (
                api_error.status,
                [(header::CONTENT_TYPE, "application/json")],
                Json(api_error.error),
            )
                .into_response()
        }
    }
}
