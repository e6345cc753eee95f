//! HTTP API module for the Fulfillment Reconciliation Engine.
//!
//! This module provides the REST API endpoints for reconciling a batch of
//! shipment, pick and pack tables.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::ReconcileRequest;
pub use response::{ApiError, ENGINE_VERSION, HealthResponse, ReconcileResponse};
pub use state::AppState;
