//! Request types for the Fulfillment Reconciliation Engine API.
//!
//! This module defines the JSON request structure for the `/reconcile` endpoint.

use serde::{Deserialize, Serialize};

use crate::models::Table;

/// Request body for the `/reconcile` endpoint.
///
/// Carries the three source tables, already decoded into rows of cells.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconcileRequest {
    /// The shipment master.
    pub shipments: Table,
    /// The pick log.
    pub picks: Table,
    /// The pack log.
    pub packs: Table,
}
