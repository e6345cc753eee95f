//! Core data models for the Fulfillment Reconciliation Engine.
//!
//! This module contains all the domain models used throughout the engine.

mod delivery;
mod events;
mod reconciliation;
mod table;

pub use delivery::{
    DERIVED_COLUMNS, DelayReason, DeliveryKpi, EnrichedDelivery, OtpStatus, PackAggregate,
    PickAggregate,
};
pub use events::{MasterRecord, PackEvent, PickEvent};
pub use reconciliation::{BatchSummary, Reconciliation};
pub use table::{CellValue, Table};
