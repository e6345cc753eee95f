//! Fulfillment Reconciliation Engine
//!
//! This crate reconciles a warehouse's shipment master, pick-scan log and
//! pack log into one enriched row per delivery: break-aware labor time,
//! picking and packing metrics, lead-time KPIs, on-time performance and the
//! phase blamed for a late delivery.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod ingest;
pub mod models;
pub mod pipeline;
