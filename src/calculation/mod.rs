//! Calculation logic for the fulfillment reconciliation engine.
//!
//! This module contains the pure stages of a reconciliation run: delivery key
//! normalization, break-aware labor-time cleaning, per-delivery pick and pack
//! aggregation, the left join onto the shipment master, and the KPI, on-time
//! and delay-attribution derivations.

mod delivery_key;
mod durations;
mod kpi;
mod labor_time;
mod merge;
mod pack_aggregation;
mod pick_aggregation;

pub use delivery_key::{normalize_cell_key, normalize_key};
pub use durations::{hours_between, minutes_between, minutes_to_hours};
pub use kpi::{PhaseDurations, attribute_delay, classify_otp, derive_kpi};
pub use labor_time::{CleanedPickEvent, GapExclusion, clean_labor_time};
pub use merge::{MergeOutcome, MergedDelivery, merge_deliveries};
pub use pack_aggregation::{aggregate_packs, most_frequent};
pub use pick_aggregation::aggregate_picks;
