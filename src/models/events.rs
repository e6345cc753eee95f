//! Typed rows extracted from the three input tables.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::CellValue;

/// One shipment master row.
///
/// The raw cells are kept so the enriched output can echo every master column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MasterRecord {
    /// Normalized delivery key.
    pub delivery: String,
    /// The row as read, aligned with the master table's columns.
    pub cells: Vec<CellValue>,
    /// When the delivery order was created.
    pub created_at: Option<NaiveDateTime>,
    /// Actual loading date.
    pub loading_date: Option<NaiveDateTime>,
    /// Planned goods-movement date.
    pub planned_goods_movement: Option<NaiveDateTime>,
}

/// One pick-scan line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PickEvent {
    /// Normalized delivery key.
    pub delivery: String,
    /// Worker who confirmed the pick.
    pub worker: Option<String>,
    /// Picked material.
    pub material: Option<String>,
    /// Target quantity; zero when absent or non-numeric.
    pub quantity: Decimal,
    /// Source storage bin.
    pub storage_bin: Option<String>,
    /// Confirmation date + time; `None` when either part failed to parse.
    pub timestamp: Option<NaiveDateTime>,
}

/// One packing / label / shipment action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackEvent {
    /// Normalized generated-delivery key.
    pub delivery: String,
    /// Handling unit the action belongs to.
    pub handling_unit: Option<String>,
    /// Packaging material code.
    pub packaging_material: Option<String>,
    /// Label creation date + time.
    pub label_created: Option<NaiveDateTime>,
    /// Shipment / change date + time.
    pub shipment_added: Option<NaiveDateTime>,
}
