//! Per-delivery aggregates, KPIs and the enriched delivery row.
//!
//! This module contains the types produced by the aggregation, merge and KPI
//! stages. Field names on the wire follow the stable output column names
//! (`Pick_Start`, `OTP_Status`, ...), which BI reports bind to.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::CellValue;

/// Picking metrics for one delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PickAggregate {
    /// Earliest pick timestamp.
    #[serde(rename = "Pick_Start")]
    pub pick_start: Option<NaiveDateTime>,
    /// Latest pick timestamp.
    #[serde(rename = "Pick_End")]
    pub pick_end: Option<NaiveDateTime>,
    /// Sum of cleaned per-scan labor minutes.
    #[serde(rename = "Labor_Time_Min")]
    pub labor_time_min: Decimal,
    /// Distinct workers.
    #[serde(rename = "Unique_Pickers")]
    pub unique_pickers: usize,
    /// Distinct materials.
    #[serde(rename = "Unique_Materials")]
    pub unique_materials: usize,
    /// Number of pick lines.
    #[serde(rename = "Total_Pick_Lines")]
    pub total_pick_lines: usize,
    /// Sum of target quantities.
    #[serde(rename = "Total_Pieces")]
    pub total_pieces: Decimal,
    /// Distinct source bins.
    #[serde(rename = "Unique_Bins")]
    pub unique_bins: usize,
    /// Wall-clock span between first and last pick, in minutes.
    #[serde(rename = "Process_Pick_Duration_Min")]
    pub process_pick_duration_min: Option<Decimal>,
}

/// Packing metrics for one delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackAggregate {
    /// Earliest label creation.
    #[serde(rename = "Label_Created_Time")]
    pub label_created_time: Option<NaiveDateTime>,
    /// Latest shipment / change time.
    #[serde(rename = "Shipment_Added_Time")]
    pub shipment_added_time: Option<NaiveDateTime>,
    /// Distinct handling units.
    #[serde(rename = "Handling_Unit_Count")]
    pub handling_unit_count: usize,
    /// Most frequent packaging material.
    #[serde(rename = "Main_Packaging_Type")]
    pub main_packaging_type: Option<String>,
}

/// On-time performance verdict.
///
/// # Example
///
/// ```
/// use fulfillment_engine::models::OtpStatus;
///
/// assert_eq!(OtpStatus::OnTime.to_string(), "On time");
/// assert_eq!(serde_json::to_string(&OtpStatus::NotAvailable).unwrap(), "\"N/A\"");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OtpStatus {
    /// Loaded on or before the planned goods-movement date.
    #[serde(rename = "On time")]
    OnTime,
    /// Loaded after the planned goods-movement date.
    #[serde(rename = "Late")]
    Late,
    /// Loading or planned date missing.
    #[serde(rename = "N/A")]
    NotAvailable,
}

impl std::fmt::Display for OtpStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OtpStatus::OnTime => write!(f, "On time"),
            OtpStatus::Late => write!(f, "Late"),
            OtpStatus::NotAvailable => write!(f, "N/A"),
        }
    }
}

/// The fulfillment phase blamed for a late delivery.
///
/// Variants are declared in evaluation order; the first phase wins a tie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DelayReason {
    /// Delivery was not late (or could not be judged).
    #[serde(rename = "OK")]
    Ok,
    /// Order creation to first pick.
    #[serde(rename = "Warehouse Reaction")]
    Reaction,
    /// First pick to last pick.
    #[serde(rename = "Picking")]
    Picking,
    /// Last pick to label creation.
    #[serde(rename = "Waiting for Packing")]
    WaitingForPacking,
    /// Label creation to shipment / loading.
    #[serde(rename = "Packing/Shipping")]
    PackingShipping,
}

impl std::fmt::Display for DelayReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DelayReason::Ok => write!(f, "OK"),
            DelayReason::Reaction => write!(f, "Warehouse Reaction"),
            DelayReason::Picking => write!(f, "Picking"),
            DelayReason::WaitingForPacking => write!(f, "Waiting for Packing"),
            DelayReason::PackingShipping => write!(f, "Packing/Shipping"),
        }
    }
}

/// Derived lead times and verdicts for one delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryKpi {
    /// Order creation to first pick, in hours.
    #[serde(rename = "Duration_Reaction_Hrs")]
    pub reaction_hrs: Option<Decimal>,
    /// First to last pick, in hours. Used for delay attribution only; the
    /// output carries this span as `Process_Pick_Duration_Min`.
    #[serde(skip)]
    pub pick_hrs: Option<Decimal>,
    /// Last pick to label creation, in hours.
    #[serde(rename = "Duration_Wait_Pack_Hrs")]
    pub wait_pack_hrs: Option<Decimal>,
    /// Shipment time if known, otherwise the loading date.
    #[serde(rename = "End_Process_Time")]
    pub end_process_time: Option<NaiveDateTime>,
    /// Label creation to end of process, in hours.
    #[serde(rename = "Duration_Pack_Ship_Hrs")]
    pub pack_ship_hrs: Option<Decimal>,
    /// Order creation to loading, in hours.
    #[serde(rename = "Total_Lead_Time_Hrs")]
    pub total_lead_time_hrs: Option<Decimal>,
    /// On-time verdict.
    #[serde(rename = "OTP_Status")]
    pub otp_status: OtpStatus,
    /// Phase blamed for lateness.
    #[serde(rename = "Main_Delay_Reason")]
    pub main_delay_reason: DelayReason,
}

/// The final reconciled row for one delivery.
///
/// `pick` and `pack` are `None` when the delivery had no matching events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedDelivery {
    /// Normalized delivery key.
    pub delivery: String,
    /// Master row cells, aligned with the master table's columns.
    pub master: Vec<CellValue>,
    /// Picking metrics, if any pick events matched.
    pub pick: Option<PickAggregate>,
    /// Packing metrics, if any pack events matched.
    pub pack: Option<PackAggregate>,
    /// Derived KPIs.
    pub kpi: DeliveryKpi,
}

/// Output columns appended after the master columns, in order.
pub const DERIVED_COLUMNS: [&str; 20] = [
    "Pick_Start",
    "Pick_End",
    "Labor_Time_Min",
    "Unique_Pickers",
    "Unique_Materials",
    "Total_Pick_Lines",
    "Total_Pieces",
    "Unique_Bins",
    "Process_Pick_Duration_Min",
    "Label_Created_Time",
    "Shipment_Added_Time",
    "Handling_Unit_Count",
    "Main_Packaging_Type",
    "Duration_Reaction_Hrs",
    "Duration_Wait_Pack_Hrs",
    "End_Process_Time",
    "Duration_Pack_Ship_Hrs",
    "Total_Lead_Time_Hrs",
    "OTP_Status",
    "Main_Delay_Reason",
];

impl EnrichedDelivery {
    /// Flattens the delivery into output cells: master cells first, then one
    /// cell per entry of [`DERIVED_COLUMNS`].
    ///
    /// Missing aggregates render as null timestamps and durations, and zero
    /// counts and sums.
    pub fn to_row(&self) -> Vec<CellValue> {
        let pick = self.pick.as_ref();
        let pack = self.pack.as_ref();
        let count = |value: Option<usize>| CellValue::from(value.unwrap_or(0));
        let sum = |value: Option<Decimal>| CellValue::from(value.unwrap_or(Decimal::ZERO));

        let derived = [
            CellValue::from(pick.and_then(|p| p.pick_start)),
            CellValue::from(pick.and_then(|p| p.pick_end)),
            sum(pick.map(|p| p.labor_time_min)),
            count(pick.map(|p| p.unique_pickers)),
            count(pick.map(|p| p.unique_materials)),
            count(pick.map(|p| p.total_pick_lines)),
            sum(pick.map(|p| p.total_pieces)),
            count(pick.map(|p| p.unique_bins)),
            CellValue::from(pick.and_then(|p| p.process_pick_duration_min)),
            CellValue::from(pack.and_then(|p| p.label_created_time)),
            CellValue::from(pack.and_then(|p| p.shipment_added_time)),
            count(pack.map(|p| p.handling_unit_count)),
            CellValue::from(pack.and_then(|p| p.main_packaging_type.clone())),
            CellValue::from(self.kpi.reaction_hrs),
            CellValue::from(self.kpi.wait_pack_hrs),
            CellValue::from(self.kpi.end_process_time),
            CellValue::from(self.kpi.pack_ship_hrs),
            CellValue::from(self.kpi.total_lead_time_hrs),
            CellValue::Text(self.kpi.otp_status.to_string()),
            CellValue::Text(self.kpi.main_delay_reason.to_string()),
        ];

        let mut row = self.master.clone();
        row.extend(derived);
        row
    }
}
