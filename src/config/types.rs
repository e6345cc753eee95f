//! Configuration types for delivery reconciliation.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files. Every structure also has
//! a built-in default so the engine can run without a configuration directory.

use chrono::NaiveTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A scheduled same-day break, both endpoints inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakWindow {
    /// Clock time the break starts.
    pub start: NaiveTime,
    /// Clock time the break ends.
    pub end: NaiveTime,
}

impl BreakWindow {
    /// Builds a window from hour/minute pairs.
    ///
    /// Returns `None` if either pair is not a valid clock time.
    pub fn from_hm(start: (u32, u32), end: (u32, u32)) -> Option<Self> {
        Some(Self {
            start: NaiveTime::from_hms_opt(start.0, start.1, 0)?,
            end: NaiveTime::from_hms_opt(end.0, end.1, 0)?,
        })
    }

    /// Returns true if `time` falls inside the window (inclusive).
    ///
    /// # Example
    ///
    /// ```
    /// use fulfillment_engine::config::BreakWindow;
    /// use chrono::NaiveTime;
    ///
    /// let lunch = BreakWindow::from_hm((11, 0), (11, 40)).unwrap();
    /// assert!(lunch.contains(NaiveTime::from_hms_opt(11, 40, 0).unwrap()));
    /// assert!(!lunch.contains(NaiveTime::from_hms_opt(11, 40, 1).unwrap()));
    /// ```
    pub fn contains(&self, time: NaiveTime) -> bool {
        self.start <= time && time <= self.end
    }
}

/// Settings for the labor-time cleaner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaborConfig {
    /// Gaps strictly longer than this are treated as shift breaks or anomalies.
    pub max_gap_minutes: Decimal,
    /// Scheduled break windows of the warehouse shift plan.
    pub break_windows: Vec<BreakWindow>,
}

impl Default for LaborConfig {
    fn default() -> Self {
        let windows = [
            ((8, 15), (8, 40)),
            ((11, 0), (11, 40)),
            ((12, 45), (13, 10)),
            ((16, 15), (16, 40)),
            ((18, 30), (19, 10)),
            ((20, 30), (20, 55)),
        ];
        Self {
            max_gap_minutes: Decimal::from(240),
            break_windows: windows
                .into_iter()
                .filter_map(|(start, end)| BreakWindow::from_hm(start, end))
                .collect(),
        }
    }
}

/// Accepted textual formats for timestamp cells, tried in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsingConfig {
    /// chrono formats for single-cell date+time values.
    pub datetime_formats: Vec<String>,
    /// chrono formats for date-only values.
    pub date_formats: Vec<String>,
    /// chrono formats for time-only values.
    pub time_formats: Vec<String>,
}

impl Default for ParsingConfig {
    fn default() -> Self {
        let owned = |formats: &[&str]| formats.iter().map(|f| f.to_string()).collect();
        Self {
            datetime_formats: owned(&[
                "%Y-%m-%d %H:%M:%S",
                "%Y-%m-%d %H:%M:%S%.f",
                "%Y-%m-%dT%H:%M:%S",
                "%Y-%m-%dT%H:%M:%S%.f",
                "%Y-%m-%d %H:%M",
                "%d.%m.%Y %H:%M:%S",
                "%d.%m.%Y %H:%M",
                "%m/%d/%Y %H:%M:%S",
                "%m/%d/%Y %H:%M",
            ]),
            date_formats: owned(&["%Y-%m-%d", "%d.%m.%Y", "%m/%d/%Y", "%Y%m%d"]),
            time_formats: owned(&["%H:%M:%S", "%H:%M:%S%.f", "%H:%M"]),
        }
    }
}

/// HTTP surface settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Largest accepted `/reconcile` request body, in bytes.
    pub max_body_bytes: usize,
}

impl ServerConfig {
    /// Default request body limit: 256 MiB, room for a full batch of logs.
    pub const DEFAULT_MAX_BODY_BYTES: usize = 256 * 1024 * 1024;
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            max_body_bytes: Self::DEFAULT_MAX_BODY_BYTES,
        }
    }
}

/// Ordered header aliases for the shipment master.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MasterColumns {
    /// Delivery identifier (required).
    pub delivery: Vec<String>,
    /// Order-creation timestamp.
    #[serde(default)]
    pub created_at: Vec<String>,
    /// Actual loading date.
    #[serde(default)]
    pub loading_date: Vec<String>,
    /// Planned goods-movement date.
    #[serde(default)]
    pub planned_goods_movement: Vec<String>,
}

/// Ordered header aliases for the pick log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PickColumns {
    /// Delivery identifier (required).
    pub delivery: Vec<String>,
    /// Worker / user id.
    #[serde(default)]
    pub worker: Vec<String>,
    /// Material number.
    #[serde(default)]
    pub material: Vec<String>,
    /// Quantity; the primary field comes first, its fallback after it.
    #[serde(default)]
    pub quantity: Vec<String>,
    /// Source storage bin.
    #[serde(default)]
    pub storage_bin: Vec<String>,
    /// Confirmation date.
    #[serde(default)]
    pub confirmation_date: Vec<String>,
    /// Confirmation time.
    #[serde(default)]
    pub confirmation_time: Vec<String>,
}

/// Ordered header aliases for the pack log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackColumns {
    /// Generated delivery identifier (required).
    pub generated_delivery: Vec<String>,
    /// Handling unit id.
    #[serde(default)]
    pub handling_unit: Vec<String>,
    /// Packaging material code.
    #[serde(default)]
    pub packaging_material: Vec<String>,
    /// Label creation date.
    #[serde(default)]
    pub created_date: Vec<String>,
    /// Label creation time.
    #[serde(default)]
    pub created_time: Vec<String>,
    /// Shipment / change date.
    #[serde(default)]
    pub changed_date: Vec<String>,
    /// Shipment / change time.
    #[serde(default)]
    pub changed_time: Vec<String>,
}

/// Alias lists for all three inputs, as found in `columns.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSchema {
    /// Shipment master aliases.
    pub master: MasterColumns,
    /// Pick log aliases.
    pub pick: PickColumns,
    /// Pack log aliases.
    pub pack: PackColumns,
}

fn aliases(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| n.to_string()).collect()
}

impl Default for ColumnSchema {
    fn default() -> Self {
        Self {
            master: MasterColumns {
                delivery: aliases(&["Delivery", "Shipment", "Dodávka", "Zásilka", "Lieferung"]),
                created_at: aliases(&["Creation date delivery", "Delivery creation date"]),
                loading_date: aliases(&["Loading Date", "Datum nakládky"]),
                planned_goods_movement: aliases(&[
                    "Pland Gds Mvmnt Date",
                    "Planned Goods Movement Date",
                ]),
            },
            pick: PickColumns {
                delivery: aliases(&["Delivery", "Shipment", "Dodávka", "Lieferung"]),
                worker: aliases(&["User", "Worker", "Uživatel"]),
                material: aliases(&["Material", "Materiál"]),
                quantity: aliases(&["Source target qty", "Dest.target quantity"]),
                storage_bin: aliases(&["Source Storage Bin", "Source Bin"]),
                confirmation_date: aliases(&["Confirmation date"]),
                confirmation_time: aliases(&["Confirmation time"]),
            },
            pack: PackColumns {
                generated_delivery: aliases(&["Generated delivery", "Delivery"]),
                handling_unit: aliases(&["Handling Unit"]),
                packaging_material: aliases(&["Packaging materials", "Packaging Material"]),
                created_date: aliases(&["Created On"]),
                created_time: aliases(&["Time"]),
                changed_date: aliases(&["Changed On"]),
                changed_time: aliases(&["Time of change"]),
            },
        }
    }
}

/// Contents of `pipeline.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Labor-time cleaning settings.
    #[serde(default)]
    pub labor: LaborConfig,
    /// Timestamp parsing settings.
    #[serde(default)]
    pub parsing: ParsingConfig,
    /// HTTP surface settings.
    #[serde(default)]
    pub server: ServerConfig,
}

/// The complete engine configuration.
///
/// Aggregates the pipeline settings and the column schema. It can be loaded
/// from YAML through [`super::ConfigLoader`] or built directly in code.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EngineConfig {
    /// Labor-time cleaning settings.
    pub labor: LaborConfig,
    /// Timestamp parsing settings.
    pub parsing: ParsingConfig,
    /// HTTP surface settings.
    pub server: ServerConfig,
    /// Column alias lists.
    pub columns: ColumnSchema,
}

impl EngineConfig {
    /// Creates a new EngineConfig from its component parts.
    pub fn new(pipeline: PipelineConfig, columns: ColumnSchema) -> Self {
        Self {
            labor: pipeline.labor,
            parsing: pipeline.parsing,
            server: pipeline.server,
            columns,
        }
    }
}
