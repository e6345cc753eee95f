//! Rectangular table model shared by the three inputs and the enriched output.
//!
//! The ingestion collaborator decodes CSV or spreadsheet files into a [`Table`];
//! the engine never sees the file format.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// A single table cell.
///
/// Input tables carry the first five variants. `Decimal` and `Timestamp` are
/// produced by the engine for derived columns; on the wire they serialize as
/// strings.
///
/// # Example
///
/// ```
/// use fulfillment_engine::models::CellValue;
///
/// let cell: CellValue = serde_json::from_str("\"00042\"").unwrap();
/// assert_eq!(cell, CellValue::Text("00042".to_string()));
///
/// let cell: CellValue = serde_json::from_str("42").unwrap();
/// assert_eq!(cell, CellValue::Integer(42));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    /// An empty cell.
    Null,
    /// A boolean cell.
    Bool(bool),
    /// An integral number.
    Integer(i64),
    /// A floating point number.
    Float(f64),
    /// Free text.
    Text(String),
    /// An exact decimal produced by the engine.
    Decimal(Decimal),
    /// A timestamp produced by the engine.
    Timestamp(NaiveDateTime),
}

impl CellValue {
    /// Returns true for null cells and text cells holding only whitespace.
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Null => true,
            CellValue::Text(text) => text.trim().is_empty(),
            _ => false,
        }
    }

    /// Renders the cell as text, or `None` for blank cells.
    ///
    /// Integral floats render without a fractional part, so a spreadsheet
    /// value of `42.0` reads as `"42"`.
    pub fn as_text(&self) -> Option<Cow<'_, str>> {
        if self.is_blank() {
            return None;
        }
        Some(match self {
            CellValue::Text(text) => Cow::Borrowed(text.as_str()),
            CellValue::Bool(b) => Cow::Owned(b.to_string()),
            CellValue::Integer(i) => Cow::Owned(i.to_string()),
            CellValue::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => {
                Cow::Owned(format!("{}", *f as i64))
            }
            CellValue::Float(f) => Cow::Owned(f.to_string()),
            CellValue::Decimal(d) => Cow::Owned(d.normalize().to_string()),
            CellValue::Timestamp(ts) => Cow::Owned(ts.format("%Y-%m-%d %H:%M:%S").to_string()),
            CellValue::Null => return None,
        })
    }

    /// Returns the trimmed text of the cell as an owned identifier.
    pub fn as_identifier(&self) -> Option<String> {
        self.as_text().map(|text| text.trim().to_string())
    }
}

impl From<Option<NaiveDateTime>> for CellValue {
    fn from(value: Option<NaiveDateTime>) -> Self {
        value.map_or(CellValue::Null, CellValue::Timestamp)
    }
}

impl From<Option<Decimal>> for CellValue {
    fn from(value: Option<Decimal>) -> Self {
        value.map_or(CellValue::Null, CellValue::Decimal)
    }
}

impl From<Decimal> for CellValue {
    fn from(value: Decimal) -> Self {
        CellValue::Decimal(value)
    }
}

impl From<usize> for CellValue {
    fn from(value: usize) -> Self {
        CellValue::Integer(i64::try_from(value).unwrap_or(i64::MAX))
    }
}

impl From<Option<String>> for CellValue {
    fn from(value: Option<String>) -> Self {
        value.map_or(CellValue::Null, CellValue::Text)
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

/// A rectangular table: ordered header names plus rows of cells.
///
/// Rows shorter than the header read as null for the missing cells.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    /// Header names, in column order.
    pub columns: Vec<String>,
    /// Data rows.
    #[serde(default)]
    pub rows: Vec<Vec<CellValue>>,
}

static NULL_CELL: CellValue = CellValue::Null;

impl Table {
    /// Creates a table from headers and rows.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        Self { columns, rows }
    }

    /// Returns the number of data rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true when the table has no data rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns the cell at `column` of `row`, or null when the row is short.
    pub fn cell<'a>(row: &'a [CellValue], column: usize) -> &'a CellValue {
        row.get(column).unwrap_or(&NULL_CELL)
    }
}
