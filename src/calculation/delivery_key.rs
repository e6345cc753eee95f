//! Delivery key normalization.
//!
//! The shipment master, the pick log and the pack log spell the same delivery
//! differently: zero-padded text in one, a bare number in another, stray
//! whitespace in a third. All three go through [`normalize_key`] before any join.

use crate::models::CellValue;

/// Canonicalizes a delivery identifier.
///
/// Surrounding whitespace is removed and leading `'0'` characters stripped.
/// An empty or all-zero identifier normalizes to the empty string, which
/// joins to nothing.
///
/// # Example
///
/// ```
/// use fulfillment_engine::calculation::normalize_key;
///
/// assert_eq!(normalize_key("00042"), "42");
/// assert_eq!(normalize_key(" 42 "), "42");
/// assert_eq!(normalize_key("0000"), "");
/// ```
pub fn normalize_key(raw: &str) -> String {
    raw.trim().trim_start_matches('0').to_string()
}

/// Normalizes a delivery identifier held in a table cell.
///
/// Numeric cells are rendered as text first; integral floats lose their
/// fractional part, so `42.0` and `"0042"` meet at `"42"`.
pub fn normalize_cell_key(cell: &CellValue) -> String {
    cell.as_text()
        .map(|text| normalize_key(&text))
        .unwrap_or_default()
}
