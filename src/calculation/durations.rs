//! Exact elapsed-time helpers.
//!
//! Durations are computed from whole milliseconds into `Decimal`, so equal
//! spans always compare equal and the 240-minute boundary is exact.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;

const MILLIS_PER_MINUTE: i64 = 60_000;
const MILLIS_PER_HOUR: i64 = 3_600_000;

/// Minutes from `from` to `to`; negative if `to` is earlier.
///
/// # Example
///
/// ```
/// use fulfillment_engine::calculation::minutes_between;
/// use chrono::NaiveDateTime;
/// use rust_decimal::Decimal;
///
/// let a = NaiveDateTime::parse_from_str("2024-01-01 09:00:00", "%Y-%m-%d %H:%M:%S").unwrap();
/// let b = NaiveDateTime::parse_from_str("2024-01-01 09:01:30", "%Y-%m-%d %H:%M:%S").unwrap();
/// assert_eq!(minutes_between(a, b), Decimal::new(15, 1));
/// ```
pub fn minutes_between(from: NaiveDateTime, to: NaiveDateTime) -> Decimal {
    Decimal::from((to - from).num_milliseconds()) / Decimal::from(MILLIS_PER_MINUTE)
}

/// Hours from `from` to `to`, or `None` if either end is missing.
pub fn hours_between(from: Option<NaiveDateTime>, to: Option<NaiveDateTime>) -> Option<Decimal> {
    let (from, to) = (from?, to?);
    Some(Decimal::from((to - from).num_milliseconds()) / Decimal::from(MILLIS_PER_HOUR))
}

/// Converts a minute value to hours.
pub fn minutes_to_hours(minutes: Decimal) -> Decimal {
    minutes / Decimal::from(60)
}
