//! Per-cell coercion of timestamps and quantities.
//!
//! Nothing here fails: a cell that cannot be converted yields `None` (or zero
//! for quantities) and the batch carries on.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::config::ParsingConfig;
use crate::models::CellValue;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Numeric date cells below this are spreadsheet serial days; larger ones are
/// left to the text formats (e.g. `20240102` as `%Y%m%d`).
const MAX_SERIAL_DAY: f64 = 100_000.0;

/// Reads a numeric cell as a spreadsheet serial date: whole days since
/// 1899-12-30, with any fraction as the time of day.
fn serial_datetime(cell: &CellValue) -> Option<NaiveDateTime> {
    let days = match cell {
        CellValue::Integer(n) => *n as f64,
        CellValue::Float(f) => *f,
        _ => return None,
    };
    if !(1.0..MAX_SERIAL_DAY).contains(&days) {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
    let seconds = (days * SECONDS_PER_DAY).round() as i64;
    epoch.checked_add_signed(Duration::seconds(seconds))
}

/// Parses date, time and timestamp cells using the configured formats.
#[derive(Debug, Clone, Copy)]
pub struct CellParser<'a> {
    formats: &'a ParsingConfig,
}

impl<'a> CellParser<'a> {
    /// Creates a parser over the given format lists.
    pub fn new(formats: &'a ParsingConfig) -> Self {
        Self { formats }
    }

    /// Parses a single-cell timestamp.
    ///
    /// Datetime formats are tried first, then date formats (at midnight).
    /// Numbers below 100000 are spreadsheet serial dates.
    ///
    /// # Example
    ///
    /// ```
    /// use fulfillment_engine::config::ParsingConfig;
    /// use fulfillment_engine::ingest::CellParser;
    /// use fulfillment_engine::models::CellValue;
    ///
    /// let formats = ParsingConfig::default();
    /// let parser = CellParser::new(&formats);
    ///
    /// let ts = parser.datetime(&CellValue::Text("2024-01-02".to_string())).unwrap();
    /// assert_eq!(ts.to_string(), "2024-01-02 00:00:00");
    /// assert!(parser.datetime(&CellValue::Text("not a date".to_string())).is_none());
    /// ```
    pub fn datetime(&self, cell: &CellValue) -> Option<NaiveDateTime> {
        if let CellValue::Timestamp(ts) = cell {
            return Some(*ts);
        }
        if let Some(ts) = serial_datetime(cell) {
            return Some(ts);
        }
        let text = cell.as_text()?;
        let text = text.trim();
        self.parse_datetime_text(text)
            .or_else(|| self.parse_date_text(text)?.and_hms_opt(0, 0, 0))
    }

    /// Parses a date cell. A full datetime is accepted and truncated to its
    /// date, as is a spreadsheet serial date.
    pub fn date(&self, cell: &CellValue) -> Option<NaiveDate> {
        if let CellValue::Timestamp(ts) = cell {
            return Some(ts.date());
        }
        if let Some(ts) = serial_datetime(cell) {
            return Some(ts.date());
        }
        let text = cell.as_text()?;
        let text = text.trim();
        self.parse_date_text(text)
            .or_else(|| self.parse_datetime_text(text).map(|ts| ts.date()))
    }

    /// Parses a time cell.
    ///
    /// Besides the configured text formats, a float in `[0, 1)` is read as a
    /// spreadsheet fraction of a day.
    pub fn time(&self, cell: &CellValue) -> Option<NaiveTime> {
        match cell {
            CellValue::Timestamp(ts) => Some(ts.time()),
            CellValue::Float(fraction) if (0.0..1.0).contains(fraction) => {
                let seconds = (fraction * SECONDS_PER_DAY).round() as u32;
                NaiveTime::from_num_seconds_from_midnight_opt(seconds.min(86_399), 0)
            }
            _ => {
                let text = cell.as_text()?;
                let text = text.trim();
                self.formats
                    .time_formats
                    .iter()
                    .find_map(|format| NaiveTime::parse_from_str(text, format).ok())
                    .or_else(|| self.parse_datetime_text(text).map(|ts| ts.time()))
            }
        }
    }

    /// Builds a timestamp from a date cell and a time cell.
    ///
    /// Returns `None` if either part is missing or unparseable.
    pub fn combine(&self, date: &CellValue, time: &CellValue) -> Option<NaiveDateTime> {
        let date = self.date(date)?;
        let time = self.time(time)?;
        Some(date.and_time(time))
    }

    fn parse_datetime_text(&self, text: &str) -> Option<NaiveDateTime> {
        self.formats
            .datetime_formats
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
    }

    fn parse_date_text(&self, text: &str) -> Option<NaiveDate> {
        self.formats
            .date_formats
            .iter()
            .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
    }
}

/// Coerces a quantity cell to a decimal, treating anything non-numeric as zero.
///
/// A comma is accepted as the decimal separator when the text has no dot.
///
/// # Example
///
/// ```
/// use fulfillment_engine::ingest::parse_quantity;
/// use fulfillment_engine::models::CellValue;
/// use rust_decimal::Decimal;
///
/// assert_eq!(parse_quantity(&CellValue::Text("2,5".to_string())), Decimal::new(25, 1));
/// assert_eq!(parse_quantity(&CellValue::Text("n/a".to_string())), Decimal::ZERO);
/// ```
pub fn parse_quantity(cell: &CellValue) -> Decimal {
    match cell {
        CellValue::Integer(i) => Decimal::from(*i),
        CellValue::Float(f) => Decimal::try_from(*f).unwrap_or(Decimal::ZERO),
        CellValue::Decimal(d) => *d,
        CellValue::Text(text) => {
            let text = text.trim();
            Decimal::from_str(text)
                .ok()
                .or_else(|| {
                    if text.contains(',') && !text.contains('.') {
                        Decimal::from_str(&text.replace(',', ".")).ok()
                    } else {
                        None
                    }
                })
                .unwrap_or(Decimal::ZERO)
        }
        CellValue::Null | CellValue::Bool(_) | CellValue::Timestamp(_) => Decimal::ZERO,
    }
}
