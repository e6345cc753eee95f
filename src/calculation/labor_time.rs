//! Break-aware labor-time cleaning.
//!
//! Every pick scan is credited with the time elapsed since the same worker's
//! previous scan, unless that gap cannot be labor: the worker's first scan, a
//! gap crossing midnight, a gap longer than the configured threshold, or a scan
//! made during a scheduled break. Summed per delivery this approximates active
//! picking minutes net of breaks and shift changes. Unscheduled micro-breaks
//! are not detected.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::config::LaborConfig;
use crate::models::PickEvent;

use super::durations::minutes_between;

/// Why a scan was credited with zero labor minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GapExclusion {
    /// The scan has no timestamp.
    MissingTimestamp,
    /// The scan has no worker.
    MissingWorker,
    /// First scan of the worker in this batch.
    FirstScan,
    /// Previous scan was on another calendar day.
    CrossDay,
    /// Gap longer than `max_gap_minutes`.
    AnomalousGap,
    /// Scan clock time inside a break window.
    BreakWindow,
}

/// A pick event with its labor contribution attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleanedPickEvent {
    /// The scan.
    pub event: PickEvent,
    /// Raw minutes since the worker's previous scan, before any zeroing.
    pub gap_minutes: Option<Decimal>,
    /// Minutes credited as labor.
    pub clean_duration_min: Decimal,
    /// Set when `clean_duration_min` was forced to zero.
    pub exclusion: Option<GapExclusion>,
}

#[derive(Debug, Clone, Copy)]
struct Contribution {
    gap_minutes: Option<Decimal>,
    clean_minutes: Decimal,
    exclusion: Option<GapExclusion>,
}

impl Contribution {
    fn excluded(gap_minutes: Option<Decimal>, reason: GapExclusion) -> Self {
        Self {
            gap_minutes,
            clean_minutes: Decimal::ZERO,
            exclusion: Some(reason),
        }
    }
}

/// Classifies the gap between two consecutive scans of one worker.
fn classify_gap(
    previous: NaiveDateTime,
    current: NaiveDateTime,
    config: &LaborConfig,
) -> Contribution {
    let gap = minutes_between(previous, current);

    if previous.date() != current.date() {
        return Contribution::excluded(Some(gap), GapExclusion::CrossDay);
    }
    if gap > config.max_gap_minutes {
        return Contribution::excluded(Some(gap), GapExclusion::AnomalousGap);
    }
    let clock = current.time();
    if config.break_windows.iter().any(|w| w.contains(clock)) {
        return Contribution::excluded(Some(gap), GapExclusion::BreakWindow);
    }

    Contribution {
        gap_minutes: Some(gap),
        clean_minutes: gap,
        exclusion: None,
    }
}

/// Attaches a clean labor duration to every pick event.
///
/// Events are grouped by worker and ordered by timestamp inside each group;
/// scans with equal timestamps keep their input order. The returned events
/// are in input order. Scans without a worker or timestamp take no part in
/// any worker's sequence and are credited zero.
///
/// # Example
///
/// ```
/// use fulfillment_engine::calculation::clean_labor_time;
/// use fulfillment_engine::config::LaborConfig;
/// use fulfillment_engine::models::PickEvent;
/// use chrono::NaiveDateTime;
/// use rust_decimal::Decimal;
///
/// let scan = |time: &str| PickEvent {
///     delivery: "42".to_string(),
///     worker: Some("P1".to_string()),
///     material: None,
///     quantity: Decimal::ONE,
///     storage_bin: None,
///     timestamp: NaiveDateTime::parse_from_str(time, "%Y-%m-%d %H:%M:%S").ok(),
/// };
///
/// let cleaned = clean_labor_time(
///     vec![scan("2024-01-01 09:00:00"), scan("2024-01-01 09:10:00")],
///     &LaborConfig::default(),
/// );
/// assert_eq!(cleaned[0].clean_duration_min, Decimal::ZERO);
/// assert_eq!(cleaned[1].clean_duration_min, Decimal::from(10));
/// ```
pub fn clean_labor_time(events: Vec<PickEvent>, config: &LaborConfig) -> Vec<CleanedPickEvent> {
    let mut contributions: Vec<Contribution> = events
        .iter()
        .map(|event| {
            let reason = match (&event.worker, event.timestamp) {
                (_, None) => GapExclusion::MissingTimestamp,
                (None, _) => GapExclusion::MissingWorker,
                _ => GapExclusion::FirstScan,
            };
            Contribution::excluded(None, reason)
        })
        .collect();

    {
        let mut by_worker: HashMap<&str, Vec<(NaiveDateTime, usize)>> = HashMap::new();
        for (idx, event) in events.iter().enumerate() {
            if let (Some(worker), Some(timestamp)) = (event.worker.as_deref(), event.timestamp) {
                by_worker.entry(worker).or_default().push((timestamp, idx));
            }
        }

        for scans in by_worker.values_mut() {
            scans.sort_unstable();
            for pair in scans.windows(2) {
                let (previous, _) = pair[0];
                let (current, idx) = pair[1];
                contributions[idx] = classify_gap(previous, current, config);
            }
        }
    }

    events
        .into_iter()
        .zip(contributions)
        .map(|(event, contribution)| CleanedPickEvent {
            event,
            gap_minutes: contribution.gap_minutes,
            clean_duration_min: contribution.clean_minutes,
            exclusion: contribution.exclusion,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BreakWindow;
    use chrono::Duration;
    use proptest::prelude::*;

    fn ts(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    fn scan(worker: &str, timestamp: NaiveDateTime) -> PickEvent {
        PickEvent {
            delivery: "42".to_string(),
            worker: Some(worker.to_string()),
            material: Some("MAT".to_string()),
            quantity: Decimal::ONE,
            storage_bin: None,
            timestamp: Some(timestamp),
        }
    }

    fn clean(events: Vec<PickEvent>) -> Vec<CleanedPickEvent> {
        clean_labor_time(events, &LaborConfig::default())
    }

    #[test]
    fn test_first_scan_of_worker_is_zero() {
        let cleaned = clean(vec![scan("P1", ts("2024-01-01 09:00:00"))]);
        assert_eq!(cleaned[0].clean_duration_min, Decimal::ZERO);
        assert_eq!(cleaned[0].exclusion, Some(GapExclusion::FirstScan));
        assert_eq!(cleaned[0].gap_minutes, None);
    }

    #[test]
    fn test_consecutive_scans_credit_the_gap() {
        let cleaned = clean(vec![
            scan("P1", ts("2024-01-01 09:00:00")),
            scan("P1", ts("2024-01-01 09:07:30")),
        ]);
        assert_eq!(cleaned[1].clean_duration_min, Decimal::new(75, 1));
        assert_eq!(cleaned[1].exclusion, None);
    }

    #[test]
    fn test_unsorted_input_is_ordered_per_worker() {
        let cleaned = clean(vec![
            scan("P1", ts("2024-01-01 09:20:00")),
            scan("P1", ts("2024-01-01 09:00:00")),
            scan("P1", ts("2024-01-01 09:05:00")),
        ]);
        // Output stays in input order.
        assert_eq!(cleaned[0].clean_duration_min, Decimal::from(15));
        assert_eq!(cleaned[1].clean_duration_min, Decimal::ZERO);
        assert_eq!(cleaned[2].clean_duration_min, Decimal::from(5));
    }

    #[test]
    fn test_workers_are_independent() {
        let cleaned = clean(vec![
            scan("P1", ts("2024-01-01 09:00:00")),
            scan("P2", ts("2024-01-01 09:03:00")),
            scan("P1", ts("2024-01-01 09:10:00")),
        ]);
        assert_eq!(cleaned[1].exclusion, Some(GapExclusion::FirstScan));
        assert_eq!(cleaned[2].clean_duration_min, Decimal::from(10));
    }

    #[test]
    fn test_gap_inside_break_window_is_zero_regardless_of_size() {
        let cleaned = clean(vec![
            scan("P1", ts("2024-01-01 11:05:00")),
            scan("P1", ts("2024-01-01 11:35:00")),
        ]);
        assert_eq!(cleaned[1].gap_minutes, Some(Decimal::from(30)));
        assert_eq!(cleaned[1].clean_duration_min, Decimal::ZERO);
        assert_eq!(cleaned[1].exclusion, Some(GapExclusion::BreakWindow));
    }

    #[test]
    fn test_scan_on_break_window_edges_is_zero() {
        let cleaned = clean(vec![
            scan("P1", ts("2024-01-01 08:10:00")),
            scan("P1", ts("2024-01-01 08:15:00")),
            scan("P1", ts("2024-01-01 08:40:00")),
            scan("P1", ts("2024-01-01 08:41:00")),
        ]);
        assert_eq!(cleaned[1].clean_duration_min, Decimal::ZERO);
        assert_eq!(cleaned[2].clean_duration_min, Decimal::ZERO);
        assert_eq!(cleaned[3].clean_duration_min, Decimal::ONE);
    }

    #[test]
    fn test_cross_day_gap_is_zero() {
        let cleaned = clean(vec![
            scan("P1", ts("2024-01-01 23:50:00")),
            scan("P1", ts("2024-01-02 00:05:00")),
        ]);
        assert_eq!(cleaned[1].gap_minutes, Some(Decimal::from(15)));
        assert_eq!(cleaned[1].clean_duration_min, Decimal::ZERO);
        assert_eq!(cleaned[1].exclusion, Some(GapExclusion::CrossDay));
    }

    #[test]
    fn test_gap_of_exactly_threshold_is_kept() {
        // 05:00 -> 09:00, no break window between touches 09:00.
        let cleaned = clean(vec![
            scan("P1", ts("2024-01-01 05:00:00")),
            scan("P1", ts("2024-01-01 09:00:00")),
        ]);
        assert_eq!(cleaned[1].clean_duration_min, Decimal::from(240));
        assert_eq!(cleaned[1].exclusion, None);
    }

    #[test]
    fn test_gap_just_above_threshold_is_zero() {
        let start = ts("2024-01-01 05:00:00");
        let end = start + Duration::milliseconds(14_400_600); // 240.01 min
        let cleaned = clean(vec![scan("P1", start), scan("P1", end)]);
        assert_eq!(cleaned[1].gap_minutes, Some(Decimal::new(24001, 2)));
        assert_eq!(cleaned[1].clean_duration_min, Decimal::ZERO);
        assert_eq!(cleaned[1].exclusion, Some(GapExclusion::AnomalousGap));
    }

    #[test]
    fn test_scans_without_timestamp_or_worker_are_skipped() {
        let mut no_time = scan("P1", ts("2024-01-01 09:05:00"));
        no_time.timestamp = None;
        let mut no_worker = scan("P1", ts("2024-01-01 09:06:00"));
        no_worker.worker = None;

        let cleaned = clean(vec![
            scan("P1", ts("2024-01-01 09:00:00")),
            no_time,
            no_worker,
            scan("P1", ts("2024-01-01 09:10:00")),
        ]);

        assert_eq!(cleaned[1].exclusion, Some(GapExclusion::MissingTimestamp));
        assert_eq!(cleaned[2].exclusion, Some(GapExclusion::MissingWorker));
        assert_eq!(cleaned[3].clean_duration_min, Decimal::from(10));
    }

    #[test]
    fn test_injected_break_windows_replace_defaults() {
        let config = LaborConfig {
            max_gap_minutes: Decimal::from(240),
            break_windows: vec![BreakWindow::from_hm((9, 0), (9, 30)).unwrap()],
        };
        let cleaned = clean_labor_time(
            vec![
                scan("P1", ts("2024-01-01 08:50:00")),
                scan("P1", ts("2024-01-01 09:10:00")),
                scan("P1", ts("2024-01-01 11:10:00")),
            ],
            &config,
        );
        assert_eq!(cleaned[1].exclusion, Some(GapExclusion::BreakWindow));
        // 11:10 is a default break, but not in the injected table.
        assert_eq!(cleaned[2].clean_duration_min, Decimal::from(120));
    }

    proptest! {
        #[test]
        fn prop_contributions_are_bounded(offsets in prop::collection::vec(0i64..2_000, 1..40)) {
            let base = ts("2024-01-01 00:00:00");
            let events: Vec<PickEvent> = offsets
                .iter()
                .map(|m| scan("P1", base + Duration::minutes(*m)))
                .collect();

            for cleaned in clean(events) {
                prop_assert!(cleaned.clean_duration_min >= Decimal::ZERO);
                prop_assert!(cleaned.clean_duration_min <= Decimal::from(240));
                if let Some(gap) = cleaned.gap_minutes {
                    prop_assert!(gap >= Decimal::ZERO);
                }
            }
        }
    }
}
