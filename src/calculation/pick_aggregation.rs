//! Per-delivery reduction of cleaned pick events.

use rust_decimal::Decimal;
use std::collections::{HashMap, HashSet};
use tracing::warn;

use crate::models::PickAggregate;

use super::durations::minutes_between;
use super::labor_time::CleanedPickEvent;

/// Reduces cleaned pick events to one [`PickAggregate`] per delivery key.
///
/// Events whose key normalized to the empty string are not aggregated.
/// Distinct counts ignore null values; `total_pick_lines` counts every row.
pub fn aggregate_picks(events: &[CleanedPickEvent]) -> HashMap<String, PickAggregate> {
    let mut groups: HashMap<&str, Vec<&CleanedPickEvent>> = HashMap::new();
    for cleaned in events {
        if cleaned.event.delivery.is_empty() {
            continue;
        }
        groups
            .entry(cleaned.event.delivery.as_str())
            .or_default()
            .push(cleaned);
    }

    groups
        .into_iter()
        .map(|(delivery, group)| (delivery.to_string(), fold_group(delivery, &group)))
        .collect()
}

/// Adds `value` to `total`, pinning the sum at the representable bound
/// instead of panicking.
fn saturating_sum(total: Decimal, value: Decimal, delivery: &str, column: &str) -> Decimal {
    match total.checked_add(value) {
        Some(sum) => sum,
        None => {
            warn!(delivery, column, "Sum overflowed; saturating");
            total.saturating_add(value)
        }
    }
}

fn fold_group(delivery: &str, group: &[&CleanedPickEvent]) -> PickAggregate {
    let mut pickers = HashSet::new();
    let mut materials = HashSet::new();
    let mut bins = HashSet::new();
    let mut labor_time_min = Decimal::ZERO;
    let mut total_pieces = Decimal::ZERO;

    for cleaned in group {
        let event = &cleaned.event;
        labor_time_min = saturating_sum(
            labor_time_min,
            cleaned.clean_duration_min,
            delivery,
            "Labor_Time_Min",
        );
        total_pieces = saturating_sum(total_pieces, event.quantity, delivery, "Total_Pieces");
        if let Some(worker) = event.worker.as_deref() {
            pickers.insert(worker);
        }
        if let Some(material) = event.material.as_deref() {
            materials.insert(material);
        }
        if let Some(bin) = event.storage_bin.as_deref() {
            bins.insert(bin);
        }
    }

    let timestamps = group.iter().filter_map(|c| c.event.timestamp);
    let pick_start = timestamps.clone().min();
    let pick_end = timestamps.max();
    let process_pick_duration_min = match (pick_start, pick_end) {
        (Some(start), Some(end)) => Some(minutes_between(start, end)),
        _ => None,
    };

    PickAggregate {
        pick_start,
        pick_end,
        labor_time_min,
        unique_pickers: pickers.len(),
        unique_materials: materials.len(),
        total_pick_lines: group.len(),
        total_pieces,
        unique_bins: bins.len(),
        process_pick_duration_min,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculation::clean_labor_time;
    use crate::config::LaborConfig;
    use crate::models::PickEvent;
    use chrono::NaiveDateTime;

    fn ts(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    fn pick(delivery: &str, worker: &str, material: &str, qty: i64, time: &str) -> PickEvent {
        PickEvent {
            delivery: delivery.to_string(),
            worker: Some(worker.to_string()),
            material: Some(material.to_string()),
            quantity: Decimal::from(qty),
            storage_bin: Some(format!("BIN-{material}")),
            timestamp: Some(ts(time)),
        }
    }

    fn aggregate(events: Vec<PickEvent>) -> HashMap<String, PickAggregate> {
        aggregate_picks(&clean_labor_time(events, &LaborConfig::default()))
    }

    #[test]
    fn test_single_worker_delivery() {
        let result = aggregate(vec![
            pick("42", "P1", "M1", 2, "2024-01-01 09:00:00"),
            pick("42", "P1", "M2", 3, "2024-01-01 09:10:00"),
            pick("42", "P1", "M1", 1, "2024-01-01 09:25:00"),
        ]);

        let agg = &result["42"];
        assert_eq!(agg.pick_start, Some(ts("2024-01-01 09:00:00")));
        assert_eq!(agg.pick_end, Some(ts("2024-01-01 09:25:00")));
        assert_eq!(agg.labor_time_min, Decimal::from(25));
        assert_eq!(agg.unique_pickers, 1);
        assert_eq!(agg.unique_materials, 2);
        assert_eq!(agg.unique_bins, 2);
        assert_eq!(agg.total_pick_lines, 3);
        assert_eq!(agg.total_pieces, Decimal::from(6));
        assert_eq!(agg.process_pick_duration_min, Some(Decimal::from(25)));
    }

    #[test]
    fn test_process_duration_covers_labor_for_uninterrupted_worker() {
        let result = aggregate(vec![
            pick("42", "P1", "M1", 1, "2024-01-01 09:00:00"),
            pick("42", "P1", "M1", 1, "2024-01-01 09:20:00"),
            pick("42", "P1", "M1", 1, "2024-01-01 09:40:00"),
        ]);
        let agg = &result["42"];
        let process = agg.process_pick_duration_min.unwrap();
        assert!(process >= agg.labor_time_min);
        assert!(agg.labor_time_min >= Decimal::ZERO);
    }

    #[test]
    fn test_labor_from_interleaved_scans_is_credited_to_each_delivery() {
        let result = aggregate(vec![
            pick("1", "P1", "M1", 1, "2024-01-01 09:00:00"),
            pick("2", "P1", "M2", 1, "2024-01-01 09:05:00"),
            pick("1", "P1", "M3", 1, "2024-01-01 09:12:00"),
        ]);
        assert_eq!(result["1"].labor_time_min, Decimal::from(7));
        assert_eq!(result["2"].labor_time_min, Decimal::from(5));
    }

    #[test]
    fn test_empty_keys_are_not_aggregated() {
        let result = aggregate(vec![
            pick("", "P1", "M1", 1, "2024-01-01 09:00:00"),
            pick("42", "P1", "M1", 1, "2024-01-01 09:04:00"),
        ]);
        assert_eq!(result.len(), 1);
        // The keyless scan still anchors the worker's chain.
        assert_eq!(result["42"].labor_time_min, Decimal::from(4));
    }

    #[test]
    fn test_group_without_timestamps_has_null_times() {
        let mut event = pick("42", "P1", "M1", 4, "2024-01-01 09:00:00");
        event.timestamp = None;
        event.worker = None;
        event.storage_bin = None;

        let result = aggregate(vec![event]);
        let agg = &result["42"];
        assert_eq!(agg.pick_start, None);
        assert_eq!(agg.process_pick_duration_min, None);
        assert_eq!(agg.unique_pickers, 0);
        assert_eq!(agg.unique_bins, 0);
        assert_eq!(agg.total_pick_lines, 1);
        assert_eq!(agg.total_pieces, Decimal::from(4));
    }

    #[test]
    fn test_huge_quantities_saturate_instead_of_overflowing() {
        let mut first = pick("42", "P1", "M1", 0, "2024-01-01 09:00:00");
        first.quantity = Decimal::MAX;
        let mut second = pick("42", "P1", "M2", 0, "2024-01-01 09:05:00");
        second.quantity = Decimal::MAX;
        let mut third = pick("42", "P1", "M3", 0, "2024-01-01 09:09:00");
        third.quantity = Decimal::from(-1);

        let result = aggregate(vec![first, second, third]);
        let agg = &result["42"];
        assert_eq!(agg.total_pieces, Decimal::MAX - Decimal::ONE);
        assert_eq!(agg.total_pick_lines, 3);
        assert_eq!(agg.labor_time_min, Decimal::from(9));
    }

    #[test]
    fn test_negative_overflow_saturates_at_min() {
        let mut first = pick("42", "P1", "M1", 0, "2024-01-01 09:00:00");
        first.quantity = Decimal::MIN;
        let mut second = pick("42", "P1", "M2", 0, "2024-01-01 09:05:00");
        second.quantity = Decimal::MIN;

        let result = aggregate(vec![first, second]);
        assert_eq!(result["42"].total_pieces, Decimal::MIN);
    }
}
