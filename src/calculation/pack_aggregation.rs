//! Per-delivery reduction of pack events.

use std::collections::{BTreeMap, HashMap, HashSet};

use crate::models::{PackAggregate, PackEvent};

/// Reduces pack events to one [`PackAggregate`] per delivery key.
///
/// Label time is the earliest label creation, shipment time the latest
/// change. Events whose key normalized to the empty string are skipped.
pub fn aggregate_packs(events: &[PackEvent]) -> HashMap<String, PackAggregate> {
    let mut groups: HashMap<&str, Vec<&PackEvent>> = HashMap::new();
    for event in events.iter().filter(|e| !e.delivery.is_empty()) {
        groups.entry(event.delivery.as_str()).or_default().push(event);
    }

    groups
        .into_iter()
        .map(|(delivery, group)| (delivery.to_string(), fold_group(&group)))
        .collect()
}

fn fold_group(group: &[&PackEvent]) -> PackAggregate {
    let handling_units: HashSet<&str> = group
        .iter()
        .filter_map(|e| e.handling_unit.as_deref())
        .collect();

    PackAggregate {
        label_created_time: group.iter().filter_map(|e| e.label_created).min(),
        shipment_added_time: group.iter().filter_map(|e| e.shipment_added).max(),
        handling_unit_count: handling_units.len(),
        main_packaging_type: most_frequent(group.iter().filter_map(|e| e.packaging_material.as_deref())),
    }
}

/// The most frequent value; ties go to the lexicographically smallest.
pub fn most_frequent<'a>(values: impl Iterator<Item = &'a str>) -> Option<String> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for value in values {
        *counts.entry(value).or_insert(0) += 1;
    }

    let mut best: Option<(&str, usize)> = None;
    for (value, count) in counts {
        if best.is_none_or(|(_, top)| count > top) {
            best = Some((value, count));
        }
    }
    best.map(|(value, _)| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    fn ts(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    fn pack(hu: &str, material: Option<&str>, label: &str, shipped: &str) -> PackEvent {
        PackEvent {
            delivery: "42".to_string(),
            handling_unit: Some(hu.to_string()),
            packaging_material: material.map(str::to_string),
            label_created: Some(ts(label)),
            shipment_added: Some(ts(shipped)),
        }
    }

    #[test]
    fn test_label_is_earliest_and_shipment_latest() {
        let result = aggregate_packs(&[
            pack("HU1", Some("BOX"), "2024-01-01 12:00:00", "2024-01-01 15:00:00"),
            pack("HU2", Some("BOX"), "2024-01-01 11:00:00", "2024-01-01 16:00:00"),
            pack("HU1", Some("PALLET"), "2024-01-01 13:00:00", "2024-01-01 14:00:00"),
        ]);

        let agg = &result["42"];
        assert_eq!(agg.label_created_time, Some(ts("2024-01-01 11:00:00")));
        assert_eq!(agg.shipment_added_time, Some(ts("2024-01-01 16:00:00")));
        assert_eq!(agg.handling_unit_count, 2);
        assert_eq!(agg.main_packaging_type.as_deref(), Some("BOX"));
    }

    #[test]
    fn test_mode_ignores_nulls_and_breaks_ties_alphabetically() {
        assert_eq!(
            most_frequent(["PALLET", "BOX", "PALLET", "BOX"].into_iter()),
            Some("BOX".to_string())
        );
        assert_eq!(most_frequent(std::iter::empty()), None);

        let result = aggregate_packs(&[
            pack("HU1", None, "2024-01-01 12:00:00", "2024-01-01 15:00:00"),
            pack("HU2", None, "2024-01-01 12:00:00", "2024-01-01 15:00:00"),
            pack("HU3", Some("CARTON"), "2024-01-01 12:00:00", "2024-01-01 15:00:00"),
        ]);
        assert_eq!(result["42"].main_packaging_type.as_deref(), Some("CARTON"));
    }

    #[test]
    fn test_all_null_packaging_has_no_mode() {
        let result = aggregate_packs(&[pack(
            "HU1",
            None,
            "2024-01-01 12:00:00",
            "2024-01-01 15:00:00",
        )]);
        assert_eq!(result["42"].main_packaging_type, None);
    }

    #[test]
    fn test_empty_keys_are_skipped() {
        let mut orphan = pack("HU9", Some("BOX"), "2024-01-01 12:00:00", "2024-01-01 15:00:00");
        orphan.delivery = String::new();
        assert!(aggregate_packs(&[orphan]).is_empty());
    }
}
