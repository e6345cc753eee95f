//! Lead times, on-time performance and delay attribution.
//!
//! All durations are in hours and left unrounded. Any null operand yields a
//! null duration; negative durations are kept as they come, since they point
//! at data-quality problems worth seeing downstream.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;

use crate::models::{DelayReason, DeliveryKpi, OtpStatus};

use super::durations::{hours_between, minutes_to_hours};
use super::merge::MergedDelivery;

/// Judges on-time performance at calendar-day granularity.
///
/// # Example
///
/// ```
/// use fulfillment_engine::calculation::classify_otp;
/// use fulfillment_engine::models::OtpStatus;
/// use chrono::NaiveDateTime;
///
/// let at = |s| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").ok();
/// assert_eq!(classify_otp(at("2024-01-02 23:59:00"), at("2024-01-02 00:00:00")), OtpStatus::OnTime);
/// assert_eq!(classify_otp(at("2024-01-03 00:01:00"), at("2024-01-02 00:00:00")), OtpStatus::Late);
/// assert_eq!(classify_otp(None, at("2024-01-02 00:00:00")), OtpStatus::NotAvailable);
/// ```
pub fn classify_otp(loading: Option<NaiveDateTime>, planned: Option<NaiveDateTime>) -> OtpStatus {
    match (loading, planned) {
        (Some(loading), Some(planned)) if loading.date() <= planned.date() => OtpStatus::OnTime,
        (Some(_), Some(_)) => OtpStatus::Late,
        _ => OtpStatus::NotAvailable,
    }
}

/// The four phase durations considered for delay attribution, in hours.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PhaseDurations {
    /// Order creation to first pick.
    pub reaction: Option<Decimal>,
    /// First to last pick.
    pub picking: Option<Decimal>,
    /// Last pick to label.
    pub waiting_for_packing: Option<Decimal>,
    /// Label to end of process.
    pub packing_shipping: Option<Decimal>,
}

/// Names the longest phase of a late delivery.
///
/// Non-late deliveries get [`DelayReason::Ok`]. Null phases count as zero.
/// On a tie the earlier phase in process order wins.
pub fn attribute_delay(status: OtpStatus, phases: &PhaseDurations) -> DelayReason {
    if status != OtpStatus::Late {
        return DelayReason::Ok;
    }

    let candidates = [
        (DelayReason::Reaction, phases.reaction),
        (DelayReason::Picking, phases.picking),
        (DelayReason::WaitingForPacking, phases.waiting_for_packing),
        (DelayReason::PackingShipping, phases.packing_shipping),
    ];

    let mut blamed = DelayReason::Reaction;
    let mut longest = phases.reaction.unwrap_or(Decimal::ZERO);
    for (reason, hours) in candidates.into_iter().skip(1) {
        let hours = hours.unwrap_or(Decimal::ZERO);
        if hours > longest {
            blamed = reason;
            longest = hours;
        }
    }
    blamed
}

/// Derives every KPI column for one merged delivery.
pub fn derive_kpi(row: &MergedDelivery) -> DeliveryKpi {
    let master = &row.master;
    let pick_start = row.pick.as_ref().and_then(|p| p.pick_start);
    let pick_end = row.pick.as_ref().and_then(|p| p.pick_end);
    let label = row.pack.as_ref().and_then(|p| p.label_created_time);
    let shipment = row.pack.as_ref().and_then(|p| p.shipment_added_time);

    let end_process_time = shipment.or(master.loading_date);
    let phases = PhaseDurations {
        reaction: hours_between(master.created_at, pick_start),
        picking: row
            .pick
            .as_ref()
            .and_then(|p| p.process_pick_duration_min)
            .map(minutes_to_hours),
        waiting_for_packing: hours_between(pick_end, label),
        packing_shipping: hours_between(label, end_process_time),
    };

    let otp_status = classify_otp(master.loading_date, master.planned_goods_movement);

    DeliveryKpi {
        reaction_hrs: phases.reaction,
        pick_hrs: phases.picking,
        wait_pack_hrs: phases.waiting_for_packing,
        end_process_time,
        pack_ship_hrs: phases.packing_shipping,
        total_lead_time_hrs: hours_between(master.created_at, master.loading_date),
        otp_status,
        main_delay_reason: attribute_delay(otp_status, &phases),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CellValue, MasterRecord, PackAggregate, PickAggregate};
    use chrono::Duration;
    use proptest::prelude::*;

    fn ts(s: &str) -> Option<NaiveDateTime> {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").ok()
    }

    fn hours(value: i64) -> Option<Decimal> {
        Some(Decimal::from(value))
    }

    fn merged(
        created: &str,
        loading: &str,
        planned: &str,
        pick: Option<(&str, &str)>,
        pack: Option<(&str, Option<&str>)>,
    ) -> MergedDelivery {
        MergedDelivery {
            master: MasterRecord {
                delivery: "42".to_string(),
                cells: vec![CellValue::Text("42".to_string())],
                created_at: ts(created),
                loading_date: ts(loading),
                planned_goods_movement: ts(planned),
            },
            pick: pick.map(|(start, end)| PickAggregate {
                pick_start: ts(start),
                pick_end: ts(end),
                labor_time_min: Decimal::ZERO,
                unique_pickers: 1,
                unique_materials: 1,
                total_pick_lines: 2,
                total_pieces: Decimal::from(2),
                unique_bins: 1,
                process_pick_duration_min: match (ts(start), ts(end)) {
                    (Some(s), Some(e)) => Some(crate::calculation::minutes_between(s, e)),
                    _ => None,
                },
            }),
            pack: pack.map(|(label, shipped)| PackAggregate {
                label_created_time: ts(label),
                shipment_added_time: shipped.and_then(ts),
                handling_unit_count: 1,
                main_packaging_type: None,
            }),
        }
    }

    #[test]
    fn test_late_delivery_blamed_on_longest_phase() {
        let row = merged(
            "2024-01-01 08:00:00",
            "2024-01-03 09:00:00",
            "2024-01-02 00:00:00",
            Some(("2024-01-01 09:00:00", "2024-01-01 11:00:00")),
            Some(("2024-01-01 12:00:00", Some("2024-01-01 12:30:00"))),
        );

        let kpi = derive_kpi(&row);

        assert_eq!(kpi.reaction_hrs, hours(1));
        assert_eq!(kpi.pick_hrs, hours(2));
        assert_eq!(kpi.wait_pack_hrs, hours(1));
        assert_eq!(kpi.pack_ship_hrs, Some(Decimal::new(5, 1)));
        assert_eq!(kpi.end_process_time, ts("2024-01-01 12:30:00"));
        assert_eq!(kpi.total_lead_time_hrs, hours(49));
        assert_eq!(kpi.otp_status, OtpStatus::Late);
        assert_eq!(kpi.main_delay_reason, DelayReason::Picking);
    }

    #[test]
    fn test_end_process_falls_back_to_loading_date() {
        let row = merged(
            "2024-01-01 08:00:00",
            "2024-01-01 18:00:00",
            "2024-01-01 00:00:00",
            None,
            Some(("2024-01-01 12:00:00", None)),
        );

        let kpi = derive_kpi(&row);

        assert_eq!(kpi.end_process_time, ts("2024-01-01 18:00:00"));
        assert_eq!(kpi.pack_ship_hrs, hours(6));
        assert_eq!(kpi.reaction_hrs, None);
        assert_eq!(kpi.pick_hrs, None);
        assert_eq!(kpi.otp_status, OtpStatus::OnTime);
        assert_eq!(kpi.main_delay_reason, DelayReason::Ok);
    }

    #[test]
    fn test_missing_dates_propagate_to_null() {
        let row = merged("", "", "", None, None);
        let kpi = derive_kpi(&row);

        assert_eq!(kpi.total_lead_time_hrs, None);
        assert_eq!(kpi.end_process_time, None);
        assert_eq!(kpi.otp_status, OtpStatus::NotAvailable);
        assert_eq!(kpi.main_delay_reason, DelayReason::Ok);
    }

    #[test]
    fn test_otp_compares_calendar_days_only() {
        assert_eq!(
            classify_otp(ts("2024-01-02 23:59:59"), ts("2024-01-02 06:00:00")),
            OtpStatus::OnTime
        );
        assert_eq!(
            classify_otp(ts("2024-01-01 10:00:00"), ts("2024-01-02 06:00:00")),
            OtpStatus::OnTime
        );
        assert_eq!(
            classify_otp(ts("2024-01-03 00:00:00"), ts("2024-01-02 23:59:59")),
            OtpStatus::Late
        );
        assert_eq!(classify_otp(ts("2024-01-03 00:00:00"), None), OtpStatus::NotAvailable);
    }

    #[test]
    fn test_attribution_ties_go_to_earliest_phase() {
        let phases = PhaseDurations {
            reaction: hours(1),
            picking: hours(3),
            waiting_for_packing: hours(3),
            packing_shipping: hours(2),
        };
        assert_eq!(attribute_delay(OtpStatus::Late, &phases), DelayReason::Picking);

        let level = PhaseDurations {
            reaction: hours(2),
            picking: hours(2),
            waiting_for_packing: hours(2),
            packing_shipping: hours(2),
        };
        assert_eq!(attribute_delay(OtpStatus::Late, &level), DelayReason::Reaction);
    }

    #[test]
    fn test_attribution_treats_null_as_zero() {
        let phases = PhaseDurations {
            reaction: None,
            picking: None,
            waiting_for_packing: None,
            packing_shipping: hours(1),
        };
        assert_eq!(
            attribute_delay(OtpStatus::Late, &phases),
            DelayReason::PackingShipping
        );
        assert_eq!(
            attribute_delay(OtpStatus::Late, &PhaseDurations::default()),
            DelayReason::Reaction
        );
    }

    #[test]
    fn test_attribution_only_for_late_rows() {
        let phases = PhaseDurations {
            reaction: hours(10),
            ..PhaseDurations::default()
        };
        assert_eq!(attribute_delay(OtpStatus::OnTime, &phases), DelayReason::Ok);
        assert_eq!(
            attribute_delay(OtpStatus::NotAvailable, &phases),
            DelayReason::Ok
        );
    }

    proptest! {
        #[test]
        fn prop_otp_agrees_with_calendar_comparison(
            loading_min in 0i64..20_000,
            planned_min in 0i64..20_000,
        ) {
            let base = ts("2024-01-01 00:00:00").unwrap();
            let loading = base + Duration::minutes(loading_min);
            let planned = base + Duration::minutes(planned_min);

            let expected = if loading.date() <= planned.date() {
                OtpStatus::OnTime
            } else {
                OtpStatus::Late
            };
            prop_assert_eq!(classify_otp(Some(loading), Some(planned)), expected);
            prop_assert_eq!(classify_otp(None, Some(planned)), OtpStatus::NotAvailable);
            prop_assert_eq!(classify_otp(Some(loading), None), OtpStatus::NotAvailable);
        }
    }
}
