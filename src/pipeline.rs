//! Batch orchestration.
//!
//! [`reconcile`] runs the whole transformation over three in-memory tables:
//! extract, clean labor time, aggregate picks and packs, merge onto the
//! shipment master and derive KPIs. A missing required column aborts the run
//! before any output is built.

use std::time::Instant;

use tracing::{debug, info, warn};

use crate::calculation::{
    aggregate_packs, aggregate_picks, clean_labor_time, derive_kpi, merge_deliveries,
};
use crate::config::EngineConfig;
use crate::error::EngineResult;
use crate::ingest::{extract_master, extract_packs, extract_picks};
use crate::models::{BatchSummary, EnrichedDelivery, Reconciliation, Table};

/// Reconciles the shipment master, pick log and pack log into one enriched
/// row per distinct delivery key.
///
/// # Errors
///
/// Returns [`EngineError::MissingColumn`](crate::error::EngineError::MissingColumn)
/// if any input lacks its delivery-key column.
///
/// # Example
///
/// ```
/// use fulfillment_engine::config::EngineConfig;
/// use fulfillment_engine::models::{CellValue, Table};
/// use fulfillment_engine::pipeline::reconcile;
///
/// let text = |s: &str| CellValue::Text(s.to_string());
/// let shipments = Table::new(vec!["Delivery".into()], vec![vec![text("00042")]]);
/// let picks = Table::new(vec!["Delivery".into()], vec![vec![text(" 42 ")]]);
/// let packs = Table::new(vec!["Generated delivery".into()], vec![]);
///
/// let result = reconcile(&shipments, &picks, &packs, &EngineConfig::default()).unwrap();
/// assert_eq!(result.deliveries.len(), 1);
/// assert_eq!(result.deliveries[0].delivery, "42");
/// assert!(result.deliveries[0].pick.is_some());
/// ```
pub fn reconcile(
    shipments: &Table,
    picks: &Table,
    packs: &Table,
    config: &EngineConfig,
) -> EngineResult<Reconciliation> {
    let started = Instant::now();

    let master = extract_master(shipments, config)?;
    let pick_log = extract_picks(picks, config)?;
    let pack_log = extract_packs(packs, config)?;

    let mut summary = BatchSummary {
        master_rows: master.records.len(),
        pick_events: pick_log.records.len(),
        pack_events: pack_log.records.len(),
        pick_events_without_key: pick_log
            .records
            .iter()
            .filter(|e| e.delivery.is_empty())
            .count(),
        pack_events_without_key: pack_log
            .records
            .iter()
            .filter(|e| e.delivery.is_empty())
            .count(),
        pick_events_without_timestamp: pick_log
            .records
            .iter()
            .filter(|e| e.timestamp.is_none())
            .count(),
        missing_optional_columns: master
            .missing_columns
            .into_iter()
            .chain(pick_log.missing_columns)
            .chain(pack_log.missing_columns)
            .collect(),
        ..BatchSummary::default()
    };
    debug!(
        master_rows = summary.master_rows,
        pick_events = summary.pick_events,
        pack_events = summary.pack_events,
        "Extracted input tables"
    );

    if summary.pick_events_without_key > 0 || summary.pack_events_without_key > 0 {
        warn!(
            pick_events = summary.pick_events_without_key,
            pack_events = summary.pack_events_without_key,
            "Events with an empty delivery key are excluded from aggregation"
        );
    }

    let cleaned = clean_labor_time(pick_log.records, &config.labor);
    debug!(events = cleaned.len(), "Cleaned labor time");

    let pick_aggregates = aggregate_picks(&cleaned);
    let pack_aggregates = aggregate_packs(&pack_log.records);
    debug!(
        picked_deliveries = pick_aggregates.len(),
        packed_deliveries = pack_aggregates.len(),
        "Aggregated events per delivery"
    );

    let merged = merge_deliveries(master.records, pick_aggregates, pack_aggregates);
    summary.duplicate_master_rows = merged.duplicate_master_rows;
    if merged.duplicate_master_rows > 0 {
        warn!(
            duplicates = merged.duplicate_master_rows,
            "Duplicate delivery keys in shipment master; keeping the first row of each"
        );
    }
    summary.master_rows_without_key = merged.master_rows_without_key;
    if merged.master_rows_without_key > 0 {
        warn!(
            rows = merged.master_rows_without_key,
            "Shipment master rows with an empty delivery key share one unmatched output row"
        );
    }

    let deliveries: Vec<EnrichedDelivery> = merged
        .deliveries
        .into_iter()
        .map(|row| {
            let kpi = derive_kpi(&row);
            EnrichedDelivery {
                delivery: row.master.delivery,
                master: row.master.cells,
                pick: row.pick,
                pack: row.pack,
                kpi,
            }
        })
        .collect();
    summary.count_deliveries(&deliveries);

    info!(
        master_rows = summary.master_rows,
        deliveries = summary.deliveries,
        late = summary.late,
        duration_us = started.elapsed().as_micros(),
        "Reconciliation completed"
    );

    Ok(Reconciliation {
        master_columns: shipments.columns.clone(),
        deliveries,
        summary,
    })
}
