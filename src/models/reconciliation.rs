//! Batch result models.
//!
//! This module contains the [`Reconciliation`] type returned by a pipeline run,
//! together with the [`BatchSummary`] counts reported to the user.

use serde::{Deserialize, Serialize};

use super::{DERIVED_COLUMNS, EnrichedDelivery, OtpStatus, Table};

/// Counts describing one reconciliation run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSummary {
    /// Rows read from the shipment master.
    pub master_rows: usize,
    /// Rows emitted (distinct normalized master keys).
    pub deliveries: usize,
    /// Master rows dropped because their non-empty key had already been seen.
    pub duplicate_master_rows: usize,
    /// Master rows whose key normalized to the empty string. They share a
    /// single output row.
    #[serde(default)]
    pub master_rows_without_key: usize,
    /// Rows read from the pick log.
    pub pick_events: usize,
    /// Rows read from the pack log.
    pub pack_events: usize,
    /// Pick rows whose key normalized to the empty string.
    pub pick_events_without_key: usize,
    /// Pack rows whose key normalized to the empty string.
    pub pack_events_without_key: usize,
    /// Pick rows whose timestamp could not be built.
    pub pick_events_without_timestamp: usize,
    /// Deliveries with no matching pick events.
    pub deliveries_without_picks: usize,
    /// Deliveries with no matching pack events.
    pub deliveries_without_packs: usize,
    /// Deliveries judged on time.
    pub on_time: usize,
    /// Deliveries judged late.
    pub late: usize,
    /// Deliveries that could not be judged.
    pub otp_not_available: usize,
    /// Optional logical fields whose column was not found, as `input.field`.
    pub missing_optional_columns: Vec<String>,
}

impl BatchSummary {
    /// Tallies the OTP verdicts and join misses of the emitted deliveries.
    pub fn count_deliveries(&mut self, deliveries: &[EnrichedDelivery]) {
        self.deliveries = deliveries.len();
        for delivery in deliveries {
            if delivery.pick.is_none() {
                self.deliveries_without_picks += 1;
            }
            if delivery.pack.is_none() {
                self.deliveries_without_packs += 1;
            }
            match delivery.kpi.otp_status {
                OtpStatus::OnTime => self.on_time += 1,
                OtpStatus::Late => self.late += 1,
                OtpStatus::NotAvailable => self.otp_not_available += 1,
            }
        }
    }
}

/// The complete output of one reconciliation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reconciliation {
    /// Header names of the shipment master, in order.
    pub master_columns: Vec<String>,
    /// One row per distinct delivery key, in master order.
    pub deliveries: Vec<EnrichedDelivery>,
    /// Run counts.
    pub summary: BatchSummary,
}

impl Reconciliation {
    /// Flattens the result into the enriched delivery table: all master
    /// columns followed by the derived columns.
    ///
    /// # Example
    ///
    /// ```
    /// use fulfillment_engine::models::{BatchSummary, Reconciliation, DERIVED_COLUMNS};
    ///
    /// let result = Reconciliation {
    ///     master_columns: vec!["Delivery".to_string()],
    ///     deliveries: vec![],
    ///     summary: BatchSummary::default(),
    /// };
    /// let table = result.to_table();
    /// assert_eq!(table.columns.len(), 1 + DERIVED_COLUMNS.len());
    /// assert!(table.rows.is_empty());
    /// ```
    pub fn to_table(&self) -> Table {
        let columns = self
            .master_columns
            .iter()
            .cloned()
            .chain(DERIVED_COLUMNS.iter().map(|c| c.to_string()))
            .collect();
        let rows = self.deliveries.iter().map(EnrichedDelivery::to_row).collect();
        Table::new(columns, rows)
    }
}
