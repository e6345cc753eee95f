//! Left join of the shipment master with the pick and pack aggregates.

use std::collections::{HashMap, HashSet};

use crate::models::{MasterRecord, PackAggregate, PickAggregate};

/// A master row with whatever aggregates matched its key.
#[derive(Debug, Clone, PartialEq)]
pub struct MergedDelivery {
    /// The first master row seen for the key.
    pub master: MasterRecord,
    /// Matching pick aggregate.
    pub pick: Option<PickAggregate>,
    /// Matching pack aggregate.
    pub pack: Option<PackAggregate>,
}

/// Result of [`merge_deliveries`].
#[derive(Debug, Clone, PartialEq)]
pub struct MergeOutcome {
    /// One entry per distinct master key, in master order.
    pub deliveries: Vec<MergedDelivery>,
    /// Master rows dropped because their non-empty key was already present.
    pub duplicate_master_rows: usize,
    /// Master rows whose key normalized to the empty string. The first one is
    /// emitted, the rest are dropped.
    pub master_rows_without_key: usize,
}

/// Joins aggregates onto the master, keeping every master key exactly once.
///
/// Duplicate master keys collapse to their first row; aggregates for keys not
/// in the master are discarded. Master rows with an empty key share one output
/// row that never matches an aggregate, and are counted apart from duplicates.
pub fn merge_deliveries(
    master: Vec<MasterRecord>,
    mut picks: HashMap<String, PickAggregate>,
    mut packs: HashMap<String, PackAggregate>,
) -> MergeOutcome {
    let mut seen = HashSet::new();
    let mut deliveries = Vec::with_capacity(master.len());
    let mut duplicate_master_rows = 0;
    let mut master_rows_without_key = 0;

    for record in master {
        let keyless = record.delivery.is_empty();
        if keyless {
            master_rows_without_key += 1;
        }
        if !seen.insert(record.delivery.clone()) {
            if !keyless {
                duplicate_master_rows += 1;
            }
            continue;
        }
        let (pick, pack) = if keyless {
            (None, None)
        } else {
            (picks.remove(&record.delivery), packs.remove(&record.delivery))
        };
        deliveries.push(MergedDelivery {
            master: record,
            pick,
            pack,
        });
    }

    MergeOutcome {
        deliveries,
        duplicate_master_rows,
        master_rows_without_key,
    }
}
