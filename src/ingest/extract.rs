//! Conversion of input tables into typed records.
//!
//! Each extractor resolves its column layout once, then maps every row to a
//! record with a normalized delivery key. Only a missing required column is an
//! error; every per-cell problem degrades to null or zero.

use crate::calculation::normalize_cell_key;
use crate::config::EngineConfig;
use crate::error::EngineResult;
use crate::models::{CellValue, MasterRecord, PackEvent, PickEvent, Table};

use super::coerce::{CellParser, parse_quantity};
use super::schema::{MasterLayout, PackLayout, PickLayout};

/// Records read from one table, plus the optional fields that were absent.
#[derive(Debug, Clone, PartialEq)]
pub struct Extracted<T> {
    /// One record per table row, in table order.
    pub records: Vec<T>,
    /// Optional logical fields not found, as `input.field`.
    pub missing_columns: Vec<String>,
}

fn optional_cell(row: &[CellValue], column: Option<usize>) -> &CellValue {
    static NULL: CellValue = CellValue::Null;
    column.map_or(&NULL, |idx| Table::cell(row, idx))
}

fn optional_identifier(row: &[CellValue], column: Option<usize>) -> Option<String> {
    optional_cell(row, column).as_identifier()
}

/// Reads the shipment master.
pub fn extract_master(table: &Table, config: &EngineConfig) -> EngineResult<Extracted<MasterRecord>> {
    let layout = MasterLayout::resolve(&table.columns, &config.columns.master)?;
    let parser = CellParser::new(&config.parsing);

    let records = table
        .rows
        .iter()
        .map(|row| MasterRecord {
            delivery: normalize_cell_key(Table::cell(row, layout.delivery)),
            cells: row.clone(),
            created_at: parser.datetime(optional_cell(row, layout.created_at)),
            loading_date: parser.datetime(optional_cell(row, layout.loading_date)),
            planned_goods_movement: parser
                .datetime(optional_cell(row, layout.planned_goods_movement)),
        })
        .collect();

    Ok(Extracted {
        records,
        missing_columns: layout.missing,
    })
}

/// Reads the pick log.
///
/// Rows keep their position even when the key normalizes to the empty string:
/// such scans still count as worker activity for labor-time cleaning.
pub fn extract_picks(table: &Table, config: &EngineConfig) -> EngineResult<Extracted<PickEvent>> {
    let layout = PickLayout::resolve(&table.columns, &config.columns.pick)?;
    let parser = CellParser::new(&config.parsing);

    let records = table
        .rows
        .iter()
        .map(|row| PickEvent {
            delivery: normalize_cell_key(Table::cell(row, layout.delivery)),
            worker: optional_identifier(row, layout.worker),
            material: optional_identifier(row, layout.material),
            quantity: parse_quantity(optional_cell(row, layout.quantity)),
            storage_bin: optional_identifier(row, layout.storage_bin),
            timestamp: parser.combine(
                optional_cell(row, layout.confirmation_date),
                optional_cell(row, layout.confirmation_time),
            ),
        })
        .collect();

    Ok(Extracted {
        records,
        missing_columns: layout.missing,
    })
}

/// Reads the pack log, keyed by its generated-delivery column.
pub fn extract_packs(table: &Table, config: &EngineConfig) -> EngineResult<Extracted<PackEvent>> {
    let layout = PackLayout::resolve(&table.columns, &config.columns.pack)?;
    let parser = CellParser::new(&config.parsing);

    let records = table
        .rows
        .iter()
        .map(|row| PackEvent {
            delivery: normalize_cell_key(Table::cell(row, layout.generated_delivery)),
            handling_unit: optional_identifier(row, layout.handling_unit),
            packaging_material: optional_identifier(row, layout.packaging_material),
            label_created: parser.combine(
                optional_cell(row, layout.created_date),
                optional_cell(row, layout.created_time),
            ),
            shipment_added: parser.combine(
                optional_cell(row, layout.changed_date),
                optional_cell(row, layout.changed_time),
            ),
        })
        .collect();

    Ok(Extracted {
        records,
        missing_columns: layout.missing,
    })
}
