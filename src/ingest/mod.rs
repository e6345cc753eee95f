//! Input handling for the three source tables.
//!
//! This module resolves header aliases to column indices, coerces individual
//! cells to timestamps and quantities, and turns table rows into typed records
//! with normalized delivery keys.

mod coerce;
mod extract;
mod schema;

pub use coerce::{CellParser, parse_quantity};
pub use extract::{Extracted, extract_master, extract_packs, extract_picks};
pub use schema::{InputKind, MasterLayout, PackLayout, PickLayout, find_column};
