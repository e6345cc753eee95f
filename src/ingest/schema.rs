//! Declarative column resolution.
//!
//! Each logical field has an ordered alias list. Aliases are matched against
//! the table headers once, case-insensitively and ignoring surrounding
//! whitespace, before any row is read. The resulting layouts hold plain column
//! indices.

use tracing::{info, warn};

use crate::config::{MasterColumns, PackColumns, PickColumns};
use crate::error::{EngineError, EngineResult};

/// Which of the three inputs a table is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputKind {
    /// The shipment master.
    ShipmentMaster,
    /// The pick-scan log.
    PickLog,
    /// The packing / label log.
    PackLog,
}

impl InputKind {
    fn prefix(self) -> &'static str {
        match self {
            InputKind::ShipmentMaster => "master",
            InputKind::PickLog => "pick",
            InputKind::PackLog => "pack",
        }
    }
}

impl std::fmt::Display for InputKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputKind::ShipmentMaster => write!(f, "shipment master"),
            InputKind::PickLog => write!(f, "pick log"),
            InputKind::PackLog => write!(f, "pack log"),
        }
    }
}

/// Returns the index of the first header matching any alias, in alias order.
///
/// # Example
///
/// ```
/// use fulfillment_engine::ingest::find_column;
///
/// let headers = vec!["Material".to_string(), " DELIVERY ".to_string()];
/// let aliases = vec!["Shipment".to_string(), "Delivery".to_string()];
/// assert_eq!(find_column(&headers, &aliases), Some(1));
/// ```
pub fn find_column(headers: &[String], aliases: &[String]) -> Option<usize> {
    aliases.iter().find_map(|alias| {
        let wanted = alias.trim().to_lowercase();
        headers
            .iter()
            .position(|header| header.trim().to_lowercase() == wanted)
    })
}

struct Resolver<'a> {
    input: InputKind,
    headers: &'a [String],
    missing: Vec<String>,
}

impl<'a> Resolver<'a> {
    fn new(input: InputKind, headers: &'a [String]) -> Self {
        Self {
            input,
            headers,
            missing: Vec::new(),
        }
    }

    fn required(&self, field: &str, aliases: &[String]) -> EngineResult<usize> {
        find_column(self.headers, aliases).ok_or_else(|| EngineError::MissingColumn {
            input: self.input.to_string(),
            field: field.to_string(),
            expected: aliases.to_vec(),
            found: self.headers.to_vec(),
        })
    }

    fn optional(&mut self, field: &str, aliases: &[String]) -> Option<usize> {
        let column = find_column(self.headers, aliases);
        if column.is_none() {
            let name = format!("{}.{}", self.input.prefix(), field);
            warn!(
                input = %self.input,
                field = field,
                "Optional column not found; metric degrades to null"
            );
            self.missing.push(name);
        }
        column
    }
}

/// Column indices of the shipment master.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MasterLayout {
    /// Delivery identifier.
    pub delivery: usize,
    /// Order-creation timestamp.
    pub created_at: Option<usize>,
    /// Loading date.
    pub loading_date: Option<usize>,
    /// Planned goods-movement date.
    pub planned_goods_movement: Option<usize>,
    /// Optional fields that were not found, as `master.<field>`.
    pub missing: Vec<String>,
}

impl MasterLayout {
    /// Resolves the master layout, failing if no delivery column exists.
    pub fn resolve(headers: &[String], columns: &MasterColumns) -> EngineResult<Self> {
        let mut resolver = Resolver::new(InputKind::ShipmentMaster, headers);
        let delivery = resolver.required("delivery", &columns.delivery)?;
        let created_at = resolver.optional("created_at", &columns.created_at);
        let loading_date = resolver.optional("loading_date", &columns.loading_date);
        let planned_goods_movement =
            resolver.optional("planned_goods_movement", &columns.planned_goods_movement);

        Ok(Self {
            delivery,
            created_at,
            loading_date,
            planned_goods_movement,
            missing: resolver.missing,
        })
    }
}

/// Column indices of the pick log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickLayout {
    /// Delivery identifier.
    pub delivery: usize,
    /// Worker id.
    pub worker: Option<usize>,
    /// Material.
    pub material: Option<usize>,
    /// Quantity (primary or fallback, whichever alias matched first).
    pub quantity: Option<usize>,
    /// Source storage bin.
    pub storage_bin: Option<usize>,
    /// Confirmation date.
    pub confirmation_date: Option<usize>,
    /// Confirmation time.
    pub confirmation_time: Option<usize>,
    /// Optional fields that were not found, as `pick.<field>`.
    pub missing: Vec<String>,
}

impl PickLayout {
    /// Resolves the pick layout, failing if no delivery column exists.
    pub fn resolve(headers: &[String], columns: &PickColumns) -> EngineResult<Self> {
        let mut resolver = Resolver::new(InputKind::PickLog, headers);
        let delivery = resolver.required("delivery", &columns.delivery)?;
        let worker = resolver.optional("worker", &columns.worker);
        let material = resolver.optional("material", &columns.material);
        let quantity = resolver.optional("quantity", &columns.quantity);
        let storage_bin = resolver.optional("storage_bin", &columns.storage_bin);
        let confirmation_date = resolver.optional("confirmation_date", &columns.confirmation_date);
        let confirmation_time = resolver.optional("confirmation_time", &columns.confirmation_time);

        if let Some(idx) = quantity {
            info!(column = %headers[idx], "Using quantity column for Total_Pieces");
        }

        Ok(Self {
            delivery,
            worker,
            material,
            quantity,
            storage_bin,
            confirmation_date,
            confirmation_time,
            missing: resolver.missing,
        })
    }
}

/// Column indices of the pack log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackLayout {
    /// Generated delivery identifier.
    pub generated_delivery: usize,
    /// Handling unit.
    pub handling_unit: Option<usize>,
    /// Packaging material.
    pub packaging_material: Option<usize>,
    /// Label creation date.
    pub created_date: Option<usize>,
    /// Label creation time.
    pub created_time: Option<usize>,
    /// Shipment / change date.
    pub changed_date: Option<usize>,
    /// Shipment / change time.
    pub changed_time: Option<usize>,
    /// Optional fields that were not found, as `pack.<field>`.
    pub missing: Vec<String>,
}

impl PackLayout {
    /// Resolves the pack layout, failing if no generated-delivery column exists.
    pub fn resolve(headers: &[String], columns: &PackColumns) -> EngineResult<Self> {
        let mut resolver = Resolver::new(InputKind::PackLog, headers);
        let generated_delivery =
            resolver.required("generated_delivery", &columns.generated_delivery)?;

        Ok(Self {
            generated_delivery,
            handling_unit: resolver.optional("handling_unit", &columns.handling_unit),
            packaging_material: resolver
                .optional("packaging_material", &columns.packaging_material),
            created_date: resolver.optional("created_date", &columns.created_date),
            created_time: resolver.optional("created_time", &columns.created_time),
            changed_date: resolver.optional("changed_date", &columns.changed_date),
            changed_time: resolver.optional("changed_time", &columns.changed_time),
            missing: resolver.missing,
        })
    }
}
