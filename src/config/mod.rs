//! Configuration loading and management for the Fulfillment Reconciliation Engine.
//!
//! This module provides functionality to load engine configuration from YAML files:
//! the labor-time cleaning rules (gap threshold and shift break windows), the
//! accepted timestamp formats, and the header aliases for the three input tables.
//!
//! # Example
//!
//! ```no_run
//! use fulfillment_engine::config::ConfigLoader;
//!
//! let loader = ConfigLoader::load("./config/default").unwrap();
//! println!("Gap threshold: {} min", loader.config().labor.max_gap_minutes);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    BreakWindow, ColumnSchema, EngineConfig, LaborConfig, MasterColumns, PackColumns,
    ParsingConfig, PickColumns, PipelineConfig, ServerConfig,
};
