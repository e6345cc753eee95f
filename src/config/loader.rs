//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading engine
//! configurations from YAML files.

use rust_decimal::Decimal;
use std::fs;
use std::path::Path;

use crate::error::{EngineError, EngineResult};

use super::types::{ColumnSchema, EngineConfig, PipelineConfig};

/// Loads, validates and provides access to engine configuration.
///
/// # Directory Structure
///
/// ```text
/// config/default/
/// ├── pipeline.yaml   # Gap threshold, break windows, timestamp formats
/// └── columns.yaml    # Header aliases for the three input tables
/// ```
///
/// # Example
///
/// ```no_run
/// use fulfillment_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/default").unwrap();
/// println!("{} break windows", loader.config().labor.break_windows.len());
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: EngineConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` instance on success, or an error if:
    /// - Any required file is missing
    /// - Any file contains invalid YAML
    /// - A break window ends before it starts, or the gap threshold is not positive
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let pipeline = Self::load_yaml::<PipelineConfig>(&path.join("pipeline.yaml"))?;
        let columns = Self::load_yaml::<ColumnSchema>(&path.join("columns.yaml"))?;

        Self::from_config(EngineConfig::new(pipeline, columns))
    }

    /// Wraps an in-code configuration after validating it.
    ///
    /// # Example
    ///
    /// ```
    /// use fulfillment_engine::config::{ConfigLoader, EngineConfig};
    ///
    /// let loader = ConfigLoader::from_config(EngineConfig::default())?;
    /// assert_eq!(loader.config().labor.break_windows.len(), 6);
    /// # Ok::<(), fulfillment_engine::error::EngineError>(())
    /// ```
    pub fn from_config(config: EngineConfig) -> EngineResult<Self> {
        Self::validate(&config)?;
        Ok(Self { config })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    fn validate(config: &EngineConfig) -> EngineResult<()> {
        if config.labor.max_gap_minutes <= Decimal::ZERO {
            return Err(EngineError::InvalidConfig {
                message: format!(
                    "max_gap_minutes must be positive, got {}",
                    config.labor.max_gap_minutes
                ),
            });
        }

        if let Some(window) = config.labor.break_windows.iter().find(|w| w.start > w.end) {
            return Err(EngineError::InvalidConfig {
                message: format!(
                    "break window {}-{} ends before it starts",
                    window.start, window.end
                ),
            });
        }

        if config.server.max_body_bytes == 0 {
            return Err(EngineError::InvalidConfig {
                message: "max_body_bytes must be positive".to_string(),
            });
        }

        let required = [
            ("master.delivery", &config.columns.master.delivery),
            ("pick.delivery", &config.columns.pick.delivery),
            ("pack.generated_delivery", &config.columns.pack.generated_delivery),
        ];
        if let Some((field, _)) = required.iter().find(|(_, aliases)| aliases.is_empty()) {
            return Err(EngineError::InvalidConfig {
                message: format!("{} needs at least one column alias", field),
            });
        }

        Ok(())
    }

    /// Returns the underlying engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}
