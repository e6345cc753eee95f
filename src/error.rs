//! Error types for the Fulfillment Reconciliation Engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate.
//! Only configuration problems are errors: per-cell parse failures and join
//! misses are recovered locally as null values and never surface here.

use thiserror::Error;

/// The main error type for the Fulfillment Reconciliation Engine.
///
/// Any of these aborts the whole batch; no partial table is produced.
///
/// # Example
///
/// ```
/// use fulfillment_engine::error::EngineError;
///
/// let error = EngineError::ConfigNotFound {
///     path: "/missing/pipeline.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: /missing/pipeline.yaml");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// Configuration parsed but holds values the engine cannot use.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// A description of the offending value.
        message: String,
    },

    /// A required identifier column could not be located in an input table.
    #[error(
        "Required column '{field}' not found in {input}: expected one of [{}], found [{}]",
        .expected.join(", "),
        .found.join(", ")
    )]
    MissingColumn {
        /// The input table the column was missing from.
        input: String,
        /// The logical field that could not be resolved.
        field: String,
        /// The header names that would have been accepted.
        expected: Vec<String>,
        /// The header names actually present in the table.
        found: Vec<String>,
    },
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
