//! Error types for score computations.

use crate::statements::StatementKind;
use thiserror::Error;

/// Result type for score operations.
pub type Result<T> = std::result::Result<T, ScoreError>;

/// Errors that can occur during score computation.
///
/// Undefined ratios are not errors: each calculator resolves them with its own
/// policy (zeroed, NaN or propagated infinity). Only structurally absent input
/// surfaces here.
#[derive(Debug, Error)]
pub enum ScoreError {
    /// A required statement table is empty or absent for a company
    #[error("Missing {statement} for {symbol}")]
    MissingInput {
        /// Ticker symbol of the company
        symbol: String,
        /// Statement that was empty
        statement: StatementKind,
    },

    /// Missing required column in input data
    #[error("Missing required column: {0}")]
    MissingColumn(String),

    /// A statement reports the same date more than once
    #[error("{statement} of {symbol} has duplicate periods")]
    DuplicatePeriod {
        /// Ticker symbol of the company
        symbol: String,
        /// Statement with the repeated dates
        statement: StatementKind,
    },

    /// No GNP reference value for the requested year
    #[error("GNP value not available for {region} in {year}")]
    GnpUnavailable {
        /// Region whose table was consulted
        region: String,
        /// Calendar year that was requested
        year: i32,
    },

    /// Polars DataFrame error
    #[error("DataFrame error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// Filesystem error while reading the cache or writing exports
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Cached statement could not be decoded
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Score not found in registry
    #[error("Score not found: {0}")]
    NotFound(String),

    /// Computation error
    #[error("Computation error: {0}")]
    Computation(String),
}

impl ScoreError {
    /// Whether the error means the company lacks usable input and should be
    /// skipped rather than aborting the whole run.
    pub const fn is_missing_input(&self) -> bool {
        matches!(
            self,
            Self::MissingInput { .. } | Self::MissingColumn(_) | Self::DuplicatePeriod { .. }
        )
    }
}
