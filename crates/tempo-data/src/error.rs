//! Error types for data loading.

use thiserror::Error;

/// Result type for data loading operations.
pub type Result<T> = std::result::Result<T, DataError>;

/// Errors that can occur while loading or generating datasets.
#[derive(Debug, Error)]
pub enum DataError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Polars error
    #[error("Polars error: {0}")]
    Polars(#[from] polars::prelude::PolarsError),

    /// Input could not be interpreted as a dataset
    #[error("data parsing error: {0}")]
    Parse(String),

    /// The configured date column is not in the file header
    #[error("date column {column} not found in input")]
    MissingDateColumn {
        /// Name of the configured date column
        column: String,
    },
}
