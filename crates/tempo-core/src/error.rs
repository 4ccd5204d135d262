//! Error types for analysis operations.

use polars::prelude::{DataFrame, PolarsError};
use thiserror::Error;

/// Result type for analysis operations.
pub type Result<T> = std::result::Result<T, AnalysisError>;

/// Errors that can occur while preparing or running an analysis.
///
/// Schema and configuration problems are errors; sparse data is not. A
/// dimension tuple that is missing from a period, or a growth rate whose
/// denominator is zero or absent, flows through the engine as an absent value
/// rather than surfacing here.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Reference date could not be determined or parsed
    #[error("invalid reference date: {0}")]
    InvalidDate(String),

    /// A configured dimension, measure, or date column is not in the dataset
    #[error("column not found in dataset: {column}")]
    MissingColumn {
        /// Name of the requested column
        column: String,
    },

    /// Aggregation name is not one of the recognized kinds
    #[error("unknown aggregation: {0} (expected sum, mean, count, max, min)")]
    UnknownAggregation(String),

    /// An analysis was configured without any dimension columns
    #[error("analysis requires at least one dimension column")]
    EmptyDimensions,

    /// A non-count aggregation was pointed at a non-numeric column
    #[error("measure column {column} has non-numeric type {dtype}")]
    MeasureNotNumeric {
        /// Name of the measure column
        column: String,
        /// The column's actual data type
        dtype: String,
    },

    /// Polars error
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),
}

/// Check that `column` exists in the frame's schema.
pub(crate) fn ensure_column(frame: &DataFrame, column: &str) -> Result<()> {
    if frame
        .get_column_names()
        .iter()
        .any(|name| name.as_str() == column)
    {
        Ok(())
    } else {
        Err(AnalysisError::MissingColumn {
            column: column.to_string(),
        })
    }
}
