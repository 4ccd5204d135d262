//! Column role classification.
//!
//! Text columns group records, numeric columns get aggregated, and
//! identifier-like columns do neither. The exclude list is matched
//! case-insensitively so `Order_ID` and `order_id` are treated the same.

use polars::prelude::*;

/// Column names excluded from analysis roles by default.
///
/// Identifiers look numeric or categorical but carry no analytical meaning,
/// so they would otherwise pollute the inferred dimension and measure lists.
pub const DEFAULT_EXCLUDED: &[&str] = &["id", "order_id", "customer_id", "product_id", "record_id"];

/// Dimension and measure columns inferred from a frame's schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnRoles {
    /// Text columns usable for grouping
    pub dimensions: Vec<String>,
    /// Numeric columns usable as measures
    pub measures: Vec<String>,
}

/// Classify a frame's columns into dimensions and measures.
///
/// The date column and anything on the exclude list take no role; excluded
/// columns stay in the frame untouched.
pub fn classify_columns(frame: &DataFrame, date_column: &str, exclude: &[String]) -> ColumnRoles {
    let mut dimensions = Vec::new();
    let mut measures = Vec::new();

    for column in frame.get_columns() {
        let name = column.name().as_str();
        if name == date_column || is_excluded(name, exclude) {
            continue;
        }
        match column.dtype() {
            DataType::String => dimensions.push(name.to_string()),
            dtype if is_numeric(dtype) => measures.push(name.to_string()),
            _ => {}
        }
    }

    ColumnRoles {
        dimensions,
        measures,
    }
}

fn is_excluded(name: &str, exclude: &[String]) -> bool {
    exclude
        .iter()
        .any(|candidate| candidate.eq_ignore_ascii_case(name))
}

fn is_numeric(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Float64
            | DataType::Float32
            | DataType::Int64
            | DataType::Int32
            | DataType::Int16
            | DataType::Int8
            | DataType::UInt64
            | DataType::UInt32
            | DataType::UInt16
            | DataType::UInt8
    )
}
