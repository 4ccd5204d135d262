//! CSV loading into typed dataset frames.
//!
//! The loader reads everything as text, then types each column: the
//! configured date column becomes a Polars `Date` column, columns whose every
//! non-empty cell parses as a number become `Float64`, and the rest become
//! `String`. Empty cells are null in all three cases, which is how sparse
//! data stays distinguishable from genuine zeros downstream.

use std::path::Path;

use chrono::NaiveDate;
use polars::prelude::*;
use tempo_core::period::epoch_days;

use crate::error::{DataError, Result};
use crate::schema::{ColumnRoles, DEFAULT_EXCLUDED, classify_columns};

/// Options controlling how a file is read and classified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadOptions {
    /// Name of the date column
    pub date_column: String,
    /// Columns excluded from analysis roles (case-insensitive)
    pub exclude: Vec<String>,
}

impl LoadOptions {
    /// Options with the given date column and the default exclude list.
    pub fn new(date_column: impl Into<String>) -> Self {
        Self {
            date_column: date_column.into(),
            exclude: DEFAULT_EXCLUDED.iter().map(|s| (*s).to_string()).collect(),
        }
    }

    /// Add columns to the exclude list.
    pub fn with_exclude<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude.extend(columns.into_iter().map(Into::into));
        self
    }
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self::new("date")
    }
}

/// A loaded table together with its inferred column roles.
#[derive(Debug, Clone)]
pub struct Dataset {
    /// The typed table
    pub frame: DataFrame,
    /// Name of the date column
    pub date_column: String,
    /// Text columns usable for grouping
    pub dimensions: Vec<String>,
    /// Numeric columns usable as measures
    pub measures: Vec<String>,
}

impl Dataset {
    /// Wrap an already-typed frame, inferring column roles from its schema.
    pub fn from_frame(frame: DataFrame, date_column: &str, exclude: &[String]) -> Self {
        let ColumnRoles {
            dimensions,
            measures,
        } = classify_columns(&frame, date_column, exclude);
        Self {
            frame,
            date_column: date_column.to_string(),
            dimensions,
            measures,
        }
    }
}

/// Load a CSV file into a typed dataset.
///
/// Header names are trimmed of surrounding whitespace; cell values are not.
/// Fails with [`DataError::MissingDateColumn`] when the configured date
/// column is not in the header row.
pub fn load_csv(path: impl AsRef<Path>, options: &LoadOptions) -> Result<Dataset> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::Headers)
        .from_path(path.as_ref())?;

    let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();
    if headers.is_empty() {
        return Err(DataError::Parse("input has no header row".to_string()));
    }
    if !headers.iter().any(|h| h == &options.date_column) {
        return Err(DataError::MissingDateColumn {
            column: options.date_column.clone(),
        });
    }

    let mut cells: Vec<Vec<String>> = vec![Vec::new(); headers.len()];
    for record in reader.records() {
        let record = record?;
        for (index, cell) in record.iter().enumerate() {
            cells[index].push(cell.to_string());
        }
    }

    let mut columns: Vec<Column> = Vec::with_capacity(headers.len());
    for (name, values) in headers.iter().zip(&cells) {
        columns.push(build_column(name, values, name == &options.date_column)?);
    }
    let frame = DataFrame::new(columns)?;

    Ok(Dataset::from_frame(
        frame,
        &options.date_column,
        &options.exclude,
    ))
}

fn build_column(name: &str, values: &[String], is_date: bool) -> Result<Column> {
    if is_date {
        let days: Vec<Option<i32>> = values
            .iter()
            .map(|value| parse_date(value).map(epoch_days))
            .collect();
        return Ok(Series::new(name.into(), days)
            .cast(&DataType::Date)?
            .into());
    }

    if is_numeric_column(values) {
        let numbers: Vec<Option<f64>> = values
            .iter()
            .map(|value| {
                let value = value.trim();
                if value.is_empty() {
                    None
                } else {
                    value.parse::<f64>().ok()
                }
            })
            .collect();
        return Ok(Series::new(name.into(), numbers).into());
    }

    let texts: Vec<Option<String>> = values
        .iter()
        .map(|value| {
            if value.trim().is_empty() {
                None
            } else {
                Some(value.clone())
            }
        })
        .collect();
    Ok(Series::new(name.into(), texts).into())
}

/// Date formats accepted in the date column.
fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(raw, "%Y/%m/%d"))
        .ok()
}

/// A column is numeric when it has at least one non-empty cell and every
/// non-empty cell parses as a number.
fn is_numeric_column(values: &[String]) -> bool {
    let mut any = false;
    for value in values {
        let value = value.trim();
        if value.is_empty() {
            continue;
        }
        if value.parse::<f64>().is_err() {
            return false;
        }
        any = true;
    }
    any
}
