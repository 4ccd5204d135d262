//! Export functionality for Tempo analysis results.
//!
//! Detail tables and summaries export to CSV and JSON. CSV detail columns are
//! one column per dimension followed by the period values and growth rates;
//! absent values become empty cells so they stay distinguishable from zeros.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tempo_core::{AnalysisResults, AnalysisTable, SummaryRow};
use thiserror::Error;

/// Errors that can occur during export operations.
#[derive(Debug, Error)]
pub enum ExportError {
    /// CSV serialization error.
    #[error("CSV serialization error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error.
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid format error.
    #[error("Invalid format: {0}")]
    InvalidFormat(String),
}

/// Export format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Comma-separated values format.
    Csv,

    /// Compact JSON format.
    Json,

    /// Pretty-printed JSON format.
    PrettyJson,
}

impl ExportFormat {
    /// Get the file extension for this format.
    pub const fn extension(&self) -> &str {
        match self {
            Self::Csv => "csv",
            Self::Json | Self::PrettyJson => "json",
        }
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, ExportError> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            "pretty-json" | "pretty_json" => Ok(Self::PrettyJson),
            other => Err(ExportError::InvalidFormat(other.to_string())),
        }
    }
}

/// Trait for exporting data in various formats.
pub trait Exporter {
    /// Export data to a string in the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError>;

    /// Export data to a file in the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or file writing fails.
    fn export_to_file(&self, path: &Path, format: ExportFormat) -> Result<(), ExportError> {
        let content = self.export_to_string(format)?;
        let mut file = File::create(path)?;
        file.write_all(content.as_bytes())?;
        Ok(())
    }
}

impl Exporter for AnalysisTable {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Csv => {
                let mut wtr = csv::Writer::from_writer(vec![]);
                let mut header = self.config.normalized_dimensions();
                header.extend(
                    ["current", "prior_month", "prior_year", "pop_growth", "yoy_growth"]
                        .map(String::from),
                );
                wtr.write_record(&header)?;

                for row in &self.rows {
                    let mut record: Vec<String> = row.key.values().to_vec();
                    record.push(optional_cell(row.current));
                    record.push(optional_cell(row.prior_month));
                    record.push(optional_cell(row.prior_year));
                    record.push(optional_cell(row.pop_growth));
                    record.push(optional_cell(row.yoy_growth));
                    wtr.write_record(&record)?;
                }

                let data =
                    String::from_utf8(wtr.into_inner().map_err(|e| e.into_error())?).unwrap();
                Ok(data)
            }
            ExportFormat::Json => Ok(serde_json::to_string(self)?),
            ExportFormat::PrettyJson => Ok(serde_json::to_string_pretty(self)?),
        }
    }
}

/// Flattened summary row for CSV export.
#[derive(Debug, Serialize, Deserialize)]
struct SummaryFlat {
    analysis: String,
    dimensions: String,
    measure: String,
    aggregation: String,
    groups: usize,
    pop_positive: usize,
    pop_negative: usize,
    pop_mean: Option<f64>,
    pop_min: Option<f64>,
    pop_max: Option<f64>,
    yoy_positive: usize,
    yoy_negative: usize,
    yoy_mean: Option<f64>,
    yoy_min: Option<f64>,
    yoy_max: Option<f64>,
}

impl From<&SummaryRow> for SummaryFlat {
    fn from(row: &SummaryRow) -> Self {
        Self {
            analysis: row.analysis.clone(),
            dimensions: row.dimensions.join(" / "),
            measure: row.measure.clone(),
            aggregation: row.aggregation.to_string(),
            groups: row.groups,
            pop_positive: row.pop.positive,
            pop_negative: row.pop.negative,
            pop_mean: row.pop.mean,
            pop_min: row.pop.min,
            pop_max: row.pop.max,
            yoy_positive: row.yoy.positive,
            yoy_negative: row.yoy.negative,
            yoy_mean: row.yoy.mean,
            yoy_min: row.yoy.min,
            yoy_max: row.yoy.max,
        }
    }
}

impl Exporter for Vec<SummaryRow> {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Csv => {
                let mut wtr = csv::Writer::from_writer(vec![]);
                for row in self {
                    wtr.serialize(SummaryFlat::from(row))?;
                }
                let data =
                    String::from_utf8(wtr.into_inner().map_err(|e| e.into_error())?).unwrap();
                Ok(data)
            }
            ExportFormat::Json => Ok(serde_json::to_string(self)?),
            ExportFormat::PrettyJson => Ok(serde_json::to_string_pretty(self)?),
        }
    }
}

/// Write one file per detail table plus a summary file into `directory`.
///
/// Files are named after their analysis (sanitized) with the format's
/// extension; the summary lands in `summary.<ext>`. Returns the written paths.
pub fn export_results(
    results: &AnalysisResults,
    directory: &Path,
    format: ExportFormat,
) -> Result<Vec<PathBuf>, ExportError> {
    fs::create_dir_all(directory)?;

    let mut written = Vec::with_capacity(results.tables.len() + 1);
    for table in &results.tables {
        let path = directory.join(format!(
            "{}.{}",
            sanitize_file_stem(&table.name),
            format.extension()
        ));
        table.export_to_file(&path, format)?;
        written.push(path);
    }

    let summary_path = directory.join(format!("summary.{}", format.extension()));
    results.summary.export_to_file(&summary_path, format)?;
    written.push(summary_path);

    Ok(written)
}

fn optional_cell(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn sanitize_file_stem(name: &str) -> String {
    let stem: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if stem.is_empty() {
        "analysis".to_string()
    } else {
        stem
    }
}
