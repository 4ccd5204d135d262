//! Report assembly for Tempo growth analyses.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tempo_core::{AnalysisResults, AnalysisTable, PeriodSet, SummaryRow};
use thiserror::Error;

/// Errors that can occur during report generation.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// An analysis that was rejected for a schema or configuration problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedAnalysis {
    /// Name of the failed analysis
    pub name: String,
    /// Human-readable reason
    pub message: String,
}

/// A complete growth analysis deliverable.
///
/// Bundles the resolved periods, every detail table, the cross-analysis
/// summary, and any per-analysis failures under one title and timestamp,
/// ready for serialization or rendering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    /// Report title.
    pub title: String,

    /// Report generation timestamp.
    pub generated_at: DateTime<Utc>,

    /// The comparison periods the analyses were aligned to.
    pub periods: PeriodSet,

    /// One detail table per successful analysis.
    pub tables: Vec<AnalysisTable>,

    /// One summary row per successful analysis.
    pub summary: Vec<SummaryRow>,

    /// Analyses rejected for schema or configuration problems.
    pub failures: Vec<FailedAnalysis>,
}

impl Report {
    /// Wrap engine results into a titled, timestamped report.
    pub fn from_results(title: impl Into<String>, results: AnalysisResults) -> Self {
        let AnalysisResults {
            periods,
            tables,
            summary,
            failures,
        } = results;

        Self {
            title: title.into(),
            generated_at: Utc::now(),
            periods,
            tables,
            summary,
            failures: failures
                .into_iter()
                .map(|failure| FailedAnalysis {
                    name: failure.name,
                    message: failure.error.to_string(),
                })
                .collect(),
        }
    }

    /// Convert the report to a pretty-printed JSON string.
    pub fn to_json(&self) -> Result<String, ReportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Builder for creating reports.
#[derive(Debug)]
pub struct ReportBuilder {
    title: Option<String>,
    results: AnalysisResults,
}

impl ReportBuilder {
    /// Create a builder around engine results.
    pub const fn new(results: AnalysisResults) -> Self {
        Self {
            title: None,
            results,
        }
    }

    /// Set the report title.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Build the report.
    pub fn build(self) -> Report {
        let title = self
            .title
            .unwrap_or_else(|| "Growth Analysis Report".to_string());
        Report::from_results(title, self.results)
    }
}
