//! Cross-analysis summary statistics.
//!
//! Summaries are recomputed in full from the growth rows of each analysis;
//! nothing is accumulated incrementally. Absent growth values are excluded
//! from every statistic, not treated as zero.

use serde::{Deserialize, Serialize};

use crate::aggregate::Aggregation;
use crate::engine::AnalysisTable;

/// Distribution statistics over the present growth values of one analysis.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GrowthStats {
    /// Number of groups with growth above zero
    pub positive: usize,
    /// Number of groups with growth below zero
    pub negative: usize,
    /// Mean growth rate, absent when no growth value was computable
    pub mean: Option<f64>,
    /// Smallest growth rate, absent when no growth value was computable
    pub min: Option<f64>,
    /// Largest growth rate, absent when no growth value was computable
    pub max: Option<f64>,
}

impl GrowthStats {
    /// Compute statistics over the given growth values.
    pub fn from_values(values: &[f64]) -> Self {
        if values.is_empty() {
            return Self::default();
        }

        let positive = values.iter().filter(|v| **v > 0.0).count();
        let negative = values.iter().filter(|v| **v < 0.0).count();
        let sum: f64 = values.iter().sum();
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for value in values {
            min = min.min(*value);
            max = max.max(*value);
        }

        Self {
            positive,
            negative,
            mean: Some(sum / values.len() as f64),
            min: Some(min),
            max: Some(max),
        }
    }
}

/// Summary of one analysis, labeled with its configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryRow {
    /// Analysis name
    pub analysis: String,
    /// Dimension columns the analysis grouped by
    pub dimensions: Vec<String>,
    /// Measure column the analysis reduced
    pub measure: String,
    /// Aggregation the analysis applied
    pub aggregation: Aggregation,
    /// Number of dimension groups in the detail table
    pub groups: usize,
    /// Period-over-period growth statistics
    pub pop: GrowthStats,
    /// Year-over-year growth statistics
    pub yoy: GrowthStats,
}

/// Build one summary row per analysis table.
pub fn summarize(tables: &[AnalysisTable]) -> Vec<SummaryRow> {
    tables
        .iter()
        .map(|table| {
            let pop: Vec<f64> = table.rows.iter().filter_map(|r| r.pop_growth).collect();
            let yoy: Vec<f64> = table.rows.iter().filter_map(|r| r.yoy_growth).collect();
            SummaryRow {
                analysis: table.name.clone(),
                dimensions: table.config.normalized_dimensions(),
                measure: table.config.measure.clone(),
                aggregation: table.config.aggregation,
                groups: table.rows.len(),
                pop: GrowthStats::from_values(&pop),
                yoy: GrowthStats::from_values(&yoy),
            }
        })
        .collect()
}
