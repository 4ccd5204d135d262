//! Analysis orchestration.
//!
//! The engine resolves and aligns the comparison periods once, then evaluates
//! each analysis configuration as a pure function of the aligned subsets.
//! Nothing is shared or mutated between configurations, so runs are
//! independent and repeatable.

use chrono::NaiveDate;
use polars::prelude::DataFrame;
use serde::{Deserialize, Serialize};

use crate::aggregate::aggregate;
use crate::align::{AlignedPeriods, align_periods};
use crate::config::AnalysisConfig;
use crate::error::{AnalysisError, Result};
use crate::growth::{GrowthRow, compute_growth};
use crate::period::{PeriodSet, latest_date, resolve_periods};
use crate::summary::{SummaryRow, summarize};

/// The detail table of one completed analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisTable {
    /// Analysis name, as given in the configuration
    pub name: String,
    /// The configuration that produced this table
    pub config: AnalysisConfig,
    /// Growth rows ordered by descending current value
    pub rows: Vec<GrowthRow>,
}

/// An analysis that failed on a schema or configuration error.
///
/// Failures carry the offending analysis name so the shell can report them
/// without aborting sibling analyses.
#[derive(Debug)]
pub struct AnalysisFailure {
    /// Name of the failed analysis
    pub name: String,
    /// What went wrong
    pub error: AnalysisError,
}

/// Everything produced by one engine invocation.
#[derive(Debug)]
pub struct AnalysisResults {
    /// The resolved comparison periods, including the reference date
    pub periods: PeriodSet,
    /// One detail table per successful analysis
    pub tables: Vec<AnalysisTable>,
    /// One summary row per successful analysis
    pub summary: Vec<SummaryRow>,
    /// Analyses rejected for schema or configuration problems
    pub failures: Vec<AnalysisFailure>,
}

/// Run every configuration against the dataset.
///
/// The reference date defaults to the maximum date in `date_column`; failing
/// to determine one is fatal and surfaces before any aggregation. Per-config
/// schema errors (unknown column, unusable measure, empty dimension list) are
/// collected into [`AnalysisResults::failures`] and do not abort the others.
pub fn run_analyses(
    frame: &DataFrame,
    date_column: &str,
    configs: &[AnalysisConfig],
    reference: Option<NaiveDate>,
) -> Result<AnalysisResults> {
    let reference = match reference {
        Some(date) => date,
        None => latest_date(frame, date_column)?,
    };
    let periods = resolve_periods(reference)?;
    let aligned = align_periods(frame, date_column, &periods)?;

    let mut tables = Vec::with_capacity(configs.len());
    let mut failures = Vec::new();
    for config in configs {
        match run_config(&aligned, config) {
            Ok(rows) => tables.push(AnalysisTable {
                name: config.name.clone(),
                config: config.clone(),
                rows,
            }),
            Err(error) => failures.push(AnalysisFailure {
                name: config.name.clone(),
                error,
            }),
        }
    }

    let summary = summarize(&tables);
    Ok(AnalysisResults {
        periods,
        tables,
        summary,
        failures,
    })
}

/// Evaluate one configuration over already-aligned period subsets.
///
/// Pure: the same subsets and configuration always yield the same rows.
pub fn run_config(aligned: &AlignedPeriods, config: &AnalysisConfig) -> Result<Vec<GrowthRow>> {
    let dimensions = config.normalized_dimensions();
    let current = aggregate(
        &aligned.current,
        &dimensions,
        &config.measure,
        config.aggregation,
    )?;
    let prior_month = aggregate(
        &aligned.prior_month,
        &dimensions,
        &config.measure,
        config.aggregation,
    )?;
    let prior_year = aggregate(
        &aligned.prior_year,
        &dimensions,
        &config.measure,
        config.aggregation,
    )?;

    Ok(compute_growth(&current, &prior_month, &prior_year))
}
