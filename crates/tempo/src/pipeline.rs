//! End-to-end analysis pipeline.
//!
//! Glues the loader and the engine: load a CSV, optionally derive analysis
//! configurations from the detected schema, run every configuration, and hand
//! the results to the reporting layer.

use std::path::Path;

use chrono::NaiveDate;
use tempo_core::{Aggregation, AnalysisConfig, AnalysisError, AnalysisResults, run_analyses};
use tempo_data::{DataError, Dataset, LoadOptions, load_csv};
use thiserror::Error;

/// Errors from the end-to-end pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Dataset could not be loaded
    #[error(transparent)]
    Data(#[from] DataError),

    /// Analysis run failed before any configuration was evaluated
    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    /// No numeric column is available to analyze
    #[error("dataset has no numeric measure columns")]
    NoMeasures,

    /// No categorical column is available to group by
    #[error("dataset has no dimension columns to group by")]
    NoDimensions,

    /// The requested measure is not a numeric column of the dataset
    #[error("column {column} is not a numeric measure of the dataset")]
    MeasureNotAvailable {
        /// The requested column name
        column: String,
    },
}

/// Load a CSV file and run every configuration against it.
///
/// Returns the loaded dataset alongside the results so callers can report on
/// the detected schema as well as the analyses.
pub fn analyze_file(
    path: impl AsRef<Path>,
    options: &LoadOptions,
    configs: &[AnalysisConfig],
    reference: Option<NaiveDate>,
) -> Result<(Dataset, AnalysisResults), PipelineError> {
    let dataset = load_csv(path, options)?;
    let results = run_analyses(&dataset.frame, &dataset.date_column, configs, reference)?;
    Ok((dataset, results))
}

/// Derive analysis configurations from a dataset's detected schema.
///
/// One configuration per detected dimension, plus a combined configuration
/// over all dimensions when there is more than one. The measure defaults to
/// the first detected numeric column.
pub fn auto_configs(
    dataset: &Dataset,
    measure: Option<&str>,
    aggregation: Aggregation,
) -> Result<Vec<AnalysisConfig>, PipelineError> {
    let measure = match measure {
        Some(column) => {
            if !dataset.measures.iter().any(|m| m == column) {
                return Err(PipelineError::MeasureNotAvailable {
                    column: column.to_string(),
                });
            }
            column.to_string()
        }
        None => dataset
            .measures
            .first()
            .cloned()
            .ok_or(PipelineError::NoMeasures)?,
    };

    if dataset.dimensions.is_empty() {
        return Err(PipelineError::NoDimensions);
    }

    let mut configs: Vec<AnalysisConfig> = dataset
        .dimensions
        .iter()
        .map(|dimension| {
            AnalysisConfig::new(
                format!("by_{dimension}"),
                vec![dimension.clone()],
                measure.clone(),
                aggregation,
            )
        })
        .collect();

    if dataset.dimensions.len() > 1 {
        configs.push(AnalysisConfig::new(
            "by_all_dimensions",
            dataset.dimensions.clone(),
            measure,
            aggregation,
        ));
    }

    Ok(configs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use tempo_data::write_sample_csv;

    fn sample_path(name: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(name);
        let reference = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        write_sample_csv(&path, reference, 8, &mut StdRng::seed_from_u64(11)).unwrap();
        path
    }

    #[test]
    fn auto_configs_cover_each_dimension_and_the_combination() {
        let path = sample_path("tempo_pipeline_auto.csv");
        let dataset = tempo_data::load_csv(&path, &LoadOptions::default()).unwrap();

        let configs = auto_configs(&dataset, None, Aggregation::Sum).unwrap();
        let names: Vec<&str> = configs.iter().map(|c| c.name.as_str()).collect();

        assert_eq!(
            names,
            vec!["by_region", "by_channel", "by_product", "by_all_dimensions"]
        );
        assert!(configs.iter().all(|c| c.measure == "sales"));
    }

    #[test]
    fn auto_configs_validate_the_requested_measure() {
        let path = sample_path("tempo_pipeline_measure.csv");
        let dataset = tempo_data::load_csv(&path, &LoadOptions::default()).unwrap();

        assert!(auto_configs(&dataset, Some("units"), Aggregation::Mean).is_ok());
        assert!(matches!(
            auto_configs(&dataset, Some("region"), Aggregation::Mean),
            Err(PipelineError::MeasureNotAvailable { column }) if column == "region"
        ));
    }

    #[test]
    fn analyze_file_runs_the_whole_pipeline() {
        let path = sample_path("tempo_pipeline_analyze.csv");
        let options = LoadOptions::default();
        let dataset = tempo_data::load_csv(&path, &options).unwrap();
        let configs = auto_configs(&dataset, None, Aggregation::Sum).unwrap();

        let (dataset, results) = analyze_file(
            &path,
            &options,
            &configs,
            Some(NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()),
        )
        .unwrap();

        assert_eq!(dataset.dimensions.len(), 3);
        assert_eq!(results.tables.len(), 4);
        assert!(results.failures.is_empty());
        // Every period held sample rows, so each single-dimension analysis
        // produces at least one group with a current value.
        assert!(results.tables[0].rows.iter().any(|r| r.current.is_some()));
    }
}
