//! Grouped reduction of a period subset.
//!
//! A subset is grouped by the exact equality of its full dimension tuple and
//! a single measure column is reduced per group. The output is a mapping from
//! [`DimensionKey`] to the reduced value, ready for period-over-period
//! alignment.

use std::collections::BTreeMap;
use std::str::FromStr;

use derive_more::Display;
use polars::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, Result, ensure_column};
use crate::key::DimensionKey;

/// Name of the reduced value column inside the intermediate group-by frame.
const VALUE_COLUMN: &str = "__tempo_value";

/// One aggregated table: dimension tuple to reduced measure value.
///
/// A `BTreeMap` keeps keys in lexical order, which makes downstream iteration
/// deterministic.
pub type AggregatedValues = BTreeMap<DimensionKey, f64>;

/// How a measure column is reduced within each dimension group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
pub enum Aggregation {
    /// Sum of present measure values
    #[display("sum")]
    Sum,
    /// Arithmetic mean of present measure values
    #[display("mean")]
    Mean,
    /// Number of records in the group, present measure or not
    #[display("count")]
    Count,
    /// Largest present measure value
    #[display("max")]
    Max,
    /// Smallest present measure value
    #[display("min")]
    Min,
}

impl FromStr for Aggregation {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sum" => Ok(Self::Sum),
            "mean" => Ok(Self::Mean),
            "count" => Ok(Self::Count),
            "max" => Ok(Self::Max),
            "min" => Ok(Self::Min),
            other => Err(AnalysisError::UnknownAggregation(other.to_string())),
        }
    }
}

impl Aggregation {
    fn expr(self, measure: &str) -> Expr {
        match self {
            Self::Sum => col(measure).sum(),
            Self::Mean => col(measure).mean(),
            Self::Count => col(measure).len(),
            Self::Max => col(measure).max(),
            Self::Min => col(measure).min(),
        }
    }
}

/// Group `frame` by `dimensions` and reduce `measure` with `aggregation`.
///
/// Policy, mirroring how sparse data flows through the rest of the engine:
///
/// - `count` counts records whether or not the measure value is present;
///   the other aggregations skip absent measure values.
/// - A group whose `mean`/`max`/`min` has no contributing records is omitted
///   from the mapping entirely, never reported as zero.
/// - A group containing an absent dimension value is omitted; normalization
///   of categorical values is the loading shell's concern.
///
/// Dimensions are deduplicated order-preserving. Fails with
/// [`AnalysisError::MissingColumn`] for unknown columns,
/// [`AnalysisError::EmptyDimensions`] when no dimensions remain, and
/// [`AnalysisError::MeasureNotNumeric`] when a non-count aggregation targets a
/// non-numeric column.
pub fn aggregate(
    frame: &DataFrame,
    dimensions: &[String],
    measure: &str,
    aggregation: Aggregation,
) -> Result<AggregatedValues> {
    let dimensions = dedup_dimensions(dimensions);
    if dimensions.is_empty() {
        return Err(AnalysisError::EmptyDimensions);
    }
    for dimension in &dimensions {
        ensure_column(frame, dimension)?;
    }
    ensure_column(frame, measure)?;

    if aggregation != Aggregation::Count {
        let dtype = frame.column(measure)?.dtype().clone();
        if !is_numeric(&dtype) {
            return Err(AnalysisError::MeasureNotNumeric {
                column: measure.to_string(),
                dtype: dtype.to_string(),
            });
        }
    }

    let mut values = AggregatedValues::new();
    if frame.height() == 0 {
        return Ok(values);
    }

    let keys: Vec<Expr> = dimensions.iter().map(|d| col(d.as_str())).collect();
    let casts: Vec<Expr> = dimensions
        .iter()
        .map(|d| col(d.as_str()).cast(DataType::String))
        .collect();
    let grouped = frame
        .clone()
        .lazy()
        .group_by(keys)
        .agg([aggregation
            .expr(measure)
            .cast(DataType::Float64)
            .alias(VALUE_COLUMN)])
        .with_columns(casts)
        .collect()?;

    let reduced = grouped.column(VALUE_COLUMN)?.f64()?;
    let mut dimension_columns = Vec::with_capacity(dimensions.len());
    for dimension in &dimensions {
        dimension_columns.push(grouped.column(dimension.as_str())?.str()?);
    }

    for row in 0..grouped.height() {
        let Some(value) = reduced.get(row) else {
            continue;
        };
        let mut parts = Vec::with_capacity(dimension_columns.len());
        for column in &dimension_columns {
            match column.get(row) {
                Some(part) => parts.push(part.to_string()),
                None => break,
            }
        }
        if parts.len() == dimension_columns.len() {
            values.insert(DimensionKey::new(parts), value);
        }
    }

    Ok(values)
}

fn dedup_dimensions(dimensions: &[String]) -> Vec<String> {
    let mut seen = Vec::with_capacity(dimensions.len());
    for dimension in dimensions {
        if !seen.contains(dimension) {
            seen.push(dimension.clone());
        }
    }
    seen
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

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    fn sales_frame() -> DataFrame {
        DataFrame::new(vec![
            Series::new(
                "region".into(),
                vec![
                    Some("North"),
                    Some("North"),
                    Some("South"),
                    Some("South"),
                    None,
                ],
            )
            .into(),
            Series::new(
                "channel".into(),
                vec!["Online", "Retail", "Online", "Online", "Online"],
            )
            .into(),
            Series::new(
                "sales".into(),
                vec![Some(100.0), Some(40.0), None, Some(60.0), Some(5.0)],
            )
            .into(),
        ])
        .unwrap()
    }

    #[test]
    fn sum_groups_by_the_full_tuple() {
        let frame = sales_frame();
        let values = aggregate(
            &frame,
            &["region".to_string(), "channel".to_string()],
            "sales",
            Aggregation::Sum,
        )
        .unwrap();

        assert_eq!(
            values.get(&DimensionKey::from(["North", "Online"])),
            Some(&100.0)
        );
        assert_eq!(
            values.get(&DimensionKey::from(["North", "Retail"])),
            Some(&40.0)
        );
        // Null measure skipped, remaining record still contributes.
        assert_eq!(
            values.get(&DimensionKey::from(["South", "Online"])),
            Some(&60.0)
        );
    }

    #[test]
    fn count_includes_records_with_absent_measures() {
        let frame = sales_frame();
        let values = aggregate(
            &frame,
            &["region".to_string()],
            "sales",
            Aggregation::Count,
        )
        .unwrap();

        assert_eq!(values.get(&DimensionKey::from(["South"])), Some(&2.0));
        assert_eq!(values.get(&DimensionKey::from(["North"])), Some(&2.0));
    }

    #[test]
    fn mean_of_no_contributing_records_is_omitted() {
        let frame = DataFrame::new(vec![
            Series::new("region".into(), vec!["East", "East"]).into(),
            Series::new("sales".into(), vec![None::<f64>, None]).into(),
        ])
        .unwrap();

        let values =
            aggregate(&frame, &["region".to_string()], "sales", Aggregation::Mean).unwrap();
        assert!(values.is_empty());
    }

    #[test]
    fn null_dimension_groups_are_omitted() {
        let frame = sales_frame();
        let values =
            aggregate(&frame, &["region".to_string()], "sales", Aggregation::Sum).unwrap();

        assert_eq!(values.len(), 2);
        assert!(values.keys().all(|k| !k.values().is_empty()));
    }

    #[test]
    fn mean_skips_absent_values() {
        let frame = sales_frame();
        let values =
            aggregate(&frame, &["region".to_string()], "sales", Aggregation::Mean).unwrap();

        // South has one null and one 60.0; the mean divides by one record.
        assert_relative_eq!(
            *values.get(&DimensionKey::from(["South"])).unwrap(),
            60.0,
            epsilon = 1e-12
        );
        assert_relative_eq!(
            *values.get(&DimensionKey::from(["North"])).unwrap(),
            70.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn duplicate_dimensions_collapse() {
        let frame = sales_frame();
        let values = aggregate(
            &frame,
            &["region".to_string(), "region".to_string()],
            "sales",
            Aggregation::Sum,
        )
        .unwrap();

        assert!(values.contains_key(&DimensionKey::from(["North"])));
    }

    #[test]
    fn unknown_columns_are_schema_errors() {
        let frame = sales_frame();

        assert!(matches!(
            aggregate(&frame, &["territory".to_string()], "sales", Aggregation::Sum),
            Err(AnalysisError::MissingColumn { column }) if column == "territory"
        ));
        assert!(matches!(
            aggregate(&frame, &["region".to_string()], "revenue", Aggregation::Sum),
            Err(AnalysisError::MissingColumn { column }) if column == "revenue"
        ));
    }

    #[test]
    fn no_dimensions_is_an_error() {
        let frame = sales_frame();
        assert!(matches!(
            aggregate(&frame, &[], "sales", Aggregation::Sum),
            Err(AnalysisError::EmptyDimensions)
        ));
    }

    #[test]
    fn text_measure_rejected_except_for_count() {
        let frame = sales_frame();

        assert!(matches!(
            aggregate(&frame, &["region".to_string()], "channel", Aggregation::Sum),
            Err(AnalysisError::MeasureNotNumeric { .. })
        ));
        let counted =
            aggregate(&frame, &["region".to_string()], "channel", Aggregation::Count).unwrap();
        assert_eq!(counted.get(&DimensionKey::from(["North"])), Some(&2.0));
    }

    #[rstest]
    #[case("sum", Aggregation::Sum)]
    #[case("MEAN", Aggregation::Mean)]
    #[case(" count ", Aggregation::Count)]
    #[case("max", Aggregation::Max)]
    #[case("min", Aggregation::Min)]
    fn aggregation_parses_known_names(#[case] input: &str, #[case] expected: Aggregation) {
        assert_eq!(input.parse::<Aggregation>().unwrap(), expected);
    }

    #[test]
    fn aggregation_rejects_unknown_names() {
        assert!(matches!(
            "median".parse::<Aggregation>(),
            Err(AnalysisError::UnknownAggregation(name)) if name == "median"
        ));
    }
}
