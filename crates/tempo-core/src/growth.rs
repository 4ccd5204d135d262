//! Period-over-period and year-over-year growth computation.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::aggregate::AggregatedValues;
use crate::key::DimensionKey;

/// One dimension tuple's values across the three periods and its growth rates.
///
/// Every field except the key is independently optional: a tuple absent from a
/// period has no value there, and a growth rate with an absent or zero
/// denominator is not computable. Growth rates are ratios (0.25 = +25%);
/// percentage formatting belongs to the output layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthRow {
    /// The dimension tuple this row describes
    pub key: DimensionKey,
    /// Aggregated value in the current month
    pub current: Option<f64>,
    /// Aggregated value in the prior month
    pub prior_month: Option<f64>,
    /// Aggregated value in the same month one year earlier
    pub prior_year: Option<f64>,
    /// Period-over-period growth, `(current - prior_month) / prior_month`
    pub pop_growth: Option<f64>,
    /// Year-over-year growth, `(current - prior_year) / prior_year`
    pub yoy_growth: Option<f64>,
}

/// Join the three aggregated tables of one analysis into growth rows.
///
/// The output covers the union of the three key sets: a key missing from one
/// period still produces a row with an absent value there, never a dropped
/// row. Rows are ordered by descending current value so the largest
/// contributors lead the detail table; rows without a current value sort last,
/// and ties break on lexical key order.
///
/// # Examples
///
/// ```
/// use std::collections::BTreeMap;
/// use tempo_core::growth::compute_growth;
/// use tempo_core::key::DimensionKey;
///
/// let key = DimensionKey::from(["North"]);
/// let mut current = BTreeMap::new();
/// current.insert(key.clone(), 100.0);
/// let mut prior_month = BTreeMap::new();
/// prior_month.insert(key.clone(), 80.0);
///
/// let rows = compute_growth(&current, &prior_month, &BTreeMap::new());
/// assert_eq!(rows[0].pop_growth, Some(0.25));
/// assert_eq!(rows[0].yoy_growth, None);
/// ```
pub fn compute_growth(
    current: &AggregatedValues,
    prior_month: &AggregatedValues,
    prior_year: &AggregatedValues,
) -> Vec<GrowthRow> {
    let keys: BTreeSet<&DimensionKey> = current
        .keys()
        .chain(prior_month.keys())
        .chain(prior_year.keys())
        .collect();

    let mut rows: Vec<GrowthRow> = keys
        .into_iter()
        .map(|key| {
            let current = current.get(key).copied();
            let prior_month = prior_month.get(key).copied();
            let prior_year = prior_year.get(key).copied();
            GrowthRow {
                key: key.clone(),
                current,
                prior_month,
                prior_year,
                pop_growth: growth_ratio(current, prior_month),
                yoy_growth: growth_ratio(current, prior_year),
            }
        })
        .collect();

    rows.sort_by(|a, b| match (a.current, b.current) {
        (Some(x), Some(y)) => y
            .partial_cmp(&x)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.key.cmp(&b.key)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.key.cmp(&b.key),
    });

    rows
}

/// Relative change from `prior` to `current`.
///
/// Absent when either value is absent or the denominator is zero; absence is
/// the designed representation of "not computable", never an error and never
/// infinity.
pub fn growth_ratio(current: Option<f64>, prior: Option<f64>) -> Option<f64> {
    match (current, prior) {
        (Some(current), Some(prior)) if prior != 0.0 => Some((current - prior) / prior),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn values(entries: &[(&[&str], f64)]) -> AggregatedValues {
        entries
            .iter()
            .map(|(parts, value)| {
                let key = DimensionKey::new(parts.iter().map(|p| (*p).to_string()).collect());
                (key, *value)
            })
            .collect()
    }

    #[test]
    fn rows_cover_the_key_union() {
        let current = values(&[(&["North"], 100.0)]);
        let prior_month = values(&[(&["South"], 50.0)]);
        let prior_year = values(&[(&["East"], 25.0)]);

        let rows = compute_growth(&current, &prior_month, &prior_year);
        let keys: Vec<String> = rows.iter().map(|r| r.key.to_string()).collect();

        assert_eq!(rows.len(), 3);
        assert!(keys.contains(&"North".to_string()));
        assert!(keys.contains(&"South".to_string()));
        assert!(keys.contains(&"East".to_string()));
    }

    #[test]
    fn growth_matches_the_worked_example() {
        let current = values(&[(&["North"], 100.0)]);
        let prior_month = values(&[(&["North"], 80.0)]);
        let prior_year = values(&[(&["North"], 60.0)]);

        let rows = compute_growth(&current, &prior_month, &prior_year);

        assert_eq!(rows.len(), 1);
        assert_relative_eq!(rows[0].pop_growth.unwrap(), 0.25, epsilon = 1e-12);
        assert_relative_eq!(rows[0].yoy_growth.unwrap(), 2.0 / 3.0, epsilon = 1e-12);
    }

    #[test]
    fn missing_prior_year_leaves_pop_untouched() {
        let current = values(&[(&["North"], 100.0)]);
        let prior_month = values(&[(&["North"], 80.0)]);

        let rows = compute_growth(&current, &prior_month, &AggregatedValues::new());

        assert_relative_eq!(rows[0].pop_growth.unwrap(), 0.25, epsilon = 1e-12);
        assert_eq!(rows[0].yoy_growth, None);
    }

    #[test]
    fn zero_denominator_yields_absent_growth() {
        let current = values(&[(&["North"], 100.0)]);
        let prior_month = values(&[(&["North"], 0.0)]);

        let rows = compute_growth(&current, &prior_month, &AggregatedValues::new());

        assert_eq!(rows[0].prior_month, Some(0.0));
        assert_eq!(rows[0].pop_growth, None);
    }

    #[test]
    fn rows_sort_by_descending_current_then_key() {
        let current = values(&[(&["B"], 10.0), (&["A"], 10.0), (&["C"], 99.0)]);
        let prior_month = values(&[(&["Z"], 1.0)]);

        let rows = compute_growth(&current, &prior_month, &AggregatedValues::new());
        let keys: Vec<String> = rows.iter().map(|r| r.key.to_string()).collect();

        // Largest current first, equal currents in key order, absent current last.
        assert_eq!(keys, vec!["C", "A", "B", "Z"]);
    }

    #[test]
    fn recomputation_is_idempotent() {
        let current = values(&[(&["North"], 100.0), (&["South"], 30.0)]);
        let prior_month = values(&[(&["North"], 80.0)]);
        let prior_year = values(&[(&["South"], 10.0)]);

        let first = compute_growth(&current, &prior_month, &prior_year);
        let second = compute_growth(&current, &prior_month, &prior_year);

        assert_eq!(first, second);
    }

    #[test]
    fn ratio_requires_both_operands() {
        assert_eq!(growth_ratio(None, Some(10.0)), None);
        assert_eq!(growth_ratio(Some(10.0), None), None);
        assert_eq!(growth_ratio(Some(10.0), Some(0.0)), None);
        assert_relative_eq!(
            growth_ratio(Some(50.0), Some(40.0)).unwrap(),
            0.25,
            epsilon = 1e-12
        );
    }
}
