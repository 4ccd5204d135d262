//! Partitioning of the input table into period subsets.

use polars::prelude::*;

use crate::error::{Result, ensure_column};
use crate::period::{Period, PeriodSet, epoch_days};

/// The input table partitioned into the three comparison periods.
///
/// The intervals are disjoint by construction, so a record appears in at most
/// one subset; records dated outside all three periods appear in none.
/// Measure values are carried through untouched.
#[derive(Debug, Clone)]
pub struct AlignedPeriods {
    /// Records dated inside the current month
    pub current: DataFrame,
    /// Records dated inside the prior month
    pub prior_month: DataFrame,
    /// Records dated inside the same month one year earlier
    pub prior_year: DataFrame,
}

/// Select the records of `frame` falling into each of the three periods.
///
/// `date_column` must hold a Polars `Date` (or integer day) column; fails with
/// [`crate::error::AnalysisError::MissingColumn`] when it is absent.
pub fn align_periods(
    frame: &DataFrame,
    date_column: &str,
    periods: &PeriodSet,
) -> Result<AlignedPeriods> {
    ensure_column(frame, date_column)?;
    Ok(AlignedPeriods {
        current: filter_period(frame, date_column, &periods.current)?,
        prior_month: filter_period(frame, date_column, &periods.prior_month)?,
        prior_year: filter_period(frame, date_column, &periods.prior_year)?,
    })
}

fn filter_period(frame: &DataFrame, date_column: &str, period: &Period) -> Result<DataFrame> {
    let days = col(date_column).cast(DataType::Int32);
    let within = days
        .clone()
        .gt_eq(lit(epoch_days(period.start)))
        .and(days.lt(lit(epoch_days(period.end))));
    Ok(frame.clone().lazy().filter(within).collect()?)
}
