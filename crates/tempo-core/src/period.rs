//! Comparison period resolution.
//!
//! A single reference date resolves into three calendar-month periods: the
//! month containing the reference date, the month immediately before it, and
//! the same month one year earlier. Each period is a half-open date interval
//! `[start, end)`, which makes adjacent months share exactly one boundary.

use chrono::{Datelike, Months, NaiveDate};
use derive_more::Display;
use polars::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, Result, ensure_column};

/// Days between 0001-01-01 (CE) and the Unix epoch.
const UNIX_EPOCH_DAYS: i32 = 719_163;

/// Which comparison period a descriptor refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
pub enum PeriodLabel {
    /// The calendar month containing the reference date
    #[display("current")]
    Current,
    /// The calendar month immediately preceding the current one
    #[display("prior_month")]
    PriorMonth,
    /// The same calendar month one year earlier
    #[display("prior_year")]
    PriorYear,
}

/// A half-open date interval `[start, end)` covering one calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    /// Which comparison period this is
    pub label: PeriodLabel,
    /// First day of the month (inclusive)
    pub start: NaiveDate,
    /// First day of the following month (exclusive)
    pub end: NaiveDate,
}

impl Period {
    /// Whether `date` falls inside the interval.
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date < self.end
    }
}

/// The three comparison periods resolved from one reference date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodSet {
    /// The reference date the periods were resolved from
    pub reference: NaiveDate,
    /// Month containing the reference date
    pub current: Period,
    /// Month immediately preceding the current one
    pub prior_month: Period,
    /// Same month one year earlier
    pub prior_year: Period,
}

/// Resolve the three comparison periods for a reference date.
///
/// Month arithmetic rolls over year boundaries, so a January reference yields
/// a prior month in December of the previous year.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use tempo_core::period::resolve_periods;
///
/// let reference = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
/// let periods = resolve_periods(reference).unwrap();
///
/// assert_eq!(periods.current.start, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
/// assert_eq!(periods.prior_month.start, NaiveDate::from_ymd_opt(2023, 12, 1).unwrap());
/// assert_eq!(periods.prior_year.start, NaiveDate::from_ymd_opt(2023, 1, 1).unwrap());
/// ```
pub fn resolve_periods(reference: NaiveDate) -> Result<PeriodSet> {
    let current_start = month_start(reference)?;
    let current_end = shift_months(current_start, 1)?;
    let prior_month_start = shift_months(current_start, -1)?;
    let prior_year_start = shift_months(current_start, -12)?;
    let prior_year_end = shift_months(prior_year_start, 1)?;

    Ok(PeriodSet {
        reference,
        current: Period {
            label: PeriodLabel::Current,
            start: current_start,
            end: current_end,
        },
        prior_month: Period {
            label: PeriodLabel::PriorMonth,
            start: prior_month_start,
            end: current_start,
        },
        prior_year: Period {
            label: PeriodLabel::PriorYear,
            start: prior_year_start,
            end: prior_year_end,
        },
    })
}

/// The maximum date present in `date_column`, used as the default reference
/// date when the caller does not supply one.
///
/// Fails with [`AnalysisError::InvalidDate`] when the column holds no dates at
/// all (empty dataset, or every value null).
pub fn latest_date(frame: &DataFrame, date_column: &str) -> Result<NaiveDate> {
    ensure_column(frame, date_column)?;
    let days = frame.column(date_column)?.cast(&DataType::Int32)?;
    days.i32()?
        .max()
        .and_then(date_from_epoch_days)
        .ok_or_else(|| {
            AnalysisError::InvalidDate(
                "dataset contains no dates and no explicit reference date was given".to_string(),
            )
        })
}

/// Days since the Unix epoch, the physical representation of a Polars `Date`.
pub fn epoch_days(date: NaiveDate) -> i32 {
    date.num_days_from_ce() - UNIX_EPOCH_DAYS
}

/// Inverse of [`epoch_days`]; `None` when the day count is out of range.
pub fn date_from_epoch_days(days: i32) -> Option<NaiveDate> {
    NaiveDate::from_num_days_from_ce_opt(days + UNIX_EPOCH_DAYS)
}

fn month_start(date: NaiveDate) -> Result<NaiveDate> {
    date.with_day(1).ok_or_else(|| {
        AnalysisError::InvalidDate(format!("cannot normalize {date} to the start of its month"))
    })
}

fn shift_months(date: NaiveDate, months: i32) -> Result<NaiveDate> {
    let shifted = if months >= 0 {
        date.checked_add_months(Months::new(months as u32))
    } else {
        date.checked_sub_months(Months::new(months.unsigned_abs()))
    };
    shifted.ok_or_else(|| {
        AnalysisError::InvalidDate(format!("month arithmetic out of range from {date}"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn periods_are_calendar_months() {
        let periods = resolve_periods(date(2024, 2, 29)).unwrap();

        assert_eq!(periods.current.start, date(2024, 2, 1));
        assert_eq!(periods.current.end, date(2024, 3, 1));
        assert_eq!(periods.prior_month.start, date(2024, 1, 1));
        assert_eq!(periods.prior_year.start, date(2023, 2, 1));
        assert_eq!(periods.prior_year.end, date(2023, 3, 1));
    }

    #[test]
    fn prior_month_end_meets_current_start() {
        let periods = resolve_periods(date(2024, 7, 4)).unwrap();
        assert_eq!(periods.prior_month.end, periods.current.start);
    }

    #[test]
    fn january_rolls_into_previous_year() {
        let periods = resolve_periods(date(2024, 1, 2)).unwrap();

        assert_eq!(periods.prior_month.start, date(2023, 12, 1));
        assert_eq!(periods.prior_month.end, date(2024, 1, 1));
        assert_eq!(periods.prior_year.start, date(2023, 1, 1));
    }

    #[rstest]
    #[case(date(2024, 2, 1), true)]
    #[case(date(2024, 2, 29), true)]
    #[case(date(2024, 3, 1), false)]
    #[case(date(2024, 1, 31), false)]
    fn interval_is_half_open(#[case] probe: NaiveDate, #[case] inside: bool) {
        let periods = resolve_periods(date(2024, 2, 15)).unwrap();
        assert_eq!(periods.current.contains(probe), inside);
    }

    #[test]
    fn epoch_days_round_trips() {
        let d = date(2024, 2, 29);
        assert_eq!(date_from_epoch_days(epoch_days(d)), Some(d));
        assert_eq!(epoch_days(date(1970, 1, 1)), 0);
    }

    #[test]
    fn latest_date_picks_the_maximum() {
        let days = vec![
            Some(epoch_days(date(2024, 1, 15))),
            Some(epoch_days(date(2024, 2, 10))),
            None,
        ];
        let column: Column = Series::new("date".into(), days)
            .cast(&DataType::Date)
            .unwrap()
            .into();
        let frame = DataFrame::new(vec![column]).unwrap();

        assert_eq!(latest_date(&frame, "date").unwrap(), date(2024, 2, 10));
    }

    #[test]
    fn latest_date_fails_on_empty_column() {
        let empty: Vec<Option<i32>> = Vec::new();
        let column: Column = Series::new("date".into(), empty)
            .cast(&DataType::Date)
            .unwrap()
            .into();
        let frame = DataFrame::new(vec![column]).unwrap();

        assert!(matches!(
            latest_date(&frame, "date"),
            Err(AnalysisError::InvalidDate(_))
        ));
    }

    #[test]
    fn latest_date_requires_the_column() {
        let frame = DataFrame::new(vec![
            Series::new("amount".into(), vec![1.0f64]).into(),
        ])
        .unwrap();

        assert!(matches!(
            latest_date(&frame, "date"),
            Err(AnalysisError::MissingColumn { .. })
        ));
    }
}
