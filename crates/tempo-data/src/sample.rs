//! Synthetic sample dataset generation.
//!
//! Generates a small sales table spanning the three comparison periods of a
//! reference date, plus a handful of out-of-period rows that alignment must
//! ignore. Deterministic under a seeded rng, which is how the tests use it.

use std::path::Path;

use chrono::NaiveDate;
use polars::prelude::*;
use rand::Rng;
use tempo_core::period::{PeriodSet, epoch_days, resolve_periods};

use crate::error::{DataError, Result};

const REGIONS: &[&str] = &["North", "South", "East", "West"];
const CHANNELS: &[&str] = &["Online", "Retail", "Partner"];
const PRODUCTS: &[&str] = &["Starter", "Pro", "Enterprise"];

/// One generated record.
#[derive(Debug, Clone)]
struct SampleRow {
    date: NaiveDate,
    region: &'static str,
    channel: &'static str,
    product: &'static str,
    sales: f64,
    units: i64,
}

/// Generate a sample sales table as a typed frame.
///
/// `rows_per_period` records land in each of the three comparison periods
/// resolved from `reference`, and a few extra rows fall outside all of them.
pub fn sample_frame(
    reference: NaiveDate,
    rows_per_period: usize,
    rng: &mut impl Rng,
) -> Result<DataFrame> {
    let rows = generate_rows(reference, rows_per_period, rng)?;

    let dates: Vec<i32> = rows.iter().map(|r| epoch_days(r.date)).collect();
    let regions: Vec<&str> = rows.iter().map(|r| r.region).collect();
    let channels: Vec<&str> = rows.iter().map(|r| r.channel).collect();
    let products: Vec<&str> = rows.iter().map(|r| r.product).collect();
    let sales: Vec<f64> = rows.iter().map(|r| r.sales).collect();
    let units: Vec<i64> = rows.iter().map(|r| r.units).collect();

    Ok(DataFrame::new(vec![
        Series::new("date".into(), dates)
            .cast(&DataType::Date)?
            .into(),
        Series::new("region".into(), regions).into(),
        Series::new("channel".into(), channels).into(),
        Series::new("product".into(), products).into(),
        Series::new("sales".into(), sales).into(),
        Series::new("units".into(), units).into(),
    ])?)
}

/// Write the sample table as a CSV file the loader can read back.
pub fn write_sample_csv(
    path: impl AsRef<Path>,
    reference: NaiveDate,
    rows_per_period: usize,
    rng: &mut impl Rng,
) -> Result<()> {
    let rows = generate_rows(reference, rows_per_period, rng)?;

    let mut writer = csv::Writer::from_path(path.as_ref())?;
    writer.write_record(["date", "region", "channel", "product", "sales", "units"])?;
    for row in &rows {
        writer.write_record([
            row.date.format("%Y-%m-%d").to_string(),
            row.region.to_string(),
            row.channel.to_string(),
            row.product.to_string(),
            format!("{:.2}", row.sales),
            row.units.to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

fn generate_rows(
    reference: NaiveDate,
    rows_per_period: usize,
    rng: &mut impl Rng,
) -> Result<Vec<SampleRow>> {
    let periods = resolve_periods(reference)
        .map_err(|e| DataError::Parse(format!("cannot resolve sample periods: {e}")))?;

    let mut rows = Vec::with_capacity(rows_per_period * 3 + 4);
    for start in period_starts(&periods) {
        for _ in 0..rows_per_period {
            rows.push(random_row(start, rng));
        }
    }

    // A few records two months before the current period; alignment must
    // leave them out of every subset.
    let outside = periods
        .prior_month
        .start
        .checked_sub_months(chrono::Months::new(1))
        .ok_or_else(|| DataError::Parse("sample reference date out of range".to_string()))?;
    for _ in 0..4 {
        rows.push(random_row(outside, rng));
    }

    Ok(rows)
}

const fn period_starts(periods: &PeriodSet) -> [NaiveDate; 3] {
    [
        periods.current.start,
        periods.prior_month.start,
        periods.prior_year.start,
    ]
}

fn random_row(month_start: NaiveDate, rng: &mut impl Rng) -> SampleRow {
    let day_offset = rng.gen_range(0..28);
    SampleRow {
        date: month_start + chrono::Days::new(day_offset),
        region: REGIONS[rng.gen_range(0..REGIONS.len())],
        channel: CHANNELS[rng.gen_range(0..CHANNELS.len())],
        product: PRODUCTS[rng.gen_range(0..PRODUCTS.len())],
        sales: (rng.gen_range(50.0..5000.0_f64) * 100.0).round() / 100.0,
        units: rng.gen_range(1..50),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn reference() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
    }

    #[test]
    fn generation_is_deterministic_under_a_seed() {
        let a = sample_frame(reference(), 10, &mut StdRng::seed_from_u64(7)).unwrap();
        let b = sample_frame(reference(), 10, &mut StdRng::seed_from_u64(7)).unwrap();

        assert_eq!(a, b);
        assert_eq!(a.height(), 34);
    }

    #[test]
    fn rows_cover_all_three_periods() {
        let frame = sample_frame(reference(), 5, &mut StdRng::seed_from_u64(1)).unwrap();
        let periods = resolve_periods(reference()).unwrap();

        let days = frame.column("date").unwrap().cast(&DataType::Int32).unwrap();
        let days = days.i32().unwrap();

        let mut current = 0;
        let mut prior_month = 0;
        let mut prior_year = 0;
        let mut outside = 0;
        for index in 0..frame.height() {
            let date = tempo_core::period::date_from_epoch_days(days.get(index).unwrap()).unwrap();
            if periods.current.contains(date) {
                current += 1;
            } else if periods.prior_month.contains(date) {
                prior_month += 1;
            } else if periods.prior_year.contains(date) {
                prior_year += 1;
            } else {
                outside += 1;
            }
        }

        assert_eq!(current, 5);
        assert_eq!(prior_month, 5);
        assert_eq!(prior_year, 5);
        assert_eq!(outside, 4);
    }

    #[test]
    fn csv_round_trips_through_the_loader() {
        let path = std::env::temp_dir().join("tempo_sample_roundtrip.csv");
        write_sample_csv(&path, reference(), 3, &mut StdRng::seed_from_u64(3)).unwrap();

        let dataset =
            crate::loader::load_csv(&path, &crate::loader::LoadOptions::default()).unwrap();

        assert_eq!(dataset.frame.height(), 13);
        assert_eq!(dataset.dimensions, vec!["region", "channel", "product"]);
        assert_eq!(dataset.measures, vec!["sales", "units"]);
    }
}
