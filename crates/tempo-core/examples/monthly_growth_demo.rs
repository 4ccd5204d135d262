//! Demonstration of the core growth engine over an in-memory table.

use chrono::NaiveDate;
use polars::prelude::*;
use tempo_core::{Aggregation, AnalysisConfig, epoch_days, run_analyses};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Tempo Growth Engine Demo ===\n");

    let date = |y: i32, m: u32, d: u32| NaiveDate::from_ymd_opt(y, m, d).unwrap();
    let rows = [
        ("North", date(2024, 2, 15), 100.0),
        ("North", date(2024, 2, 22), 25.0),
        ("South", date(2024, 2, 8), 90.0),
        ("North", date(2024, 1, 15), 80.0),
        ("South", date(2024, 1, 3), 120.0),
        ("North", date(2023, 2, 15), 60.0),
    ];

    let frame = DataFrame::new(vec![
        Series::new("region".into(), rows.iter().map(|r| r.0).collect::<Vec<_>>()).into(),
        Series::new(
            "date".into(),
            rows.iter().map(|r| epoch_days(r.1)).collect::<Vec<_>>(),
        )
        .cast(&DataType::Date)?
        .into(),
        Series::new("sales".into(), rows.iter().map(|r| r.2).collect::<Vec<_>>()).into(),
    ])?;

    let config = AnalysisConfig::new(
        "by_region",
        vec!["region".to_string()],
        "sales",
        Aggregation::Sum,
    );
    let results = run_analyses(&frame, "date", &[config], Some(date(2024, 2, 29)))?;

    println!(
        "Current period: {} to {}\n",
        results.periods.current.start, results.periods.current.end
    );
    for row in &results.tables[0].rows {
        println!(
            "{:<8} current={:?} prior_month={:?} prior_year={:?} pop={:?} yoy={:?}",
            row.key.to_string(),
            row.current,
            row.prior_month,
            row.prior_year,
            row.pop_growth,
            row.yoy_growth,
        );
    }

    Ok(())
}
