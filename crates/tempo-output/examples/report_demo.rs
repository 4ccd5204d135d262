//! Demonstration of report rendering and export.

use chrono::NaiveDate;
use polars::prelude::*;
use tempo_core::{Aggregation, AnalysisConfig, epoch_days, run_analyses};
use tempo_output::{ExportFormat, Report, export_results};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Tempo Report Demo ===\n");

    let date = |y: i32, m: u32, d: u32| NaiveDate::from_ymd_opt(y, m, d).unwrap();
    let rows = [
        ("North", "Online", date(2024, 2, 15), 100.0),
        ("South", "Retail", date(2024, 2, 12), 45.0),
        ("North", "Online", date(2024, 1, 15), 80.0),
        ("South", "Retail", date(2024, 1, 20), 60.0),
        ("North", "Online", date(2023, 2, 15), 60.0),
    ];

    let frame = DataFrame::new(vec![
        Series::new("region".into(), rows.iter().map(|r| r.0).collect::<Vec<_>>()).into(),
        Series::new("channel".into(), rows.iter().map(|r| r.1).collect::<Vec<_>>()).into(),
        Series::new(
            "date".into(),
            rows.iter().map(|r| epoch_days(r.2)).collect::<Vec<_>>(),
        )
        .cast(&DataType::Date)?
        .into(),
        Series::new("sales".into(), rows.iter().map(|r| r.3).collect::<Vec<_>>()).into(),
    ])?;

    let configs = [
        AnalysisConfig::new(
            "by_region",
            vec!["region".to_string()],
            "sales",
            Aggregation::Sum,
        ),
        AnalysisConfig::new(
            "by_region_channel",
            vec!["region".to_string(), "channel".to_string()],
            "sales",
            Aggregation::Sum,
        ),
    ];
    let results = run_analyses(&frame, "date", &configs, Some(date(2024, 2, 29)))?;

    let temp_dir = std::env::temp_dir().join("tempo_report_demo");
    let written = export_results(&results, &temp_dir, ExportFormat::Csv)?;
    println!("Exported files:");
    for path in &written {
        println!("  {}", path.display());
    }

    let report = Report::from_results("February Growth", results);
    println!("{}", report.to_ascii_table());
    println!("\nMarkdown rendering:\n");
    println!("{}", report.to_markdown());

    Ok(())
}
