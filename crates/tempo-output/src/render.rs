//! Terminal and Markdown rendering of reports.
//!
//! Growth rates are ratios everywhere else in the system; rendering is where
//! they become percentages. Absent values render as blanks in both formats.

use crate::report::Report;
use tempo_core::AnalysisTable;

/// Detail rows shown per analysis in rendered output; exports carry them all.
const DETAIL_ROW_LIMIT: usize = 10;

impl Report {
    /// Format as ASCII table for terminal display.
    pub fn to_ascii_table(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!("\n{}\n", self.title));
        output.push_str(&format!(
            "Reference date: {} (current {} to {}, prior month {}, prior year {})\n",
            self.periods.reference,
            self.periods.current.start,
            self.periods.current.end,
            self.periods.prior_month.start,
            self.periods.prior_year.start,
        ));
        output.push_str(&"=".repeat(100));
        output.push('\n');

        output.push_str("\nSummary:\n");
        output.push_str(&"-".repeat(100));
        output.push('\n');
        output.push_str(&format!(
            "{:<24} {:>8} {:>10} {:>7} {:>7} {:>10} {:>7} {:>7}\n",
            "Analysis", "Groups", "PoP mean", "PoP +", "PoP -", "YoY mean", "YoY +", "YoY -"
        ));
        for row in &self.summary {
            output.push_str(&format!(
                "{:<24} {:>8} {:>10} {:>7} {:>7} {:>10} {:>7} {:>7}\n",
                row.analysis,
                row.groups,
                percent_cell(row.pop.mean),
                row.pop.positive,
                row.pop.negative,
                percent_cell(row.yoy.mean),
                row.yoy.positive,
                row.yoy.negative,
            ));
        }

        for table in &self.tables {
            output.push_str(&render_table_ascii(table));
        }

        if !self.failures.is_empty() {
            output.push_str("\nFailed analyses:\n");
            output.push_str(&"-".repeat(100));
            output.push('\n');
            for failure in &self.failures {
                output.push_str(&format!("  {}: {}\n", failure.name, failure.message));
            }
        }

        output.push_str(&"=".repeat(100));
        output.push('\n');

        output
    }

    /// Format as Markdown for documentation.
    pub fn to_markdown(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!("# {}\n\n", self.title));
        output.push_str(&format!(
            "**Reference date:** {} (current period {} to {})\n\n",
            self.periods.reference, self.periods.current.start, self.periods.current.end
        ));

        output.push_str("## Summary\n\n");
        output.push_str("| Analysis | Groups | PoP mean | PoP + | PoP - | YoY mean | YoY + | YoY - |\n");
        output.push_str("|----------|--------|----------|-------|-------|----------|-------|-------|\n");
        for row in &self.summary {
            output.push_str(&format!(
                "| {} | {} | {} | {} | {} | {} | {} | {} |\n",
                row.analysis,
                row.groups,
                percent_cell(row.pop.mean),
                row.pop.positive,
                row.pop.negative,
                percent_cell(row.yoy.mean),
                row.yoy.positive,
                row.yoy.negative,
            ));
        }

        for table in &self.tables {
            output.push_str(&render_table_markdown(table));
        }

        if !self.failures.is_empty() {
            output.push_str("\n## Failed analyses\n\n");
            for failure in &self.failures {
                output.push_str(&format!("- **{}**: {}\n", failure.name, failure.message));
            }
        }

        output
    }
}

fn render_table_ascii(table: &AnalysisTable) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "\n{} ({} by {}, {} groups):\n",
        table.name,
        table.config.aggregation,
        table.config.normalized_dimensions().join(" / "),
        table.rows.len()
    ));
    output.push_str(&"-".repeat(100));
    output.push('\n');
    output.push_str(&format!(
        "{:<32} {:>12} {:>12} {:>12} {:>10} {:>10}\n",
        "Group", "Current", "Prior mo.", "Prior yr.", "PoP", "YoY"
    ));

    for row in table.rows.iter().take(DETAIL_ROW_LIMIT) {
        output.push_str(&format!(
            "{:<32} {:>12} {:>12} {:>12} {:>10} {:>10}\n",
            row.key.to_string(),
            value_cell(row.current),
            value_cell(row.prior_month),
            value_cell(row.prior_year),
            percent_cell(row.pop_growth),
            percent_cell(row.yoy_growth),
        ));
    }
    if table.rows.len() > DETAIL_ROW_LIMIT {
        output.push_str(&format!(
            "  ... {} more groups in the exported table\n",
            table.rows.len() - DETAIL_ROW_LIMIT
        ));
    }

    output
}

fn render_table_markdown(table: &AnalysisTable) -> String {
    let mut output = String::new();

    output.push_str(&format!("\n## {}\n\n", table.name));
    output.push_str("| Group | Current | Prior month | Prior year | PoP | YoY |\n");
    output.push_str("|-------|---------|-------------|------------|-----|-----|\n");
    for row in table.rows.iter().take(DETAIL_ROW_LIMIT) {
        output.push_str(&format!(
            "| {} | {} | {} | {} | {} | {} |\n",
            row.key,
            value_cell(row.current),
            value_cell(row.prior_month),
            value_cell(row.prior_year),
            percent_cell(row.pop_growth),
            percent_cell(row.yoy_growth),
        ));
    }

    output
}

fn value_cell(value: Option<f64>) -> String {
    value.map(|v| format!("{v:.2}")).unwrap_or_default()
}

fn percent_cell(value: Option<f64>) -> String {
    value.map(|v| format!("{:.2}%", v * 100.0)).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use crate::report::Report;
    use chrono::NaiveDate;
    use tempo_core::{
        Aggregation, AnalysisConfig, AnalysisResults, AnalysisTable, DimensionKey, GrowthRow,
        resolve_periods, summarize,
    };

    fn report() -> Report {
        let periods = resolve_periods(NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()).unwrap();
        let tables = vec![AnalysisTable {
            name: "by_region".to_string(),
            config: AnalysisConfig::new(
                "by_region",
                vec!["region".to_string()],
                "sales",
                Aggregation::Sum,
            ),
            rows: vec![
                GrowthRow {
                    key: DimensionKey::from(["North"]),
                    current: Some(100.0),
                    prior_month: Some(80.0),
                    prior_year: Some(60.0),
                    pop_growth: Some(0.25),
                    yoy_growth: Some(2.0 / 3.0),
                },
                GrowthRow {
                    key: DimensionKey::from(["South"]),
                    current: None,
                    prior_month: Some(40.0),
                    prior_year: None,
                    pop_growth: None,
                    yoy_growth: None,
                },
            ],
        }];
        let summary = summarize(&tables);
        Report::from_results(
            "February Growth",
            AnalysisResults {
                periods,
                tables,
                summary,
                failures: Vec::new(),
            },
        )
    }

    #[test]
    fn ascii_table_shows_percentages_and_blanks() {
        let ascii = report().to_ascii_table();

        assert!(ascii.contains("February Growth"));
        assert!(ascii.contains("by_region"));
        assert!(ascii.contains("25.00%"));
        assert!(ascii.contains("66.67%"));
        assert!(ascii.contains("North"));
        // The South row has no current value; its cells stay blank.
        assert!(ascii.contains("South"));
        assert!(!ascii.contains("NaN"));
        assert!(!ascii.contains("inf"));
    }

    #[test]
    fn markdown_has_summary_and_detail_sections() {
        let md = report().to_markdown();

        assert!(md.contains("# February Growth"));
        assert!(md.contains("## Summary"));
        assert!(md.contains("## by_region"));
        assert!(md.contains("| North | 100.00 | 80.00 | 60.00 | 25.00% | 66.67% |"));
    }
}
