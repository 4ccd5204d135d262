//! Tempo CLI binary.
//!
//! Command-line interface for running multi-period growth analyses over CSV
//! datasets.

use std::error::Error;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::process;
use std::time::Duration;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tempo::auto_configs;
use tempo_core::{
    Aggregation, AnalysisConfig, AnalysisFailure, AnalysisResults, AnalysisTable, align_periods,
    latest_date, resolve_periods, run_config, summarize,
};
use tempo_data::{Dataset, LoadOptions, load_csv, write_sample_csv};
use tempo_output::{ExportFormat, Report, export_results};

#[derive(Parser)]
#[command(name = "tempo")]
#[command(about = "Tempo: multi-period growth analytics", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run growth analyses over a CSV dataset
    Analyze {
        /// Input CSV file
        #[arg(long)]
        input: PathBuf,

        /// JSON file with analysis configurations
        #[arg(long)]
        config: Option<PathBuf>,

        /// Derive one analysis per detected dimension column
        #[arg(long)]
        auto: bool,

        /// Comma-separated dimension columns for a single ad-hoc analysis
        #[arg(long, value_delimiter = ',')]
        dimensions: Vec<String>,

        /// Measure column (ad-hoc and auto modes; defaults to the first
        /// detected numeric column)
        #[arg(long)]
        measure: Option<String>,

        /// Aggregation for ad-hoc and auto modes (sum, mean, count, max, min)
        #[arg(long, default_value = "sum")]
        aggregation: String,

        /// Name of the date column
        #[arg(long, default_value = "date")]
        date_column: String,

        /// Reference date (YYYY-MM-DD); defaults to the latest date in the data
        #[arg(long)]
        reference_date: Option<String>,

        /// Directory to export result tables into
        #[arg(long)]
        output: Option<PathBuf>,

        /// Export format (csv, json, pretty-json)
        #[arg(long, default_value = "csv")]
        format: String,

        /// Print the report as Markdown instead of an ASCII table
        #[arg(long)]
        markdown: bool,
    },

    /// Show the detected schema of a CSV dataset
    Inspect {
        /// Input CSV file
        #[arg(long)]
        input: PathBuf,

        /// Name of the date column
        #[arg(long, default_value = "date")]
        date_column: String,
    },

    /// Generate a sample dataset and a matching configuration file
    Demo {
        /// Directory to write the sample files into
        #[arg(long, default_value = "tempo-demo")]
        output: PathBuf,

        /// Records per comparison period
        #[arg(long, default_value = "40")]
        rows: usize,

        /// Reference date (YYYY-MM-DD) the sample is generated around
        #[arg(long)]
        reference_date: Option<String>,

        /// Seed for deterministic output
        #[arg(long)]
        seed: Option<u64>,
    },
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            input,
            config,
            auto,
            dimensions,
            measure,
            aggregation,
            date_column,
            reference_date,
            output,
            format,
            markdown,
        } => analyze(AnalyzeArgs {
            input,
            config,
            auto,
            dimensions,
            measure,
            aggregation,
            date_column,
            reference_date,
            output,
            format,
            markdown,
        }),
        Commands::Inspect { input, date_column } => inspect(&input, &date_column),
        Commands::Demo {
            output,
            rows,
            reference_date,
            seed,
        } => demo(&output, rows, reference_date.as_deref(), seed),
    }
}

struct AnalyzeArgs {
    input: PathBuf,
    config: Option<PathBuf>,
    auto: bool,
    dimensions: Vec<String>,
    measure: Option<String>,
    aggregation: String,
    date_column: String,
    reference_date: Option<String>,
    output: Option<PathBuf>,
    format: String,
    markdown: bool,
}

fn analyze(args: AnalyzeArgs) -> Result<(), Box<dyn Error>> {
    let aggregation: Aggregation = args.aggregation.parse()?;
    let format: ExportFormat = args.format.parse()?;
    let explicit_reference = args
        .reference_date
        .as_deref()
        .map(parse_date)
        .transpose()?;

    println!("\n╔══════════════════════════════════════════════════════════════╗");
    println!("║{:^62}║", "TEMPO GROWTH ANALYSIS");
    println!("╚══════════════════════════════════════════════════════════════╝\n");

    print!("Loading {}...", args.input.display());
    std::io::Write::flush(&mut std::io::stdout())?;
    let options = LoadOptions::new(args.date_column);
    let dataset = match load_csv(&args.input, &options) {
        Ok(dataset) => {
            println!(" ✓ ({} rows)", dataset.frame.height());
            dataset
        }
        Err(e) => {
            println!(" ✗");
            return Err(e.into());
        }
    };
    println!("  Dimensions: {}", dataset.dimensions.join(", "));
    println!("  Measures:   {}", dataset.measures.join(", "));

    let configs = build_configs(
        &dataset,
        args.config.as_deref(),
        args.auto,
        &args.dimensions,
        args.measure.as_deref(),
        aggregation,
    )?;

    let reference = match explicit_reference {
        Some(date) => date,
        None => latest_date(&dataset.frame, &dataset.date_column)?,
    };
    let periods = resolve_periods(reference)?;
    println!(
        "\nReference date {} (current period {} to {})",
        reference, periods.current.start, periods.current.end
    );
    let aligned = align_periods(&dataset.frame, &dataset.date_column, &periods)?;

    let pb = ProgressBar::new(configs.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .expect("valid template")
            .progress_chars("█▓░"),
    );
    pb.enable_steady_tick(Duration::from_millis(100));

    let mut tables = Vec::with_capacity(configs.len());
    let mut failures = Vec::new();
    for config in &configs {
        pb.set_message(config.name.clone());
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
        pb.inc(1);
    }
    pb.finish_with_message(format!(
        "{} analyses completed, {} failed",
        tables.len(),
        failures.len()
    ));

    let summary = summarize(&tables);
    let results = AnalysisResults {
        periods,
        tables,
        summary,
        failures,
    };

    if let Some(directory) = &args.output {
        let written = export_results(&results, directory, format)?;
        println!("Exported {} files to {}", written.len(), directory.display());
    }

    let stem = args
        .input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("dataset");
    let report = Report::from_results(format!("Growth analysis: {}", stem), results);

    if args.markdown {
        println!("{}", report.to_markdown());
    } else {
        println!("{}", report.to_ascii_table());
    }

    Ok(())
}

fn build_configs(
    dataset: &Dataset,
    config: Option<&Path>,
    auto: bool,
    dimensions: &[String],
    measure: Option<&str>,
    aggregation: Aggregation,
) -> Result<Vec<AnalysisConfig>, Box<dyn Error>> {
    if let Some(path) = config {
        let file = File::open(path)?;
        let configs: Vec<AnalysisConfig> = serde_json::from_reader(file)?;
        if configs.is_empty() {
            return Err("configuration file contains no analyses".into());
        }
        println!("  Analyses:   {} (from {})", configs.len(), path.display());
        return Ok(configs);
    }

    if !dimensions.is_empty() {
        let measure = match measure {
            Some(column) => column.to_string(),
            None => dataset
                .measures
                .first()
                .cloned()
                .ok_or("dataset has no numeric measure columns")?,
        };
        let name = format!("by_{}", dimensions.join("_"));
        println!("  Analyses:   1 (ad-hoc {})", name);
        return Ok(vec![AnalysisConfig::new(
            name,
            dimensions.to_vec(),
            measure,
            aggregation,
        )]);
    }

    if !auto {
        println!("  No analyses specified; deriving them from the detected schema");
    }
    let configs = auto_configs(dataset, measure, aggregation)?;
    println!("  Analyses:   {} (auto-derived)", configs.len());
    Ok(configs)
}

fn inspect(input: &Path, date_column: &str) -> Result<(), Box<dyn Error>> {
    let dataset = load_csv(input, &LoadOptions::new(date_column))?;

    println!("\nDataset: {}", input.display());
    println!("  Rows:       {}", dataset.frame.height());
    println!("  Date column: {}", dataset.date_column);
    println!(
        "  Dimensions: {}",
        if dataset.dimensions.is_empty() {
            "(none)".to_string()
        } else {
            dataset.dimensions.join(", ")
        }
    );
    println!(
        "  Measures:   {}",
        if dataset.measures.is_empty() {
            "(none)".to_string()
        } else {
            dataset.measures.join(", ")
        }
    );
    match latest_date(&dataset.frame, &dataset.date_column) {
        Ok(date) => println!("  Latest date: {}", date),
        Err(_) => println!("  Latest date: (no parseable dates)"),
    }

    Ok(())
}

fn demo(
    output: &Path,
    rows: usize,
    reference_date: Option<&str>,
    seed: Option<u64>,
) -> Result<(), Box<dyn Error>> {
    let reference = match reference_date {
        Some(raw) => parse_date(raw)?,
        None => chrono::Utc::now().date_naive(),
    };
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    std::fs::create_dir_all(output)?;
    let data_path = output.join("sample.csv");
    write_sample_csv(&data_path, reference, rows, &mut rng)?;

    let configs = vec![
        AnalysisConfig::new(
            "by_region",
            vec!["region".to_string()],
            "sales",
            Aggregation::Sum,
        ),
        AnalysisConfig::new(
            "by_channel",
            vec!["channel".to_string()],
            "sales",
            Aggregation::Sum,
        ),
        AnalysisConfig::new(
            "by_product",
            vec!["product".to_string()],
            "sales",
            Aggregation::Mean,
        ),
        AnalysisConfig::new(
            "by_region_channel",
            vec!["region".to_string(), "channel".to_string()],
            "sales",
            Aggregation::Sum,
        ),
    ];
    let config_path = output.join("analyses.json");
    serde_json::to_writer_pretty(File::create(&config_path)?, &configs)?;

    println!("Wrote {}", data_path.display());
    println!("Wrote {}", config_path.display());
    println!("\nTry:");
    println!(
        "  tempo analyze --input {} --config {} --reference-date {}",
        data_path.display(),
        config_path.display(),
        reference.format("%Y-%m-%d")
    );

    Ok(())
}

fn parse_date(raw: &str) -> Result<NaiveDate, Box<dyn Error>> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| format!("invalid date {raw:?}, expected YYYY-MM-DD").into())
}
