//! Demonstration of sample data generation and loading.

use chrono::NaiveDate;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tempo_data::{LoadOptions, load_csv, write_sample_csv};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Tempo Sample Data Demo ===\n");

    let reference = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
    let path = std::env::temp_dir().join("tempo_sample_demo.csv");
    write_sample_csv(&path, reference, 12, &mut StdRng::seed_from_u64(42))?;
    println!("Wrote {}", path.display());

    let dataset = load_csv(&path, &LoadOptions::default())?;
    println!("Rows:       {}", dataset.frame.height());
    println!("Dimensions: {}", dataset.dimensions.join(", "));
    println!("Measures:   {}", dataset.measures.join(", "));

    Ok(())
}
