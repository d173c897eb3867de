//! Example: Clean a measurement column in a tabular data file.
//!
//! Usage:
//!   cargo run --example preprocess -- <file_path> <column>
//!
//! Example:
//!   cargo run --example preprocess -- growth.tsv OD600

use std::env;
use std::path::Path;

use tabprep::{
    DropStrategy, LoadOptions, OutputFormat, PreprocessConfig, Preprocessor, ValuePolicy, Writer, load_path,
};

fn main() -> tabprep::Result<()> {
    let args: Vec<String> = env::args().collect();

    if args.len() < 3 {
        eprintln!("Usage: cargo run --example preprocess -- <file_path> <column>");
        eprintln!("\nExample:");
        eprintln!("  cargo run --example preprocess -- growth.tsv OD600");
        std::process::exit(1);
    }

    let path = Path::new(&args[1]);
    if !path.exists() {
        eprintln!("Error: File not found: {}", path.display());
        std::process::exit(1);
    }

    let loaded = load_path(path, &LoadOptions::default())?;

    let separator = "=".repeat(80);
    println!("{}", separator);
    println!("Preprocessing: {} ({})", loaded.source.file, loaded.source.format);
    println!("{}", separator);
    println!();

    // Missing readings become 0 and are kept; measured zeros and
    // negatives are blanked.
    let config = PreprocessConfig::new([args[2].as_str()])
        .with_missing(ValuePolicy::replace(0))
        .with_negative(ValuePolicy::Drop)
        .with_zero(ValuePolicy::Drop)
        .with_drop_strategy(DropStrategy::Value);

    let processed = Preprocessor::new(config)?.process(&loaded.table)?;

    println!("## Changes");
    for change in &processed.report.changes {
        println!("  [{}] {}", change.phase, change.description);
    }
    if processed.report.changes.is_empty() {
        println!("  (none)");
    }
    for column in &processed.report.skipped_columns {
        println!("  Column '{}' not found", column);
    }
    println!();

    println!("## Result");
    print!("{}", Writer::new().to_string(&processed.table, OutputFormat::Tsv)?);

    Ok(())
}
