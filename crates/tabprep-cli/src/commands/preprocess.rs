//! Preprocess command - apply value policies and write the result.

use colored::Colorize;
use tabprep::preprocess::PhaseAction;
use tabprep::{LoadOptions, PreprocessConfig, Preprocessor, WriteOptions, Writer, load_path};

use crate::cli::PreprocessArgs;

use super::default_output;

pub fn run(args: PreprocessArgs, verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    if !args.file.exists() {
        return Err(format!("Data file not found: {}", args.file.display()).into());
    }

    let config = build_config(&args)?;
    if config.columns.is_empty() {
        return Err("No columns to process. Use --columns or a config file.".into());
    }
    let preprocessor = Preprocessor::new(config)?;

    println!(
        "{} {}",
        "Preprocessing".cyan().bold(),
        args.file.display().to_string().white()
    );

    let mut loaded = load_path(&args.file, &LoadOptions::new().with_shape(false))?;
    let report = preprocessor.apply(&mut loaded.table)?;

    if verbose {
        let config = preprocessor.config();
        println!(
            "  Policies: missing={} negative={} zero={} drop={}",
            config.missing, config.negative, config.zero, config.drop_strategy
        );
    }

    for coerced in &report.coerced_columns {
        println!(
            "  {} '{}' {} → {}",
            "Coerced".blue(),
            coerced.column,
            coerced.from,
            coerced.to
        );
    }
    for change in &report.changes {
        let label = match change.action {
            PhaseAction::RowsDropped | PhaseAction::ColumnDropped => "Dropped".red(),
            PhaseAction::ValuesNulled => "Nulled".yellow(),
            PhaseAction::Replaced | PhaseAction::Absolute => "Changed".green(),
        };
        println!("  {} {}", label, change.description);
    }
    for column in &report.skipped_columns {
        println!(
            "  {} column '{}' not found, skipped",
            "Warning:".yellow().bold(),
            column
        );
    }
    if report.is_noop() && report.skipped_columns.is_empty() {
        println!("  No values needed changes.");
    }

    let output_path = args
        .output
        .clone()
        .unwrap_or_else(|| default_output(&args.file, "preprocess", args.format));

    let writer = Writer::with_options(WriteOptions {
        keep_header: true,
        keep_index: args.keep_index,
    });
    writer.write_file(&loaded.table, &output_path, args.format)?;

    println!();
    println!(
        "{} {} rows → {} rows, saved to {}",
        "Done:".green().bold(),
        report.rows_before,
        report.rows_after.to_string().white().bold(),
        output_path.display().to_string().cyan()
    );

    if args.report {
        println!();
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    Ok(())
}

/// Config file (if any) with command-line flags layered on top.
fn build_config(args: &PreprocessArgs) -> Result<PreprocessConfig, Box<dyn std::error::Error>> {
    let mut config = match &args.config {
        Some(path) => PreprocessConfig::load(path)?,
        None => PreprocessConfig::new(Vec::<String>::new()),
    };

    if !args.columns.is_empty() {
        config.columns = args.columns.clone();
    }
    if let Some(policy) = &args.missing {
        config.missing = policy.clone();
    }
    if let Some(policy) = &args.negative {
        config.negative = policy.clone();
    }
    if let Some(policy) = &args.zero {
        config.zero = policy.clone();
    }
    if let Some(strategy) = args.drop_strategy {
        config.drop_strategy = strategy;
    }
    if let Some(coercion) = &args.force_type {
        config.force_type = Some(coercion.clone());
    }
    if args.no_reset_index {
        config.reset_index = false;
    }

    Ok(config)
}
