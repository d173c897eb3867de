//! Inspect command - show file metadata and a shape summary.

use std::path::PathBuf;

use colored::Colorize;
use serde::Serialize;
use tabprep::input::{RowLabels, TableShape};
use tabprep::{LoadOptions, SourceMetadata, load_path};

/// JSON view of an inspected file.
#[derive(Serialize)]
struct Inspection<'a> {
    source: &'a SourceMetadata,
    shape: Option<&'a TableShape>,
    #[serde(skip_serializing_if = "Option::is_none")]
    numeric_columns: Option<Vec<&'a str>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    vector_len: Option<usize>,
}

pub fn run(
    file: PathBuf,
    json_output: bool,
    alternate_forms: bool,
    _verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if !file.exists() {
        return Err(format!("Data file not found: {}", file.display()).into());
    }

    let options = LoadOptions::new().with_alternate_forms(alternate_forms);
    let loaded = load_path(&file, &options)?;

    if json_output {
        let inspection = Inspection {
            source: &loaded.source,
            shape: loaded.shape.as_ref(),
            numeric_columns: loaded.numeric.as_ref().map(|t| t.column_names()),
            vector_len: loaded.vector.as_ref().map(Vec::len),
        };
        println!("{}", serde_json::to_string_pretty(&inspection)?);
        return Ok(());
    }

    let source = &loaded.source;
    println!("{} {}", "File:".cyan().bold(), source.file.white());
    println!("  Format:   {} ({})", source.format, source.encoding);
    println!("  Size:     {} bytes", source.size_bytes);
    println!("  Hash:     {}", source.hash.dimmed());
    println!("  Loaded:   {}", source.loaded_at.format("%Y-%m-%d %H:%M:%S UTC"));
    println!();

    if let Some(shape) = &loaded.shape {
        println!(
            "{} {} rows × {} columns",
            "Shape:".yellow().bold(),
            shape.row_count.to_string().white().bold(),
            shape.column_count.to_string().white().bold()
        );
        match &shape.rows {
            RowLabels::Listed { labels } if !labels.is_empty() => {
                let first = labels.first().copied().unwrap_or_default();
                let last = labels.last().copied().unwrap_or_default();
                println!("  Rows:     {}..={}", first, last);
            }
            RowLabels::Listed { .. } => println!("  Rows:     (none)"),
            RowLabels::Truncated { limit } => {
                println!("  Rows:     more than {} (labels not listed)", limit)
            }
        }
        println!();

        println!("{}", "Columns:".yellow().bold());
        let width = shape.columns.iter().map(|c| c.name.len()).max().unwrap_or(0);
        for column in &shape.columns {
            let nulls = if column.null_count > 0 {
                format!("{} missing", column.null_count).red().to_string()
            } else {
                "complete".green().to_string()
            };
            println!(
                "  {:width$}  {:11}  {}",
                column.name,
                column.dtype.to_string(),
                nulls,
                width = width
            );
        }
    }

    if let (Some(numeric), Some(vector)) = (&loaded.numeric, &loaded.vector) {
        println!();
        println!("{}", "Alternate forms:".yellow().bold());
        println!("  Numeric columns: {}", numeric.column_names().join(", "));
        println!("  Flattened values: {}", vector.len());
    }

    Ok(())
}
