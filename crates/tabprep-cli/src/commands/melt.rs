//! Melt command - reshape a wide data file to long format.

use std::path::PathBuf;

use colored::Colorize;
use tabprep::{LoadOptions, OutputFormat, Writer, load_path, wide_to_long};

use super::default_output;

pub fn run(
    file: PathBuf,
    id_vars: Vec<String>,
    var_name: String,
    value_name: String,
    output: Option<PathBuf>,
    format: OutputFormat,
    _verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if !file.exists() {
        return Err(format!("Data file not found: {}", file.display()).into());
    }

    let loaded = load_path(&file, &LoadOptions::new().with_shape(false))?;

    let ids: Vec<&str> = id_vars.iter().map(String::as_str).collect();
    let long = wide_to_long(&loaded.table, &ids, &var_name, &value_name)?;

    let output_path = output.unwrap_or_else(|| default_output(&file, "melt", format));
    Writer::new().write_file(&long, &output_path, format)?;

    println!(
        "{} {} columns × {} rows → {} rows",
        "Melted".cyan().bold(),
        loaded.table.column_count().saturating_sub(ids.len()).to_string().white().bold(),
        loaded.table.row_count(),
        long.row_count().to_string().white().bold()
    );
    println!("Saved to {}", output_path.display().to_string().cyan());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_melt_writes_long_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("wide.csv");
        fs::write(&input, "population,0 min,5 min\nA,1,2\nB,3,4\n").unwrap();

        run(
            input.clone(),
            vec!["population".to_string()],
            "time".to_string(),
            "count".to_string(),
            None,
            OutputFormat::Csv,
            false,
        )
        .unwrap();

        let written = fs::read_to_string(dir.path().join("wide_melt.csv")).unwrap();
        assert_eq!(
            written,
            "population,time,count\nA,0 min,1\nB,0 min,3\nA,5 min,2\nB,5 min,4\n"
        );
    }

    #[test]
    fn test_melt_unknown_id() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("wide.csv");
        fs::write(&input, "population,t0\nA,1\n").unwrap();

        let result = run(
            input,
            vec!["site".to_string()],
            "time".to_string(),
            "value".to_string(),
            None,
            OutputFormat::Tsv,
            false,
        );
        assert!(result.is_err());
    }
}
