//! CLI argument definitions using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use tabprep::{DropStrategy, OutputFormat, TypeCoercion, ValuePolicy};

/// tabprep: value preprocessing for long-format tabular data
#[derive(Parser)]
#[command(name = "tabprep")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Apply missing/negative/zero value policies to columns of a data file
    Preprocess(PreprocessArgs),

    /// Reshape a wide data file to long format
    Melt {
        /// Path to the data file (CSV/TSV/TXT)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Identifier columns to keep (comma-separated)
        #[arg(long, value_delimiter = ',', required = true)]
        id_vars: Vec<String>,

        /// Name of the column holding the melted column names
        #[arg(long, default_value = "variable")]
        var_name: String,

        /// Name of the column holding the melted values
        #[arg(long, default_value = "value")]
        value_name: String,

        /// Output path (default: <stem>_melt.<format> next to the input)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(short, long, default_value = "tsv")]
        format: OutputFormat,
    },

    /// Show file metadata and a shape summary
    Inspect {
        /// Path to the data file (CSV/TSV/TXT)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,

        /// Include the numeric-only table and flattened values
        #[arg(long)]
        alternate_forms: bool,
    },
}

/// Arguments of the `preprocess` command. Flags override the config file.
#[derive(clap::Args)]
pub struct PreprocessArgs {
    /// Path to the data file (CSV/TSV/TXT)
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// JSON configuration file
    #[arg(long, value_name = "JSON")]
    pub config: Option<PathBuf>,

    /// Columns to process (comma-separated)
    #[arg(short, long, value_delimiter = ',')]
    pub columns: Vec<String>,

    /// Missing value policy: keep, drop, replace:V or V
    #[arg(long, value_name = "POLICY", allow_hyphen_values = true)]
    pub missing: Option<ValuePolicy>,

    /// Negative value policy: keep, drop, abs, replace:V or V
    #[arg(long, value_name = "POLICY", allow_hyphen_values = true)]
    pub negative: Option<ValuePolicy>,

    /// Zero value policy: keep, drop, replace:V or V
    #[arg(long, value_name = "POLICY", allow_hyphen_values = true)]
    pub zero: Option<ValuePolicy>,

    /// How dropped values are removed: row, column or value
    #[arg(long, value_name = "STRATEGY")]
    pub drop_strategy: Option<DropStrategy>,

    /// Type coercion: TYPE, TYPE,TYPE.. (by position) or COL=TYPE,..
    #[arg(long, value_name = "TYPES")]
    pub force_type: Option<TypeCoercion>,

    /// Keep the original row labels of surviving rows
    #[arg(long)]
    pub no_reset_index: bool,

    /// Output path (default: <stem>_preprocess.<format> next to the input)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, default_value = "tsv")]
    pub format: OutputFormat,

    /// Write the row index as the first column
    #[arg(long)]
    pub keep_index: bool,

    /// Print the preprocessing report as JSON
    #[arg(long)]
    pub report: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_preprocess_flags() {
        let cli = Cli::try_parse_from([
            "tabprep",
            "preprocess",
            "growth.tsv",
            "-c",
            "OD600,OD750",
            "--missing",
            "0",
            "--negative",
            "abs",
            "--zero",
            "drop",
            "--drop-strategy",
            "values",
            "--force-type",
            "float",
        ])
        .unwrap();

        let Commands::Preprocess(args) = cli.command else {
            panic!("expected preprocess");
        };
        assert_eq!(args.columns, vec!["OD600", "OD750"]);
        assert_eq!(args.missing, Some(ValuePolicy::replace(0)));
        assert_eq!(args.negative, Some(ValuePolicy::Abs));
        assert_eq!(args.drop_strategy, Some(DropStrategy::Value));
        assert_eq!(args.format, OutputFormat::Tsv);
    }

    #[test]
    fn test_negative_replacement_value() {
        let cli = Cli::try_parse_from(["tabprep", "preprocess", "x.csv", "-c", "X", "--zero", "-1"]).unwrap();

        let Commands::Preprocess(args) = cli.command else {
            panic!("expected preprocess");
        };
        assert_eq!(args.zero, Some(ValuePolicy::replace(-1)));
    }

    #[test]
    fn test_rejects_bad_strategy() {
        let result = Cli::try_parse_from(["tabprep", "preprocess", "x.csv", "--drop-strategy", "cells"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_melt() {
        let cli = Cli::try_parse_from([
            "tabprep",
            "melt",
            "wide.csv",
            "--id-vars",
            "population",
            "--var-name",
            "time",
            "-f",
            "csv",
        ])
        .unwrap();

        let Commands::Melt { id_vars, var_name, value_name, format, .. } = cli.command else {
            panic!("expected melt");
        };
        assert_eq!(id_vars, vec!["population"]);
        assert_eq!(var_name, "time");
        assert_eq!(value_name, "value");
        assert_eq!(format, OutputFormat::Csv);
    }
}
