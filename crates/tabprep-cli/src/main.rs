//! tabprep CLI - value preprocessing for long-format tabular data.

mod cli;
mod commands;

use std::env;

use clap::Parser;
use cli::{Cli, Commands};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

fn main() {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Preprocess(args) => commands::preprocess::run(args, cli.verbose),

        Commands::Melt {
            file,
            id_vars,
            var_name,
            value_name,
            output,
            format,
        } => commands::melt::run(file, id_vars, var_name, value_name, output, format, cli.verbose),

        Commands::Inspect {
            file,
            json,
            alternate_forms,
        } => commands::inspect::run(file, json, alternate_forms, cli.verbose),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Log to stderr; `--verbose` forces debug, otherwise `RUST_LOG` or warn.
fn init_logging(verbose: bool) {
    let level = if verbose {
        Level::DEBUG
    } else {
        env::var("RUST_LOG")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(Level::WARN)
    };

    FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
