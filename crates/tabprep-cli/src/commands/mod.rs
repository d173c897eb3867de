//! CLI command implementations.

pub mod inspect;
pub mod melt;
pub mod preprocess;

use std::path::{Path, PathBuf};

use tabprep::OutputFormat;

/// Default output path: `<stem>_<command>.<format>` next to the input.
pub(crate) fn default_output(input: &Path, command: &str, format: OutputFormat) -> PathBuf {
    let stem = input.file_stem().unwrap_or_default().to_string_lossy();
    input.with_file_name(format!("{}_{}.{}", stem, command, format.extension()))
}
