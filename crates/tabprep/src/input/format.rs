//! Supported file formats.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TabprepError};

/// Tabular file formats known to the loader and writer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileFormat {
    /// Delimited text with an auto-detected delimiter.
    Txt,
    Csv,
    Tsv,
    Xlsx,
    Xls,
}

impl FileFormat {
    /// All recognised formats.
    pub const ALL: [FileFormat; 5] = [
        FileFormat::Txt,
        FileFormat::Csv,
        FileFormat::Tsv,
        FileFormat::Xlsx,
        FileFormat::Xls,
    ];

    /// Determine the format from a file extension.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().into_owned())
            .unwrap_or_default();

        ext.parse().map_err(|_| {
            TabprepError::UnsupportedFormat(format!(
                "'{}' must end in one of {}",
                path.display(),
                Self::supported_list()
            ))
        })
    }

    /// Fixed delimiter for this format, or None when it must be detected.
    pub fn delimiter(&self) -> Option<u8> {
        match self {
            FileFormat::Csv => Some(b','),
            FileFormat::Tsv => Some(b'\t'),
            _ => None,
        }
    }

    /// Returns true for spreadsheet formats, which cannot be read or written.
    pub fn is_spreadsheet(&self) -> bool {
        matches!(self, FileFormat::Xlsx | FileFormat::Xls)
    }

    pub fn extension(&self) -> &'static str {
        match self {
            FileFormat::Txt => "txt",
            FileFormat::Csv => "csv",
            FileFormat::Tsv => "tsv",
            FileFormat::Xlsx => "xlsx",
            FileFormat::Xls => "xls",
        }
    }

    /// Comma-separated list of supported extensions, for messages.
    pub fn supported_list() -> String {
        Self::ALL
            .iter()
            .map(|f| f.extension())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for FileFormat {
    type Err = TabprepError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().trim_start_matches('.').to_lowercase().as_str() {
            "txt" => Ok(FileFormat::Txt),
            "csv" => Ok(FileFormat::Csv),
            "tsv" => Ok(FileFormat::Tsv),
            "xlsx" => Ok(FileFormat::Xlsx),
            "xls" => Ok(FileFormat::Xls),
            _ => Err(TabprepError::Config(format!(
                "Format '{}' is invalid, try one of: {}",
                s,
                Self::supported_list()
            ))),
        }
    }
}
