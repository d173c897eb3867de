//! Data source metadata and table shape summaries.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::table::{ColumnType, DataTable};

/// Row labels are listed in a [`TableShape`] only up to this many rows.
pub const MAX_LISTED_ROWS: usize = 100;

/// Provenance of a loaded table: which file, its digest and what was read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceMetadata {
    pub path: PathBuf,
    /// Final path component, e.g. `growth.tsv`.
    pub file: String,
    /// `file` without its extension.
    pub name: String,
    /// Lowercased, no leading dot.
    pub extension: String,
    /// `sha256:` followed by the hex digest of the raw bytes.
    pub hash: String,
    pub size_bytes: u64,
    /// Delimiter family the bytes were read as.
    pub format: String,
    pub encoding: String,
    pub row_count: usize,
    pub column_count: usize,
    pub loaded_at: DateTime<Utc>,
}

impl SourceMetadata {
    /// Describe `table`, read as `format` from the raw `contents` of `path`.
    pub fn describe(path: &Path, contents: &[u8], format: &str, table: &DataTable) -> Self {
        let component = |part: Option<&OsStr>| {
            part.map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default()
        };

        Self {
            path: path.to_path_buf(),
            file: component(path.file_name()),
            name: component(path.file_stem()),
            extension: component(path.extension()).to_lowercase(),
            hash: format!("sha256:{:x}", Sha256::digest(contents)),
            size_bytes: contents.len() as u64,
            format: format.to_string(),
            encoding: "utf-8".to_string(),
            row_count: table.row_count(),
            column_count: table.column_count(),
            loaded_at: Utc::now(),
        }
    }
}

/// Row labels of a table, or a note that there were too many to list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RowLabels {
    Listed { labels: Vec<usize> },
    Truncated { limit: usize },
}

/// Summary of one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSummary {
    pub name: String,
    pub dtype: ColumnType,
    pub null_count: usize,
}

/// Shape of a table: row count and labels, column names and types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableShape {
    pub row_count: usize,
    pub rows: RowLabels,
    pub column_count: usize,
    pub columns: Vec<ColumnSummary>,
}

impl TableShape {
    /// Summarise a table.
    pub fn of(table: &DataTable) -> Self {
        let rows = if table.row_count() <= MAX_LISTED_ROWS {
            RowLabels::Listed {
                labels: table.index().to_vec(),
            }
        } else {
            RowLabels::Truncated {
                limit: MAX_LISTED_ROWS,
            }
        };

        let columns = table
            .columns()
            .map(|(name, col)| ColumnSummary {
                name: name.to_string(),
                dtype: col.dtype(),
                null_count: col.null_count(),
            })
            .collect();

        Self {
            row_count: table.row_count(),
            rows,
            column_count: table.column_count(),
            columns,
        }
    }
}
