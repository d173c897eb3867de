//! Error types for the tabprep library.

use std::path::PathBuf;
use thiserror::Error;

use crate::table::ColumnType;

/// Everything that can go wrong while loading, preprocessing, reshaping or
/// writing a table.
#[derive(Debug, Error)]
pub enum TabprepError {
    #[error("Cannot access '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed delimited input. `row` 0 is the header.
    #[error("Malformed input at row {row}, field {column}: {message}")]
    Parse {
        row: usize,
        column: usize,
        message: String,
    },

    #[error("Delimited read/write failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The input has no columns or no data rows.
    #[error("Nothing to load: {0}")]
    EmptyData(String),

    /// File kind the loader or writer does not handle (spreadsheets, unknown
    /// extensions).
    #[error("Unsupported file type: {0}")]
    UnsupportedFormat(String),

    /// Bad policy, drop strategy or coercion shape.
    #[error("Invalid preprocessing configuration: {0}")]
    Config(String),

    #[error("Column '{0}' not found")]
    ColumnNotFound(String),

    /// A column does not have as many values as the table has rows.
    #[error("Column '{column}' has {actual} values, expected {expected}")]
    LengthMismatch {
        column: String,
        expected: usize,
        actual: usize,
    },

    /// A cell could not be cast to the requested type.
    #[error("Cannot convert '{value}' at row {row} of column '{column}' to {target}")]
    TypeConversion {
        column: String,
        row: usize,
        value: String,
        target: ColumnType,
    },

    /// A sign or zero test was requested on a non-numeric column.
    #[error("Column '{column}' has type {dtype}, {operation} requires a numeric column")]
    TypeMismatch {
        column: String,
        dtype: ColumnType,
        operation: String,
    },
}

pub type Result<T> = std::result::Result<T, TabprepError>;
