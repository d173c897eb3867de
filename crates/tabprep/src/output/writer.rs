//! Writing tables to delimited text and JSON.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{Result, TabprepError};
use crate::table::{DataTable, Value};

/// Output file format.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Tsv,
    Csv,
    /// Comma-separated, `.txt` extension.
    Txt,
    /// Array of row records.
    Json,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Tsv => "tsv",
            OutputFormat::Csv => "csv",
            OutputFormat::Txt => "txt",
            OutputFormat::Json => "json",
        }
    }

    fn delimiter(&self) -> Option<u8> {
        match self {
            OutputFormat::Tsv => Some(b'\t'),
            OutputFormat::Csv | OutputFormat::Txt => Some(b','),
            OutputFormat::Json => None,
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "tsv" => Ok(OutputFormat::Tsv),
            "csv" => Ok(OutputFormat::Csv),
            "txt" => Ok(OutputFormat::Txt),
            "json" => Ok(OutputFormat::Json),
            "xlsx" | "xls" => Err(format!("{} output is not supported. Use tsv, csv, txt, or json.", s)),
            _ => Err(format!("Unknown format: {}. Use tsv, csv, txt, or json.", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

/// Options for writing a table.
#[derive(Debug, Clone)]
pub struct WriteOptions {
    /// Write the header row (delimited formats only).
    pub keep_header: bool,
    /// Write the row index as the first column / an `index` field.
    pub keep_index: bool,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            keep_header: true,
            keep_index: false,
        }
    }
}

impl WriteOptions {
    pub fn with_header(mut self, keep: bool) -> Self {
        self.keep_header = keep;
        self
    }

    pub fn with_index(mut self, keep: bool) -> Self {
        self.keep_index = keep;
        self
    }
}

/// Serialises tables.
#[derive(Debug, Default)]
pub struct Writer {
    options: WriteOptions,
}

impl Writer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: WriteOptions) -> Self {
        Self { options }
    }

    /// Write a table to a file, creating the parent directory if needed.
    pub fn write_file(&self, table: &DataTable, path: impl AsRef<Path>, format: OutputFormat) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| TabprepError::Io {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
            }
        }

        let file = File::create(path).map_err(|e| TabprepError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        let mut writer = BufWriter::new(file);
        self.write_to(table, &mut writer, format)?;
        writer.flush().map_err(|e| TabprepError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        info!(
            path = %path.display(),
            rows = table.row_count(),
            format = %format,
            "wrote table"
        );

        Ok(())
    }

    /// Write a table to any writer.
    pub fn write_to<W: Write>(&self, table: &DataTable, writer: W, format: OutputFormat) -> Result<()> {
        match format.delimiter() {
            Some(delimiter) => self.write_delimited(table, writer, delimiter),
            None => self.write_json(table, writer),
        }
    }

    /// Render a table to a string.
    pub fn to_string(&self, table: &DataTable, format: OutputFormat) -> Result<String> {
        let mut buffer = Vec::new();
        self.write_to(table, &mut buffer, format)?;
        String::from_utf8(buffer).map_err(|e| TabprepError::Parse {
            row: 0,
            column: 0,
            message: e.to_string(),
        })
    }

    fn write_delimited<W: Write>(&self, table: &DataTable, writer: W, delimiter: u8) -> Result<()> {
        let mut out = csv::WriterBuilder::new()
            .delimiter(delimiter)
            .from_writer(writer);

        if self.options.keep_header {
            let mut header: Vec<&str> = Vec::with_capacity(table.column_count() + 1);
            if self.options.keep_index {
                header.push("");
            }
            header.extend(table.column_names());
            out.write_record(&header)?;
        }

        for (row, label) in table.index().iter().enumerate() {
            let mut record: Vec<String> = Vec::with_capacity(table.column_count() + 1);
            if self.options.keep_index {
                record.push(label.to_string());
            }
            for (_, column) in table.columns() {
                record.push(column.get(row).map(Value::to_string).unwrap_or_default());
            }
            out.write_record(&record)?;
        }

        out.flush().map_err(|e| TabprepError::Csv(e.into()))?;
        Ok(())
    }

    fn write_json<W: Write>(&self, table: &DataTable, writer: W) -> Result<()> {
        let records: Vec<IndexMap<&str, serde_json::Value>> = table
            .index()
            .iter()
            .enumerate()
            .map(|(row, label)| {
                let mut record = IndexMap::new();
                if self.options.keep_index {
                    record.insert("index", serde_json::Value::from(*label));
                }
                for (name, column) in table.columns() {
                    let value = column
                        .get(row)
                        .map(json_value)
                        .unwrap_or(serde_json::Value::Null);
                    record.insert(name, value);
                }
                record
            })
            .collect();

        serde_json::to_writer_pretty(writer, &records)?;
        Ok(())
    }
}

fn json_value(value: &Value) -> serde_json::Value {
    if value.is_missing() {
        serde_json::Value::Null
    } else {
        serde_json::to_value(value).unwrap_or(serde_json::Value::Null)
    }
}
