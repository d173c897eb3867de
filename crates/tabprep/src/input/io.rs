//! Folder-based loading and saving of tables.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;

use super::format::FileFormat;
use super::parser::{Parser, ParserConfig};
use super::source::{SourceMetadata, TableShape};
use crate::error::{Result, TabprepError};
use crate::output::{OutputFormat, WriteOptions, Writer};
use crate::table::DataTable;

/// Default folder files are read from.
pub const DEFAULT_INPUT_DIR: &str = "Input";
/// Default folder files are written to.
pub const DEFAULT_OUTPUT_DIR: &str = "Output";

/// Options controlling how a file is loaded.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Read the file as this format regardless of its extension.
    pub force_format: Option<FileFormat>,
    /// Parser settings (header, skipped lines, row limit, quote).
    pub parser: ParserConfig,
    /// Attach a [`TableShape`] to the result.
    pub include_shape: bool,
    /// Attach the numeric-only table and its flattened values.
    pub alternate_forms: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            force_format: None,
            parser: ParserConfig::default(),
            include_shape: true,
            alternate_forms: false,
        }
    }
}

impl LoadOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Force the file format.
    pub fn with_format(mut self, format: FileFormat) -> Self {
        self.force_format = Some(format);
        self
    }

    /// Set parser options.
    pub fn with_parser(mut self, parser: ParserConfig) -> Self {
        self.parser = parser;
        self
    }

    /// Enable or disable the shape summary.
    pub fn with_shape(mut self, include: bool) -> Self {
        self.include_shape = include;
        self
    }

    /// Enable or disable alternate forms.
    pub fn with_alternate_forms(mut self, include: bool) -> Self {
        self.alternate_forms = include;
        self
    }
}

/// A loaded table together with what is known about its source.
#[derive(Debug, Clone, Serialize)]
pub struct LoadedTable {
    pub source: SourceMetadata,
    #[serde(skip)]
    pub table: DataTable,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shape: Option<TableShape>,
    /// Numeric columns only.
    #[serde(skip)]
    pub numeric: Option<DataTable>,
    /// Numeric values flattened row-major.
    #[serde(skip)]
    pub vector: Option<Vec<f64>>,
}

/// Reads tables from an input folder and writes them to an output folder.
#[derive(Debug, Clone)]
pub struct DataIo {
    input_dir: PathBuf,
    output_dir: PathBuf,
}

impl Default for DataIo {
    fn default() -> Self {
        Self::new(DEFAULT_INPUT_DIR, DEFAULT_OUTPUT_DIR)
    }
}

impl DataIo {
    /// Create with explicit input and output folders.
    pub fn new(input_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            input_dir: input_dir.into(),
            output_dir: output_dir.into(),
        }
    }

    /// Load `file_name` from the input folder.
    pub fn file_to_table(&self, file_name: &str, options: &LoadOptions) -> Result<LoadedTable> {
        load_path(self.input_dir.join(file_name), options)
    }

    /// Write a table to `<output_dir>/<file_name>.<format>`. Returns the path written.
    pub fn table_to_file(
        &self,
        table: &DataTable,
        file_name: &str,
        format: OutputFormat,
        options: &WriteOptions,
    ) -> Result<PathBuf> {
        let path = self
            .output_dir
            .join(format!("{}.{}", file_name, format.extension()));
        Writer::with_options(options.clone()).write_file(table, &path, format)?;
        Ok(path)
    }
}

/// Load a table from an explicit path.
pub fn load_path(path: impl AsRef<Path>, options: &LoadOptions) -> Result<LoadedTable> {
    let path = path.as_ref();

    let format = match options.force_format {
        Some(format) => format,
        None => FileFormat::from_path(path)?,
    };

    if format.is_spreadsheet() {
        return Err(TabprepError::UnsupportedFormat(format!(
            "{} files are not supported, export '{}' as csv or tsv",
            format,
            path.display()
        )));
    }

    let mut parser_config = options.parser.clone();
    if parser_config.delimiter.is_none() {
        parser_config.delimiter = format.delimiter();
    }

    let (table, source) = Parser::with_config(parser_config).parse_file(path)?;

    info!(
        file = %source.file,
        rows = source.row_count,
        columns = source.column_count,
        "loaded table"
    );

    let shape = options.include_shape.then(|| TableShape::of(&table));
    let (numeric, vector) = if options.alternate_forms {
        (Some(table.numeric_only()), Some(table.flatten_numeric()))
    } else {
        (None, None)
    };

    Ok(LoadedTable {
        source,
        table,
        shape,
        numeric,
        vector,
    })
}
