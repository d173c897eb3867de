//! Delimited text reader.
//!
//! Turns CSV/TSV/TXT bytes into a [`DataTable`]: the delimiter is sniffed
//! from the leading lines when not given, ragged rows are padded with
//! missing cells and each column gets the narrowest type its cells admit.

use std::path::Path;

use tracing::{debug, trace};

use super::source::SourceMetadata;
use crate::error::{Result, TabprepError};
use crate::table::{Column, ColumnType, DataTable, Value};

/// Candidate delimiters, in tie-break order.
const CANDIDATES: [u8; 4] = [b'\t', b',', b';', b'|'];

/// Lines inspected when sniffing the delimiter.
const SNIFF_LINES: usize = 10;

/// How delimited text is read.
#[derive(Debug, Clone)]
pub struct ParserConfig {
    /// Field separator; sniffed from the content when `None`.
    pub delimiter: Option<u8>,
    /// First record holds the column names.
    pub has_header: bool,
    /// Leading lines discarded before anything is read.
    pub skip_rows: usize,
    /// Stop after this many data rows.
    pub max_rows: Option<usize>,
    pub quote: u8,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            delimiter: None,
            has_header: true,
            skip_rows: 0,
            max_rows: None,
            quote: b'"',
        }
    }
}

impl ParserConfig {
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = Some(delimiter);
        self
    }

    pub fn with_header(mut self, has_header: bool) -> Self {
        self.has_header = has_header;
        self
    }

    pub fn with_skip_rows(mut self, rows: usize) -> Self {
        self.skip_rows = rows;
        self
    }

    pub fn with_max_rows(mut self, rows: usize) -> Self {
        self.max_rows = Some(rows);
        self
    }
}

/// Reads delimited text into typed tables.
#[derive(Debug, Clone, Default)]
pub struct Parser {
    config: ParserConfig,
}

impl Parser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ParserConfig) -> Self {
        Self { config }
    }

    /// Read a file from disk, returning the table and where it came from.
    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<(DataTable, SourceMetadata)> {
        let path = path.as_ref();
        let contents = std::fs::read(path).map_err(|source| TabprepError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let body = skip_lines(&contents, self.config.skip_rows);
        let delimiter = match self.config.delimiter {
            Some(delimiter) => delimiter,
            None => sniff_delimiter(body)?,
        };
        let table = self.parse_bytes(body, delimiter)?;
        let format = format_label(delimiter);

        debug!(
            path = %path.display(),
            rows = table.row_count(),
            columns = table.column_count(),
            format,
            "parsed delimited file"
        );

        let source = SourceMetadata::describe(path, &contents, format, &table);
        Ok((table, source))
    }

    /// Read in-memory text with a known delimiter.
    pub fn parse_bytes(&self, bytes: &[u8], delimiter: u8) -> Result<DataTable> {
        let mut records = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .quote(self.config.quote)
            .has_headers(false)
            .flexible(true)
            .from_reader(bytes)
            .into_records();

        let first = records
            .next()
            .transpose()?
            .ok_or_else(|| TabprepError::EmptyData("No data rows found".to_string()))?;

        let (names, mut rows) = if self.config.has_header {
            let names: Vec<String> = first.iter().map(|name| name.trim().to_string()).collect();
            (names, Vec::new())
        } else {
            let names = (1..=first.len()).map(placeholder_name).collect();
            (names, vec![first])
        };

        if names.iter().all(String::is_empty) {
            return Err(TabprepError::EmptyData("No columns found".to_string()));
        }

        let limit = self.config.max_rows.unwrap_or(usize::MAX);
        for record in records {
            if rows.len() >= limit {
                break;
            }
            rows.push(record?);
        }
        rows.truncate(limit);

        if rows.is_empty() {
            return Err(TabprepError::EmptyData("No data rows found".to_string()));
        }
        trace!(rows = rows.len(), columns = names.len(), "read records");

        let mut table = DataTable::new();
        for (position, name) in names.into_iter().enumerate() {
            let name = if name.is_empty() {
                placeholder_name(position + 1)
            } else {
                name
            };
            if table.has_column(&name) {
                return Err(TabprepError::Parse {
                    row: 0,
                    column: position,
                    message: format!("Duplicate column name '{}'", name),
                });
            }
            // Missing trailing fields read as empty, surplus fields are ignored.
            let cells: Vec<&str> = rows
                .iter()
                .map(|record| record.get(position).unwrap_or("").trim())
                .collect();
            table.set_column(name, infer_column(&cells))?;
        }

        Ok(table)
    }
}

fn placeholder_name(position: usize) -> String {
    format!("column_{}", position)
}

fn format_label(delimiter: u8) -> &'static str {
    match delimiter {
        b'\t' => "tsv",
        b',' => "csv",
        b';' => "csv-semicolon",
        b'|' => "psv",
        _ => "delimited",
    }
}

/// Narrowest type shared by every present cell.
fn infer_type(present: &[&str]) -> ColumnType {
    let all = |test: fn(&str) -> bool| present.iter().all(|cell| test(cell));

    if present.is_empty() {
        ColumnType::Float
    } else if all(|cell| cell.parse::<i64>().is_ok()) {
        ColumnType::Integer
    } else if all(|cell| cell.parse::<f64>().is_ok()) {
        ColumnType::Float
    } else if all(|cell| cell.eq_ignore_ascii_case("true") || cell.eq_ignore_ascii_case("false")) {
        ColumnType::Boolean
    } else {
        ColumnType::String
    }
}

/// Build a typed column from trimmed cells. Null markers become missing.
fn infer_column(cells: &[&str]) -> Column {
    let present: Vec<&str> = cells
        .iter()
        .copied()
        .filter(|cell| !DataTable::is_null_value(cell))
        .collect();
    let dtype = infer_type(&present);

    let values = cells.iter().map(|&cell| {
        if DataTable::is_null_value(cell) {
            return Value::Missing;
        }
        let text = Value::Text(cell.to_string());
        match dtype {
            ColumnType::String => text,
            _ => text.cast(dtype).unwrap_or(Value::Missing),
        }
    });

    Column::new(dtype, values.collect())
}

fn skip_lines(bytes: &[u8], count: usize) -> &[u8] {
    let mut rest = bytes;
    for _ in 0..count {
        match rest.iter().position(|&b| b == b'\n') {
            Some(end) => rest = &rest[end + 1..],
            None => return &[],
        }
    }
    rest
}

/// Pick the candidate that splits the leading lines most uniformly.
///
/// A candidate must occur on the first non-blank line. Candidates are
/// ranked by how many sampled lines agree with the first line's field
/// count, then by that count. Ties go to the earlier candidate, so tab
/// wins over comma. Text with no candidate at all reads as comma
/// separated (a single column).
fn sniff_delimiter(bytes: &[u8]) -> Result<u8> {
    let lines: Vec<&[u8]> = bytes
        .split(|&b| b == b'\n')
        .filter(|line| !line.trim_ascii().is_empty())
        .take(SNIFF_LINES)
        .collect();

    if lines.is_empty() {
        return Err(TabprepError::EmptyData("No lines to analyze".to_string()));
    }

    let mut best: Option<(u8, (usize, usize))> = None;
    for delimiter in CANDIDATES {
        let counts: Vec<usize> = lines
            .iter()
            .map(|line| unquoted_occurrences(line, delimiter))
            .collect();
        let expected = counts[0];
        if expected == 0 {
            continue;
        }
        let agreeing = counts.iter().filter(|&&count| count == expected).count();
        let rank = (agreeing, expected);

        if best.is_none_or(|(_, best_rank)| rank > best_rank) {
            best = Some((delimiter, rank));
        }
    }

    Ok(best.map_or(b',', |(delimiter, _)| delimiter))
}

/// Occurrences of `delimiter` outside double-quoted spans.
fn unquoted_occurrences(line: &[u8], delimiter: u8) -> usize {
    line.iter()
        .scan(false, |quoted, &b| {
            if b == b'"' {
                *quoted = !*quoted;
            }
            Some(b == delimiter && !*quoted)
        })
        .filter(|&hit| hit)
        .count()
}
