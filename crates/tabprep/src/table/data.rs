//! In-memory table.

use indexmap::IndexMap;

use crate::error::{Result, TabprepError};

use super::column::Column;
use super::value::Value;

/// An ordered collection of named, equally long columns plus a row index.
///
/// Column order is insertion order. The row index holds the row labels;
/// dropping rows keeps the labels of the surviving rows until
/// [`DataTable::reset_index`] renumbers them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataTable {
    columns: IndexMap<String, Column>,
    index: Vec<usize>,
}

impl DataTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from named columns.
    pub fn from_columns<I, S>(columns: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, Column)>,
        S: Into<String>,
    {
        let mut table = Self::new();
        for (name, column) in columns {
            let name = name.into();
            if table.columns.contains_key(&name) {
                return Err(TabprepError::Config(format!("Duplicate column '{}'", name)));
            }
            table.set_column(name, column)?;
        }
        Ok(table)
    }

    /// Insert a column, or replace an existing column of the same name in
    /// place. Returns the replaced column, if any.
    pub fn set_column(&mut self, name: impl Into<String>, column: Column) -> Result<Option<Column>> {
        let name = name.into();

        if self.columns.is_empty() && self.index.is_empty() {
            self.index = (0..column.len()).collect();
        } else if column.len() != self.row_count() {
            return Err(TabprepError::LengthMismatch {
                column: name,
                expected: self.row_count(),
                actual: column.len(),
            });
        }

        Ok(self.columns.insert(name, column))
    }

    /// Get the number of columns.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Get the number of rows.
    pub fn row_count(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Column names in order.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.keys().map(|k| k.as_str()).collect()
    }

    /// Iterate over (name, column) pairs in order.
    pub fn columns(&self) -> impl Iterator<Item = (&str, &Column)> {
        self.columns.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Check whether a column exists.
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    /// Get a column by name.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.get(name)
    }

    /// Get a mutable column by name.
    pub fn column_mut(&mut self, name: &str) -> Option<&mut Column> {
        self.columns.get_mut(name)
    }

    /// Position of a column.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.get_index_of(name)
    }

    /// Get a specific cell value.
    pub fn get(&self, row: usize, column: &str) -> Option<&Value> {
        self.columns.get(column).and_then(|c| c.get(row))
    }

    /// Row labels.
    pub fn index(&self) -> &[usize] {
        &self.index
    }

    /// Renumber row labels as `0..row_count`.
    pub fn reset_index(&mut self) {
        self.index = (0..self.index.len()).collect();
    }

    /// Remove a column, keeping the order of the others.
    pub fn drop_column(&mut self, name: &str) -> Option<Column> {
        self.columns.shift_remove(name)
    }

    /// Keep only rows where `mask` is true. Returns the number of rows removed.
    pub fn retain_rows(&mut self, mask: &[bool]) -> usize {
        let before = self.row_count();

        for column in self.columns.values_mut() {
            column.retain_mask(mask);
        }
        let mut keep = mask.iter();
        self.index.retain(|_| keep.next().copied().unwrap_or(true));

        before - self.row_count()
    }

    /// Sub-table holding only the numeric columns, with the same row index.
    pub fn numeric_only(&self) -> DataTable {
        DataTable {
            columns: self
                .columns
                .iter()
                .filter(|(_, c)| c.is_numeric())
                .map(|(k, c)| (k.clone(), c.clone()))
                .collect(),
            index: self.index.clone(),
        }
    }

    /// Numeric values flattened row-major; missing cells become NaN.
    pub fn flatten_numeric(&self) -> Vec<f64> {
        let numeric: Vec<&Column> = self.columns.values().filter(|c| c.is_numeric()).collect();
        let mut flat = Vec::with_capacity(numeric.len() * self.row_count());

        for row in 0..self.row_count() {
            for column in &numeric {
                flat.push(column.get(row).and_then(Value::as_f64).unwrap_or(f64::NAN));
            }
        }

        flat
    }

    /// Check if a raw string represents a missing/null value.
    pub fn is_null_value(value: &str) -> bool {
        let trimmed = value.trim();
        trimmed.is_empty()
            || trimmed.eq_ignore_ascii_case("na")
            || trimmed.eq_ignore_ascii_case("n/a")
            || trimmed.eq_ignore_ascii_case("#n/a")
            || trimmed.eq_ignore_ascii_case("nan")
            || trimmed.eq_ignore_ascii_case("-nan")
            || trimmed.eq_ignore_ascii_case("null")
            || trimmed.eq_ignore_ascii_case("none")
            || trimmed == "<NA>"
    }
}
