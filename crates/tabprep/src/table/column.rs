//! Typed column storage.

use crate::error::{Result, TabprepError};

use super::types::ColumnType;
use super::value::Value;

/// A typed sequence of cells.
///
/// Every non-missing value conforms to the declared type. Writing a value
/// of another type promotes the whole column (see [`ColumnType::promote`]).
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    dtype: ColumnType,
    values: Vec<Value>,
}

impl Column {
    /// Create a column, converting values to the declared type where needed.
    ///
    /// Values with no representation in `dtype` become missing; use
    /// [`Column::cast`] when conversion failures must be reported.
    pub fn new(dtype: ColumnType, values: Vec<Value>) -> Self {
        let values = values
            .into_iter()
            .map(|v| conform(v, dtype))
            .collect();
        Self { dtype, values }
    }

    /// Create a column whose type is inferred from its values.
    ///
    /// An all-missing column is typed as float.
    pub fn from_values(values: Vec<Value>) -> Self {
        let dtype = values
            .iter()
            .filter_map(Value::dtype)
            .reduce(ColumnType::promote)
            .unwrap_or(ColumnType::Float);
        Self::new(dtype, values)
    }

    /// Integer column; `None` entries are missing.
    pub fn integer<I>(values: I) -> Self
    where
        I: IntoIterator<Item = Option<i64>>,
    {
        Self {
            dtype: ColumnType::Integer,
            values: values.into_iter().map(Value::from).collect(),
        }
    }

    /// Float column; `None` and NaN entries are missing.
    pub fn float<I>(values: I) -> Self
    where
        I: IntoIterator<Item = Option<f64>>,
    {
        Self {
            dtype: ColumnType::Float,
            values: values.into_iter().map(Value::from).collect(),
        }
    }

    /// Boolean column; `None` entries are missing.
    pub fn boolean<I>(values: I) -> Self
    where
        I: IntoIterator<Item = Option<bool>>,
    {
        Self {
            dtype: ColumnType::Boolean,
            values: values.into_iter().map(Value::from).collect(),
        }
    }

    /// Text column; `None` entries are missing.
    pub fn string<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = Option<S>>,
        S: Into<String>,
    {
        Self {
            dtype: ColumnType::String,
            values: values
                .into_iter()
                .map(|v| v.map(|s| Value::Text(s.into())).unwrap_or(Value::Missing))
                .collect(),
        }
    }

    /// Categorical column of labels; `None` entries are missing.
    pub fn categorical<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = Option<S>>,
        S: Into<String>,
    {
        let mut column = Self::string(values);
        column.dtype = ColumnType::Categorical;
        column
    }

    /// Declared type.
    pub fn dtype(&self) -> ColumnType {
        self.dtype
    }

    /// All values in row order.
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Number of values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value at a position.
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    /// Returns true if the column type is numeric.
    pub fn is_numeric(&self) -> bool {
        self.dtype.is_numeric()
    }

    /// Number of missing values.
    pub fn null_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_missing()).count()
    }

    /// Convert the column to another type.
    ///
    /// Fails on the first value that cannot be represented in `target`;
    /// `name` is only used for the error message.
    pub fn cast(&self, name: &str, target: ColumnType) -> Result<Column> {
        let mut values = Vec::with_capacity(self.values.len());

        for (row, value) in self.values.iter().enumerate() {
            let converted = value.cast(target).ok_or_else(|| TabprepError::TypeConversion {
                column: name.to_string(),
                row,
                value: value.to_string(),
                target,
            })?;
            values.push(converted);
        }

        Ok(Column {
            dtype: target,
            values,
        })
    }

    /// Fill missing cells with `value`. Returns the number of cells filled.
    pub fn fill_missing(&mut self, value: &Value) -> usize {
        self.replace_where(Value::is_missing, value)
    }

    /// Replace every cell matching `predicate` with `value`.
    /// Returns the number of cells replaced.
    pub fn replace_where<F>(&mut self, predicate: F, value: &Value) -> usize
    where
        F: Fn(&Value) -> bool,
    {
        let targets: Vec<bool> = self.values.iter().map(predicate).collect();
        self.replace_masked(&targets, value)
    }

    /// Replace the cells at positions where `targets` is true.
    /// The column type is only widened when something is replaced.
    pub fn replace_masked(&mut self, targets: &[bool], value: &Value) -> usize {
        let count = targets.iter().take(self.values.len()).filter(|t| **t).count();
        if count == 0 {
            return 0;
        }

        self.make_room_for(value);
        let stored = conform(value.clone(), self.dtype);
        for (cell, _) in self.values.iter_mut().zip(targets).filter(|(_, t)| **t) {
            *cell = stored.clone();
        }

        count
    }

    /// Set the cells at positions where `targets` is true to missing.
    /// Cells that are already missing are not counted.
    pub fn null_masked(&mut self, targets: &[bool]) -> usize {
        let mut nulled = 0;
        for (cell, _) in self.values.iter_mut().zip(targets).filter(|(_, t)| **t) {
            if !cell.is_missing() {
                *cell = Value::Missing;
                nulled += 1;
            }
        }
        nulled
    }

    /// Replace numeric values by their absolute value.
    /// Returns the number of values that changed.
    ///
    /// An integer column holding `i64::MIN` becomes a float column.
    pub fn abs(&mut self) -> usize {
        if self.values.contains(&Value::Int(i64::MIN)) {
            self.make_room_for(&Value::Float(0.0));
        }

        let mut changed = 0;
        for value in self.values.iter_mut() {
            if value.is_negative() {
                *value = value.abs();
                changed += 1;
            }
        }
        changed
    }

    /// Keep only positions where `mask` is true.
    pub(crate) fn retain_mask(&mut self, mask: &[bool]) {
        let mut keep = mask.iter();
        self.values.retain(|_| keep.next().copied().unwrap_or(true));
    }

    /// Widen the column type so that `value` can be stored.
    fn make_room_for(&mut self, value: &Value) {
        let Some(incoming) = value.dtype() else {
            return;
        };

        let promoted = self.dtype.promote(incoming);
        if promoted != self.dtype {
            let values = std::mem::take(&mut self.values);
            self.values = values.into_iter().map(|v| conform(v, promoted)).collect();
            self.dtype = promoted;
        }
    }
}

/// Convert a value into `dtype`, falling back to missing.
fn conform(value: Value, dtype: ColumnType) -> Value {
    match value.dtype() {
        None => Value::Missing,
        Some(t) if t == dtype || (t == ColumnType::String && dtype.is_textual()) => value,
        Some(_) => value.cast(dtype).unwrap_or(Value::Missing),
    }
}
