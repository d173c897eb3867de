//! Cell values.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::data::DataTable;
use super::types::ColumnType;

/// Floats whose truncation lies in this range convert to `i64` exactly.
const I64_RANGE: std::ops::Range<f64> = i64::MIN as f64..i64::MAX as f64;

/// A single table cell.
///
/// Serialises untagged, so `Missing` is `null` and the others are plain
/// JSON scalars. A float NaN is treated as missing everywhere.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Missing-value marker.
    #[default]
    Missing,
    Int(i64),
    Float(f64),
    Bool(bool),
    Text(String),
}

impl Value {
    /// Check whether this is the missing-value marker.
    pub fn is_missing(&self) -> bool {
        match self {
            Value::Missing => true,
            Value::Float(f) => f.is_nan(),
            _ => false,
        }
    }

    /// The column type this value belongs to (None for missing).
    pub fn dtype(&self) -> Option<ColumnType> {
        match self {
            _ if self.is_missing() => None,
            Value::Int(_) => Some(ColumnType::Integer),
            Value::Float(_) => Some(ColumnType::Float),
            Value::Bool(_) => Some(ColumnType::Boolean),
            Value::Text(_) => Some(ColumnType::String),
            Value::Missing => None,
        }
    }

    /// Numeric view of the value; None for missing and non-numeric values.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) if !f.is_nan() => Some(*f),
            _ => None,
        }
    }

    /// True for numeric values below zero.
    pub fn is_negative(&self) -> bool {
        self.as_f64().is_some_and(|v| v < 0.0)
    }

    /// True for numeric values equal to zero (including -0.0).
    pub fn is_zero(&self) -> bool {
        self.as_f64().is_some_and(|v| v == 0.0)
    }

    /// Absolute value for numeric values; everything else is returned as-is.
    ///
    /// `i64::MIN` has no integer absolute value and becomes a float.
    pub fn abs(&self) -> Value {
        match self {
            Value::Int(i) => match i.checked_abs() {
                Some(a) => Value::Int(a),
                None => Value::Float((*i as f64).abs()),
            },
            Value::Float(f) => Value::from(f.abs()),
            other => other.clone(),
        }
    }

    /// Convert to the given column type, or None if the value has no
    /// representation in it.
    ///
    /// Null-like text ("NA", "", "null", ...) becomes missing when
    /// converted to a numeric or boolean type.
    pub fn cast(&self, target: ColumnType) -> Option<Value> {
        if self.is_missing() {
            return Some(Value::Missing);
        }

        if target.is_textual() {
            return Some(Value::Text(self.to_string()));
        }

        match (self, target) {
            (Value::Text(s), _) if DataTable::is_null_value(s) => Some(Value::Missing),
            (Value::Int(i), ColumnType::Integer) => Some(Value::Int(*i)),
            (Value::Int(i), ColumnType::Float) => Some(Value::Float(*i as f64)),
            (Value::Int(i), ColumnType::Boolean) => Some(Value::Bool(*i != 0)),
            (Value::Float(f), ColumnType::Integer) => {
                let t = f.trunc();
                I64_RANGE.contains(&t).then(|| Value::Int(t as i64))
            }
            (Value::Float(f), ColumnType::Float) => Some(Value::Float(*f)),
            (Value::Float(f), ColumnType::Boolean) => Some(Value::Bool(*f != 0.0)),
            (Value::Bool(b), ColumnType::Integer) => Some(Value::Int(*b as i64)),
            (Value::Bool(b), ColumnType::Float) => Some(Value::Float(*b as i64 as f64)),
            (Value::Bool(b), ColumnType::Boolean) => Some(Value::Bool(*b)),
            (Value::Text(s), ColumnType::Integer) => s.trim().parse::<i64>().ok().map(Value::Int),
            (Value::Text(s), ColumnType::Float) => s.trim().parse::<f64>().ok().map(Value::from),
            (Value::Text(s), ColumnType::Boolean) => parse_bool(s).map(Value::Bool),
            _ => None,
        }
    }

    /// Parse a free-standing scalar: integer, then float, then boolean,
    /// otherwise text. Null-like tokens become missing.
    pub fn parse_scalar(raw: &str) -> Value {
        let trimmed = raw.trim();
        if DataTable::is_null_value(trimmed) {
            return Value::Missing;
        }
        if let Ok(i) = trimmed.parse::<i64>() {
            return Value::Int(i);
        }
        if let Ok(f) = trimmed.parse::<f64>() {
            return Value::from(f);
        }
        match trimmed.to_lowercase().as_str() {
            "true" => Value::Bool(true),
            "false" => Value::Bool(false),
            _ => Value::Text(trimmed.to_string()),
        }
    }
}

/// Interpret common boolean spellings.
pub(crate) fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "true" | "yes" | "1" | "t" | "y" => Some(true),
        "false" | "no" | "0" | "f" | "n" => Some(false),
        _ => None,
    }
}

/// Render a float so that whole numbers keep a trailing `.0`.
fn format_float(f: f64) -> String {
    if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15 {
        format!("{:.1}", f)
    } else {
        format!("{}", f)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            _ if self.is_missing() => Ok(()),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => f.write_str(&format_float(*x)),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Text(s) => f.write_str(s),
            Value::Missing => Ok(()),
        }
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(value.into())
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        if value.is_nan() {
            Value::Missing
        } else {
            Value::Float(value)
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Value::Missing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nan_is_missing() {
        assert_eq!(Value::from(f64::NAN), Value::Missing);
        assert!(Value::Float(f64::NAN).is_missing());
        assert!(!Value::Float(f64::NAN).is_zero());
    }

    #[test]
    fn test_sign_checks() {
        assert!(Value::Int(-3).is_negative());
        assert!(Value::Float(-0.0).is_zero());
        assert!(!Value::Float(-0.0).is_negative());
        assert!(!Value::Missing.is_negative());
        assert!(!Value::Text("-1".into()).is_negative());
    }

    #[test]
    fn test_cast_text_to_numbers() {
        assert_eq!(Value::from("42").cast(ColumnType::Integer), Some(Value::Int(42)));
        assert_eq!(Value::from(" 1.5 ").cast(ColumnType::Float), Some(Value::Float(1.5)));
        assert_eq!(Value::from("NA").cast(ColumnType::Float), Some(Value::Missing));
        assert_eq!(Value::from("abc").cast(ColumnType::Integer), None);
        assert_eq!(Value::from("1.5").cast(ColumnType::Integer), None);
    }

    #[test]
    fn test_cast_float_to_integer_truncates() {
        assert_eq!(Value::Float(2.9).cast(ColumnType::Integer), Some(Value::Int(2)));
        assert_eq!(Value::Float(-2.9).cast(ColumnType::Integer), Some(Value::Int(-2)));
        assert_eq!(Value::Float(f64::INFINITY).cast(ColumnType::Integer), None);
    }

    #[test]
    fn test_cast_float_out_of_integer_range() {
        assert_eq!(Value::Float(1e20).cast(ColumnType::Integer), None);
        assert_eq!(Value::Float(-1e30).cast(ColumnType::Integer), None);
        assert_eq!(Value::Float(9.2e18).cast(ColumnType::Integer), Some(Value::Int(9_200_000_000_000_000_000)));
        assert_eq!(
            Value::Float(i64::MIN as f64).cast(ColumnType::Integer),
            Some(Value::Int(i64::MIN))
        );
    }

    #[test]
    fn test_abs_of_smallest_integer_is_float() {
        assert_eq!(Value::Int(-7).abs(), Value::Int(7));
        assert_eq!(Value::Int(i64::MIN).abs(), Value::Float(9_223_372_036_854_775_808.0));
    }

    #[test]
    fn test_cast_to_text() {
        assert_eq!(Value::Float(3.0).cast(ColumnType::String), Some(Value::Text("3.0".into())));
        assert_eq!(Value::Int(7).cast(ColumnType::Categorical), Some(Value::Text("7".into())));
        assert_eq!(Value::Missing.cast(ColumnType::String), Some(Value::Missing));
    }

    #[test]
    fn test_parse_scalar() {
        assert_eq!(Value::parse_scalar("0"), Value::Int(0));
        assert_eq!(Value::parse_scalar("-0.5"), Value::Float(-0.5));
        assert_eq!(Value::parse_scalar("True"), Value::Bool(true));
        assert_eq!(Value::parse_scalar("NA"), Value::Missing);
        assert_eq!(Value::parse_scalar("unknown"), Value::Text("unknown".into()));
    }

    #[test]
    fn test_json_shapes() {
        let values: Vec<Value> = serde_json::from_str("[null, 0, 0.5, true, \"x\"]").unwrap();
        assert_eq!(
            values,
            vec![
                Value::Missing,
                Value::Int(0),
                Value::Float(0.5),
                Value::Bool(true),
                Value::Text("x".into())
            ]
        );
    }
}
