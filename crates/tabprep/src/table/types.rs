//! Column type definitions.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Declared data type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum ColumnType {
    /// Whole numbers (no decimal point).
    Integer,
    /// Floating-point numbers.
    Float,
    /// Boolean values (true/false).
    Boolean,
    /// Free text values.
    String,
    /// Categorical labels.
    Categorical,
}

impl ColumnType {
    /// Returns true if this type is numeric.
    pub fn is_numeric(&self) -> bool {
        matches!(self, ColumnType::Integer | ColumnType::Float)
    }

    /// Returns true if values of this type are stored as text.
    pub fn is_textual(&self) -> bool {
        matches!(self, ColumnType::String | ColumnType::Categorical)
    }

    /// The narrowest type able to hold values of both `self` and `other`.
    pub fn promote(self, other: ColumnType) -> ColumnType {
        use ColumnType::*;

        match (self, other) {
            (a, b) if a == b => a,
            (Integer, Float) | (Float, Integer) => Float,
            (Integer, Boolean) | (Boolean, Integer) => Integer,
            (Categorical, String) => Categorical,
            _ => String,
        }
    }

    /// Canonical lowercase name.
    pub fn name(&self) -> &'static str {
        match self {
            ColumnType::Integer => "integer",
            ColumnType::Float => "float",
            ColumnType::Boolean => "boolean",
            ColumnType::String => "string",
            ColumnType::Categorical => "categorical",
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ColumnType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "int" | "integer" | "int64" | "i64" | "int32" | "i32" => Ok(ColumnType::Integer),
            "float" | "float64" | "f64" | "float32" | "f32" | "double" | "numeric" => {
                Ok(ColumnType::Float)
            }
            "bool" | "boolean" => Ok(ColumnType::Boolean),
            "str" | "string" | "text" | "object" => Ok(ColumnType::String),
            "category" | "categorical" => Ok(ColumnType::Categorical),
            _ => Err(format!(
                "Unknown column type: {}. Use int, float, bool, str, or category.",
                s
            )),
        }
    }
}

impl TryFrom<String> for ColumnType {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
