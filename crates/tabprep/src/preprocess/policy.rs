//! Value policies, drop strategies and type coercion.

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use crate::error::{Result, TabprepError};
use crate::table::{ColumnType, DataTable, Value};

/// What to do with cells of one kind (missing, negative or zero).
///
/// In JSON a policy is `"Keep"`, `"Drop"`, `"Abs"`, `{"Replace": v}` or a
/// bare scalar `v`. A bare scalar means exactly the same as
/// `{"Replace": v}`; any string other than the three tags is a bare text
/// scalar.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(from = "RawPolicy")]
pub enum ValuePolicy {
    /// Leave the cells alone.
    #[default]
    Keep,
    /// Remove the cells according to the [`DropStrategy`].
    Drop,
    /// Substitute a fixed value.
    Replace(Value),
    /// Replace values with their absolute value (negative policy only).
    Abs,
}

impl ValuePolicy {
    /// Shorthand for `ValuePolicy::Replace(value.into())`.
    pub fn replace(value: impl Into<Value>) -> Self {
        ValuePolicy::Replace(value.into())
    }

    pub fn is_keep(&self) -> bool {
        matches!(self, ValuePolicy::Keep)
    }

    /// True for `Replace(0)` (integer or float zero).
    pub fn replaces_with_zero(&self) -> bool {
        matches!(self, ValuePolicy::Replace(v) if v.is_zero())
    }
}

impl fmt::Display for ValuePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValuePolicy::Keep => f.write_str("keep"),
            ValuePolicy::Drop => f.write_str("drop"),
            ValuePolicy::Abs => f.write_str("abs"),
            ValuePolicy::Replace(Value::Missing) => f.write_str("replace:NA"),
            ValuePolicy::Replace(v) => write!(f, "replace:{}", v),
        }
    }
}

/// Parses `keep`, `drop`, `abs`, `replace:V` / `replace=V`, or a bare scalar.
impl FromStr for ValuePolicy {
    type Err = TabprepError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(TabprepError::Config("Empty value policy".to_string()));
        }

        let lower = trimmed.to_lowercase();
        let policy = match lower.as_str() {
            "keep" => ValuePolicy::Keep,
            "drop" => ValuePolicy::Drop,
            "abs" => ValuePolicy::Abs,
            _ => match lower
                .strip_prefix("replace:")
                .or_else(|| lower.strip_prefix("replace="))
            {
                Some(_) => ValuePolicy::Replace(Value::parse_scalar(&trimmed["replace:".len()..])),
                None => ValuePolicy::Replace(Value::parse_scalar(trimmed)),
            },
        };

        Ok(policy)
    }
}

impl Serialize for ValuePolicy {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            ValuePolicy::Keep => serializer.serialize_str("Keep"),
            ValuePolicy::Drop => serializer.serialize_str("Drop"),
            ValuePolicy::Abs => serializer.serialize_str("Abs"),
            ValuePolicy::Replace(value) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("Replace", value)?;
                map.end()
            }
        }
    }
}

/// The accepted JSON shapes of a policy.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawPolicy {
    Tag(String),
    Tagged(ReplaceSpec),
    Scalar(Value),
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct ReplaceSpec {
    #[serde(rename = "Replace", alias = "replace")]
    replace: Value,
}

impl From<RawPolicy> for ValuePolicy {
    fn from(raw: RawPolicy) -> Self {
        match raw {
            RawPolicy::Tag(tag) => match tag.trim().to_lowercase().as_str() {
                "keep" => ValuePolicy::Keep,
                "drop" => ValuePolicy::Drop,
                "abs" => ValuePolicy::Abs,
                _ => ValuePolicy::Replace(Value::Text(tag)),
            },
            RawPolicy::Tagged(spec) => ValuePolicy::Replace(spec.replace),
            RawPolicy::Scalar(value) => ValuePolicy::Replace(value),
        }
    }
}

/// How offending cells are removed when a policy is `Drop`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum DropStrategy {
    /// Delete the whole row.
    #[default]
    Row,
    /// Delete the whole column.
    Column,
    /// Set just the offending cell to missing.
    Value,
}

impl fmt::Display for DropStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DropStrategy::Row => f.write_str("row"),
            DropStrategy::Column => f.write_str("column"),
            DropStrategy::Value => f.write_str("value"),
        }
    }
}

/// Case-insensitive; a trailing plural `s` is ignored and `col` means column.
impl FromStr for DropStrategy {
    type Err = TabprepError;

    fn from_str(s: &str) -> Result<Self> {
        let lower = s.trim().to_lowercase();
        match lower.trim_end_matches('s') {
            "row" => Ok(DropStrategy::Row),
            "col" | "column" => Ok(DropStrategy::Column),
            "value" => Ok(DropStrategy::Value),
            _ => Err(TabprepError::Config(format!(
                "Unknown drop strategy: {}. Use row, column, or value.",
                s
            ))),
        }
    }
}

impl TryFrom<String> for DropStrategy {
    type Error = TabprepError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

/// Requested column type conversions, applied before any value policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TypeCoercion {
    /// One type for every designated column present in the table.
    Single(ColumnType),
    /// One type per designated column, by position.
    PerColumn(Vec<ColumnType>),
    /// Types by column name; names absent from the table are ignored.
    ByName(IndexMap<String, ColumnType>),
}

impl TypeCoercion {
    /// Check the coercion shape against the designated columns.
    pub fn validate(&self, columns: &[String]) -> Result<()> {
        match self {
            TypeCoercion::PerColumn(types) if types.len() != columns.len() => {
                Err(TabprepError::Config(format!(
                    "force_type lists {} type(s) for {} column(s)",
                    types.len(),
                    columns.len()
                )))
            }
            _ => Ok(()),
        }
    }

    /// Resolve to the (column, type) pairs to convert in `table`.
    ///
    /// A positional entry naming a column that is not in the table is an
    /// error; single and by-name coercions skip absent columns.
    pub fn resolve(&self, columns: &[String], table: &DataTable) -> Result<Vec<(String, ColumnType)>> {
        self.validate(columns)?;

        let targets = match self {
            TypeCoercion::Single(dtype) => columns
                .iter()
                .filter(|c| table.has_column(c))
                .map(|c| (c.clone(), *dtype))
                .collect(),
            TypeCoercion::PerColumn(types) => {
                let mut targets = Vec::with_capacity(types.len());
                for (column, dtype) in columns.iter().zip(types) {
                    if !table.has_column(column) {
                        return Err(TabprepError::ColumnNotFound(column.clone()));
                    }
                    targets.push((column.clone(), *dtype));
                }
                targets
            }
            TypeCoercion::ByName(map) => map
                .iter()
                .filter(|(c, _)| table.has_column(c))
                .map(|(c, dtype)| (c.clone(), *dtype))
                .collect(),
        };

        Ok(targets)
    }
}

/// Parses `int`, `int,float` (positional) or `A=int,B=float` (by name).
impl FromStr for TypeCoercion {
    type Err = TabprepError;

    fn from_str(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.split(',').map(str::trim).filter(|p| !p.is_empty()).collect();
        let parse_type = |raw: &str| raw.parse::<ColumnType>().map_err(TabprepError::Config);

        match parts.as_slice() {
            [] => Err(TabprepError::Config("Empty type coercion".to_string())),
            [single] if !single.contains('=') => Ok(TypeCoercion::Single(parse_type(single)?)),
            _ if parts.iter().all(|p| p.contains('=')) => {
                let mut map = IndexMap::new();
                for part in &parts {
                    if let Some((column, dtype)) = part.split_once('=') {
                        map.insert(column.trim().to_string(), parse_type(dtype)?);
                    }
                }
                Ok(TypeCoercion::ByName(map))
            }
            _ if parts.iter().any(|p| p.contains('=')) => Err(TabprepError::Config(format!(
                "Cannot mix positional and named types in '{}'",
                s
            ))),
            _ => Ok(TypeCoercion::PerColumn(
                parts.iter().map(|p| parse_type(p)).collect::<Result<_>>()?,
            )),
        }
    }
}
