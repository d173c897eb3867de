//! Preprocessing configuration.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{Result, TabprepError};

use super::policy::{DropStrategy, TypeCoercion, ValuePolicy};
use super::report::Phase;

/// Configuration for a [`Preprocessor`](super::Preprocessor) run.
///
/// Loadable from JSON; the legacy keys `behavior_nans`, `behavior_negs`,
/// `behavior_zeroes` and `drop_behavior` are accepted as aliases.
///
/// ```
/// use tabprep::preprocess::{DropStrategy, PreprocessConfig, ValuePolicy};
///
/// let config: PreprocessConfig = serde_json::from_str(
///     r#"{"columns": "X", "behavior_nans": 0, "behavior_zeroes": "Drop", "drop_behavior": "values"}"#,
/// ).unwrap();
///
/// assert_eq!(config.columns, vec!["X"]);
/// assert_eq!(config.missing, ValuePolicy::replace(0));
/// assert_eq!(config.drop_strategy, DropStrategy::Value);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreprocessConfig {
    /// Designated columns, in processing order. A single string is accepted.
    #[serde(deserialize_with = "one_or_many")]
    pub columns: Vec<String>,

    #[serde(default, alias = "behavior_nans")]
    pub missing: ValuePolicy,

    #[serde(default, alias = "behavior_negs")]
    pub negative: ValuePolicy,

    #[serde(default, alias = "behavior_zeroes")]
    pub zero: ValuePolicy,

    #[serde(default, alias = "drop_behavior")]
    pub drop_strategy: DropStrategy,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub force_type: Option<TypeCoercion>,

    /// Renumber row labels after processing.
    #[serde(default = "default_true")]
    pub reset_index: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

fn one_or_many<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Vec<String>, D::Error> {
    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(column) => vec![column],
        OneOrMany::Many(columns) => columns,
    })
}

impl PreprocessConfig {
    /// Keep everything for the given columns.
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            missing: ValuePolicy::Keep,
            negative: ValuePolicy::Keep,
            zero: ValuePolicy::Keep,
            drop_strategy: DropStrategy::Row,
            force_type: None,
            reset_index: true,
        }
    }

    pub fn with_missing(mut self, policy: ValuePolicy) -> Self {
        self.missing = policy;
        self
    }

    pub fn with_negative(mut self, policy: ValuePolicy) -> Self {
        self.negative = policy;
        self
    }

    pub fn with_zero(mut self, policy: ValuePolicy) -> Self {
        self.zero = policy;
        self
    }

    pub fn with_drop_strategy(mut self, strategy: DropStrategy) -> Self {
        self.drop_strategy = strategy;
        self
    }

    pub fn with_force_type(mut self, coercion: TypeCoercion) -> Self {
        self.force_type = Some(coercion);
        self
    }

    pub fn with_reset_index(mut self, reset: bool) -> Self {
        self.reset_index = reset;
        self
    }

    /// Load a configuration from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|e| TabprepError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_json(&json)
    }

    /// Parse a configuration from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize the configuration as pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check policy and coercion shapes.
    pub fn validate(&self) -> Result<()> {
        for (phase, policy) in [(Phase::Missing, &self.missing), (Phase::Zero, &self.zero)] {
            if *policy == ValuePolicy::Abs {
                return Err(TabprepError::Config(format!(
                    "Abs only applies to negative values, not {} values",
                    phase
                )));
            }
        }

        if let Some(coercion) = &self.force_type {
            coercion.validate(&self.columns)?;
        }

        Ok(())
    }

    /// The policy for one phase.
    pub fn policy(&self, phase: Phase) -> &ValuePolicy {
        match phase {
            Phase::Missing => &self.missing,
            Phase::Negative => &self.negative,
            Phase::Zero => &self.zero,
        }
    }

    /// Order in which the phases run on each column.
    ///
    /// Missing, zero, negative by default. A phase that replaces with 0 is
    /// deferred until after the zero phase when the zero policy acts, so the
    /// zeros it creates are kept rather than handled as zeros.
    pub fn phase_plan(&self) -> [Phase; 3] {
        let zero_acts = !self.zero.is_keep();
        let defer_negative = zero_acts && self.negative.replaces_with_zero();
        let defer_missing = zero_acts && self.missing.replaces_with_zero();

        let (first, second) = if defer_negative {
            (Phase::Zero, Phase::Negative)
        } else {
            (Phase::Negative, Phase::Zero)
        };

        if defer_missing {
            [first, second, Phase::Missing]
        } else {
            [Phase::Missing, first, second]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::ColumnType;

    #[test]
    fn test_defaults() {
        let config = PreprocessConfig::from_json(r#"{"columns": ["A", "B"]}"#).unwrap();

        assert_eq!(config, PreprocessConfig::new(["A", "B"]));
        assert!(config.reset_index);
        assert_eq!(config.phase_plan(), [Phase::Missing, Phase::Negative, Phase::Zero]);
    }

    #[test]
    fn test_canonical_keys() {
        let config = PreprocessConfig::from_json(
            r#"{
                "columns": "X",
                "missing": {"Replace": -1},
                "negative": "Abs",
                "zero": "keep",
                "drop_strategy": "column",
                "force_type": "float",
                "reset_index": false
            }"#,
        )
        .unwrap();

        assert_eq!(config.missing, ValuePolicy::replace(-1));
        assert_eq!(config.negative, ValuePolicy::Abs);
        assert_eq!(config.drop_strategy, DropStrategy::Column);
        assert_eq!(config.force_type, Some(TypeCoercion::Single(ColumnType::Float)));
        assert!(!config.reset_index);
    }

    #[test]
    fn test_json_roundtrip_keeps_meaning() {
        let config = PreprocessConfig::new(["X"])
            .with_missing(ValuePolicy::replace(0))
            .with_zero(ValuePolicy::Drop)
            .with_drop_strategy(DropStrategy::Value);

        let parsed = PreprocessConfig::from_json(&config.to_json().unwrap()).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_validate_rejects_abs_outside_negative() {
        let config = PreprocessConfig::new(["X"]).with_missing(ValuePolicy::Abs);
        assert!(matches!(config.validate(), Err(TabprepError::Config(_))));

        let config = PreprocessConfig::new(["X"]).with_zero(ValuePolicy::Abs);
        assert!(matches!(config.validate(), Err(TabprepError::Config(_))));

        let config = PreprocessConfig::new(["X"]).with_negative(ValuePolicy::Abs);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_positional_types_length() {
        let config = PreprocessConfig::new(["X", "Y"])
            .with_force_type(TypeCoercion::PerColumn(vec![ColumnType::Integer]));
        assert!(matches!(config.validate(), Err(TabprepError::Config(_))));
    }

    #[test]
    fn test_phase_plan_deferral() {
        let base = PreprocessConfig::new(["X"]);

        let plan = base
            .clone()
            .with_negative(ValuePolicy::replace(0))
            .with_zero(ValuePolicy::Drop)
            .phase_plan();
        assert_eq!(plan, [Phase::Missing, Phase::Zero, Phase::Negative]);

        let plan = base
            .clone()
            .with_missing(ValuePolicy::replace(0))
            .with_zero(ValuePolicy::replace(1))
            .phase_plan();
        assert_eq!(plan, [Phase::Negative, Phase::Zero, Phase::Missing]);

        let plan = base
            .clone()
            .with_missing(ValuePolicy::replace(0.0))
            .with_negative(ValuePolicy::replace(0))
            .with_zero(ValuePolicy::Drop)
            .phase_plan();
        assert_eq!(plan, [Phase::Zero, Phase::Negative, Phase::Missing]);

        // Zero policy keeps, so nothing is deferred.
        let plan = base
            .with_missing(ValuePolicy::replace(0))
            .with_negative(ValuePolicy::replace(0))
            .phase_plan();
        assert_eq!(plan, [Phase::Missing, Phase::Negative, Phase::Zero]);
    }

    #[test]
    fn test_load_missing_file() {
        let err = PreprocessConfig::load("/nonexistent/config.json").unwrap_err();
        assert!(matches!(err, TabprepError::Io { .. }));
    }
}
