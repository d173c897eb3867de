//! Engine that applies value policies to designated columns.

use tracing::{debug, info, warn};

use crate::error::{Result, TabprepError};
use crate::table::{Column, DataTable, Value};

use super::config::PreprocessConfig;
use super::policy::{DropStrategy, ValuePolicy};
use super::report::{CoercedColumn, Phase, PhaseAction, PhaseChange, PreprocessReport};

impl Phase {
    /// Whether a cell is targeted by this phase.
    pub fn matches(&self, value: &Value) -> bool {
        match self {
            Phase::Missing => value.is_missing(),
            Phase::Negative => value.is_negative(),
            Phase::Zero => value.is_zero(),
        }
    }
}

/// A preprocessed copy of a table.
#[derive(Debug, Clone)]
pub struct Processed {
    pub table: DataTable,
    pub report: PreprocessReport,
}

/// Applies a [`PreprocessConfig`] to tables.
#[derive(Debug, Clone)]
pub struct Preprocessor {
    config: PreprocessConfig,
}

impl Preprocessor {
    /// Create a preprocessor, rejecting invalid policy combinations.
    pub fn new(config: PreprocessConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &PreprocessConfig {
        &self.config
    }

    /// Process a copy of `table`, leaving the input untouched.
    pub fn process(&self, table: &DataTable) -> Result<Processed> {
        let mut table = table.clone();
        let report = self.apply(&mut table)?;
        Ok(Processed { table, report })
    }

    /// Process `table` in place.
    ///
    /// Type coercion either applies to every targeted column or to none.
    /// An error from a later phase leaves earlier phases applied.
    pub fn apply(&self, table: &mut DataTable) -> Result<PreprocessReport> {
        let mut report = PreprocessReport::new(table.row_count());

        self.coerce_types(table, &mut report)?;

        let plan = self.config.phase_plan();
        for column in &self.config.columns {
            if !table.has_column(column) {
                warn!(column = %column, "column not found in table, skipping");
                report.skipped_columns.push(column.clone());
                continue;
            }

            debug!(column = %column, ?plan, "processing column");
            let mut state = ColumnState::new(column, table)?;
            for phase in plan {
                // A column drop ends the remaining phases for this column.
                if !table.has_column(column) {
                    break;
                }
                if let Some(change) = self.apply_phase(phase, &mut state, table)? {
                    debug!(column = %column, phase = %phase, "{}", change.description);
                    report.add_change(change);
                }
            }
        }

        if self.config.reset_index {
            table.reset_index();
            report.index_reset = true;
        }
        report.rows_after = table.row_count();

        info!(
            columns = self.config.columns.len(),
            rows_before = report.rows_before,
            rows_after = report.rows_after,
            changes = report.changes.len(),
            "preprocessing complete"
        );

        Ok(report)
    }

    /// Convert column types. All conversions are computed before any is stored.
    fn coerce_types(&self, table: &mut DataTable, report: &mut PreprocessReport) -> Result<()> {
        let Some(coercion) = &self.config.force_type else {
            return Ok(());
        };

        let targets = coercion.resolve(&self.config.columns, table)?;

        let mut staged = Vec::with_capacity(targets.len());
        for (name, dtype) in targets {
            let source = table
                .column(&name)
                .ok_or_else(|| TabprepError::ColumnNotFound(name.clone()))?;
            let from = source.dtype();
            staged.push((name.clone(), from, source.cast(&name, dtype)?));
        }

        for (name, from, column) in staged {
            let to = column.dtype();
            table.set_column(name.clone(), column)?;
            debug!(column = %name, from = %from, to = %to, "coerced column");
            report.coerced_columns.push(CoercedColumn { column: name, from, to });
        }

        Ok(())
    }

    fn apply_phase(&self, phase: Phase, state: &mut ColumnState<'_>, table: &mut DataTable) -> Result<Option<PhaseChange>> {
        let policy = self.config.policy(phase);
        if policy.is_keep() {
            return Ok(None);
        }

        let name = state.name;
        let column = lookup(table, name)?;
        // Zero tests match nothing on non-numeric columns; sign tests fail.
        if phase == Phase::Negative {
            require_numeric(name, column, phase)?;
        }
        let targets = state.targets(phase, column);

        let change = match policy {
            ValuePolicy::Keep => None,
            ValuePolicy::Drop => self.drop_targets(phase, state, &targets, table)?,
            ValuePolicy::Replace(value) => {
                let replaced = lookup_mut(table, name)?.replace_masked(&targets, value);
                let shown = if value.is_missing() { "NA".to_string() } else { value.to_string() };
                (replaced > 0).then(|| {
                    PhaseChange::new(
                        name,
                        phase,
                        PhaseAction::Replaced,
                        replaced,
                        format!("Replaced {} {} value(s) in '{}' with {}", replaced, phase, name, shown),
                    )
                })
            }
            ValuePolicy::Abs => {
                let changed = lookup_mut(table, name)?.abs();
                (changed > 0).then(|| {
                    PhaseChange::new(
                        name,
                        phase,
                        PhaseAction::Absolute,
                        changed,
                        format!("Took absolute value of {} {} value(s) in '{}'", changed, phase, name),
                    )
                })
            }
        };

        Ok(change)
    }

    fn drop_targets(
        &self,
        phase: Phase,
        state: &mut ColumnState<'_>,
        targets: &[bool],
        table: &mut DataTable,
    ) -> Result<Option<PhaseChange>> {
        let name = state.name;

        match self.config.drop_strategy {
            DropStrategy::Row => {
                let keep: Vec<bool> = targets.iter().map(|t| !t).collect();
                let removed = table.retain_rows(&keep);
                state.retain(&keep);

                Ok((removed > 0).then(|| {
                    PhaseChange::new(
                        name,
                        phase,
                        PhaseAction::RowsDropped,
                        removed,
                        format!("Dropped {} row(s) with {} values in '{}'", removed, phase, name),
                    )
                }))
            }
            DropStrategy::Column => {
                let removed = table.drop_column(name).map(|c| c.len()).unwrap_or(0);
                Ok(Some(PhaseChange::new(
                    name,
                    phase,
                    PhaseAction::ColumnDropped,
                    removed,
                    format!("Dropped column '{}' ({} policy)", name, phase),
                )))
            }
            // Missing cells are already missing.
            DropStrategy::Value if phase == Phase::Missing => Ok(None),
            DropStrategy::Value => {
                let nulled = lookup_mut(table, name)?.null_masked(targets);

                Ok((nulled > 0).then(|| {
                    PhaseChange::new(
                        name,
                        phase,
                        PhaseAction::ValuesNulled,
                        nulled,
                        format!("Set {} {} value(s) in '{}' to missing", nulled, phase, name),
                    )
                }))
            }
        }
    }
}

/// Per-column bookkeeping across phases.
///
/// The missing phase only targets cells that were missing before the
/// column's first phase ran, so cells nulled by an earlier phase stay
/// missing when missing-value handling is deferred.
struct ColumnState<'a> {
    name: &'a str,
    missing_at_start: Vec<bool>,
}

impl<'a> ColumnState<'a> {
    fn new(name: &'a str, table: &DataTable) -> Result<Self> {
        let missing_at_start = lookup(table, name)?.values().iter().map(Value::is_missing).collect();
        Ok(Self { name, missing_at_start })
    }

    fn targets(&self, phase: Phase, column: &Column) -> Vec<bool> {
        let values = column.values().iter();
        match phase {
            Phase::Missing => values
                .zip(&self.missing_at_start)
                .map(|(v, was_missing)| *was_missing && v.is_missing())
                .collect(),
            _ => values.map(|v| phase.matches(v)).collect(),
        }
    }

    /// Follow a row drop.
    fn retain(&mut self, keep: &[bool]) {
        let mut keep = keep.iter();
        self.missing_at_start.retain(|_| keep.next().copied().unwrap_or(true));
    }
}

fn lookup<'t>(table: &'t DataTable, name: &str) -> Result<&'t Column> {
    table
        .column(name)
        .ok_or_else(|| TabprepError::ColumnNotFound(name.to_string()))
}

fn lookup_mut<'t>(table: &'t mut DataTable, name: &str) -> Result<&'t mut Column> {
    table
        .column_mut(name)
        .ok_or_else(|| TabprepError::ColumnNotFound(name.to_string()))
}

fn require_numeric(name: &str, column: &Column, phase: Phase) -> Result<()> {
    if column.is_numeric() {
        Ok(())
    } else {
        Err(TabprepError::TypeMismatch {
            column: name.to_string(),
            dtype: column.dtype(),
            operation: format!("{} value handling", phase),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preprocess::TypeCoercion;
    use crate::table::ColumnType;

    fn x_table() -> DataTable {
        DataTable::from_columns([
            ("X", Column::float([Some(1.0), Some(-2.0), Some(0.0), None, Some(-5.0)])),
            ("Y", Column::string([Some("a"), Some("b"), Some("c"), Some("d"), Some("e")])),
        ])
        .unwrap()
    }

    fn values(table: &DataTable, name: &str) -> Vec<Value> {
        table.column(name).unwrap().values().to_vec()
    }

    #[test]
    fn test_deferred_missing_survives_zero_nulling() {
        let config = PreprocessConfig::new(["X"])
            .with_missing(ValuePolicy::replace(0))
            .with_zero(ValuePolicy::Drop)
            .with_drop_strategy(DropStrategy::Value);
        let processed = Preprocessor::new(config).unwrap().process(&x_table()).unwrap();

        assert_eq!(
            values(&processed.table, "X"),
            vec![
                Value::Float(1.0),
                Value::Float(-2.0),
                Value::Missing,
                Value::Float(0.0),
                Value::Float(-5.0),
            ]
        );

        let phases: Vec<Phase> = processed.report.changes.iter().map(|c| c.phase).collect();
        assert_eq!(phases, vec![Phase::Zero, Phase::Missing]);
    }

    #[test]
    fn test_deferred_negative_survives_zero_row_drop() {
        let config = PreprocessConfig::new(["X"])
            .with_negative(ValuePolicy::replace(0))
            .with_zero(ValuePolicy::Drop);
        let processed = Preprocessor::new(config).unwrap().process(&x_table()).unwrap();

        assert_eq!(
            values(&processed.table, "X"),
            vec![Value::Float(1.0), Value::Float(0.0), Value::Missing, Value::Float(0.0)]
        );
        assert_eq!(processed.table.index(), &[0, 1, 2, 3]);
        assert_eq!(values(&processed.table, "Y")[1], Value::from("b"));
        assert_eq!(processed.report.rows_dropped(), 1);
    }

    #[test]
    fn test_row_drop_without_reset_keeps_labels() {
        let config = PreprocessConfig::new(["X"])
            .with_missing(ValuePolicy::Drop)
            .with_negative(ValuePolicy::Drop)
            .with_reset_index(false);
        let processed = Preprocessor::new(config).unwrap().process(&x_table()).unwrap();

        assert_eq!(processed.table.index(), &[0, 2]);
        assert!(!processed.report.index_reset);
    }

    #[test]
    fn test_column_drop_stops_remaining_phases() {
        let config = PreprocessConfig::new(["X"])
            .with_missing(ValuePolicy::Drop)
            .with_negative(ValuePolicy::replace(99))
            .with_drop_strategy(DropStrategy::Column);
        let processed = Preprocessor::new(config).unwrap().process(&x_table()).unwrap();

        assert!(!processed.table.has_column("X"));
        assert_eq!(processed.table.row_count(), 5);
        assert_eq!(processed.report.dropped_columns, vec!["X"]);
        assert_eq!(processed.report.changes.len(), 1);
    }

    #[test]
    fn test_column_drop_even_without_offenders() {
        let table = DataTable::from_columns([("X", Column::integer([Some(1), Some(2)]))]).unwrap();
        let config = PreprocessConfig::new(["X"])
            .with_zero(ValuePolicy::Drop)
            .with_drop_strategy(DropStrategy::Column);
        let processed = Preprocessor::new(config).unwrap().process(&table).unwrap();

        assert!(!processed.table.has_column("X"));
    }

    #[test]
    fn test_value_drop_of_missing_is_noop() {
        let config = PreprocessConfig::new(["X"])
            .with_missing(ValuePolicy::Drop)
            .with_drop_strategy(DropStrategy::Value);
        let processed = Preprocessor::new(config).unwrap().process(&x_table()).unwrap();

        assert_eq!(values(&processed.table, "X"), values(&x_table(), "X"));
        assert!(processed.report.is_noop());
    }

    #[test]
    fn test_abs_negatives() {
        let config = PreprocessConfig::new(["X"]).with_negative(ValuePolicy::Abs);
        let processed = Preprocessor::new(config).unwrap().process(&x_table()).unwrap();

        let x = values(&processed.table, "X");
        assert_eq!(x[1], Value::Float(2.0));
        assert_eq!(x[4], Value::Float(5.0));
        assert!(x[3].is_missing());
        assert_eq!(processed.report.values_changed(), 2);
    }

    #[test]
    fn test_text_replacement_promotes_column() {
        let config = PreprocessConfig::new(["X"]).with_missing(ValuePolicy::replace("unknown"));
        let processed = Preprocessor::new(config).unwrap().process(&x_table()).unwrap();

        let x = processed.table.column("X").unwrap();
        assert_eq!(x.dtype(), ColumnType::String);
        assert_eq!(x.get(3), Some(&Value::from("unknown")));
    }

    #[test]
    fn test_negative_on_text_column_fails() {
        let config = PreprocessConfig::new(["Y"]).with_negative(ValuePolicy::Drop);
        let err = Preprocessor::new(config).unwrap().process(&x_table()).unwrap_err();

        assert!(matches!(err, TabprepError::TypeMismatch { column, .. } if column == "Y"));
    }

    #[test]
    fn test_zero_policy_skips_text_column() {
        let table = DataTable::from_columns([
            ("L", Column::string([Some("a"), Some("0"), None])),
            ("X", Column::float([Some(0.0), None, Some(3.0)])),
        ])
        .unwrap();
        let config = PreprocessConfig::new(["L", "X"])
            .with_missing(ValuePolicy::replace(0))
            .with_zero(ValuePolicy::Drop)
            .with_drop_strategy(DropStrategy::Value);
        let processed = Preprocessor::new(config).unwrap().process(&table).unwrap();

        let l = processed.table.column("L").unwrap();
        assert_eq!(l.dtype(), ColumnType::String);
        assert_eq!(l.values(), &[Value::from("a"), Value::from("0"), Value::from("0")]);
        assert_eq!(
            values(&processed.table, "X"),
            vec![Value::Missing, Value::Float(0.0), Value::Float(3.0)]
        );
    }

    #[test]
    fn test_zero_column_drop_removes_text_column() {
        let config = PreprocessConfig::new(["Y", "X"])
            .with_zero(ValuePolicy::Drop)
            .with_drop_strategy(DropStrategy::Column);
        let processed = Preprocessor::new(config).unwrap().process(&x_table()).unwrap();

        assert!(processed.table.column_names().is_empty());
    }

    #[test]
    fn test_missing_column_is_skipped() {
        let config = PreprocessConfig::new(["Z", "X"]).with_negative(ValuePolicy::replace(0));
        let processed = Preprocessor::new(config).unwrap().process(&x_table()).unwrap();

        assert_eq!(processed.report.skipped_columns, vec!["Z"]);
        assert_eq!(values(&processed.table, "X")[4], Value::Float(0.0));
    }

    #[test]
    fn test_process_leaves_input_untouched() {
        let original = x_table();
        let config = PreprocessConfig::new(["X"])
            .with_missing(ValuePolicy::Drop)
            .with_force_type(TypeCoercion::Single(ColumnType::Float));
        let processed = Preprocessor::new(config).unwrap().process(&original).unwrap();

        assert_eq!(original, x_table());
        assert_eq!(processed.table.row_count(), 4);
    }

    #[test]
    fn test_apply_in_place() {
        let mut table = x_table();
        let config = PreprocessConfig::new(["X"]).with_zero(ValuePolicy::replace(-1));
        let report = Preprocessor::new(config).unwrap().apply(&mut table).unwrap();

        assert_eq!(values(&table, "X")[2], Value::Float(-1.0));
        assert_eq!(report.values_changed(), 1);
    }

    #[test]
    fn test_coercion_is_all_or_nothing() {
        let mut table = DataTable::from_columns([
            ("A", Column::string([Some("1"), Some("2")])),
            ("B", Column::string([Some("3"), Some("x")])),
        ])
        .unwrap();
        let before = table.clone();

        let config = PreprocessConfig::new(["A", "B"])
            .with_force_type(TypeCoercion::Single(ColumnType::Integer));
        let err = Preprocessor::new(config).unwrap().apply(&mut table).unwrap_err();

        assert!(matches!(err, TabprepError::TypeConversion { ref column, row: 1, .. } if column == "B"));
        assert_eq!(table, before);
    }

    #[test]
    fn test_float_coercion_out_of_range_fails() {
        let mut table = DataTable::from_columns([("F", Column::float([Some(1e20), Some(-1e30)]))]).unwrap();
        let before = table.clone();

        let config = PreprocessConfig::new(["F"])
            .with_force_type(TypeCoercion::Single(ColumnType::Integer));
        let err = Preprocessor::new(config).unwrap().apply(&mut table).unwrap_err();

        assert!(matches!(
            err,
            TabprepError::TypeConversion { ref column, row: 0, target: ColumnType::Integer, .. } if column == "F"
        ));
        assert_eq!(table, before);
    }

    #[test]
    fn test_coercion_then_policies() {
        let table = DataTable::from_columns([("A", Column::string([Some("-3"), Some("NA"), Some("4")]))]).unwrap();
        let config = PreprocessConfig::new(["A"])
            .with_force_type(TypeCoercion::Single(ColumnType::Integer))
            .with_missing(ValuePolicy::replace(0))
            .with_negative(ValuePolicy::Abs);
        let processed = Preprocessor::new(config).unwrap().process(&table).unwrap();

        assert_eq!(values(&processed.table, "A"), vec![Value::Int(3), Value::Int(0), Value::Int(4)]);
        assert_eq!(
            processed.report.coerced_columns,
            vec![CoercedColumn {
                column: "A".to_string(),
                from: ColumnType::String,
                to: ColumnType::Integer,
            }]
        );
    }

    #[test]
    fn test_new_rejects_abs_for_zero() {
        let config = PreprocessConfig::new(["X"]).with_zero(ValuePolicy::Abs);
        assert!(matches!(Preprocessor::new(config), Err(TabprepError::Config(_))));
    }

    #[test]
    fn test_empty_table() {
        let table = DataTable::from_columns([("X", Column::float(Vec::<Option<f64>>::new()))]).unwrap();
        let config = PreprocessConfig::new(["X"])
            .with_missing(ValuePolicy::Drop)
            .with_zero(ValuePolicy::replace(1));
        let processed = Preprocessor::new(config).unwrap().process(&table).unwrap();

        assert_eq!(processed.table.row_count(), 0);
        assert!(processed.report.is_noop());
    }
}
