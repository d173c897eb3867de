//! What a preprocessing run changed.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::table::ColumnType;

/// The kind of cell a phase targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Missing,
    Negative,
    Zero,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Missing => f.write_str("missing"),
            Phase::Negative => f.write_str("negative"),
            Phase::Zero => f.write_str("zero"),
        }
    }
}

/// What a phase did to its column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseAction {
    /// Offending cells were overwritten with the replacement value.
    Replaced,
    /// Negative values were replaced by their absolute value.
    Absolute,
    /// Rows containing offending cells were removed from the table.
    RowsDropped,
    /// The column was removed from the table.
    ColumnDropped,
    /// Offending cells were set to missing.
    ValuesNulled,
}

/// A single change made by one phase.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhaseChange {
    /// Column the phase ran on.
    pub column: String,

    pub phase: Phase,

    pub action: PhaseAction,

    /// Cells rewritten, or rows removed for [`PhaseAction::RowsDropped`].
    pub values_changed: usize,

    /// Description of the change.
    pub description: String,
}

impl PhaseChange {
    pub fn new(column: &str, phase: Phase, action: PhaseAction, values_changed: usize, description: String) -> Self {
        Self {
            column: column.to_string(),
            phase,
            action,
            values_changed,
            description,
        }
    }
}

/// A type conversion applied before the value phases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoercedColumn {
    pub column: String,
    pub from: ColumnType,
    pub to: ColumnType,
}

/// Summary of a preprocessing run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PreprocessReport {
    /// Row count before any phase ran.
    pub rows_before: usize,

    /// Row count after all phases ran.
    pub rows_after: usize,

    /// Columns converted by `force_type`, in application order.
    pub coerced_columns: Vec<CoercedColumn>,

    /// Designated columns that were not in the table.
    pub skipped_columns: Vec<String>,

    /// Columns removed by the `column` drop strategy.
    pub dropped_columns: Vec<String>,

    /// Phase changes in execution order. Phases that changed nothing are
    /// not recorded.
    pub changes: Vec<PhaseChange>,

    /// Whether row labels were renumbered at the end.
    pub index_reset: bool,
}

impl PreprocessReport {
    /// Create an empty report for a table of `rows_before` rows.
    pub fn new(rows_before: usize) -> Self {
        Self {
            rows_before,
            rows_after: rows_before,
            ..Self::default()
        }
    }

    /// Add a change to the report.
    pub fn add_change(&mut self, change: PhaseChange) {
        if change.action == PhaseAction::ColumnDropped {
            self.dropped_columns.push(change.column.clone());
        }
        self.changes.push(change);
    }

    /// Total number of rows removed.
    pub fn rows_dropped(&self) -> usize {
        self.rows_before.saturating_sub(self.rows_after)
    }

    /// Total number of cells rewritten in place.
    pub fn values_changed(&self) -> usize {
        self.changes
            .iter()
            .filter(|c| matches!(c.action, PhaseAction::Replaced | PhaseAction::Absolute | PhaseAction::ValuesNulled))
            .map(|c| c.values_changed)
            .sum()
    }

    /// True if nothing in the table changed apart from row labels.
    pub fn is_noop(&self) -> bool {
        self.changes.is_empty() && self.coerced_columns.is_empty()
    }
}
