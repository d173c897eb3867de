//! Fuzz target for the preprocessor.
//!
//! Random columns and policies must never panic, and the value strategy
//! must never change the table's shape.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use tabprep::{Column, DataTable, DropStrategy, PreprocessConfig, Preprocessor, ValuePolicy};

#[derive(Debug, Arbitrary)]
enum FuzzPolicy {
    Keep,
    Drop,
    Abs,
    Replace(i8),
}

impl FuzzPolicy {
    fn into_policy(self) -> ValuePolicy {
        match self {
            FuzzPolicy::Keep => ValuePolicy::Keep,
            FuzzPolicy::Drop => ValuePolicy::Drop,
            FuzzPolicy::Abs => ValuePolicy::Abs,
            FuzzPolicy::Replace(v) => ValuePolicy::replace(v as i64),
        }
    }
}

#[derive(Debug, Arbitrary)]
struct Input {
    values: Vec<Option<i16>>,
    missing: FuzzPolicy,
    negative: FuzzPolicy,
    zero: FuzzPolicy,
    strategy: u8,
    reset_index: bool,
}

fuzz_target!(|input: Input| {
    let strategy = match input.strategy % 3 {
        0 => DropStrategy::Row,
        1 => DropStrategy::Column,
        _ => DropStrategy::Value,
    };

    let column = Column::integer(input.values.iter().map(|v| v.map(i64::from)));
    let Ok(table) = DataTable::from_columns([("X", column)]) else {
        return;
    };

    let config = PreprocessConfig::new(["X"])
        .with_missing(input.missing.into_policy())
        .with_negative(input.negative.into_policy())
        .with_zero(input.zero.into_policy())
        .with_drop_strategy(strategy)
        .with_reset_index(input.reset_index);

    // Abs outside the negative policy is rejected up front.
    let Ok(preprocessor) = Preprocessor::new(config) else {
        return;
    };

    if let Ok(processed) = preprocessor.process(&table) {
        if strategy == DropStrategy::Value {
            assert_eq!(processed.table.row_count(), table.row_count());
        }
        assert_eq!(processed.table.index().len(), processed.table.row_count());
    }
});
