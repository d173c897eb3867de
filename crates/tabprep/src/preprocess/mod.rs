//! Missing, negative and zero value handling.
//!
//! A [`Preprocessor`] runs three phases on each designated column, one per
//! kind of cell, each governed by a [`ValuePolicy`]. Phases run in the
//! order given by [`PreprocessConfig::phase_plan`].

mod config;
mod engine;
mod policy;
mod report;

pub use config::PreprocessConfig;
pub use engine::{Preprocessor, Processed};
pub use policy::{DropStrategy, TypeCoercion, ValuePolicy};
pub use report::{CoercedColumn, Phase, PhaseAction, PhaseChange, PreprocessReport};
