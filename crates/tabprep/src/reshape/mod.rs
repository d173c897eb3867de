//! Table reshaping.

mod melt;

pub use melt::wide_to_long;
