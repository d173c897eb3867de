//! Typed in-memory table model.

mod column;
mod data;
mod types;
mod value;

pub use column::Column;
pub use data::DataTable;
pub use types::ColumnType;
pub use value::Value;
