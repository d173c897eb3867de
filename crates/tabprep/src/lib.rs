//! tabprep: value preprocessing for long-format tabular data.
//!
//! For designated value columns of a table, tabprep applies independently
//! configurable policies for missing, negative and zero values, with an
//! optional type-coercion pass and a row, column or value level drop
//! strategy. Around that core it loads and writes delimited files and
//! reshapes wide tables to long format.
//!
//! # Core Principles
//!
//! - **Explicit ordering**: phases run in a per-column plan, so values
//!   converted to zero are never handled again as zeros
//! - **Explicit ownership**: [`Preprocessor::apply`] mutates a table in
//!   place, [`Preprocessor::process`] never touches its input
//! - **Reported**: every run returns a [`PreprocessReport`]
//!
//! # Example
//!
//! ```no_run
//! use tabprep::{DropStrategy, PreprocessConfig, Preprocessor, ValuePolicy, load_path, LoadOptions};
//!
//! let loaded = load_path("counts.tsv", &LoadOptions::default()).unwrap();
//!
//! let config = PreprocessConfig::new(["OD600"])
//!     .with_missing(ValuePolicy::replace(0))
//!     .with_zero(ValuePolicy::Drop)
//!     .with_drop_strategy(DropStrategy::Value);
//! let processed = Preprocessor::new(config).unwrap().process(&loaded.table).unwrap();
//!
//! println!("Rows: {}", processed.table.row_count());
//! println!("Changes: {}", processed.report.changes.len());
//! ```

pub mod error;
pub mod input;
pub mod output;
pub mod preprocess;
pub mod reshape;
pub mod table;

pub use error::{Result, TabprepError};
pub use input::{DataIo, FileFormat, LoadOptions, LoadedTable, Parser, ParserConfig, SourceMetadata, load_path};
pub use output::{OutputFormat, WriteOptions, Writer};
pub use preprocess::{
    DropStrategy, Phase, PreprocessConfig, PreprocessReport, Preprocessor, Processed, TypeCoercion, ValuePolicy,
};
pub use reshape::wide_to_long;
pub use table::{Column, ColumnType, DataTable, Value};
