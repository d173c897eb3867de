//! Input parsing and data source handling.

mod format;
mod io;
mod parser;
mod source;

pub use format::FileFormat;
pub use io::{DataIo, LoadOptions, LoadedTable, DEFAULT_INPUT_DIR, DEFAULT_OUTPUT_DIR, load_path};
pub use parser::{Parser, ParserConfig};
pub use source::{ColumnSummary, MAX_LISTED_ROWS, RowLabels, SourceMetadata, TableShape};
