//! Table export.

mod writer;

pub use writer::{OutputFormat, WriteOptions, Writer};
