//! Dataset Module - CSV input/output for the caller
//!
//! Reads raw traffic exports into a `Table` and writes labeled predictions
//! or encoded feature matrices back out. The pipeline itself never touches
//! files; only the CLI caller does.

pub mod reader;
pub mod writer;


pub use reader::{read_table, read_table_from_path, NA_TOKENS};
pub use writer::{write_features, write_features_to_path, write_table, write_table_to_path};
