//! Conversion entry points: result set to batch, batch to table.

pub mod reader;
pub mod writer;

pub use reader::{ReadOptions, query_to_arrow, query_to_arrow_with_options};
pub use writer::{batch_to_records, batch_to_table, is_valid_identifier};
