//! Apache Arrow integration for the rusqlite SQLite driver.
//!
//! This crate materializes SQL result sets whose column types are unknown
//! until query execution into Arrow `RecordBatch`es, and writes batches
//! back into SQLite tables.
//!
//! # Features
//!
//! - Declared-type resolution once per query, before the row loop
//! - First-row type inference for expression and aggregate columns
//! - Row-atomic accumulation: no partial batch is ever observable
//! - Timestamp normalization to RFC3339 text
//! - Transactional table materialization with identifier validation
//!
//! # Example
//!
//! ```
//! use rusqlite::Connection;
//! use rusqlite_arrow::{batch_to_table, query_to_arrow};
//!
//! # fn main() -> rusqlite_arrow::Result<()> {
//! let mut conn = Connection::open_in_memory()?;
//! conn.execute_batch(
//!     "CREATE TABLE readings (sensor TEXT, value DOUBLE);
//!      INSERT INTO readings VALUES ('a', 0.5), ('b', 1.5);",
//! )?;
//!
//! let batch = query_to_arrow(&conn, "SELECT sensor, value FROM readings")?;
//! batch_to_table(&mut conn, &batch, "readings_copy")?;
//! # Ok(())
//! # }
//! ```
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod conversion;
pub mod error;
pub mod schema;
pub mod types;

mod builders;

// Re-export main types for convenience
pub use conversion::reader::{ReadOptions, query_to_arrow, query_to_arrow_with_options};
pub use conversion::writer::{batch_to_records, batch_to_table, is_valid_identifier};
pub use error::{Result, SqliteArrowError};
pub use schema::mapping::declared_type_to_scan;
pub use types::scan::ScanType;
pub use types::temporal::Timestamp;
