//! Error hierarchy for rusqlite-arrow.
//!
//! Follows the "canonical error struct" pattern: a single public error type
//! wrapping a `pub(crate)` kind enum, with `is_xxx()` predicate methods
//! instead of an exposed `ErrorKind`.

use thiserror::Error;

/// Root error type for the rusqlite-arrow crate.
///
/// Captures every failure mode of the read path (result set to Arrow) and
/// the write path (Arrow to table). Exposes predicate methods (`is_xxx()`)
/// for classification without exposing internals.
///
/// # Example
///
/// ```rust,ignore
/// use rusqlite_arrow::SqliteArrowError;
///
/// fn handle_error(err: SqliteArrowError) {
///     if err.is_unsupported_column_type() {
///         eprintln!("column type cannot be materialized");
///     } else if err.is_invalid_identifier() {
///         eprintln!("table or column name rejected");
///     }
/// }
/// ```
#[derive(Error, Debug)]
#[error("{kind}")]
pub struct SqliteArrowError {
    kind: ErrorKind,
}

/// Internal error classification.
///
/// This enum is `pub(crate)` to allow adding variants without breaking
/// changes. External code should use the `is_xxx()` predicate methods.
#[derive(Error, Debug)]
#[non_exhaustive]
pub(crate) enum ErrorKind {
    /// A column whose type cannot be determined or is outside the
    /// supported set.
    #[error("unsupported column type for column '{column}': {detail}")]
    UnsupportedColumnType { column: String, detail: String },

    /// A row value failed to scan into its column's accumulator.
    #[error("scan failed for column '{column}': {message}")]
    Scan { column: String, message: String },

    /// The row cursor itself failed while advancing.
    #[error("row iteration failed: {0}")]
    RowIteration(String),

    /// An accumulated or caller-supplied value has no conversion rule.
    #[error("unsupported data type for column '{column}': {message}")]
    UnsupportedDataType { column: String, message: String },

    /// A table or column name violates the identifier policy.
    #[error("invalid {context} '{name}': only letters, digits, and underscores are allowed")]
    InvalidIdentifier { name: String, context: String },

    /// Transaction begin, commit, or rollback failed.
    #[error("transaction failure: {0}")]
    Transaction(String),

    /// The read was cancelled by the caller between rows.
    #[error("query interrupted before completion")]
    Interrupted,

    /// Error from the SQLite engine.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Error from Arrow library operations.
    #[error("arrow error: {0}")]
    Arrow(#[from] arrow_schema::ArrowError),
}

impl SqliteArrowError {
    // ═══════════════════════════════════════════════════════════════════════
    // Constructors
    // ═══════════════════════════════════════════════════════════════════════

    /// Create error for a column whose type cannot be materialized.
    #[must_use]
    pub fn unsupported_column_type(column: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::UnsupportedColumnType {
                column: column.into(),
                detail: detail.into(),
            },
        }
    }

    /// Create error for a row value that failed to scan.
    #[must_use]
    pub fn scan(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Scan {
                column: column.into(),
                message: message.into(),
            },
        }
    }

    /// Create error for a cursor failure while advancing between rows.
    #[must_use]
    pub fn row_iteration(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::RowIteration(message.into()),
        }
    }

    /// Create error for a value with no conversion rule.
    #[must_use]
    pub fn unsupported_data_type(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::UnsupportedDataType {
                column: column.into(),
                message: message.into(),
            },
        }
    }

    /// Create error for a rejected table or column name.
    #[must_use]
    pub fn invalid_identifier(name: impl Into<String>, context: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::InvalidIdentifier {
                name: name.into(),
                context: context.into(),
            },
        }
    }

    /// Create error for a transaction begin/commit/rollback failure.
    #[must_use]
    pub fn transaction(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Transaction(message.into()),
        }
    }

    /// Create error for a caller-cancelled read.
    #[must_use]
    pub const fn interrupted() -> Self {
        Self {
            kind: ErrorKind::Interrupted,
        }
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Predicate Methods (is_xxx)
    // ═══════════════════════════════════════════════════════════════════════

    /// Returns true if this is an unsupported-column-type error.
    #[must_use]
    pub const fn is_unsupported_column_type(&self) -> bool {
        matches!(self.kind, ErrorKind::UnsupportedColumnType { .. })
    }

    /// Returns true if this is a scan error.
    #[must_use]
    pub const fn is_scan(&self) -> bool {
        matches!(self.kind, ErrorKind::Scan { .. })
    }

    /// Returns true if this is a row-iteration error.
    #[must_use]
    pub const fn is_row_iteration(&self) -> bool {
        matches!(self.kind, ErrorKind::RowIteration(_))
    }

    /// Returns true if this is an unsupported-data-type error.
    #[must_use]
    pub const fn is_unsupported_data_type(&self) -> bool {
        matches!(self.kind, ErrorKind::UnsupportedDataType { .. })
    }

    /// Returns true if this is an invalid-identifier error.
    #[must_use]
    pub const fn is_invalid_identifier(&self) -> bool {
        matches!(self.kind, ErrorKind::InvalidIdentifier { .. })
    }

    /// Returns true if this is a transaction failure.
    #[must_use]
    pub const fn is_transaction(&self) -> bool {
        matches!(self.kind, ErrorKind::Transaction(_))
    }

    /// Returns true if the read was cancelled by the caller.
    #[must_use]
    pub const fn is_interrupted(&self) -> bool {
        matches!(self.kind, ErrorKind::Interrupted)
    }

    /// Returns true if this is a SQLite engine error.
    #[must_use]
    pub const fn is_sqlite(&self) -> bool {
        matches!(self.kind, ErrorKind::Sqlite(_))
    }

    /// Returns true if this is an Arrow library error.
    #[must_use]
    pub const fn is_arrow(&self) -> bool {
        matches!(self.kind, ErrorKind::Arrow(_))
    }
}

impl From<rusqlite::Error> for SqliteArrowError {
    fn from(err: rusqlite::Error) -> Self {
        Self {
            kind: ErrorKind::Sqlite(err),
        }
    }
}

impl From<arrow_schema::ArrowError> for SqliteArrowError {
    fn from(err: arrow_schema::ArrowError) -> Self {
        Self {
            kind: ErrorKind::Arrow(err),
        }
    }
}

/// Result type alias for conversion operations.
pub type Result<T> = std::result::Result<T, SqliteArrowError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = SqliteArrowError::unsupported_column_type("payload", "declared type 'BLOB'");
        assert!(err.is_unsupported_column_type());
        assert!(!err.is_scan());
    }

    #[test]
    fn test_scan_error_display() {
        let err = SqliteArrowError::scan("score", "expected REAL, got Text");
        assert!(err.is_scan());
        assert!(err.to_string().contains("score"));
        assert!(err.to_string().contains("expected REAL"));
    }

    #[test]
    fn test_invalid_identifier_display() {
        let err = SqliteArrowError::invalid_identifier("bad-name!", "table name");
        assert!(err.is_invalid_identifier());
        assert!(err.to_string().contains("bad-name!"));
        assert!(err.to_string().contains("table name"));
    }

    #[test]
    fn test_transaction_error() {
        let err = SqliteArrowError::transaction("failed to begin");
        assert!(err.is_transaction());
        assert!(!err.is_row_iteration());
    }

    #[test]
    fn test_interrupted() {
        let err = SqliteArrowError::interrupted();
        assert!(err.is_interrupted());
    }

    #[test]
    fn test_from_sqlite_error() {
        let err = SqliteArrowError::from(rusqlite::Error::InvalidQuery);
        assert!(err.is_sqlite());
    }

    #[test]
    fn test_error_debug() {
        let err = SqliteArrowError::row_iteration("disk I/O error");
        let debug_str = format!("{err:?}");
        assert!(debug_str.contains("SqliteArrowError"));
    }
}
