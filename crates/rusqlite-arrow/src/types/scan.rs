//! The closed set of column scan types and per-cell value decoding.
//!
//! Every materializable column is one of five [`ScanType`]s. Dispatch over
//! them is always an exhaustive match, so a type the set does not cover is
//! rejected at resolution time rather than surprising the row loop.

use std::fmt;

use arrow_schema::DataType;
use rusqlite::types::{Type, ValueRef};

use crate::Result;
use crate::error::SqliteArrowError;
use crate::types::temporal::{Timestamp, timestamp_from_text};

/// Native storage type resolved for one result-set column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanType {
    /// 64-bit signed integer (SQLite INTEGER).
    Int64,
    /// 64-bit float (SQLite REAL).
    Float64,
    /// UTF-8 text (SQLite TEXT).
    Text,
    /// Boolean, stored by SQLite as INTEGER 0/1.
    Bool,
    /// Calendar timestamp, stored as ISO text or Unix-epoch INTEGER.
    Timestamp,
}

impl ScanType {
    /// The Arrow type this column materializes to.
    ///
    /// Timestamps normalize to RFC3339 text, so the output type set is
    /// closed over Int64/Float64/Utf8/Boolean.
    #[must_use]
    pub const fn arrow_type(self) -> DataType {
        match self {
            Self::Int64 => DataType::Int64,
            Self::Float64 => DataType::Float64,
            Self::Text | Self::Timestamp => DataType::Utf8,
            Self::Bool => DataType::Boolean,
        }
    }

    /// Infer a scan type from a value's storage class.
    ///
    /// Used for columns with no declared type (expression and aggregate
    /// columns), where the first fetched row is the only type evidence the
    /// engine offers. NULL and BLOB carry no usable evidence.
    #[must_use]
    pub const fn from_storage_class(class: Type) -> Option<Self> {
        match class {
            Type::Integer => Some(Self::Int64),
            Type::Real => Some(Self::Float64),
            Type::Text => Some(Self::Text),
            Type::Null | Type::Blob => None,
        }
    }

    /// Returns true for the numeric scan types.
    #[must_use]
    pub const fn is_numeric(self) -> bool {
        matches!(self, Self::Int64 | Self::Float64)
    }

    /// Returns true for the temporal scan type.
    #[must_use]
    pub const fn is_temporal(self) -> bool {
        matches!(self, Self::Timestamp)
    }
}

impl fmt::Display for ScanType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Int64 => "INTEGER",
            Self::Float64 => "REAL",
            Self::Text => "TEXT",
            Self::Bool => "BOOLEAN",
            Self::Timestamp => "TIMESTAMP",
        };
        f.write_str(name)
    }
}

/// One decoded cell, typed by its column's scan type.
///
/// Produced fresh per cell per row; rows are decoded completely into these
/// before anything is appended, so a failing cell never leaves a column
/// with a partial row.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum CellValue {
    Int(i64),
    Float(f64),
    Text(String),
    Bool(bool),
    Timestamp(Timestamp),
}

/// Decode one raw cell against its column's scan type.
///
/// NULL is never decodable: the output columns are non-nullable by
/// construction, so a NULL cell fails the whole read.
pub(crate) fn decode_cell(scan_type: ScanType, value: ValueRef<'_>, column: &str) -> Result<CellValue> {
    match (scan_type, value) {
        (ScanType::Int64, ValueRef::Integer(v)) => Ok(CellValue::Int(v)),
        (ScanType::Float64, ValueRef::Real(v)) => Ok(CellValue::Float(v)),
        #[allow(clippy::cast_precision_loss)]
        (ScanType::Float64, ValueRef::Integer(v)) => Ok(CellValue::Float(v as f64)),
        (ScanType::Text, ValueRef::Text(bytes)) => match std::str::from_utf8(bytes) {
            Ok(s) => Ok(CellValue::Text(s.to_owned())),
            Err(e) => Err(SqliteArrowError::scan(column, format!("invalid UTF-8: {e}"))),
        },
        // rusqlite's own rule for booleans: any non-zero INTEGER is true
        (ScanType::Bool, ValueRef::Integer(v)) => Ok(CellValue::Bool(v != 0)),
        (ScanType::Timestamp, ValueRef::Text(bytes)) => match std::str::from_utf8(bytes) {
            Ok(s) => Ok(CellValue::Timestamp(timestamp_from_text(s, column)?)),
            Err(e) => Err(SqliteArrowError::scan(column, format!("invalid UTF-8: {e}"))),
        },
        (ScanType::Timestamp, ValueRef::Integer(seconds)) => {
            Ok(CellValue::Timestamp(Timestamp::from_unix_seconds(seconds)))
        }
        (expected, ValueRef::Null) => Err(SqliteArrowError::scan(
            column,
            format!("cannot scan NULL into a non-nullable {expected} column"),
        )),
        (expected, other) => Err(SqliteArrowError::scan(
            column,
            format!("expected {expected}, got a {} value", other.data_type()),
        )),
    }
}
