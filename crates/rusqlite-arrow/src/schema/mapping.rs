//! Column type resolution from prepared-statement metadata.
//!
//! Resolution happens once per query, before the row loop, so the loop is
//! purely mechanical (decode, append). SQLite reports a declared type for
//! table-backed columns only; expression and aggregate columns carry none
//! and are resolved from the first fetched row's storage classes instead.
//!
//! # Declared Type Mapping Table
//!
//! Keyword matching follows SQLite's own type-affinity rules, restricted
//! to the closed scan-type set:
//!
//! | Declared type contains | Scan type | Notes |
//! |------------------------|-----------|-------|
//! | `INT` | Int64 | INTEGER, BIGINT, SMALLINT, ... |
//! | `CHAR`, `CLOB`, `TEXT` | Text | VARCHAR(n), CHAR(n), TEXT, ... |
//! | `BLOB` | — | not materializable, resolution fails |
//! | `REAL`, `FLOA`, `DOUB` | Float64 | REAL, FLOAT, DOUBLE PRECISION |
//! | `BOOL` | Bool | stored as INTEGER 0/1 |
//! | `DATE`, `TIME` | Timestamp | DATE, DATETIME, TIMESTAMP |
//! | `DEC`, `NUMERIC` | Float64 | NUMERIC affinity, no decimal class |
//! | anything else | — | resolution fails |

use rusqlite::Statement;

use crate::Result;
use crate::error::SqliteArrowError;
use crate::types::ScanType;

/// One planned result-set column: display name plus resolved scan type.
///
/// `scan_type` is `None` for columns with no declared type; those are
/// bound from the first row before any value is accumulated. The plan is
/// an ordered, positionally-indexed list: column order is the output
/// order, and duplicate names are preserved verbatim.
#[derive(Debug, Clone)]
pub(crate) struct PlannedColumn {
    pub name: String,
    pub scan_type: Option<ScanType>,
}

/// Map a declared SQLite column type to its scan type.
///
/// Returns `None` for declared types outside the supported set (BLOB and
/// anything unrecognized).
#[must_use]
pub fn declared_type_to_scan(declared: &str) -> Option<ScanType> {
    let upper = declared.to_ascii_uppercase();

    if upper.contains("INT") {
        Some(ScanType::Int64)
    } else if upper.contains("CHAR") || upper.contains("CLOB") || upper.contains("TEXT") {
        Some(ScanType::Text)
    } else if upper.contains("BLOB") {
        None
    } else if upper.contains("REAL") || upper.contains("FLOA") || upper.contains("DOUB") {
        Some(ScanType::Float64)
    } else if upper.contains("BOOL") {
        Some(ScanType::Bool)
    } else if upper.contains("DATE") || upper.contains("TIME") {
        Some(ScanType::Timestamp)
    } else if upper.contains("DEC") || upper.contains("NUMERIC") {
        Some(ScanType::Float64)
    } else {
        None
    }
}

/// Resolve the column plan for a prepared statement.
///
/// Fail-fast: the first column with an unsupported declared type aborts
/// resolution naming that column; no partial plan is returned. Columns
/// with no declared type stay unresolved in the plan.
pub(crate) fn resolve_columns(stmt: &Statement<'_>) -> Result<Vec<PlannedColumn>> {
    stmt.columns()
        .iter()
        .map(|column| {
            let scan_type = match column.decl_type() {
                Some(declared) => Some(declared_type_to_scan(declared).ok_or_else(|| {
                    SqliteArrowError::unsupported_column_type(
                        column.name(),
                        format!("declared type '{declared}' is not supported"),
                    )
                })?),
                None => None,
            };
            Ok(PlannedColumn {
                name: column.name().to_owned(),
                scan_type,
            })
        })
        .collect()
}
