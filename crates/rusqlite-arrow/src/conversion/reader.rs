//! Result-set to `RecordBatch` materialization.
//!
//! Resolution runs once per query, then the row loop decodes each row into
//! typed locals and appends row-atomically into per-column accumulators.
//! On loop exit the accumulators convert into arrays and the batch is
//! assembled. Any failure aborts the whole read; no partial batch is ever
//! observable.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use arrow_array::{ArrayRef, RecordBatch};
use arrow_schema::{Field, Schema};
use rusqlite::{Connection, Row};
use tracing::{debug, trace};

use crate::Result;
use crate::builders::column::ColumnBuilder;
use crate::error::SqliteArrowError;
use crate::schema::mapping::{PlannedColumn, resolve_columns};
use crate::types::ScanType;
use crate::types::scan::{CellValue, decode_cell};

/// Configuration for a read.
///
/// Controls accumulator pre-allocation and optional cooperative
/// cancellation.
///
/// # Example
///
/// ```rust,ignore
/// use rusqlite_arrow::ReadOptions;
///
/// let options = ReadOptions::with_row_capacity(10_000).string_capacity(256 * 1024);
/// ```
#[derive(Debug, Clone)]
pub struct ReadOptions {
    /// Number of rows to pre-allocate in each accumulator.
    ///
    /// Larger values reduce reallocation for big result sets. Default: 1024.
    pub row_capacity: usize,

    /// Bytes to pre-allocate for each text accumulator's data. Default: 32KB.
    pub string_capacity: usize,

    /// Cooperative cancellation flag, checked between rows.
    ///
    /// When the flag becomes true the read aborts with an interruption
    /// error and all partial accumulation is discarded.
    pub cancel: Option<Arc<AtomicBool>>,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            row_capacity: 1024,
            string_capacity: 32 * 1024,
            cancel: None,
        }
    }
}

impl ReadOptions {
    /// Create options with the specified accumulator row capacity.
    #[must_use]
    pub fn with_row_capacity(row_capacity: usize) -> Self {
        Self {
            row_capacity,
            ..Default::default()
        }
    }

    /// Set the text accumulator data capacity.
    #[must_use]
    pub fn string_capacity(mut self, capacity: usize) -> Self {
        self.string_capacity = capacity;
        self
    }

    /// Attach a cancellation flag checked between rows.
    #[must_use]
    pub fn cancel(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }
}

/// One bound column: name, scan type, and its accumulator.
struct BoundColumn {
    name: String,
    scan_type: ScanType,
    builder: ColumnBuilder,
}

/// Accumulates decoded rows into per-column builders.
///
/// Rows commit atomically: every cell of a row is decoded into the reusable
/// row buffer first, and only a fully decoded row is appended, so all
/// accumulators hold the same number of values at every step.
struct BatchCollector {
    columns: Vec<BoundColumn>,
    cells: Vec<CellValue>,
    rows: usize,
}

impl BatchCollector {
    /// Bind every planned column to a scan type and fresh accumulator.
    ///
    /// Columns left unresolved by declared-type resolution are bound from
    /// `first_row`'s storage classes; with no row to consult, such a
    /// column's type is undeterminable and the read fails naming it.
    fn bind(
        plan: &[PlannedColumn],
        first_row: Option<&Row<'_>>,
        options: &ReadOptions,
    ) -> Result<Self> {
        let columns = plan
            .iter()
            .enumerate()
            .map(|(idx, planned)| {
                let scan_type = match planned.scan_type {
                    Some(scan_type) => scan_type,
                    None => bind_from_row(planned, idx, first_row)?,
                };
                Ok(BoundColumn {
                    name: planned.name.clone(),
                    scan_type,
                    builder: ColumnBuilder::with_capacity(
                        scan_type,
                        options.row_capacity,
                        options.string_capacity,
                    ),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let cells = Vec::with_capacity(columns.len());
        Ok(Self {
            columns,
            cells,
            rows: 0,
        })
    }

    /// Decode and append one row.
    ///
    /// The row buffer is filled completely before any accumulator is
    /// touched; a failing cell aborts with every column still at the
    /// previous row count.
    fn append_row(&mut self, row: &Row<'_>) -> Result<()> {
        self.cells.clear();
        for (idx, column) in self.columns.iter().enumerate() {
            let value = row
                .get_ref(idx)
                .map_err(|e| SqliteArrowError::scan(&column.name, e.to_string()))?;
            self.cells.push(decode_cell(column.scan_type, value, &column.name)?);
        }
        for (column, cell) in self.columns.iter_mut().zip(self.cells.drain(..)) {
            column.builder.append(cell);
        }
        self.rows += 1;
        Ok(())
    }

    /// Convert every accumulator and assemble the output batch.
    fn finish(mut self) -> Result<RecordBatch> {
        let fields: Vec<Field> = self
            .columns
            .iter()
            .map(|column| Field::new(&column.name, column.scan_type.arrow_type(), false))
            .collect();
        let arrays: Vec<ArrayRef> = self
            .columns
            .iter_mut()
            .map(|column| column.builder.finish())
            .collect();

        let batch = RecordBatch::try_new(Arc::new(Schema::new(fields)), arrays)?;
        debug!(
            rows = batch.num_rows(),
            columns = batch.num_columns(),
            "materialized result set"
        );
        Ok(batch)
    }
}

/// Bind an undeclared column from the first row's storage class.
fn bind_from_row(
    planned: &PlannedColumn,
    idx: usize,
    first_row: Option<&Row<'_>>,
) -> Result<ScanType> {
    let row = first_row.ok_or_else(|| {
        SqliteArrowError::unsupported_column_type(
            &planned.name,
            "type could not be determined: no declared type and no rows to infer from",
        )
    })?;
    let value = row.get_ref(idx)?;
    let class = value.data_type();
    ScanType::from_storage_class(class).ok_or_else(|| {
        SqliteArrowError::unsupported_column_type(
            &planned.name,
            format!("type could not be determined from a {class} value"),
        )
    })
}

/// Execute a query and materialize its full result set as one
/// `RecordBatch`.
///
/// Column order follows the result set; column types come from declared
/// column types, or from the first row for expression columns. Timestamp
/// columns normalize to RFC3339 text.
///
/// # Errors
///
/// Fails when a column's type cannot be determined or is unsupported, a
/// value fails to scan (including NULL), the cursor fails mid-iteration,
/// or the engine rejects the query. No partial batch is returned.
///
/// # Example
///
/// ```
/// use rusqlite::Connection;
/// use rusqlite_arrow::query_to_arrow;
///
/// # fn main() -> rusqlite_arrow::Result<()> {
/// let conn = Connection::open_in_memory()?;
/// conn.execute_batch(
///     "CREATE TABLE t (id INTEGER, name TEXT);
///      INSERT INTO t VALUES (1, 'a'), (2, 'b');",
/// )?;
///
/// let batch = query_to_arrow(&conn, "SELECT id, name FROM t ORDER BY id")?;
/// assert_eq!(batch.num_rows(), 2);
/// assert_eq!(batch.num_columns(), 2);
/// # Ok(())
/// # }
/// ```
pub fn query_to_arrow(conn: &Connection, sql: &str) -> Result<RecordBatch> {
    query_to_arrow_with_options(conn, sql, &ReadOptions::default())
}

/// Execute a query and materialize its result set with explicit options.
///
/// Behaves as [`query_to_arrow`], with accumulator capacity hints and an
/// optional cancellation flag checked between rows. Cancellation discards
/// all partial accumulation.
///
/// # Errors
///
/// As [`query_to_arrow`], plus an interruption error when the
/// cancellation flag is set.
pub fn query_to_arrow_with_options(
    conn: &Connection,
    sql: &str,
    options: &ReadOptions,
) -> Result<RecordBatch> {
    let mut stmt = conn.prepare(sql)?;
    let plan = resolve_columns(&stmt)?;
    let fully_declared = plan.iter().all(|column| column.scan_type.is_some());

    let mut collector = if fully_declared {
        Some(BatchCollector::bind(&plan, None, options)?)
    } else {
        trace!("column types partially undeclared, deferring to first row");
        None
    };

    let mut rows = stmt.query([])?;
    loop {
        if let Some(flag) = &options.cancel {
            if flag.load(Ordering::Relaxed) {
                return Err(SqliteArrowError::interrupted());
            }
        }

        // Cursor advancement errors are the engine's post-row failure
        // channel, distinct from per-cell scan failures.
        let row = match rows.next() {
            Ok(Some(row)) => row,
            Ok(None) => break,
            Err(e) => return Err(SqliteArrowError::row_iteration(e.to_string())),
        };

        if collector.is_none() {
            collector = Some(BatchCollector::bind(&plan, Some(row), options)?);
        }
        if let Some(collector) = collector.as_mut() {
            collector.append_row(row)?;
        }
    }

    match collector {
        Some(collector) => collector.finish(),
        None => {
            // Zero rows with at least one undeclared column: nothing to
            // infer from.
            let name = plan
                .iter()
                .find(|column| column.scan_type.is_none())
                .map(|column| column.name.as_str())
                .unwrap_or_default();
            Err(SqliteArrowError::unsupported_column_type(
                name,
                "type could not be determined: no declared type and the result set produced no rows",
            ))
        }
    }
}
