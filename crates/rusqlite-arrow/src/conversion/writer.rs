//! `RecordBatch` to table materialization.
//!
//! Validates every identifier, infers one SQL column type per Arrow
//! column, then creates the table and inserts row by row inside a single
//! transaction. Any failure after the transaction begins rolls it back
//! before the error surfaces.

use arrow_array::{
    Array, ArrayRef, BooleanArray, Float32Array, Float64Array, Int8Array, Int16Array, Int32Array,
    Int64Array, LargeStringArray, RecordBatch, StringArray, UInt8Array, UInt16Array, UInt32Array,
};
use arrow_cast::display::array_value_to_string;
use arrow_schema::DataType;
use rusqlite::types::Value;
use rusqlite::{Connection, params_from_iter};
use tracing::debug;

use crate::Result;
use crate::error::SqliteArrowError;

/// Check a name against the identifier policy: non-empty, letters, digits,
/// and underscores only.
#[must_use]
pub fn is_valid_identifier(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_alphanumeric() || c == '_')
}

/// Validate an identifier, naming its role on rejection.
fn validate_identifier(name: &str, context: &str) -> Result<()> {
    if is_valid_identifier(name) {
        Ok(())
    } else {
        Err(SqliteArrowError::invalid_identifier(name, context))
    }
}

/// Infer the SQL column type for an Arrow column type.
///
/// Integer widths widen to INTEGER, float widths to REAL; anything outside
/// the known set lands in a TEXT column with display-formatted values.
const fn sql_column_type(data_type: &DataType) -> &'static str {
    match data_type {
        DataType::Int8
        | DataType::Int16
        | DataType::Int32
        | DataType::Int64
        | DataType::UInt8
        | DataType::UInt16
        | DataType::UInt32 => "INTEGER",
        DataType::Float32 | DataType::Float64 => "REAL",
        DataType::Utf8 | DataType::LargeUtf8 => "TEXT",
        DataType::Boolean => "BOOLEAN",
        _ => "TEXT",
    }
}

/// Build the CREATE TABLE statement for a batch's schema.
///
/// Identifiers must already be validated; they are double-quoted in the
/// emitted SQL.
fn create_table_sql(batch: &RecordBatch, table_name: &str) -> String {
    let schema = batch.schema();
    let columns: Vec<String> = schema
        .fields()
        .iter()
        .map(|field| format!("\"{}\" {}", field.name(), sql_column_type(field.data_type())))
        .collect();
    format!("CREATE TABLE \"{table_name}\" ({})", columns.join(", "))
}

/// Extract one cell as a SQL parameter value.
///
/// Arrow nulls insert SQL NULL. Types outside the known set are rendered
/// with Arrow's display formatting into the column's TEXT form; a value
/// that cannot be rendered fails naming the column.
fn cell_param(column: &str, array: &ArrayRef, row: usize) -> Result<Value> {
    if array.is_null(row) {
        return Ok(Value::Null);
    }

    macro_rules! extract {
        ($array_type:ty, $wrap:expr) => {
            array
                .as_any()
                .downcast_ref::<$array_type>()
                .map(|a| $wrap(a.value(row)))
                .ok_or_else(|| {
                    SqliteArrowError::unsupported_data_type(column, "array downcast failed")
                })
        };
    }

    match array.data_type() {
        DataType::Int8 => extract!(Int8Array, |v| Value::Integer(i64::from(v))),
        DataType::Int16 => extract!(Int16Array, |v| Value::Integer(i64::from(v))),
        DataType::Int32 => extract!(Int32Array, |v| Value::Integer(i64::from(v))),
        DataType::Int64 => extract!(Int64Array, Value::Integer),
        DataType::UInt8 => extract!(UInt8Array, |v| Value::Integer(i64::from(v))),
        DataType::UInt16 => extract!(UInt16Array, |v| Value::Integer(i64::from(v))),
        DataType::UInt32 => extract!(UInt32Array, |v| Value::Integer(i64::from(v))),
        DataType::Float32 => extract!(Float32Array, |v| Value::Real(f64::from(v))),
        DataType::Float64 => extract!(Float64Array, Value::Real),
        DataType::Utf8 => extract!(StringArray, |v: &str| Value::Text(v.to_owned())),
        DataType::LargeUtf8 => extract!(LargeStringArray, |v: &str| Value::Text(v.to_owned())),
        DataType::Boolean => extract!(BooleanArray, |v| Value::Integer(i64::from(v))),
        _ => array_value_to_string(array, row)
            .map(Value::Text)
            .map_err(|e| SqliteArrowError::unsupported_data_type(column, e.to_string())),
    }
}

/// Materialize a `RecordBatch` into a new table.
///
/// Validates the table name and every column name, creates the table, and
/// inserts all rows with a parameterized statement inside one transaction.
/// A batch with zero rows is a legal no-op: the table is created and the
/// transaction still commits.
///
/// # Errors
///
/// Fails with an invalid-identifier error before touching the database
/// when any name violates the policy; transaction begin/commit failures
/// surface as transaction errors; any other failure rolls the transaction
/// back and propagates. The target table must not already exist.
///
/// # Example
///
/// ```rust,ignore
/// use rusqlite_arrow::batch_to_table;
///
/// batch_to_table(&mut conn, &batch, "scores")?;
/// ```
pub fn batch_to_table(conn: &mut Connection, batch: &RecordBatch, table_name: &str) -> Result<()> {
    validate_identifier(table_name, "table name")?;
    let schema = batch.schema();
    for field in schema.fields().iter() {
        validate_identifier(field.name(), "column name")?;
    }

    let tx = conn
        .transaction()
        .map_err(|e| SqliteArrowError::transaction(format!("failed to begin: {e}")))?;

    tx.execute(&create_table_sql(batch, table_name), [])?;

    if batch.num_rows() > 0 {
        let placeholders = vec!["?"; batch.num_columns()].join(", ");
        let insert_sql = format!("INSERT INTO \"{table_name}\" VALUES ({placeholders})");
        let mut stmt = tx.prepare(&insert_sql)?;

        for row in 0..batch.num_rows() {
            let params = schema
                .fields()
                .iter()
                .zip(batch.columns())
                .map(|(field, array)| cell_param(field.name(), array, row))
                .collect::<Result<Vec<Value>>>()?;
            stmt.execute(params_from_iter(params))?;
        }
    }

    tx.commit()
        .map_err(|e| SqliteArrowError::transaction(format!("failed to commit: {e}")))?;

    debug!(
        table = table_name,
        rows = batch.num_rows(),
        columns = batch.num_columns(),
        "materialized batch into table"
    );
    Ok(())
}

/// Render a batch as row-major records: a header row of column names
/// followed by one display-formatted row per batch row.
///
/// # Errors
///
/// Fails naming the column when a value cannot be rendered.
pub fn batch_to_records(batch: &RecordBatch) -> Result<Vec<Vec<String>>> {
    let schema = batch.schema();
    let mut records = Vec::with_capacity(batch.num_rows() + 1);
    records.push(
        schema
            .fields()
            .iter()
            .map(|field| field.name().clone())
            .collect(),
    );

    for row in 0..batch.num_rows() {
        let record = schema
            .fields()
            .iter()
            .zip(batch.columns())
            .map(|(field, array)| {
                array_value_to_string(array, row)
                    .map_err(|e| SqliteArrowError::unsupported_data_type(field.name(), e.to_string()))
            })
            .collect::<Result<Vec<String>>>()?;
        records.push(record);
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use arrow_schema::{Field, Schema};

    use super::*;

    fn sample_batch() -> RecordBatch {
        let schema = Arc::new(Schema::new(vec![
            Field::new("id", DataType::Int64, false),
            Field::new("name", DataType::Utf8, false),
            Field::new("score", DataType::Float64, false),
            Field::new("active", DataType::Boolean, false),
        ]));
        RecordBatch::try_new(
            schema,
            vec![
                Arc::new(Int64Array::from(vec![1, 2])),
                Arc::new(StringArray::from(vec!["a", "b"])),
                Arc::new(Float64Array::from(vec![9.5, 8.0])),
                Arc::new(BooleanArray::from(vec![true, false])),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_identifier_policy() {
        assert!(is_valid_identifier("scores"));
        assert!(is_valid_identifier("my_table_2"));
        assert!(is_valid_identifier("Üben"));
        assert!(!is_valid_identifier(""));
        assert!(!is_valid_identifier("bad-name!"));
        assert!(!is_valid_identifier("drop table"));
        assert!(!is_valid_identifier("x;--"));
    }

    #[test]
    fn test_sql_column_type_inference() {
        assert_eq!(sql_column_type(&DataType::Int64), "INTEGER");
        assert_eq!(sql_column_type(&DataType::Int16), "INTEGER");
        assert_eq!(sql_column_type(&DataType::Float64), "REAL");
        assert_eq!(sql_column_type(&DataType::Utf8), "TEXT");
        assert_eq!(sql_column_type(&DataType::Boolean), "BOOLEAN");
        assert_eq!(sql_column_type(&DataType::Date32), "TEXT");
    }

    #[test]
    fn test_create_table_sql() {
        let batch = sample_batch();
        assert_eq!(
            create_table_sql(&batch, "scores"),
            "CREATE TABLE \"scores\" (\"id\" INTEGER, \"name\" TEXT, \"score\" REAL, \"active\" BOOLEAN)"
        );
    }

    #[test]
    fn test_write_rejects_bad_table_name() {
        let mut conn = Connection::open_in_memory().unwrap();
        let err = batch_to_table(&mut conn, &sample_batch(), "bad-name!").unwrap_err();
        assert!(err.is_invalid_identifier());

        // No schema mutation happened.
        let tables: i64 = conn
            .query_row("SELECT count(*) FROM sqlite_master", [], |r| r.get(0))
            .unwrap();
        assert_eq!(tables, 0);
    }

    #[test]
    fn test_write_rejects_bad_column_name() {
        let schema = Arc::new(Schema::new(vec![Field::new("bad name", DataType::Int64, false)]));
        let batch =
            RecordBatch::try_new(schema, vec![Arc::new(Int64Array::from(vec![1]))]).unwrap();

        let mut conn = Connection::open_in_memory().unwrap();
        let err = batch_to_table(&mut conn, &batch, "t").unwrap_err();
        assert!(err.is_invalid_identifier());
    }

    #[test]
    fn test_write_and_count() {
        let mut conn = Connection::open_in_memory().unwrap();
        batch_to_table(&mut conn, &sample_batch(), "scores").unwrap();

        let rows: i64 = conn
            .query_row("SELECT count(*) FROM scores", [], |r| r.get(0))
            .unwrap();
        assert_eq!(rows, 2);
    }

    #[test]
    fn test_write_existing_table_fails() {
        let mut conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE scores (x INTEGER)").unwrap();

        let err = batch_to_table(&mut conn, &sample_batch(), "scores").unwrap_err();
        assert!(err.is_sqlite());
    }

    #[test]
    fn test_records_view() {
        let records = batch_to_records(&sample_batch()).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0], vec!["id", "name", "score", "active"]);
        assert_eq!(records[1][0], "1");
        assert_eq!(records[1][1], "a");
        assert_eq!(records[2][3], "false");
    }
}
