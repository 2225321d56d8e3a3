//! Column accumulators.
//!
//! One accumulator per result-set column, owned for the whole read and
//! consumed when the output batch is assembled. A closed enum rather than
//! boxed builder trait objects: the scan-type set is five variants, so the
//! exhaustive match is the whole dispatch story.

use std::sync::Arc;

use arrow_array::builder::{ArrayBuilder, BooleanBuilder, Float64Builder, Int64Builder, StringBuilder};
use arrow_array::{ArrayRef, StringArray};

use crate::types::Timestamp;
use crate::types::scan::CellValue;
use crate::types::ScanType;

/// Growable, single-typed accumulator for one column's values.
///
/// Int/float/text/bool columns accumulate directly into Arrow builders.
/// Timestamp columns accumulate parsed civil values and convert to RFC3339
/// text only at [`finish`](Self::finish), the accumulator-to-column
/// conversion step.
#[derive(Debug)]
pub(crate) enum ColumnBuilder {
    Int64(Int64Builder),
    Float64(Float64Builder),
    Text(StringBuilder),
    Bool(BooleanBuilder),
    Timestamp(Vec<Timestamp>),
}

impl ColumnBuilder {
    /// Create an empty accumulator for the given scan type.
    ///
    /// `row_capacity` pre-allocates value slots; `string_capacity` bytes
    /// are pre-allocated for text data.
    pub(crate) fn with_capacity(
        scan_type: ScanType,
        row_capacity: usize,
        string_capacity: usize,
    ) -> Self {
        match scan_type {
            ScanType::Int64 => Self::Int64(Int64Builder::with_capacity(row_capacity)),
            ScanType::Float64 => Self::Float64(Float64Builder::with_capacity(row_capacity)),
            ScanType::Text => Self::Text(StringBuilder::with_capacity(row_capacity, string_capacity)),
            ScanType::Bool => Self::Bool(BooleanBuilder::with_capacity(row_capacity)),
            ScanType::Timestamp => Self::Timestamp(Vec::with_capacity(row_capacity)),
        }
    }

    /// Append one decoded cell.
    ///
    /// The cell variant always matches the accumulator variant: both are
    /// derived from the same scan type, and decoding happens against that
    /// type before anything is appended.
    pub(crate) fn append(&mut self, cell: CellValue) {
        match (self, cell) {
            (Self::Int64(builder), CellValue::Int(v)) => builder.append_value(v),
            (Self::Float64(builder), CellValue::Float(v)) => builder.append_value(v),
            (Self::Text(builder), CellValue::Text(v)) => builder.append_value(v),
            (Self::Bool(builder), CellValue::Bool(v)) => builder.append_value(v),
            (Self::Timestamp(values), CellValue::Timestamp(v)) => values.push(v),
            _ => unreachable!("cell decoded against a different column type"),
        }
    }

    /// Number of values accumulated so far.
    pub(crate) fn len(&self) -> usize {
        match self {
            Self::Int64(builder) => builder.len(),
            Self::Float64(builder) => builder.len(),
            Self::Text(builder) => builder.len(),
            Self::Bool(builder) => builder.len(),
            Self::Timestamp(values) => values.len(),
        }
    }

    /// Convert the accumulated values into the output array.
    ///
    /// Timestamps are formatted here with the fixed RFC3339 form.
    pub(crate) fn finish(&mut self) -> ArrayRef {
        match self {
            Self::Int64(builder) => Arc::new(builder.finish()),
            Self::Float64(builder) => Arc::new(builder.finish()),
            Self::Text(builder) => Arc::new(builder.finish()),
            Self::Bool(builder) => Arc::new(builder.finish()),
            Self::Timestamp(values) => Arc::new(StringArray::from_iter_values(
                std::mem::take(values).iter().map(Timestamp::to_rfc3339),
            )),
        }
    }
}
