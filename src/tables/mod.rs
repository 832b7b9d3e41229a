//! Dimensional table construction.
//!
//! The builders consume the loaded datasets and produce the star-schema
//! tables as Arrow RecordBatches. Shared projection, dedup, and join
//! helpers live here; the per-table logic is in the submodules.

pub mod catalog;
pub mod events;
pub mod plays;

use arrow::array::{Array, ArrayRef, RecordBatch, StringArray, UInt32Array, new_null_array};
use arrow::compute::take;
use arrow::datatypes::{Field, Schema};
use arrow::row::{RowConverter, SortField};
use snafu::prelude::*;
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{ArrowSnafu, ColumnTypeSnafu, MissingColumnSnafu, TransformError};

/// Look up a column by name.
pub(crate) fn column<'a>(
    batch: &'a RecordBatch,
    name: &str,
) -> Result<&'a ArrayRef, TransformError> {
    let index = batch
        .schema_ref()
        .index_of(name)
        .ok()
        .context(MissingColumnSnafu { name })?;
    Ok(batch.column(index))
}

/// Look up a column by name and downcast it to a string array.
pub(crate) fn string_column<'a>(
    batch: &'a RecordBatch,
    name: &str,
) -> Result<&'a StringArray, TransformError> {
    column(batch, name)?
        .as_any()
        .downcast_ref::<StringArray>()
        .context(ColumnTypeSnafu {
            name,
            expected: "Utf8",
        })
}

/// Project columns out of a batch, renaming them on the way.
///
/// `columns` is a list of `(source_name, output_name)` pairs. Output
/// fields are nullable regardless of the source, since downstream joins
/// may introduce nulls.
pub(crate) fn project(
    batch: &RecordBatch,
    columns: &[(&str, &str)],
) -> Result<RecordBatch, TransformError> {
    let mut fields = Vec::with_capacity(columns.len());
    let mut arrays = Vec::with_capacity(columns.len());

    for (source, output) in columns {
        let array = column(batch, source)?;
        fields.push(Field::new(*output, array.data_type().clone(), true));
        arrays.push(array.clone());
    }

    RecordBatch::try_new(Arc::new(Schema::new(fields)), arrays).context(ArrowSnafu)
}

/// Deduplicate a batch by exact row equality.
///
/// The first occurrence of each distinct row is retained and input order
/// is preserved. Idempotent: applying it twice yields the same rows as
/// applying it once.
pub(crate) fn dedup_rows(batch: &RecordBatch) -> Result<RecordBatch, TransformError> {
    if batch.num_rows() == 0 {
        return Ok(batch.clone());
    }

    let sort_fields: Vec<SortField> = batch
        .schema_ref()
        .fields()
        .iter()
        .map(|f| SortField::new(f.data_type().clone()))
        .collect();
    let converter = RowConverter::new(sort_fields).context(ArrowSnafu)?;
    let rows = converter
        .convert_columns(batch.columns())
        .context(ArrowSnafu)?;

    // Sort by row content with the index as tiebreak, then keep the first
    // index of each run of equal rows.
    let mut order: Vec<usize> = (0..batch.num_rows()).collect();
    order.sort_by(|&a, &b| rows.row(a).cmp(&rows.row(b)).then(a.cmp(&b)));

    let mut kept: Vec<u32> = Vec::with_capacity(order.len());
    for (position, &index) in order.iter().enumerate() {
        if position == 0 || rows.row(index) != rows.row(order[position - 1]) {
            kept.push(index as u32);
        }
    }
    kept.sort_unstable();

    take_batch(batch, &UInt32Array::from(kept))
}

/// Left-outer-join two batches on string key equality.
///
/// The output carries every left column unchanged plus the `carry`
/// columns from the right side, renamed per `(source_name, output_name)`.
/// Unmatched left rows keep nulls in the carried columns; duplicate keys
/// on the right fan out. Null keys never match.
pub(crate) fn left_join(
    left: &RecordBatch,
    left_key: &str,
    right: &RecordBatch,
    right_key: &str,
    carry: &[(&str, &str)],
) -> Result<RecordBatch, TransformError> {
    let left_keys = string_column(left, left_key)?;
    let right_keys = string_column(right, right_key)?;

    let mut by_key: HashMap<&str, Vec<u32>> = HashMap::new();
    for i in 0..right_keys.len() {
        if right_keys.is_valid(i) {
            by_key.entry(right_keys.value(i)).or_default().push(i as u32);
        }
    }

    let mut left_take: Vec<u32> = Vec::with_capacity(left.num_rows());
    let mut right_take: Vec<Option<u32>> = Vec::with_capacity(left.num_rows());
    for i in 0..left_keys.len() {
        let matches = if left_keys.is_valid(i) {
            by_key.get(left_keys.value(i))
        } else {
            None
        };
        match matches {
            Some(indices) => {
                for &r in indices {
                    left_take.push(i as u32);
                    right_take.push(Some(r));
                }
            }
            None => {
                left_take.push(i as u32);
                right_take.push(None);
            }
        }
    }

    let out_len = left_take.len();
    let left_indices = UInt32Array::from(left_take);
    let right_indices = UInt32Array::from(right_take);

    let mut fields: Vec<Field> = left
        .schema_ref()
        .fields()
        .iter()
        .map(|f| f.as_ref().clone())
        .collect();
    let mut arrays: Vec<ArrayRef> = Vec::with_capacity(fields.len() + carry.len());
    for array in left.columns() {
        arrays.push(take(array.as_ref(), &left_indices, None).context(ArrowSnafu)?);
    }

    for (source, output) in carry {
        let array = column(right, source)?;
        fields.push(Field::new(*output, array.data_type().clone(), true));
        // An empty right side cannot be taken from; the carried column is
        // all nulls in that case.
        let carried = if right.num_rows() == 0 {
            new_null_array(array.data_type(), out_len)
        } else {
            take(array.as_ref(), &right_indices, None).context(ArrowSnafu)?
        };
        arrays.push(carried);
    }

    RecordBatch::try_new(Arc::new(Schema::new(fields)), arrays).context(ArrowSnafu)
}

/// Take rows of every column in a batch by index.
pub(crate) fn take_batch(
    batch: &RecordBatch,
    indices: &UInt32Array,
) -> Result<RecordBatch, TransformError> {
    let arrays = batch
        .columns()
        .iter()
        .map(|array| take(array.as_ref(), indices, None).context(ArrowSnafu))
        .collect::<Result<Vec<_>, _>>()?;

    RecordBatch::try_new(batch.schema(), arrays).context(ArrowSnafu)
}
