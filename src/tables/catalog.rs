//! Catalog dimension builders.
//!
//! Projects the catalog dataset into the work dimension and the
//! deduplicated contributor dimension. No join happens at this stage.

use arrow::array::RecordBatch;

use super::{dedup_rows, project};
use crate::error::TransformError;

/// Build the work dimension.
///
/// Straight projection; catalog entries are assumed unique by `work_id`
/// upstream and that is not enforced here.
pub fn build_work_table(catalog: &RecordBatch) -> Result<RecordBatch, TransformError> {
    project(
        catalog,
        &[
            ("work_id", "work_id"),
            ("title", "title"),
            ("contributor_id", "contributor_id"),
            ("release_year", "release_year"),
            ("duration_seconds", "duration_seconds"),
        ],
    )
}

/// Build the contributor dimension, deduplicated by exact row equality.
pub fn build_contributor_table(catalog: &RecordBatch) -> Result<RecordBatch, TransformError> {
    let contributors = project(
        catalog,
        &[
            ("contributor_id", "contributor_id"),
            ("name", "name"),
            ("location", "location"),
            ("latitude", "latitude"),
            ("longitude", "longitude"),
        ],
    )?;
    dedup_rows(&contributors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::{Float64Array, Int64Array, StringArray};
    use arrow::datatypes::{DataType, Field, Schema};
    use std::sync::Arc;

    fn catalog_batch() -> RecordBatch {
        let schema = Arc::new(Schema::new(vec![
            Field::new("work_id", DataType::Utf8, true),
            Field::new("title", DataType::Utf8, true),
            Field::new("contributor_id", DataType::Utf8, true),
            Field::new("release_year", DataType::Int64, true),
            Field::new("duration_seconds", DataType::Float64, true),
            Field::new("name", DataType::Utf8, true),
            Field::new("location", DataType::Utf8, true),
            Field::new("latitude", DataType::Float64, true),
            Field::new("longitude", DataType::Float64, true),
        ]));
        RecordBatch::try_new(
            schema,
            vec![
                Arc::new(StringArray::from(vec!["W1", "W2"])),
                Arc::new(StringArray::from(vec!["Song A", "Song B"])),
                Arc::new(StringArray::from(vec!["C1", "C1"])),
                Arc::new(Int64Array::from(vec![2000, 2001])),
                Arc::new(Float64Array::from(vec![180.0, 240.0])),
                Arc::new(StringArray::from(vec!["Artist A", "Artist A"])),
                Arc::new(StringArray::from(vec!["NYC", "NYC"])),
                Arc::new(Float64Array::from(vec![40.7, 40.7])),
                Arc::new(Float64Array::from(vec![-74.0, -74.0])),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_work_table_no_dedup() {
        let works = build_work_table(&catalog_batch()).unwrap();
        assert_eq!(works.num_rows(), 2);
        assert_eq!(works.num_columns(), 5);
        assert_eq!(works.schema().field(0).name(), "work_id");
    }

    #[test]
    fn test_contributor_table_dedups_full_rows() {
        // Both catalog records carry the same contributor tuple
        let contributors = build_contributor_table(&catalog_batch()).unwrap();
        assert_eq!(contributors.num_rows(), 1);

        let names = contributors
            .column(1)
            .as_any()
            .downcast_ref::<StringArray>()
            .unwrap();
        assert_eq!(names.value(0), "Artist A");
    }
}
