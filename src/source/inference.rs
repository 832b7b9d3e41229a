//! Schema inference from a representative JSON object.
//!
//! Uses Arrow's built-in JSON schema inference to detect field names and
//! types from the sampled object. The sampled schema becomes authoritative
//! for the whole dataset.

use std::io::Cursor;
use std::sync::Arc;

use arrow::datatypes::{Field, Schema, SchemaRef};
use arrow::json::reader::infer_json_schema;
use bytes::Bytes;
use tracing::debug;

use crate::error::{LoadError, SchemaInferenceSnafu};
use snafu::prelude::*;

/// Number of records to sample for schema inference.
const SAMPLE_SIZE: usize = 1000;

/// Infer the record schema from the representative object's bytes.
///
/// All fields are forced nullable so that objects omitting a field are
/// accepted with nulls rather than rejected.
pub fn infer_record_schema(bytes: &Bytes) -> Result<SchemaRef, LoadError> {
    let reader = Cursor::new(bytes.as_ref());
    let (schema, records_read) =
        infer_json_schema(reader, Some(SAMPLE_SIZE)).map_err(|e| LoadError::SchemaInference {
            message: e.to_string(),
        })?;

    ensure!(
        records_read > 0,
        SchemaInferenceSnafu {
            message: "representative object contains no records".to_string(),
        }
    );

    debug!(
        "Inferred schema with {} fields from {} sampled records",
        schema.fields().len(),
        records_read
    );

    Ok(force_nullable(&schema))
}

/// Rebuild the schema with every field nullable.
fn force_nullable(schema: &Schema) -> SchemaRef {
    let fields: Vec<Field> = schema
        .fields()
        .iter()
        .map(|f| Field::new(f.name(), f.data_type().clone(), true))
        .collect();

    Arc::new(Schema::new(fields))
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::datatypes::DataType;

    fn make_json(records: &[&str]) -> Bytes {
        Bytes::from(records.join("\n"))
    }

    #[test]
    fn test_infer_basic_types() {
        let bytes = make_json(&[
            r#"{"work_id": "W1", "title": "Song A", "release_year": 2000, "duration_seconds": 180.5}"#,
        ]);

        let schema = infer_record_schema(&bytes).unwrap();

        assert_eq!(schema.fields().len(), 4);
        assert_eq!(
            schema.field_with_name("work_id").unwrap().data_type(),
            &DataType::Utf8
        );
        assert_eq!(
            schema.field_with_name("release_year").unwrap().data_type(),
            &DataType::Int64
        );
        assert_eq!(
            schema
                .field_with_name("duration_seconds")
                .unwrap()
                .data_type(),
            &DataType::Float64
        );
    }

    #[test]
    fn test_inferred_fields_are_nullable() {
        let bytes = make_json(&[r#"{"id": 1, "name": "x"}"#]);

        let schema = infer_record_schema(&bytes).unwrap();

        assert!(schema.fields().iter().all(|f| f.is_nullable()));
    }

    #[test]
    fn test_infer_empty_object_error() {
        let bytes = Bytes::new();
        let result = infer_record_schema(&bytes);
        assert!(matches!(result, Err(LoadError::SchemaInference { .. })));
    }
}
