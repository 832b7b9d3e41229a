//! JSON object decoder.
//!
//! Decodes one object's bytes (a single JSON record or newline-delimited
//! records) against the sampled schema, yielding Arrow RecordBatches.

use arrow::array::RecordBatch;
use arrow::datatypes::SchemaRef;
use arrow::json::ReaderBuilder;
use bytes::Bytes;
use std::sync::Arc;
use tracing::debug;

use crate::error::{DecoderBuildSnafu, LoadError, SchemaConflictSnafu};

/// A decoder for JSON objects that yields Arrow RecordBatches.
///
/// Runs in non-strict mode: fields absent from an object are null-filled,
/// fields absent from the sampled schema are ignored. A type conflict with
/// the sampled schema is a hard error.
pub struct RecordDecoder {
    schema: SchemaRef,
    batch_size: usize,
}

impl RecordDecoder {
    /// Create a new decoder for the given sampled schema.
    pub fn new(schema: SchemaRef, batch_size: usize) -> Self {
        Self { schema, batch_size }
    }

    /// Decode an object's bytes into record batches.
    ///
    /// # Arguments
    /// * `bytes` - The raw object contents
    /// * `path` - Object path (used for error messages and logging)
    pub fn decode(&self, bytes: &Bytes, path: &str) -> Result<Vec<RecordBatch>, LoadError> {
        let mut decoder = ReaderBuilder::new(Arc::clone(&self.schema))
            .with_batch_size(self.batch_size)
            .with_strict_mode(false)
            .build_decoder()
            .map_err(|e| {
                DecoderBuildSnafu {
                    message: e.to_string(),
                }
                .build()
            })?;

        // Decode and flush in interleaved fashion - decode() stops after
        // batch_size records, so we must flush after each decode to get
        // all records
        let mut offset = 0;
        let mut batches = Vec::new();

        loop {
            let consumed = decoder.decode(&bytes[offset..]).map_err(|e| {
                SchemaConflictSnafu {
                    path: path.to_string(),
                    message: e.to_string(),
                }
                .build()
            })?;

            if let Some(batch) = decoder.flush().map_err(|e| {
                SchemaConflictSnafu {
                    path: path.to_string(),
                    message: e.to_string(),
                }
                .build()
            })? {
                batches.push(batch);
            }

            if consumed == 0 {
                let remaining = &bytes[offset..];
                if !remaining.iter().all(|&b| b.is_ascii_whitespace()) {
                    debug!(
                        "Could not parse {} trailing bytes in {}",
                        remaining.len(),
                        path
                    );
                }
                break;
            }
            offset += consumed;
        }

        Ok(batches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::{Array, Int64Array, StringArray};
    use arrow::datatypes::{DataType, Field, Schema};

    fn sample_schema() -> SchemaRef {
        Arc::new(Schema::new(vec![
            Field::new("id", DataType::Utf8, true),
            Field::new("count", DataType::Int64, true),
        ]))
    }

    #[test]
    fn test_decode_single_record() {
        let decoder = RecordDecoder::new(sample_schema(), 1024);
        let bytes = Bytes::from(r#"{"id": "A", "count": 3}"#);

        let batches = decoder.decode(&bytes, "a.json").unwrap();
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].num_rows(), 1);
    }

    #[test]
    fn test_decode_missing_field_nulls() {
        let decoder = RecordDecoder::new(sample_schema(), 1024);
        let bytes = Bytes::from(r#"{"id": "A"}"#);

        let batches = decoder.decode(&bytes, "a.json").unwrap();
        let counts = batches[0]
            .column(1)
            .as_any()
            .downcast_ref::<Int64Array>()
            .unwrap();
        assert!(counts.is_null(0));
    }

    #[test]
    fn test_decode_extra_field_ignored() {
        let decoder = RecordDecoder::new(sample_schema(), 1024);
        let bytes = Bytes::from(r#"{"id": "A", "count": 1, "unexpected": true}"#);

        let batches = decoder.decode(&bytes, "a.json").unwrap();
        assert_eq!(batches[0].num_columns(), 2);
        let ids = batches[0]
            .column(0)
            .as_any()
            .downcast_ref::<StringArray>()
            .unwrap();
        assert_eq!(ids.value(0), "A");
    }

    #[test]
    fn test_decode_type_conflict_fails_fast() {
        let decoder = RecordDecoder::new(sample_schema(), 1024);
        let bytes = Bytes::from(r#"{"id": "A", "count": "not-a-number"}"#);

        let err = decoder.decode(&bytes, "bad.json").unwrap_err();
        assert!(matches!(err, LoadError::SchemaConflict { .. }));
    }

    #[test]
    fn test_decode_newline_delimited_records() {
        let decoder = RecordDecoder::new(sample_schema(), 1024);
        let bytes = Bytes::from("{\"id\": \"A\", \"count\": 1}\n{\"id\": \"B\", \"count\": 2}\n");

        let batches = decoder.decode(&bytes, "multi.json").unwrap();
        let total: usize = batches.iter().map(|b| b.num_rows()).sum();
        assert_eq!(total, 2);
    }
}
