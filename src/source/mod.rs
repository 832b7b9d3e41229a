//! Dataset loading.
//!
//! Given the discovered object paths, infers a unified schema from a
//! representative sample and loads every matching object into one logical
//! in-memory dataset, tolerating per-object schema drift.

mod inference;
mod reader;

pub use inference::infer_record_schema;
pub use reader::RecordDecoder;

use arrow::array::RecordBatch;
use arrow::compute::concat_batches;
use arrow::datatypes::SchemaRef;
use snafu::prelude::*;
use tracing::{debug, info};

use crate::emit;
use crate::error::{ArrowSnafu, EmptyInputSnafu, LoadError, ObjectReadSnafu, TransformError};
use crate::metrics::events::RecordsLoaded;
use crate::storage::StorageProvider;

/// Suffix of objects accepted into the dataset.
const ACCEPTED_SUFFIX: &str = ".json";

/// A sequence of uniformly-shaped records.
#[derive(Debug, Clone)]
pub struct Dataset {
    /// The sampled, authoritative schema.
    pub schema: SchemaRef,
    /// Record batches accumulated across all loaded objects.
    pub batches: Vec<RecordBatch>,
}

impl Dataset {
    /// Total number of records in the dataset.
    pub fn record_count(&self) -> usize {
        self.batches.iter().map(|b| b.num_rows()).sum()
    }

    /// Concatenate all batches into one for the table builders.
    pub fn to_batch(&self) -> Result<RecordBatch, TransformError> {
        concat_batches(&self.schema, &self.batches).context(ArrowSnafu)
    }
}

/// Loads JSON objects into a [`Dataset`].
pub struct DatasetLoader<'a> {
    storage: &'a StorageProvider,
    batch_size: usize,
}

impl<'a> DatasetLoader<'a> {
    /// Create a loader over the given storage provider.
    pub fn new(storage: &'a StorageProvider, batch_size: usize) -> Self {
        Self {
            storage,
            batch_size,
        }
    }

    /// Load all matching objects into one dataset.
    ///
    /// The representative path for schema inference is the second
    /// discovered path, falling back to the first when only one exists.
    /// The choice is arbitrary but deterministic over the sorted
    /// discovery output.
    pub async fn load(&self, paths: &[String]) -> Result<Dataset, LoadError> {
        let sample_path = paths
            .get(1)
            .or_else(|| paths.first())
            .context(EmptyInputSnafu)?;

        debug!("Sampling schema from {}", sample_path);
        let sample_bytes = self
            .storage
            .get(sample_path.as_str())
            .await
            .context(ObjectReadSnafu { path: sample_path })?;
        let schema = infer_record_schema(&sample_bytes)?;

        let decoder = RecordDecoder::new(schema.clone(), self.batch_size);
        let mut batches = Vec::new();
        let mut record_count = 0;

        for path in paths {
            if !path.ends_with(ACCEPTED_SUFFIX) {
                continue;
            }

            let bytes = self
                .storage
                .get(path.as_str())
                .await
                .context(ObjectReadSnafu { path })?;

            for batch in decoder.decode(&bytes, path)? {
                record_count += batch.num_rows();
                batches.push(batch);
            }
        }

        info!(
            "Loaded {} records from {} objects ({} fields)",
            record_count,
            paths.len(),
            schema.fields().len()
        );
        emit!(RecordsLoaded {
            count: record_count as u64
        });

        Ok(Dataset { schema, batches })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::{Array, StringArray};
    use tempfile::TempDir;

    async fn storage_for(dir: &TempDir) -> StorageProvider {
        StorageProvider::for_url(dir.path().to_str().unwrap())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_load_empty_input_fails() {
        let temp_dir = TempDir::new().unwrap();
        let storage = storage_for(&temp_dir).await;

        let loader = DatasetLoader::new(&storage, 1024);
        let err = loader.load(&[]).await.unwrap_err();
        assert!(matches!(err, LoadError::EmptyInput));
    }

    #[tokio::test]
    async fn test_schema_tolerance_null_fills_omitted_field() {
        let temp_dir = TempDir::new().unwrap();
        let base = temp_dir.path();

        // The second path (sorted) is the sample and carries the full shape.
        std::fs::write(base.join("a.json"), r#"{"id": "1"}"#).unwrap();
        std::fs::write(base.join("b.json"), r#"{"id": "2", "extra": "x"}"#).unwrap();

        let storage = storage_for(&temp_dir).await;
        let loader = DatasetLoader::new(&storage, 1024);
        let dataset = loader
            .load(&["a.json".to_string(), "b.json".to_string()])
            .await
            .unwrap();

        assert_eq!(dataset.record_count(), 2);
        let batch = dataset.to_batch().unwrap();
        let extra = batch
            .column(batch.schema().index_of("extra").unwrap())
            .as_any()
            .downcast_ref::<StringArray>()
            .unwrap()
            .clone();
        assert!(extra.is_null(0));
        assert_eq!(extra.value(1), "x");
    }

    #[tokio::test]
    async fn test_single_object_uses_first_as_sample() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("only.json"), r#"{"id": "1"}"#).unwrap();

        let storage = storage_for(&temp_dir).await;
        let loader = DatasetLoader::new(&storage, 1024);
        let dataset = loader.load(&["only.json".to_string()]).await.unwrap();

        assert_eq!(dataset.record_count(), 1);
    }
}
