//! Table persistence.
//!
//! Each star-schema table becomes one Parquet object under its own
//! directory at the destination root. Writes are full replacements: the
//! prior artifact is cleared before the new one lands, so a run that
//! fails between the clear and the put can leave the destination empty
//! until the next successful run.

mod parquet;

pub use self::parquet::serialize_batch;

use arrow::array::RecordBatch;
use snafu::prelude::*;
use tracing::info;

use crate::config::ParquetCompression;
use crate::emit;
use crate::error::{CleanupSnafu, UploadSnafu, WriteError};
use crate::metrics::events::{BytesWritten, RowsWritten, TableWritten};
use crate::storage::StorageProvider;

/// Name of the single Parquet part written per table.
const PART_NAME: &str = "part-00000.parquet";

/// Writes star-schema tables to the destination.
pub struct TableWriter<'a> {
    storage: &'a StorageProvider,
    compression: ParquetCompression,
}

impl<'a> TableWriter<'a> {
    pub fn new(storage: &'a StorageProvider, compression: ParquetCompression) -> Self {
        Self {
            storage,
            compression,
        }
    }

    /// Replace a table at the destination with the given batch.
    ///
    /// Returns the number of rows written.
    pub async fn write_table(
        &self,
        table: &'static str,
        batch: &RecordBatch,
    ) -> Result<usize, WriteError> {
        let buffer = serialize_batch(batch, self.compression)?;
        let destination = format!("{table}/{PART_NAME}");

        let cleared = self
            .storage
            .delete_prefix(table)
            .await
            .context(CleanupSnafu {
                destination: table.to_string(),
            })?;
        if cleared > 0 {
            info!("Cleared {} prior object(s) under {}", cleared, table);
        }

        let bytes = buffer.len();
        self.storage
            .put(destination.as_str(), buffer.into())
            .await
            .context(UploadSnafu {
                destination: destination.clone(),
            })?;

        info!(
            "Wrote {} rows ({} bytes) to {}",
            batch.num_rows(),
            bytes,
            destination
        );
        emit!(RowsWritten {
            table,
            count: batch.num_rows() as u64
        });
        emit!(BytesWritten {
            bytes: bytes as u64
        });
        emit!(TableWritten { table });

        Ok(batch.num_rows())
    }
}
