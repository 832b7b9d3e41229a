//! Internal events for metrics emission.
//!
//! Each event struct represents a measurable occurrence in the pipeline.
//! Events implement the `InternalEvent` trait which emits the corresponding
//! counter or histogram metric.

use metrics::{counter, histogram};
use std::time::Duration;
use tracing::trace;

/// Trait for internal events that can be emitted as metrics.
pub trait InternalEvent {
    /// Emit this event as a metric.
    fn emit(self);
}

/// Storage operation kinds.
#[derive(Debug, Clone, Copy)]
pub enum StorageOperation {
    List,
    Get,
    Put,
    Delete,
}

impl StorageOperation {
    fn as_str(&self) -> &'static str {
        match self {
            StorageOperation::List => "list",
            StorageOperation::Get => "get",
            StorageOperation::Put => "put",
            StorageOperation::Delete => "delete",
        }
    }
}

/// Outcome of a storage request.
#[derive(Debug, Clone, Copy)]
pub enum RequestStatus {
    Success,
    Error,
}

impl RequestStatus {
    fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Success => "success",
            RequestStatus::Error => "error",
        }
    }
}

/// Event emitted for every storage request.
pub struct StorageRequest {
    pub operation: StorageOperation,
    pub status: RequestStatus,
}

impl InternalEvent for StorageRequest {
    fn emit(self) {
        trace!(
            operation = self.operation.as_str(),
            status = self.status.as_str(),
            "Storage request"
        );
        counter!(
            "starlift_storage_requests_total",
            "operation" => self.operation.as_str(),
            "status" => self.status.as_str()
        )
        .increment(1);
    }
}

/// Event emitted with the duration of a storage request.
pub struct StorageRequestDuration {
    pub operation: StorageOperation,
    pub duration: Duration,
}

impl InternalEvent for StorageRequestDuration {
    fn emit(self) {
        histogram!(
            "starlift_storage_request_duration_seconds",
            "operation" => self.operation.as_str()
        )
        .record(self.duration.as_secs_f64());
    }
}

/// Event emitted when input objects are discovered under a prefix.
pub struct ObjectsDiscovered {
    pub count: u64,
}

impl InternalEvent for ObjectsDiscovered {
    fn emit(self) {
        trace!(count = self.count, "Objects discovered");
        counter!("starlift_objects_discovered_total").increment(self.count);
    }
}

/// Event emitted when records are decoded into the dataset.
pub struct RecordsLoaded {
    pub count: u64,
}

impl InternalEvent for RecordsLoaded {
    fn emit(self) {
        trace!(count = self.count, "Records loaded");
        counter!("starlift_records_loaded_total").increment(self.count);
    }
}

/// Event emitted when a table's rows are materialized for writing.
pub struct RowsWritten {
    pub table: &'static str,
    pub count: u64,
}

impl InternalEvent for RowsWritten {
    fn emit(self) {
        trace!(table = self.table, count = self.count, "Rows written");
        counter!("starlift_rows_written_total", "table" => self.table).increment(self.count);
    }
}

/// Event emitted when serialized table bytes land in the destination.
pub struct BytesWritten {
    pub bytes: u64,
}

impl InternalEvent for BytesWritten {
    fn emit(self) {
        trace!(bytes = self.bytes, "Bytes written");
        counter!("starlift_bytes_written_total").increment(self.bytes);
    }
}

/// Event emitted when a table write completes.
pub struct TableWritten {
    pub table: &'static str,
}

impl InternalEvent for TableWritten {
    fn emit(self) {
        trace!(table = self.table, "Table written");
        counter!("starlift_tables_written_total", "table" => self.table).increment(1);
    }
}
