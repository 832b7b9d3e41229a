//! Batch ETL that reshapes raw JSON event and catalog records in object
//! storage into a five-table Parquet star schema.
//!
//! The pipeline discovers JSON objects under two source prefixes, loads
//! them into in-memory Arrow datasets with a sampled schema, builds the
//! dimensional tables, and full-replaces each table at the destination.

pub mod config;
pub mod discover;
pub mod error;
pub mod metrics;
pub mod pipeline;
pub mod sink;
pub mod source;
pub mod storage;
pub mod tables;

pub use config::Config;
pub use error::EtlError;
pub use pipeline::{run_pipeline, EtlPipeline, PipelineStats};
pub use storage::{StorageProvider, StorageProviderRef};
