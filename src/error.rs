//! Error types for starlift using snafu.
//!
//! This module defines structured error types with context selectors for
//! all error conditions in the codebase.

use snafu::prelude::*;

// ============ Storage Errors ============

/// Errors that can occur during storage operations.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum StorageError {
    /// Invalid storage URL format.
    #[snafu(display("Invalid storage URL: {url}"))]
    InvalidUrl { url: String },

    /// Object store operation failed.
    #[snafu(display("Storage operation failed"))]
    ObjectStore { source: object_store::Error },

    /// IO error during storage operations.
    #[snafu(display("IO error"))]
    Io { source: std::io::Error },

    /// S3 configuration error.
    #[snafu(display("S3 configuration error"))]
    S3Config { source: object_store::Error },
}

impl StorageError {
    /// Check if this error represents a "not found" condition (404, NoSuchKey, etc.)
    pub fn is_not_found(&self) -> bool {
        match self {
            StorageError::ObjectStore { source } => {
                matches!(source, object_store::Error::NotFound { .. })
            }
            _ => false,
        }
    }
}

// ============ Config Errors ============

/// Errors that can occur during configuration parsing and validation.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ConfigError {
    /// AWS access key id is missing from the credentials section.
    #[snafu(display("Missing aws_access_key_id in credentials section"))]
    MissingAccessKeyId,

    /// AWS secret access key is missing from the credentials section.
    #[snafu(display("Missing aws_secret_access_key in credentials section"))]
    MissingSecretAccessKey,

    /// Source URL is empty.
    #[snafu(display("Source URL cannot be empty"))]
    EmptySourceUrl,

    /// Sink URL is empty.
    #[snafu(display("Sink URL cannot be empty"))]
    EmptySinkUrl,

    /// Failed to parse YAML configuration.
    #[snafu(display("Failed to parse YAML configuration"))]
    YamlParse { source: serde_yaml::Error },

    /// Failed to read configuration file.
    #[snafu(display("Failed to read configuration file"))]
    ReadFile { source: std::io::Error },
}

// ============ Discovery Errors ============

/// Errors that can occur while walking the source namespace.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum DiscoveryError {
    /// Listing a prefix failed. The whole discovery aborts; there is no
    /// partial result.
    #[snafu(display("Failed to list prefix {prefix}"))]
    Listing {
        prefix: String,
        source: StorageError,
    },
}

// ============ Load Errors ============

/// Errors that can occur while loading JSON objects into a dataset.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum LoadError {
    /// No matching objects were found, so there is nothing to infer a
    /// schema from.
    #[snafu(display("No input objects found under source prefix"))]
    EmptyInput,

    /// Schema inference from the representative object failed.
    #[snafu(display("Schema inference failed: {message}"))]
    SchemaInference { message: String },

    /// Failed to read an object from storage.
    #[snafu(display("Failed to read object {path}"))]
    ObjectRead { path: String, source: StorageError },

    /// Failed to build the JSON decoder for the sampled schema.
    #[snafu(display("Failed to build JSON decoder: {message}"))]
    DecoderBuild { message: String },

    /// An object's contents conflict with the sampled schema. The sampled
    /// schema is authoritative; no coercion is attempted.
    #[snafu(display("Object {path} does not match the sampled schema: {message}"))]
    SchemaConflict { path: String, message: String },
}

// ============ Transform Errors ============

/// Errors that can occur while building the dimensional tables.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum TransformError {
    /// A required column is absent from the dataset.
    #[snafu(display("Missing column {name}"))]
    MissingColumn { name: String },

    /// A column has an unexpected physical type.
    #[snafu(display("Column {name} is not of type {expected}"))]
    ColumnType { name: String, expected: String },

    /// Arrow compute kernel failed.
    #[snafu(display("Arrow compute failed"))]
    Arrow { source: arrow::error::ArrowError },
}

// ============ Write Errors ============

/// Errors that can occur while persisting a table.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum WriteError {
    /// Parquet serialization failed.
    #[snafu(display("Parquet write error"))]
    Parquet {
        source: parquet::errors::ParquetError,
    },

    /// Failed to clear the prior artifact at the destination.
    #[snafu(display("Failed to clear destination {destination}"))]
    Cleanup {
        destination: String,
        source: StorageError,
    },

    /// Failed to upload the serialized table.
    #[snafu(display("Failed to write table to {destination}"))]
    Upload {
        destination: String,
        source: StorageError,
    },
}

// ============ Etl Error (top-level) ============

/// Top-level errors that aggregate all error types.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum EtlError {
    /// Configuration error.
    #[snafu(display("Configuration error"))]
    Config { source: ConfigError },

    /// Storage error.
    #[snafu(display("Storage error"))]
    EtlStorage { source: StorageError },

    /// Discovery error.
    #[snafu(display("Discovery error"))]
    Discovery { source: DiscoveryError },

    /// Dataset load error.
    #[snafu(display("Load error"))]
    Load { source: LoadError },

    /// Table construction error.
    #[snafu(display("Transform error"))]
    Transform { source: TransformError },

    /// Output write error.
    #[snafu(display("Write error"))]
    Write { source: WriteError },
}
