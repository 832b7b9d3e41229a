//! Configuration parsing and validation.
//!
//! Loads the credentials and namespace configuration from a YAML file.
//! The source and sink locations carry deploy-time defaults; only the
//! credentials section is mandatory.

use serde::{Deserialize, Serialize};
use snafu::prelude::*;
use std::collections::HashMap;
use std::path::Path;

use crate::error::{
    ConfigError, EmptySinkUrlSnafu, EmptySourceUrlSnafu, MissingAccessKeyIdSnafu,
    MissingSecretAccessKeySnafu, ReadFileSnafu, YamlParseSnafu,
};

/// Main configuration structure for the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// AWS credentials. Absence of either key is a fatal startup error.
    pub credentials: CredentialsConfig,
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub sink: SinkConfig,
}

/// Credentials section of the configuration file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CredentialsConfig {
    #[serde(default)]
    pub aws_access_key_id: String,
    #[serde(default)]
    pub aws_secret_access_key: String,
}

/// Source configuration for the input namespace.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Bucket URL holding the raw JSON objects.
    #[serde(default = "default_source_url")]
    pub url: String,

    /// Prefix of the catalog (work/contributor) objects.
    #[serde(default = "default_catalog_prefix")]
    pub catalog_prefix: String,

    /// Prefix of the event log objects.
    #[serde(default = "default_events_prefix")]
    pub events_prefix: String,

    /// Batch size for decoding records (default: 8192).
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            url: default_source_url(),
            catalog_prefix: default_catalog_prefix(),
            events_prefix: default_events_prefix(),
            batch_size: default_batch_size(),
        }
    }
}

/// Sink configuration for the output namespace.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SinkConfig {
    /// Destination root for the five output tables.
    #[serde(default = "default_sink_url")]
    pub url: String,

    /// Parquet compression codec.
    #[serde(default)]
    pub compression: ParquetCompression,
}

impl Default for SinkConfig {
    fn default() -> Self {
        Self {
            url: default_sink_url(),
            compression: ParquetCompression::default(),
        }
    }
}

fn default_source_url() -> String {
    "s3://udacity-dend".to_string()
}

fn default_catalog_prefix() -> String {
    "song_data/".to_string()
}

fn default_events_prefix() -> String {
    "log_data/".to_string()
}

fn default_batch_size() -> usize {
    8192
}

fn default_sink_url() -> String {
    "s3://sparkify-spark-sz/szsparkifyoutput".to_string()
}

/// Parquet compression codec.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ParquetCompression {
    Uncompressed,
    #[default]
    Snappy,
    Gzip,
    Zstd,
    Lz4,
}

impl Config {
    /// Load configuration from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).context(ReadFileSnafu)?;
        let config: Config = serde_yaml::from_str(&content).context(YamlParseSnafu)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure!(
            !self.credentials.aws_access_key_id.is_empty(),
            MissingAccessKeyIdSnafu
        );
        ensure!(
            !self.credentials.aws_secret_access_key.is_empty(),
            MissingSecretAccessKeySnafu
        );
        ensure!(!self.source.url.is_empty(), EmptySourceUrlSnafu);
        ensure!(!self.sink.url.is_empty(), EmptySinkUrlSnafu);
        Ok(())
    }

    /// Storage options passed through to the object store builder.
    pub fn storage_options(&self) -> HashMap<String, String> {
        HashMap::from([
            (
                "aws_access_key_id".to_string(),
                self.credentials.aws_access_key_id.clone(),
            ),
            (
                "aws_secret_access_key".to_string(),
                self.credentials.aws_secret_access_key.clone(),
            ),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_yaml_parsing() {
        let yaml = r#"
credentials:
  aws_access_key_id: AKIAEXAMPLE
  aws_secret_access_key: secret

source:
  url: "s3://bucket"
  catalog_prefix: "catalog/"
  events_prefix: "events/"

sink:
  url: "s3://bucket/warehouse"
  compression: zstd
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        config.validate().unwrap();

        assert_eq!(config.source.url, "s3://bucket");
        assert_eq!(config.source.catalog_prefix, "catalog/");
        assert_eq!(config.source.events_prefix, "events/");
        assert_eq!(config.sink.url, "s3://bucket/warehouse");
    }

    #[test]
    fn test_config_defaults() {
        let yaml = r#"
credentials:
  aws_access_key_id: AKIAEXAMPLE
  aws_secret_access_key: secret
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        config.validate().unwrap();

        assert_eq!(config.source.catalog_prefix, "song_data/");
        assert_eq!(config.source.events_prefix, "log_data/");
        assert_eq!(config.source.batch_size, 8192);
    }

    #[test]
    fn test_missing_credentials_fatal() {
        let yaml = r#"
credentials:
  aws_access_key_id: AKIAEXAMPLE
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::MissingSecretAccessKey));
    }

    #[test]
    fn test_storage_options_carry_credentials() {
        let yaml = r#"
credentials:
  aws_access_key_id: AKIAEXAMPLE
  aws_secret_access_key: secret
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        let options = config.storage_options();
        assert_eq!(
            options.get("aws_access_key_id").map(String::as_str),
            Some("AKIAEXAMPLE")
        );
        assert_eq!(
            options.get("aws_secret_access_key").map(String::as_str),
            Some("secret")
        );
    }
}
