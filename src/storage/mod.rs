//! Object storage abstraction.
//!
//! Provides a unified interface over S3 and the local filesystem. The
//! provider is constructed once at startup and passed by reference into
//! the discoverer, loader, and writer.

mod local;
mod s3;

use bytes::Bytes;
use futures::StreamExt;
use object_store::path::Path;
use object_store::{ObjectStore, PutPayload};
use regex::Regex;
use snafu::prelude::*;
use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};
use std::time::Instant;

use crate::emit;
use crate::error::{InvalidUrlSnafu, ObjectStoreSnafu, StorageError};
use crate::metrics::events::{
    RequestStatus, StorageOperation, StorageRequest, StorageRequestDuration,
};

// Re-export config types
pub use local::LocalConfig;
pub use s3::S3Config;

/// A reference-counted storage provider.
pub type StorageProviderRef = Arc<StorageProvider>;

/// Storage provider that abstracts over S3 and local filesystem backends.
#[derive(Clone)]
pub struct StorageProvider {
    pub(crate) config: BackendConfig,
    pub(crate) object_store: Arc<dyn ObjectStore>,
    pub(crate) canonical_url: String,
}

impl std::fmt::Debug for StorageProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "StorageProvider<{}>", self.canonical_url)
    }
}

// URL patterns for the supported storage backends
const S3_PATH: &str =
    r"^https://s3\.(?P<region>[\w\-]+)\.amazonaws\.com/(?P<bucket>[a-z0-9\-\.]+)(/(?P<key>.+))?$";
const S3_VIRTUAL: &str =
    r"^https://(?P<bucket>[a-z0-9\-\.]+)\.s3\.(?P<region>[\w\-]+)\.amazonaws\.com(/(?P<key>.+))?$";
const S3_URL: &str = r"^[sS]3[aA]?://(?P<bucket>[a-z0-9\-\.]+)(/(?P<key>.+))?$";

const FILE_URI: &str = r"^file://(?P<path>.*)$";
const FILE_PATH: &str = r"^/(?P<path>.*)$";

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
enum Backend {
    S3,
    Local,
}

fn matchers() -> &'static HashMap<Backend, Vec<Regex>> {
    static MATCHERS: OnceLock<HashMap<Backend, Vec<Regex>>> = OnceLock::new();
    MATCHERS.get_or_init(|| {
        let mut m = HashMap::new();

        m.insert(
            Backend::S3,
            vec![
                Regex::new(S3_PATH).unwrap(),
                Regex::new(S3_VIRTUAL).unwrap(),
                Regex::new(S3_URL).unwrap(),
            ],
        );

        m.insert(
            Backend::Local,
            vec![Regex::new(FILE_URI).unwrap(), Regex::new(FILE_PATH).unwrap()],
        );

        m
    })
}

/// Backend configuration enum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendConfig {
    S3(S3Config),
    Local(LocalConfig),
}

impl BackendConfig {
    /// Parse a URL into a backend configuration.
    pub fn parse_url(url: &str) -> Result<Self, StorageError> {
        for (k, v) in matchers() {
            if let Some(matches) = v.iter().filter_map(|r| r.captures(url)).next() {
                return match k {
                    Backend::S3 => Self::parse_s3(matches),
                    Backend::Local => Self::parse_local(matches),
                };
            }
        }

        InvalidUrlSnafu {
            url: url.to_string(),
        }
        .fail()
    }

    fn parse_s3(matches: regex::Captures) -> Result<Self, StorageError> {
        let bucket = matches
            .name("bucket")
            .expect("bucket should always be available")
            .as_str()
            .to_string();

        let region = std::env::var("AWS_DEFAULT_REGION")
            .ok()
            .or_else(|| matches.name("region").map(|m| m.as_str().to_string()));

        let key = matches.name("key").map(|m| m.as_str().into());

        Ok(BackendConfig::S3(S3Config {
            region,
            bucket,
            key,
        }))
    }

    fn parse_local(matches: regex::Captures) -> Result<Self, StorageError> {
        let path = matches
            .name("path")
            .expect("path regex must contain a path group")
            .as_str();

        let path = if !path.starts_with('/') {
            format!("/{path}")
        } else {
            path.to_string()
        };

        Ok(BackendConfig::Local(LocalConfig { path }))
    }

    pub(crate) fn key(&self) -> Option<&Path> {
        match self {
            BackendConfig::S3(s3) => s3.key.as_ref(),
            BackendConfig::Local(_) => None,
        }
    }
}

impl StorageProvider {
    /// Create a storage provider for the given URL with storage options.
    pub async fn for_url_with_options(
        url: &str,
        options: HashMap<String, String>,
    ) -> Result<Self, StorageError> {
        let config = BackendConfig::parse_url(url)?;

        match config {
            BackendConfig::S3(config) => Self::construct_s3(config, options).await,
            BackendConfig::Local(config) => Self::construct_local(config).await,
        }
    }

    /// Create a storage provider for the given URL without options.
    pub async fn for_url(url: &str) -> Result<Self, StorageError> {
        Self::for_url_with_options(url, HashMap::new()).await
    }

    /// Qualify a path with the configured key prefix.
    pub fn qualify_path<'a>(&self, path: &'a Path) -> Cow<'a, Path> {
        match self.config.key() {
            Some(prefix) => Cow::Owned(prefix.parts().chain(path.parts()).collect()),
            None => Cow::Borrowed(path),
        }
    }

    /// List the immediate children of a prefix.
    ///
    /// Returns `(object_paths, sub_prefixes)` relative to the provider's
    /// configured base. The object store drives listing continuation
    /// internally, so a single call covers the whole prefix level.
    pub async fn list_children(
        &self,
        prefix: &str,
    ) -> Result<(Vec<String>, Vec<String>), StorageError> {
        let full_prefix: Option<Path> = if prefix.is_empty() {
            self.config.key().cloned()
        } else {
            Some(self.qualify_path(&Path::from(prefix)).into_owned())
        };

        let start = Instant::now();
        let result = self
            .object_store
            .list_with_delimiter(full_prefix.as_ref())
            .await;

        let status = if result.is_ok() {
            RequestStatus::Success
        } else {
            RequestStatus::Error
        };
        emit!(StorageRequest {
            operation: StorageOperation::List,
            status,
        });
        emit!(StorageRequestDuration {
            operation: StorageOperation::List,
            duration: start.elapsed(),
        });

        let listed = result.context(ObjectStoreSnafu)?;
        let key_part_count = self
            .config
            .key()
            .map(|key| key.parts().count())
            .unwrap_or_default();

        let objects = listed
            .objects
            .into_iter()
            .map(|meta| {
                let relative: Path = meta.location.parts().skip(key_part_count).collect();
                relative.to_string()
            })
            .collect();

        let sub_prefixes = listed
            .common_prefixes
            .into_iter()
            .map(|p| {
                let relative: Path = p.parts().skip(key_part_count).collect();
                relative.to_string()
            })
            .collect();

        Ok((objects, sub_prefixes))
    }

    /// Get the contents of an object.
    pub async fn get(&self, path: impl Into<Path>) -> Result<Bytes, StorageError> {
        let path = path.into();
        let start = Instant::now();
        let result = self.object_store.get(&self.qualify_path(&path)).await;

        let status = if result.is_ok() {
            RequestStatus::Success
        } else {
            RequestStatus::Error
        };
        emit!(StorageRequest {
            operation: StorageOperation::Get,
            status,
        });
        emit!(StorageRequestDuration {
            operation: StorageOperation::Get,
            duration: start.elapsed(),
        });

        let bytes = result
            .context(ObjectStoreSnafu)?
            .bytes()
            .await
            .context(ObjectStoreSnafu)?;
        Ok(bytes)
    }

    /// Put bytes to a path.
    pub async fn put(&self, path: impl Into<Path>, bytes: Bytes) -> Result<(), StorageError> {
        let path = path.into();
        let path = self.qualify_path(&path);
        let start = Instant::now();
        let result = self.object_store.put(&path, PutPayload::from(bytes)).await;

        let status = if result.is_ok() {
            RequestStatus::Success
        } else {
            RequestStatus::Error
        };
        emit!(StorageRequest {
            operation: StorageOperation::Put,
            status,
        });
        emit!(StorageRequestDuration {
            operation: StorageOperation::Put,
            duration: start.elapsed(),
        });

        result.context(ObjectStoreSnafu)?;
        Ok(())
    }

    /// Delete every object under a prefix.
    ///
    /// Used by the writer to full-replace a table's prior artifact before
    /// putting the new one.
    pub async fn delete_prefix(&self, prefix: &str) -> Result<usize, StorageError> {
        let full_prefix = self.qualify_path(&Path::from(prefix)).into_owned();
        let mut listing = self.object_store.list(Some(&full_prefix));
        let mut deleted = 0;

        while let Some(meta) = listing.next().await {
            let meta = meta.context(ObjectStoreSnafu)?;
            let start = Instant::now();
            let result = self.object_store.delete(&meta.location).await;

            let status = if result.is_ok() {
                RequestStatus::Success
            } else {
                RequestStatus::Error
            };
            emit!(StorageRequest {
                operation: StorageOperation::Delete,
                status,
            });
            emit!(StorageRequestDuration {
                operation: StorageOperation::Delete,
                duration: start.elapsed(),
            });

            result.context(ObjectStoreSnafu)?;
            deleted += 1;
        }

        Ok(deleted)
    }

    /// Get the backend configuration.
    pub fn config(&self) -> &BackendConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_s3_url_parsing() {
        let config = BackendConfig::parse_url("s3://mybucket/path/to/data").unwrap();
        match config {
            BackendConfig::S3(s3) => {
                assert_eq!(s3.bucket, "mybucket");
                assert_eq!(s3.key, Some(Path::from("path/to/data")));
            }
            _ => panic!("Expected S3 config"),
        }
    }

    #[test]
    fn test_s3a_url_parsing() {
        let config = BackendConfig::parse_url("s3a://mybucket/song_data").unwrap();
        match config {
            BackendConfig::S3(s3) => {
                assert_eq!(s3.bucket, "mybucket");
                assert_eq!(s3.key, Some(Path::from("song_data")));
            }
            _ => panic!("Expected S3 config"),
        }
    }

    #[test]
    fn test_local_url_parsing() {
        let config = BackendConfig::parse_url("/local/path/to/data").unwrap();
        match config {
            BackendConfig::Local(local) => {
                assert_eq!(local.path, "/local/path/to/data");
            }
            _ => panic!("Expected Local config"),
        }
    }

    #[test]
    fn test_invalid_url_rejected() {
        let err = BackendConfig::parse_url("ftp://nope").unwrap_err();
        assert!(matches!(err, StorageError::InvalidUrl { .. }));
    }

    #[tokio::test]
    async fn test_list_children_separates_objects_and_prefixes() {
        let temp_dir = TempDir::new().unwrap();
        let base = temp_dir.path();

        std::fs::create_dir_all(base.join("data/nested")).unwrap();
        std::fs::write(base.join("data/a.json"), b"{}").unwrap();
        std::fs::write(base.join("data/nested/b.json"), b"{}").unwrap();

        let storage = StorageProvider::for_url(base.to_str().unwrap())
            .await
            .unwrap();

        let (objects, prefixes) = storage.list_children("data").await.unwrap();
        assert_eq!(objects, vec!["data/a.json".to_string()]);
        assert_eq!(prefixes, vec!["data/nested".to_string()]);
    }

    #[tokio::test]
    async fn test_put_get_delete_prefix_roundtrip() {
        let temp_dir = TempDir::new().unwrap();
        let storage = StorageProvider::for_url(temp_dir.path().to_str().unwrap())
            .await
            .unwrap();

        storage
            .put("table/part-00000.parquet", Bytes::from_static(b"old"))
            .await
            .unwrap();
        let content = storage.get("table/part-00000.parquet").await.unwrap();
        assert_eq!(content.as_ref(), b"old");

        let deleted = storage.delete_prefix("table").await.unwrap();
        assert_eq!(deleted, 1);

        let err = storage.get("table/part-00000.parquet").await.unwrap_err();
        assert!(err.is_not_found());
    }
}
