//! Recursive discovery of input objects.
//!
//! Walks the storage namespace under a prefix, expanding sub-prefixes
//! depth-first and retaining objects that end with the accepted suffix.

use futures::FutureExt;
use futures::future::BoxFuture;
use snafu::prelude::*;
use tracing::debug;

use crate::emit;
use crate::error::{DiscoveryError, ListingSnafu};
use crate::metrics::events::ObjectsDiscovered;
use crate::storage::StorageProvider;

/// Suffix accepted by the discoverer.
const ACCEPTED_SUFFIX: &str = ".json";

/// Discover all JSON objects under a prefix, recursively.
///
/// The result is sorted, so the order is stable within a run and the
/// loader's sample selection is reproducible. A listing failure at any
/// level fails the whole discovery, naming the offending prefix.
pub async fn discover(
    storage: &StorageProvider,
    prefix: &str,
) -> Result<Vec<String>, DiscoveryError> {
    let mut paths = walk(storage, prefix.to_string()).await?;
    paths.sort();

    debug!(
        "Discovered {} objects ending in {} under {}",
        paths.len(),
        ACCEPTED_SUFFIX,
        prefix
    );
    emit!(ObjectsDiscovered {
        count: paths.len() as u64
    });

    Ok(paths)
}

/// Depth-first expansion of one prefix level.
///
/// Boxed because async recursion needs an indirection for its future type.
fn walk(
    storage: &StorageProvider,
    prefix: String,
) -> BoxFuture<'_, Result<Vec<String>, DiscoveryError>> {
    async move {
        let (objects, sub_prefixes) = storage
            .list_children(&prefix)
            .await
            .context(ListingSnafu { prefix })?;

        let mut paths: Vec<String> = objects
            .into_iter()
            .filter(|path| path.ends_with(ACCEPTED_SUFFIX))
            .collect();

        for sub in sub_prefixes {
            paths.extend(walk(storage, sub).await?);
        }

        Ok(paths)
    }
    .boxed()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn storage_for(dir: &TempDir) -> StorageProvider {
        StorageProvider::for_url(dir.path().to_str().unwrap())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_discovery_completeness_across_depths() {
        let temp_dir = TempDir::new().unwrap();
        let base = temp_dir.path();

        // Objects at depth 0..3 under the prefix, plus non-matching suffixes
        std::fs::create_dir_all(base.join("data/a/b")).unwrap();
        std::fs::write(base.join("data/root.json"), b"{}").unwrap();
        std::fs::write(base.join("data/a/one.json"), b"{}").unwrap();
        std::fs::write(base.join("data/a/b/two.json"), b"{}").unwrap();
        std::fs::write(base.join("data/a/skip.csv"), b"x").unwrap();
        std::fs::write(base.join("data/a/b/skip.txt"), b"x").unwrap();

        let storage = storage_for(&temp_dir).await;
        let paths = discover(&storage, "data").await.unwrap();

        assert_eq!(
            paths,
            vec![
                "data/a/b/two.json".to_string(),
                "data/a/one.json".to_string(),
                "data/root.json".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_discovery_excludes_sibling_prefixes() {
        let temp_dir = TempDir::new().unwrap();
        let base = temp_dir.path();

        std::fs::create_dir_all(base.join("catalog")).unwrap();
        std::fs::create_dir_all(base.join("events")).unwrap();
        std::fs::write(base.join("catalog/c.json"), b"{}").unwrap();
        std::fs::write(base.join("events/e.json"), b"{}").unwrap();

        let storage = storage_for(&temp_dir).await;
        let paths = discover(&storage, "catalog").await.unwrap();

        assert_eq!(paths, vec!["catalog/c.json".to_string()]);
    }

    #[tokio::test]
    async fn test_discovery_empty_prefix_yields_empty_set() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::create_dir_all(temp_dir.path().join("empty")).unwrap();

        let storage = storage_for(&temp_dir).await;
        let paths = discover(&storage, "empty").await.unwrap();

        assert!(paths.is_empty());
    }

    #[tokio::test]
    async fn test_discovery_order_is_stable() {
        let temp_dir = TempDir::new().unwrap();
        let base = temp_dir.path();

        std::fs::create_dir_all(base.join("data/z")).unwrap();
        std::fs::create_dir_all(base.join("data/a")).unwrap();
        std::fs::write(base.join("data/z/1.json"), b"{}").unwrap();
        std::fs::write(base.join("data/a/2.json"), b"{}").unwrap();

        let storage = storage_for(&temp_dir).await;
        let first = discover(&storage, "data").await.unwrap();
        let second = discover(&storage, "data").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(first[0], "data/a/2.json");
    }
}
