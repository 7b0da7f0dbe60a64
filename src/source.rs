//! Dataset source abstraction.
//!
//! The rendering core never touches the filesystem or network directly: it
//! asks an injected [`DataSource`] for a feature collection by dataset key.
//! Fetch mechanics, caching and retries belong to the source, not to the
//! renderer. The [`FetchCoordinator`] gives dataset swaps cancel-and-replace
//! semantics so a stale fetch can never overwrite a newer selection.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use futures::future::BoxFuture;
use futures::FutureExt;
use tracing::{debug, info};

use crate::dataset::FeatureCollection;
use crate::error::{HazmapError, Result};

/// Capability interface: given a dataset key, asynchronously yield a feature
/// collection or fail.
pub trait DataSource: Send + Sync {
    /// Fetch the dataset identified by `key`.
    fn fetch(&self, key: &str) -> BoxFuture<'_, Result<FeatureCollection>>;

    /// Get the name of this source, for logging
    fn name(&self) -> &str;
}

/// File-backed source reading `<root>/<key>_geodata.json`.
pub struct FileDataSource {
    root: PathBuf,
}

impl FileDataSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolve a dataset key to its on-disk path.
    fn dataset_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}_geodata.json", key))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl DataSource for FileDataSource {
    fn fetch(&self, key: &str) -> BoxFuture<'_, Result<FeatureCollection>> {
        let key = key.to_string();
        async move {
            validate_key(&key)?;
            let path = self.dataset_path(&key);
            debug!(key = %key, path = %path.display(), "Fetching dataset");

            let raw = tokio::fs::read_to_string(&path).await.map_err(|e| {
                HazmapError::DatasetFetch {
                    key: key.clone(),
                    message: format!("failed to read {}: {}", path.display(), e),
                }
            })?;

            let collection =
                FeatureCollection::from_geojson(&raw).map_err(|e| HazmapError::DatasetFetch {
                    key: key.clone(),
                    message: format!("malformed GeoJSON: {}", e),
                })?;

            info!(
                key = %key,
                features = collection.len(),
                layers = ?collection.layers(),
                "Dataset fetched"
            );
            Ok(collection)
        }
        .boxed()
    }

    fn name(&self) -> &str {
        "file"
    }
}

/// Dataset keys name files; restrict them to a filename-safe alphabet so a
/// key can never traverse outside the data directory.
fn validate_key(key: &str) -> Result<()> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(())
    } else {
        Err(HazmapError::InvalidParameter {
            param: "key".to_string(),
            message: format!("invalid dataset key: {:?}", key),
        })
    }
}

/// Monotonic fetch generations for cancel-and-replace.
///
/// Every fetch takes a ticket; a completion is applied only while its ticket
/// is still the newest. A later fetch supersedes all earlier outstanding
/// ones, so a slow stale response is dropped instead of overwriting the
/// newer selection.
#[derive(Debug, Default)]
pub struct FetchCoordinator {
    seq: AtomicU64,
}

impl FetchCoordinator {
    /// Start a new fetch, superseding all outstanding ones.
    pub fn begin(&self) -> u64 {
        self.seq.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Whether `ticket` still names the newest fetch.
    pub fn is_current(&self, ticket: u64) -> bool {
        self.seq.load(Ordering::SeqCst) == ticket
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_dataset(dir: &Path, key: &str, contents: &str) {
        let path = dir.join(format!("{}_geodata.json", key));
        let mut file = std::fs::File::create(path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
    }

    const VALID: &str = r#"{
        "type": "FeatureCollection",
        "features": [{
            "type": "Feature",
            "properties": {"layer": 1, "value": 5.0, "id": "A"},
            "geometry": {"type": "Polygon", "coordinates": [[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]]]}
        }]
    }"#;

    #[tokio::test]
    async fn test_fetch_reads_key_named_file() {
        let dir = tempfile::tempdir().unwrap();
        write_dataset(dir.path(), "flood_egypt", VALID);

        let source = FileDataSource::new(dir.path());
        let collection = source.fetch("flood_egypt").await.unwrap();
        assert_eq!(collection.len(), 1);
    }

    #[tokio::test]
    async fn test_fetch_missing_dataset_fails() {
        let dir = tempfile::tempdir().unwrap();
        let source = FileDataSource::new(dir.path());

        let result = source.fetch("absent").await;
        assert!(matches!(result, Err(HazmapError::DatasetFetch { .. })));
    }

    #[tokio::test]
    async fn test_fetch_malformed_geojson_fails() {
        let dir = tempfile::tempdir().unwrap();
        write_dataset(dir.path(), "broken", "{ not geojson");

        let source = FileDataSource::new(dir.path());
        let result = source.fetch("broken").await;
        assert!(matches!(result, Err(HazmapError::DatasetFetch { .. })));
    }

    #[tokio::test]
    async fn test_fetch_rejects_traversal_keys() {
        let dir = tempfile::tempdir().unwrap();
        let source = FileDataSource::new(dir.path());

        for key in ["../etc/passwd", "a/b", "", "a.b"] {
            assert!(source.fetch(key).await.is_err(), "key {:?} accepted", key);
        }
    }

    #[test]
    fn test_coordinator_supersedes_older_tickets() {
        let coordinator = FetchCoordinator::default();

        let first = coordinator.begin();
        assert!(coordinator.is_current(first));

        let second = coordinator.begin();
        assert!(!coordinator.is_current(first));
        assert!(coordinator.is_current(second));
    }
}
