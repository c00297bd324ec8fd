//! Local filesystem storage implementation.
//!
//! ## Storage Layout
//!
//! ```text
//! {root}/
//! └── {source}/
//!     ├── list.json     # Current snapshot (replaced whole on each run)
//!     └── stats.json    # Statistics of the run that wrote it
//! ```

use std::path::PathBuf;

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::models::{ListSnapshot, ParseStats};
use crate::storage::{ListStorage, WriteSummary};

/// Local filesystem storage backend.
#[derive(Clone)]
pub struct LocalStorage {
    root_dir: PathBuf,
}

impl LocalStorage {
    /// Create a new LocalStorage rooted at the given directory.
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
        }
    }

    /// Get the full path for a relative key.
    fn path(&self, key: &str) -> PathBuf {
        self.root_dir.join(key)
    }

    /// Ensure parent directory exists.
    async fn ensure_dir(&self, path: &PathBuf) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        Ok(())
    }

    /// Write bytes atomically (write to temp, then rename).
    async fn write_bytes(&self, key: &str, bytes: &[u8]) -> Result<()> {
        let path = self.path(key);
        self.ensure_dir(&path).await?;

        let tmp = path.with_extension("tmp");
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&tmp, &path).await?;
        Ok(())
    }

    /// Write JSON data.
    async fn write_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(value)?;
        self.write_bytes(key, &bytes).await
    }

    /// Read bytes, returning None if file doesn't exist.
    async fn read_bytes(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let path = self.path(key);
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Io(e)),
        }
    }

    /// Read JSON data.
    async fn read_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.read_bytes(key).await? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    fn snapshot_key(source_name: &str) -> String {
        format!("{source_name}/list.json")
    }

    fn stats_key(source_name: &str) -> String {
        format!("{source_name}/stats.json")
    }
}

#[async_trait]
impl ListStorage for LocalStorage {
    async fn write_snapshot(
        &self,
        source_name: &str,
        snapshot: &ListSnapshot,
        stats: &ParseStats,
    ) -> Result<WriteSummary> {
        let snapshot_key = Self::snapshot_key(source_name);
        self.write_json(&snapshot_key, snapshot).await?;
        self.write_json(&Self::stats_key(source_name), stats).await?;

        Ok(WriteSummary {
            resource_count: snapshot.count,
            snapshot_location: self.path(&snapshot_key).display().to_string(),
        })
    }

    async fn load_snapshot(&self, source_name: &str) -> Result<Option<ListSnapshot>> {
        self.read_json(&Self::snapshot_key(source_name)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AwesomeList, Resource};
    use tempfile::TempDir;

    fn sample_snapshot() -> ListSnapshot {
        let mut list = AwesomeList::new("Awesome Test", "https://github.com/example/list");
        let mut resource = Resource::new("Example", "https://example.com");
        resource.category = "Test Category".to_string();
        list.resources.push(resource);
        ListSnapshot::new(list)
    }

    #[tokio::test]
    async fn test_write_and_read_bytes() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path());

        storage.write_bytes("test.txt", b"hello").await.unwrap();
        let data = storage.read_bytes("test.txt").await.unwrap();
        assert_eq!(data, Some(b"hello".to_vec()));
    }

    #[tokio::test]
    async fn test_read_nonexistent() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path());

        let data = storage.read_bytes("nope.txt").await.unwrap();
        assert!(data.is_none());
    }

    #[tokio::test]
    async fn test_snapshot_round_trip() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path());

        let snapshot = sample_snapshot();
        let stats = ParseStats::begin();
        let summary = storage
            .write_snapshot("video", &snapshot, &stats)
            .await
            .unwrap();
        assert_eq!(summary.resource_count, 1);

        let loaded = storage.load_snapshot("video").await.unwrap().unwrap();
        assert_eq!(loaded.count, 1);
        assert_eq!(loaded.list.title, "Awesome Test");
        assert_eq!(loaded.list.resources[0].id, snapshot.list.resources[0].id);
    }

    #[tokio::test]
    async fn test_missing_snapshot_is_none() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path());
        assert!(storage.load_snapshot("video").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_rewrite_replaces_snapshot() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path());
        let stats = ParseStats::begin();

        storage
            .write_snapshot("video", &sample_snapshot(), &stats)
            .await
            .unwrap();

        let mut second = sample_snapshot();
        second.list.title = "Replaced".to_string();
        storage
            .write_snapshot("video", &second, &stats)
            .await
            .unwrap();

        let loaded = storage.load_snapshot("video").await.unwrap().unwrap();
        assert_eq!(loaded.list.title, "Replaced");
    }
}
