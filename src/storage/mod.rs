//! Storage abstractions for parse-result persistence.
//!
//! A run produces one snapshot per source; writing a snapshot replaces
//! the previous one whole. There is no incremental or delta model.

pub mod local;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{ListSnapshot, ParseStats};

// Re-export for convenience
pub use local::LocalStorage;

/// Summary of a snapshot write.
#[derive(Debug, Clone)]
pub struct WriteSummary {
    /// Number of resources written
    pub resource_count: usize,

    /// Location of the snapshot file
    pub snapshot_location: String,
}

/// Persistence backend for parse results.
#[async_trait]
pub trait ListStorage: Send + Sync {
    /// Write a snapshot and its run statistics for a named source.
    async fn write_snapshot(
        &self,
        source_name: &str,
        snapshot: &ListSnapshot,
        stats: &ParseStats,
    ) -> Result<WriteSummary>;

    /// Load the current snapshot for a named source, if one exists.
    async fn load_snapshot(&self, source_name: &str) -> Result<Option<ListSnapshot>>;
}
