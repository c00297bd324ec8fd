// src/models/list.rs

//! Parse result structure consumed by the rendering collaborators.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{CategoryNode, Resource};

/// The complete result of one parse invocation.
///
/// Built once per run and never mutated in place; a refresh produces a
/// fresh list that replaces the previous snapshot whole.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AwesomeList {
    /// List title (from the source document's H1, or the source name)
    pub title: String,

    /// List description (text between the H1 and the first category)
    #[serde(default)]
    pub description: String,

    /// Source repository URL
    pub repo_url: String,

    /// Every extracted resource, flat
    pub resources: Vec<Resource>,

    /// Categorized tree over the same resources
    pub categories: Vec<CategoryNode>,
}

impl AwesomeList {
    /// Create an empty list for a source.
    pub fn new(title: impl Into<String>, repo_url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            repo_url: repo_url.into(),
            resources: Vec::new(),
            categories: Vec::new(),
        }
    }

    /// Count resources in the flat list.
    pub fn resource_count(&self) -> usize {
        self.resources.len()
    }

    /// Per-category resource counts over the flat list, in tree order.
    ///
    /// Exposed so data-quality tooling can check expected totals per
    /// category against the mapping table without walking the tree.
    pub fn category_counts(&self) -> Vec<(String, usize)> {
        self.categories
            .iter()
            .map(|c| {
                let count = self
                    .resources
                    .iter()
                    .filter(|r| r.category == c.name)
                    .count();
                (c.name.clone(), count)
            })
            .collect()
    }
}

/// Snapshot wrapper persisted to storage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListSnapshot {
    /// Snapshot creation time
    pub generated_at: DateTime<Utc>,

    /// Number of resources in the list
    pub count: usize,

    /// The parse result
    pub list: AwesomeList,
}

impl ListSnapshot {
    /// Wrap a list with snapshot metadata.
    pub fn new(list: AwesomeList) -> Self {
        Self {
            generated_at: Utc::now(),
            count: list.resource_count(),
            list,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_counts() {
        let mut list = AwesomeList::new("Test", "https://github.com/example/list");
        let mut r1 = Resource::new("A", "https://a.example.com");
        r1.category = "Media Tools".to_string();
        let mut r2 = Resource::new("B", "https://b.example.com");
        r2.category = "Media Tools".to_string();
        list.resources = vec![r1, r2];
        list.categories = vec![CategoryNode::new("Media Tools")];

        assert_eq!(
            list.category_counts(),
            vec![("Media Tools".to_string(), 2)]
        );
    }

    #[test]
    fn test_snapshot_count() {
        let mut list = AwesomeList::new("Test", "https://github.com/example/list");
        list.resources
            .push(Resource::new("A", "https://a.example.com"));
        let snapshot = ListSnapshot::new(list);
        assert_eq!(snapshot.count, 1);
    }
}
