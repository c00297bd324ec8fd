// src/models/category.rs

//! Category tree data structures.

use serde::{Deserialize, Serialize};

use crate::models::Resource;
use crate::utils::text::slugify;

/// A node in the category tree.
///
/// The same shape serves all three levels (category, subcategory,
/// sub-subcategory); `children` is empty at the deepest level. Nodes are
/// created per parse run and rebuilt from scratch on every re-fetch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryNode {
    /// Display name
    pub name: String,

    /// URL-safe slug derived from the name
    pub slug: String,

    /// Resources assigned directly to this node
    #[serde(default)]
    pub resources: Vec<Resource>,

    /// Child categories one level down
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<CategoryNode>,
}

impl CategoryNode {
    /// Create an empty node for a display name.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let slug = slugify(&name);
        Self {
            name,
            slug,
            resources: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Count resources directly assigned to this node.
    pub fn resource_count(&self) -> usize {
        self.resources.len()
    }

    /// Count resources assigned to this node and all descendants.
    pub fn total_resource_count(&self) -> usize {
        self.resources.len()
            + self
                .children
                .iter()
                .map(CategoryNode::total_resource_count)
                .sum::<usize>()
    }

    /// Find a direct child by name.
    pub fn child(&self, name: &str) -> Option<&CategoryNode> {
        self.children.iter().find(|c| c.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(name: &str, resources: usize) -> CategoryNode {
        let mut node = CategoryNode::new(name);
        for i in 0..resources {
            let mut r = Resource::new(format!("r{i}"), format!("https://example.com/{i}"));
            r.category = name.to_string();
            node.resources.push(r);
        }
        node
    }

    #[test]
    fn test_new_derives_slug() {
        let node = CategoryNode::new("Encoding & Codecs");
        assert_eq!(node.slug, "encoding-codecs");
    }

    #[test]
    fn test_total_resource_count() {
        let mut root = leaf("Players & Clients", 2);
        root.children.push(leaf("Roku", 3));
        assert_eq!(root.resource_count(), 2);
        assert_eq!(root.total_resource_count(), 5);
    }

    #[test]
    fn test_child_lookup() {
        let mut root = leaf("Media Tools", 0);
        root.children.push(leaf("Subtitles & Captions", 1));
        assert!(root.child("Subtitles & Captions").is_some());
        assert!(root.child("Audio").is_none());
    }
}
