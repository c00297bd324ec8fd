// src/pipeline/hierarchy.rs

//! Hierarchy assembly: parse context, deduplication, and the category
//! tree built from a flat resource list.
//!
//! The tree assembly is shared by the markdown parser, the JSON ingester,
//! and the reconciler, which rebuilds a fresh tree from the renamed flat
//! list using the same algorithm.

use std::collections::HashMap;

use crate::models::{CategoryNode, Resource};

/// Per-parse state threaded through the line loop.
///
/// Owned by one parse invocation and passed explicitly; never stored in a
/// global, so parses can run concurrently.
#[derive(Debug, Clone, Default)]
pub struct ParseContext {
    /// Current `##` heading, if any has been seen
    pub category: Option<String>,

    /// Current `###` heading under the current category
    pub subcategory: Option<String>,

    /// Current `####` heading under the current subcategory
    pub subsubcategory: Option<String>,

    /// 1-based line number, for diagnostics
    pub line_number: usize,
}

impl ParseContext {
    /// Enter a new top-level category; deeper context resets.
    pub fn enter_category(&mut self, name: String) {
        self.category = Some(name);
        self.subcategory = None;
        self.subsubcategory = None;
    }

    /// Enter a new subcategory; sub-subcategory context resets.
    pub fn enter_subcategory(&mut self, name: String) {
        self.subcategory = Some(name);
        self.subsubcategory = None;
    }

    /// Enter a new sub-subcategory.
    pub fn enter_subsubcategory(&mut self, name: String) {
        self.subsubcategory = Some(name);
    }

    /// Stamp a resource with the current category context.
    ///
    /// A resource seen before any category heading lands in the sentinel
    /// label rather than being dropped.
    pub fn assign(&self, resource: &mut Resource, uncategorized_label: &str) {
        resource.category = self
            .category
            .clone()
            .unwrap_or_else(|| uncategorized_label.to_string());
        resource.subcategory = self.subcategory.clone();
        resource.subsubcategory = self.subsubcategory.clone();
    }
}

/// Deduplicate a flat resource list.
///
/// Duplicate detection is by exact title+url match within one category
/// assignment; the last occurrence wins and keeps the first occurrence's
/// position. The same title+url under two different categories is two
/// distinct resources.
pub fn dedupe(resources: Vec<Resource>) -> Vec<Resource> {
    let mut seen: HashMap<_, usize> = HashMap::new();
    let mut result: Vec<Resource> = Vec::with_capacity(resources.len());

    for resource in resources {
        match seen.get(&resource.dedup_key()) {
            Some(&index) => result[index] = resource,
            None => {
                seen.insert(resource.dedup_key(), result.len());
                result.push(resource);
            }
        }
    }

    result
}

/// Build the categorized tree from a flat resource list.
///
/// Nodes are created lazily on first reference. Once the whole list has
/// been consumed, sibling nodes at every level are sorted by name
/// (case-insensitive) and each node's direct resources by title.
pub fn categorize(resources: &[Resource]) -> Vec<CategoryNode> {
    let mut roots: Vec<CategoryNode> = Vec::new();

    for resource in resources {
        let category = find_or_insert(&mut roots, &resource.category);
        category.resources.push(resource.clone());

        if let Some(sub_name) = &resource.subcategory {
            let sub = find_or_insert(&mut category.children, sub_name);
            sub.resources.push(resource.clone());

            if let Some(subsub_name) = &resource.subsubcategory {
                let subsub = find_or_insert(&mut sub.children, subsub_name);
                subsub.resources.push(resource.clone());
            }
        }
    }

    sort_tree(&mut roots);
    roots
}

/// Find a sibling node by name or append a new one.
fn find_or_insert<'a>(siblings: &'a mut Vec<CategoryNode>, name: &str) -> &'a mut CategoryNode {
    if let Some(index) = siblings.iter().position(|n| n.name == name) {
        return &mut siblings[index];
    }
    siblings.push(CategoryNode::new(name));
    siblings.last_mut().expect("just pushed")
}

/// Sort siblings by name and resources by title, recursively.
///
/// Comparison is on the Unicode-lowercased key with the original string as
/// tiebreaker, so the output order is deterministic.
fn sort_tree(nodes: &mut [CategoryNode]) {
    nodes.sort_by(|a, b| {
        (a.name.to_lowercase(), &a.name).cmp(&(b.name.to_lowercase(), &b.name))
    });

    for node in nodes.iter_mut() {
        node.resources.sort_by(|a, b| {
            (a.title.to_lowercase(), &a.title).cmp(&(b.title.to_lowercase(), &b.title))
        });
        sort_tree(&mut node.children);
    }
}
