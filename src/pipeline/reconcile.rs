// src/pipeline/reconcile.rs

//! Category reconciliation onto the canonical taxonomy.
//!
//! Runs once after hierarchy assembly: every resource's category label is
//! looked up in the mapping table and replaced by its canonical name, then
//! a fresh tree is rebuilt from the renamed flat list with the same
//! algorithm the builders use. Unknown labels pass through unchanged;
//! that is a data-quality signal, never an error.

use std::collections::BTreeSet;

use crate::models::{AwesomeList, CategoryMap};
use crate::pipeline::hierarchy::categorize;

/// Result of reconciling one list.
#[derive(Debug)]
pub struct ReconcileOutcome {
    /// The list with canonical category names and a rebuilt tree
    pub list: AwesomeList,

    /// Labels that had no mapping entry, deduplicated and sorted
    pub unmapped: Vec<String>,
}

/// Normalize every resource's category onto the canonical taxonomy.
///
/// Purely a name substitution: subcategories and all other resource
/// fields are untouched.
pub fn reconcile(mut list: AwesomeList, map: &CategoryMap) -> ReconcileOutcome {
    let mut unmapped: BTreeSet<String> = BTreeSet::new();

    for resource in &mut list.resources {
        match map.resolve(&resource.category) {
            Some(canonical) => resource.category = canonical.to_string(),
            None => {
                unmapped.insert(resource.category.clone());
            }
        }
    }

    for label in &unmapped {
        log::warn!("No mapping entry for category label '{label}'; passing through");
    }

    list.categories = categorize(&list.resources);

    ReconcileOutcome {
        list,
        unmapped: unmapped.into_iter().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Resource;

    fn list_with(categories: &[&str]) -> AwesomeList {
        let mut list = AwesomeList::new("Test", "https://github.com/example/list");
        for (i, category) in categories.iter().enumerate() {
            let mut r = Resource::new(format!("R{i}"), format!("https://example.com/{i}"));
            r.category = category.to_string();
            list.resources.push(r);
        }
        list.categories = categorize(&list.resources);
        list
    }

    #[test]
    fn test_known_labels_mapped() {
        let outcome = reconcile(list_with(&["FFMPEG", "HLS"]), &CategoryMap::default());
        let categories: Vec<&str> = outcome
            .list
            .resources
            .iter()
            .map(|r| r.category.as_str())
            .collect();
        assert_eq!(categories, vec!["Encoding & Codecs", "Protocols & Transport"]);
        assert!(outcome.unmapped.is_empty());
    }

    #[test]
    fn test_unmapped_label_passes_through() {
        let outcome = reconcile(list_with(&["Some New Label"]), &CategoryMap::default());
        assert_eq!(outcome.list.resources[0].category, "Some New Label");
        assert_eq!(outcome.unmapped, vec!["Some New Label".to_string()]);
    }

    #[test]
    fn test_tree_rebuilt_and_merged() {
        // Two legacy labels landing in one canonical category merge nodes
        let outcome = reconcile(list_with(&["FFMPEG", "AV1"]), &CategoryMap::default());
        assert_eq!(outcome.list.categories.len(), 1);
        assert_eq!(outcome.list.categories[0].name, "Encoding & Codecs");
        assert_eq!(outcome.list.categories[0].resource_count(), 2);
    }

    #[test]
    fn test_subcategory_untouched() {
        let mut list = list_with(&["FFMPEG"]);
        list.resources[0].subcategory = Some("Filters".to_string());
        let outcome = reconcile(list, &CategoryMap::default());
        assert_eq!(outcome.list.resources[0].subcategory.as_deref(), Some("Filters"));
    }

    #[test]
    fn test_counts_match_after_reconcile() {
        let outcome = reconcile(
            list_with(&["FFMPEG", "HEVC", "Players", "Mystery"]),
            &CategoryMap::default(),
        );
        for (name, count) in outcome.list.category_counts() {
            let node = outcome
                .list
                .categories
                .iter()
                .find(|c| c.name == name)
                .unwrap();
            assert_eq!(node.resource_count(), count);
        }
    }
}
