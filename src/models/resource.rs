//! Resource data structure.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// A single link entry extracted from a source document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Resource {
    /// Stable identifier derived from title and URL
    pub id: String,

    /// Link text (never empty, markdown markers stripped)
    pub title: String,

    /// Absolute URL including scheme
    pub url: String,

    /// Free text following the link (empty string if the source has none)
    #[serde(default)]
    pub description: String,

    /// Top-level category name (canonical after reconciliation)
    pub category: String,

    /// Second-level category name, when the source nests one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<String>,

    /// Third-level category name, when the source nests one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subsubcategory: Option<String>,

    /// Tags carried through from JSON sources (markdown has no tag syntax)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl Resource {
    /// Build a resource, deriving its id from title and URL.
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        let title = title.into();
        let url = url.into();
        let id = Self::derive_id(&title, &url);

        Self {
            id,
            title,
            url,
            description: String::new(),
            category: String::new(),
            subcategory: None,
            subsubcategory: None,
            tags: Vec::new(),
        }
    }

    /// Derive a stable identifier from title and URL.
    ///
    /// First 12 hex characters of SHA-256 over `title\n url`; stable across
    /// runs so repeated parses of the same document yield identical output.
    pub fn derive_id(title: &str, url: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(title.as_bytes());
        hasher.update(b"\n");
        hasher.update(url.as_bytes());
        let digest = hasher.finalize();
        hex::encode(&digest[..6])
    }

    /// Key used for duplicate detection: exact title + url match within
    /// one category assignment.
    pub fn dedup_key(&self) -> (String, Option<String>, Option<String>, String, String) {
        (
            self.category.clone(),
            self.subcategory.clone(),
            self.subsubcategory.clone(),
            self.title.clone(),
            self.url.clone(),
        )
    }
}
