// src/pipeline/json.rs

//! Pre-categorized JSON source ingestion.
//!
//! Alternate sources export loosely-shaped JSON (`resources` or `projects`
//! arrays, `url` or `homepage` fields, string-or-array categories). The
//! shapes are deserialized here, at the boundary, into strict internal
//! types; nothing downstream ever sees the raw forms.

use serde::Deserialize;

use crate::error::Result;
use crate::models::{AwesomeList, Config, ParseStats, Resource, SourceInfo};
use crate::pipeline::hierarchy::{categorize, dedupe};
use crate::utils::url::{ensure_scheme, is_valid};

/// Raw document shape as exported by legacy tooling.
#[derive(Debug, Deserialize)]
struct RawDocument {
    #[serde(default)]
    title: Option<String>,

    #[serde(default)]
    description: Option<String>,

    #[serde(default, alias = "projects")]
    resources: Vec<RawResource>,
}

/// Raw entry shape; every field is optional until validated.
#[derive(Debug, Deserialize)]
struct RawResource {
    #[serde(default)]
    title: Option<String>,

    #[serde(default, alias = "homepage")]
    url: Option<String>,

    #[serde(default)]
    description: Option<String>,

    #[serde(default)]
    category: Option<OneOrMany>,

    #[serde(default)]
    tags: Vec<String>,
}

/// `category` appears as a bare string or an array of labels.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

/// Parse a JSON export into an [`AwesomeList`].
///
/// A document that is not valid JSON is a fatal error for this source;
/// individual entries missing a title or URL are skipped with a warning
/// and the rest of the document still converts.
pub fn parse_json(
    text: &str,
    source: &SourceInfo,
    config: &Config,
) -> Result<(AwesomeList, ParseStats)> {
    let raw: RawDocument = serde_json::from_str(text)?;
    let mut stats = ParseStats::begin();
    let mut resources = Vec::with_capacity(raw.resources.len());

    for (index, entry) in raw.resources.into_iter().enumerate() {
        stats.line_count += 1;
        match convert_entry(entry, &config.parse.uncategorized_label) {
            Some(resource) => {
                resources.push(resource);
                stats.resource_count += 1;
            }
            None => {
                log::warn!("Skipping JSON entry {index}: missing title or usable url");
                stats.noise_count += 1;
            }
        }
    }

    stats.finish();

    let resources = dedupe(resources);
    let categories = categorize(&resources);

    let mut list = AwesomeList::new(
        raw.title.unwrap_or_else(|| source.name.clone()),
        source.url.clone(),
    );
    list.description = raw.description.unwrap_or_default();
    list.resources = resources;
    list.categories = categories;

    Ok((list, stats))
}

/// Validate one raw entry into a [`Resource`], or reject it.
fn convert_entry(entry: RawResource, uncategorized_label: &str) -> Option<Resource> {
    let title = entry.title.filter(|t| !t.trim().is_empty())?;
    let raw_url = entry.url.filter(|u| !u.trim().is_empty())?;

    let url = ensure_scheme(&raw_url);
    if !is_valid(&url) {
        return None;
    }

    let mut resource = Resource::new(title.trim(), url);
    resource.description = entry.description.unwrap_or_default().trim().to_string();
    resource.tags = entry.tags;

    let (category, subcategory, subsubcategory) = match entry.category {
        Some(OneOrMany::One(label)) => (non_empty(label), None, None),
        Some(OneOrMany::Many(labels)) => {
            let mut labels = labels.into_iter();
            (
                labels.next().and_then(non_empty),
                labels.next().and_then(non_empty),
                labels.next().and_then(non_empty),
            )
        }
        None => (None, None, None),
    };

    resource.category = category.unwrap_or_else(|| uncategorized_label.to_string());
    resource.subcategory = subcategory;
    resource.subsubcategory = subsubcategory;

    Some(resource)
}

fn non_empty(label: String) -> Option<String> {
    let trimmed = label.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
