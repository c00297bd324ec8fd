// src/pipeline/classify.rs

//! Line classification for awesome-list markdown.
//!
//! Each source line is examined in isolation and sorted into one of the
//! [`LineKind`] buckets. Classification never fails; anything the rules do
//! not recognize is `Noise` and the caller decides whether to drop it or
//! escalate it to the fallback resolver.

use std::sync::LazyLock;

use regex::Regex;

use crate::utils::text::strip_heading_markup;

/// A markdown link pair `[text](target)`.
static LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]*)\]\(([^()\s]+)\)").expect("valid regex"));

/// Result of classifying one source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind {
    /// `## ` heading; carries the cleaned heading text
    CategoryHeading(String),
    /// `### ` heading; carries the cleaned heading text
    SubcategoryHeading(String),
    /// `#### ` heading; carries the cleaned heading text
    SubSubcategoryHeading(String),
    /// A list item shaped like a resource link
    ResourceEntry,
    /// Everything else (blank lines, prose, badges, TOC links, rules)
    Noise,
}

/// Classify a single line of markdown.
pub fn classify(line: &str) -> LineKind {
    let trimmed = line.trim();

    // Heading depth check, deepest first
    if let Some(rest) = trimmed.strip_prefix("#### ") {
        return LineKind::SubSubcategoryHeading(strip_heading_markup(rest));
    }
    if let Some(rest) = trimmed.strip_prefix("### ") {
        return LineKind::SubcategoryHeading(strip_heading_markup(rest));
    }
    if let Some(rest) = trimmed.strip_prefix("## ") {
        return LineKind::CategoryHeading(strip_heading_markup(rest));
    }

    if is_resource_entry(trimmed) {
        return LineKind::ResourceEntry;
    }

    LineKind::Noise
}

/// Check whether a trimmed line has the shape of a resource entry.
///
/// Requires a list marker followed by at least one complete `[...](...)`
/// pair whose target is not a document-internal anchor. Table-of-contents
/// entries link to `#anchors` and are noise, not resources.
fn is_resource_entry(trimmed: &str) -> bool {
    let Some(rest) = strip_list_marker(trimmed) else {
        return false;
    };

    match LINK_RE.captures(rest) {
        Some(caps) => !caps[2].starts_with('#'),
        None => false,
    }
}

/// Strip a leading `- `, `* `, or `+ ` list marker.
pub(crate) fn strip_list_marker(trimmed: &str) -> Option<&str> {
    for marker in ["- ", "* ", "+ "] {
        if let Some(rest) = trimmed.strip_prefix(marker) {
            return Some(rest.trim_start());
        }
    }
    None
}

/// Heuristic for lines worth escalating to the fallback resolver: not
/// blank, not a heading, and carrying at least one bracket or parenthesis.
pub fn looks_ambiguous(line: &str) -> bool {
    let trimmed = line.trim();
    !trimmed.is_empty()
        && !trimmed.starts_with('#')
        && trimmed.contains(['[', ']', '(', ')'])
}
