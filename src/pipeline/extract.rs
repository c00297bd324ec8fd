// src/pipeline/extract.rs

//! Resource extraction from a classified resource line.

use std::sync::LazyLock;

use regex::Regex;

use crate::models::Resource;
use crate::pipeline::classify::strip_list_marker;
use crate::utils::text::{normalize_whitespace, strip_emphasis};
use crate::utils::url::{ensure_scheme, host_of, is_valid};

/// A leading badge-image pair `[![alt](badge-url)](outer-link)`.
static BADGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\[!\[[^\]]*\]\([^()\s]*\)\]\(([^()\s]+)\)\s*").expect("valid regex")
});

/// A leading plain link pair `[title](url)`.
static LEAD_LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[([^\]]+)\]\(([^()\s]+)\)").expect("valid regex"));

/// Extract a resource from one line.
///
/// Returns `None` when the line cannot produce a non-empty title and a
/// parseable absolute URL; the caller owns the decision to drop the line
/// or escalate it to the fallback resolver. No logging happens here.
///
/// Badge convention: leading `[![alt](badge)](outer)` pairs are consumed
/// and discarded; the first plain `[title](url)` pair after them is the
/// resource. A line that is nothing but badges falls back to the last
/// badge's outer link, with the link host standing in for the title.
pub fn extract(line: &str) -> Option<Resource> {
    let trimmed = line.trim();
    let mut rest = strip_list_marker(trimmed)?;

    if let Some(unbolded) = rest.strip_prefix("**") {
        rest = unbolded.trim_start();
    }

    // Consume badge prefixes, remembering the last outer link
    let mut badge_outer: Option<&str> = None;
    while let Some(caps) = BADGE_RE.captures(rest) {
        let full = caps.get(0).expect("whole match");
        badge_outer = Some(caps.get(1).expect("outer link").as_str());
        rest = &rest[full.end()..];
    }

    let (raw_title, raw_url, after) = match LEAD_LINK_RE.captures(rest) {
        Some(caps) => {
            let full = caps.get(0).expect("whole match");
            (
                strip_emphasis(&caps[1]),
                caps[2].to_string(),
                &rest[full.end()..],
            )
        }
        None => {
            // Badge-only line: outer link supplies the URL, its host the title
            let outer = badge_outer?;
            let normalized = ensure_scheme(outer);
            let title = host_of(&normalized)?;
            (title, outer.to_string(), rest)
        }
    };

    let url = ensure_scheme(&raw_url);
    if raw_title.is_empty() || !is_valid(&url) {
        return None;
    }

    let mut resource = Resource::new(raw_title, url);
    resource.description = clean_description(after);
    Some(resource)
}

/// Clean the text following a resource link into a description.
///
/// Strips a closing bold marker and one leading separator (`-`, `–`, `:`),
/// then collapses whitespace. Absent text yields the empty string.
fn clean_description(after: &str) -> String {
    let mut text = after.trim();

    if let Some(unbolded) = text.strip_prefix("**") {
        text = unbolded.trim_start();
    }

    for separator in ["-", "–", ":"] {
        if let Some(stripped) = text.strip_prefix(separator) {
            text = stripped.trim_start();
            break;
        }
    }

    normalize_whitespace(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_entry() {
        let resource = extract("- [Example](https://example.com) - An example site.").unwrap();
        assert_eq!(resource.title, "Example");
        assert_eq!(resource.url, "https://example.com");
        assert_eq!(resource.description, "An example site.");
    }

    #[test]
    fn test_missing_description() {
        let resource = extract("- [Example](https://example.com)").unwrap();
        assert_eq!(resource.description, "");
    }

    #[test]
    fn test_colon_separator() {
        let resource = extract("- [Example](https://example.com): An example site.").unwrap();
        assert_eq!(resource.description, "An example site.");
    }

    #[test]
    fn test_en_dash_separator() {
        let resource = extract("- [Example](https://example.com) – An example site.").unwrap();
        assert_eq!(resource.description, "An example site.");
    }

    #[test]
    fn test_url_scheme_normalization() {
        let resource = extract("- [NoScheme](example.org) - desc").unwrap();
        assert_eq!(resource.url, "https://example.org");
    }

    #[test]
    fn test_bold_title() {
        let resource = extract("- **[Example](https://example.com)** - desc").unwrap();
        assert_eq!(resource.title, "Example");
        assert_eq!(resource.description, "desc");
    }

    #[test]
    fn test_bold_inside_brackets() {
        let resource = extract("- [**Example**](https://example.com) - desc").unwrap();
        assert_eq!(resource.title, "Example");
    }

    #[test]
    fn test_badge_then_link() {
        let line =
            "- [![Build](https://img.shields.io/badge.svg)](https://ci.example.com) [Project](https://project.io) - A project.";
        let resource = extract(line).unwrap();
        assert_eq!(resource.title, "Project");
        assert_eq!(resource.url, "https://project.io");
        assert_eq!(resource.description, "A project.");
        assert!(!resource.description.contains("shields.io"));
    }

    #[test]
    fn test_badge_only_line() {
        let line = "- [![Build](https://img.shields.io/badge.svg)](https://project.io) - A project.";
        let resource = extract(line).unwrap();
        assert_eq!(resource.title, "project.io");
        assert_eq!(resource.url, "https://project.io");
        assert_eq!(resource.description, "A project.");
    }

    #[test]
    fn test_unclosed_link_returns_none() {
        assert!(extract("- [Example](https://example.com").is_none());
    }

    #[test]
    fn test_plain_prose_returns_none() {
        assert!(extract("Some prose, no list marker.").is_none());
    }

    #[test]
    fn test_empty_title_returns_none() {
        assert!(extract("- [**](https://example.com)").is_none());
    }
}
