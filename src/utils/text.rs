// src/utils/text.rs

//! Markdown text cleanup helpers.

use unicode_segmentation::UnicodeSegmentation;

/// Collapse runs of whitespace into single spaces and trim the ends.
pub fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Strip markdown emphasis and a trailing `{#anchor}` from heading text.
///
/// Heading text like `## **Encoding & Codecs** {#codecs}` becomes
/// `Encoding & Codecs`.
pub fn strip_heading_markup(s: &str) -> String {
    let mut text = s.trim();

    // Trailing explicit anchor
    if let Some(idx) = text.rfind("{#") {
        if text.ends_with('}') {
            text = text[..idx].trim_end();
        }
    }

    strip_emphasis(text)
}

/// Strip surrounding emphasis markers (`**`, `__`, `*`, `_`).
pub fn strip_emphasis(s: &str) -> String {
    let mut text = s.trim();

    for marker in ["**", "__", "*", "_"] {
        if text.len() >= marker.len() * 2
            && text.starts_with(marker)
            && text.ends_with(marker)
        {
            text = text[marker.len()..text.len() - marker.len()].trim();
        }
    }

    text.to_string()
}

/// Strip a surrounding markdown code fence from a model response.
///
/// Handles ```` ```json ... ``` ```` and bare ```` ``` ... ``` ```` blocks;
/// text without a fence is returned unchanged.
pub fn strip_code_fence(s: &str) -> &str {
    let trimmed = s.trim();

    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let Some(body) = rest.strip_suffix("```") else {
        return trimmed;
    };

    // Drop the language tag on the opening fence line, if any
    match body.find('\n') {
        Some(idx) => body[idx + 1..].trim(),
        None => body.trim(),
    }
}

/// Derive a URL-safe slug from a display name.
///
/// Unicode words are lowercased, stripped of non-alphanumeric characters,
/// and joined with hyphens. The derivation is deterministic: equal names
/// always yield equal slugs.
///
/// # Examples
/// ```
/// use awesome_ingest::utils::text::slugify;
///
/// assert_eq!(slugify("Encoding & Codecs"), "encoding-codecs");
/// assert_eq!(slugify("iOS/tvOS Players"), "ios-tvos-players");
/// ```
pub fn slugify(name: &str) -> String {
    name.unicode_words()
        .map(|word| {
            word.chars()
                .filter(|c| c.is_alphanumeric())
                .collect::<String>()
                .to_lowercase()
        })
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}
