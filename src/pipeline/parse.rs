// src/pipeline/parse.rs

//! Markdown document parsing: one linear pass over the lines.
//!
//! Classification and extraction are deliberately sequential: the current
//! category context is stateful and order-dependent, so lines cannot be
//! processed out of order. The only async operations are resolver calls,
//! awaited one at a time.

use std::time::Duration;

use crate::models::{AwesomeList, Config, ParseStats, Resource, SourceInfo};
use crate::pipeline::classify::{LineKind, classify, looks_ambiguous};
use crate::pipeline::extract::extract;
use crate::pipeline::hierarchy::{ParseContext, categorize, dedupe};
use crate::services::{AmbiguityResolver, Resolution};
use crate::utils::text::{normalize_whitespace, strip_heading_markup};

/// Parses an awesome-list markdown document into an [`AwesomeList`].
pub struct MarkdownParser<'a> {
    config: &'a Config,
    resolver: &'a dyn AmbiguityResolver,
}

impl<'a> MarkdownParser<'a> {
    /// Create a parser over a config and a resolver strategy.
    pub fn new(config: &'a Config, resolver: &'a dyn AmbiguityResolver) -> Self {
        Self { config, resolver }
    }

    /// Parse a document. Never fails: unparseable lines degrade to noise
    /// or the resolver, and the worst outcome is an emptier list.
    pub async fn parse(&self, text: &str, source: &SourceInfo) -> (AwesomeList, ParseStats) {
        let mut ctx = ParseContext::default();
        let mut stats = ParseStats::begin();
        let mut resources: Vec<Resource> = Vec::new();
        let mut title: Option<String> = None;
        let mut description_parts: Vec<String> = Vec::new();

        // The preamble (everything before the first category heading) holds
        // the H1 title, tagline prose, badges, and the table of contents.
        // Nothing in it is escalated to the resolver.
        let mut in_preamble = true;

        for (index, line) in text.lines().enumerate() {
            ctx.line_number = index + 1;
            stats.line_count += 1;

            match classify(line) {
                LineKind::CategoryHeading(name) => {
                    in_preamble = false;
                    ctx.enter_category(name);
                }
                LineKind::SubcategoryHeading(name) => ctx.enter_subcategory(name),
                LineKind::SubSubcategoryHeading(name) => ctx.enter_subsubcategory(name),
                LineKind::ResourceEntry => match extract(line) {
                    Some(mut resource) => {
                        ctx.assign(&mut resource, &self.config.parse.uncategorized_label);
                        resources.push(resource);
                        stats.resource_count += 1;
                    }
                    None => {
                        if self.should_escalate(line, in_preamble) {
                            self.escalate(line, &mut ctx, &mut resources, &mut stats)
                                .await;
                        } else {
                            stats.noise_count += 1;
                        }
                    }
                },
                LineKind::Noise => {
                    let trimmed = line.trim();
                    if in_preamble {
                        if title.is_none() && trimmed.starts_with("# ") {
                            title = Some(strip_heading_markup(&trimmed[2..]));
                        } else if is_preamble_prose(trimmed) {
                            description_parts
                                .push(trimmed.trim_start_matches("> ").to_string());
                        } else {
                            stats.noise_count += 1;
                        }
                    } else if self.should_escalate(line, in_preamble) {
                        self.escalate(line, &mut ctx, &mut resources, &mut stats)
                            .await;
                    } else {
                        stats.noise_count += 1;
                    }
                }
            }
        }

        stats.finish();

        let resources = dedupe(resources);
        let categories = categorize(&resources);

        let mut list = AwesomeList::new(
            title.unwrap_or_else(|| source.name.clone()),
            source.url.clone(),
        );
        list.description = normalize_whitespace(&description_parts.join(" "));
        list.resources = resources;
        list.categories = categories;

        (list, stats)
    }

    /// Whether a failed line qualifies for the resolver.
    fn should_escalate(&self, line: &str, in_preamble: bool) -> bool {
        self.config.parse.ai_escalation && !in_preamble && looks_ambiguous(line)
    }

    /// Hand one line to the resolver and fold the answer into the parse.
    async fn escalate(
        &self,
        line: &str,
        ctx: &mut ParseContext,
        resources: &mut Vec<Resource>,
        stats: &mut ParseStats,
    ) {
        match self.resolver.resolve(line, ctx).await {
            Some(Resolution::Resource {
                title,
                url,
                description,
            }) => {
                let mut resource = Resource::new(title, url);
                resource.description = description;
                ctx.assign(&mut resource, &self.config.parse.uncategorized_label);
                resources.push(resource);
                stats.ai_resolved += 1;
            }
            Some(Resolution::Category { name }) => {
                ctx.enter_category(name);
                stats.ai_resolved += 1;
            }
            Some(Resolution::Subcategory { name }) => {
                ctx.enter_subcategory(name);
                stats.ai_resolved += 1;
            }
            Some(Resolution::Skip) => stats.ai_skipped += 1,
            None => stats.unparsed += 1,
        }

        // Stay under the provider rate limit between consecutive calls
        if self.resolver.is_enabled() && self.config.ai.request_delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.config.ai.request_delay_ms)).await;
        }
    }
}

/// Count the lines a parse of this document would escalate to the
/// resolver: past the preamble, failed by the deterministic path, and
/// matching the ambiguity heuristic. Drives operator cost estimates.
pub fn count_ambiguous(text: &str) -> usize {
    let mut in_preamble = true;
    let mut count = 0;

    for line in text.lines() {
        match classify(line) {
            LineKind::CategoryHeading(_) => in_preamble = false,
            LineKind::SubcategoryHeading(_) | LineKind::SubSubcategoryHeading(_) => {}
            LineKind::ResourceEntry => {
                if extract(line).is_none() && !in_preamble && looks_ambiguous(line) {
                    count += 1;
                }
            }
            LineKind::Noise => {
                if !in_preamble && looks_ambiguous(line) {
                    count += 1;
                }
            }
        }
    }

    count
}

/// Preamble lines worth keeping as list description: plain prose and
/// blockquote taglines, but not badges, rules, tables, or link lists.
fn is_preamble_prose(trimmed: &str) -> bool {
    !trimmed.is_empty()
        && !trimmed.starts_with('#')
        && !trimmed.starts_with('[')
        && !trimmed.starts_with("- ")
        && !trimmed.starts_with("* ")
        && !trimmed.starts_with("+ ")
        && !trimmed.starts_with('|')
        && !trimmed.starts_with("---")
        && !trimmed.contains("![")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::DisabledResolver;

    fn source() -> SourceInfo {
        SourceInfo {
            name: "test".to_string(),
            url: "https://github.com/example/list".to_string(),
            format: crate::models::SourceFormat::Markdown,
        }
    }

    async fn parse(text: &str) -> (AwesomeList, ParseStats) {
        let config = Config::default();
        let resolver = DisabledResolver;
        MarkdownParser::new(&config, &resolver)
            .parse(text, &source())
            .await
    }

    const SIMPLE_DOC: &str = "\
# Awesome Test

> A curated list for testing.

## Test Category

- [Example](https://example.com) - An example site.
";

    #[tokio::test]
    async fn test_simple_round_trip() {
        let (list, stats) = parse(SIMPLE_DOC).await;

        assert_eq!(list.title, "Awesome Test");
        assert_eq!(list.description, "A curated list for testing.");
        assert_eq!(list.resources.len(), 1);

        let resource = &list.resources[0];
        assert_eq!(resource.title, "Example");
        assert_eq!(resource.url, "https://example.com");
        assert_eq!(resource.description, "An example site.");
        assert_eq!(resource.category, "Test Category");
        assert_eq!(stats.resource_count, 1);
    }

    #[tokio::test]
    async fn test_subcategory_context() {
        let doc = "\
## Protocols & Transport

### HLS

- [A](https://a.example.com) - desc

#### Low Latency

- [B](https://b.example.com) - desc

### DASH

- [C](https://c.example.com) - desc
";
        let (list, _) = parse(doc).await;

        let a = list.resources.iter().find(|r| r.title == "A").unwrap();
        assert_eq!(a.subcategory.as_deref(), Some("HLS"));
        assert_eq!(a.subsubcategory, None);

        let b = list.resources.iter().find(|r| r.title == "B").unwrap();
        assert_eq!(b.subcategory.as_deref(), Some("HLS"));
        assert_eq!(b.subsubcategory.as_deref(), Some("Low Latency"));

        // A new subcategory resets the sub-subcategory context
        let c = list.resources.iter().find(|r| r.title == "C").unwrap();
        assert_eq!(c.subcategory.as_deref(), Some("DASH"));
        assert_eq!(c.subsubcategory, None);
    }

    #[tokio::test]
    async fn test_resource_before_heading_is_uncategorized() {
        let doc = "- [Early](https://early.example.com) - before any heading\n";
        let (list, _) = parse(doc).await;
        assert_eq!(list.resources.len(), 1);
        assert_eq!(list.resources[0].category, "Uncategorized");
    }

    #[tokio::test]
    async fn test_toc_and_badges_dropped() {
        let doc = "\
# Awesome Test

[![Build](https://img.shields.io/badge.svg)](https://ci.example.com)

- [Test Category](#test-category)

## Test Category

- [Example](https://example.com) - desc
";
        let (list, _) = parse(doc).await;
        assert_eq!(list.resources.len(), 1);
        assert_eq!(list.resources[0].title, "Example");
    }

    #[tokio::test]
    async fn test_duplicate_entry_deduplicated() {
        let doc = "\
## Tools

- [Dup](https://dup.example.com) - first
- [Dup](https://dup.example.com) - second
";
        let (list, _) = parse(doc).await;
        assert_eq!(list.resources.len(), 1);
        assert_eq!(list.resources[0].description, "second");
    }

    #[tokio::test]
    async fn test_unparseable_line_dropped_without_ai() {
        // With no credential the resolver answers None; the parse must
        // complete and simply lose the broken line.
        let doc = "\
## Tools

- [Broken](https://broken.example.com
- [Fine](https://fine.example.com) - desc
";
        let (list, stats) = parse(doc).await;
        assert_eq!(list.resources.len(), 1);
        assert_eq!(list.resources[0].title, "Fine");
        assert_eq!(stats.unparsed, 1);
    }

    #[tokio::test]
    async fn test_idempotent_output() {
        let (first, _) = parse(SIMPLE_DOC).await;
        let (second, _) = parse(SIMPLE_DOC).await;

        let a = serde_json::to_string(&first).unwrap();
        let b = serde_json::to_string(&second).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_count_ambiguous() {
        let doc = "\
# Title

- [TOC entry](#anchor)

## Tools

- [Broken](https://broken.example.com
- [Fine](https://fine.example.com) - desc
plain prose without markup
";
        assert_eq!(count_ambiguous(doc), 1);
    }

    #[tokio::test]
    async fn test_category_sum_invariant_end_to_end() {
        let doc = "\
## Tools

- [A](https://a.example.com) - desc
- [B](https://b.example.com) - desc

## Players

- [C](https://c.example.com) - desc
";
        let (list, _) = parse(doc).await;
        for (name, count) in list.category_counts() {
            let node = list.categories.iter().find(|c| c.name == name).unwrap();
            assert_eq!(node.resource_count(), count);
        }
    }
}
