// src/pipeline/pipeline.rs

//! Full ingestion run: fetch -> parse -> reconcile -> store.

use crate::error::{AppError, Result};
use crate::models::{CategoryMap, Config, ListSnapshot, SourceFormat, SourceInfo};
use crate::pipeline::json::parse_json;
use crate::pipeline::parse::MarkdownParser;
use crate::pipeline::reconcile::reconcile;
use crate::services::{AmbiguityResolver, DocumentFetcher};
use crate::storage::{ListStorage, WriteSummary};

/// Ingest a single source end to end.
pub async fn run_source(
    config: &Config,
    map: &CategoryMap,
    source: &SourceInfo,
    resolver: &dyn AmbiguityResolver,
    fetcher: &DocumentFetcher,
    storage: &dyn ListStorage,
) -> Result<WriteSummary> {
    log::info!("Fetching source '{}' from {}", source.name, source.url);
    let text = fetcher.fetch(&source.url).await?;

    let (list, mut stats) = match source.format {
        SourceFormat::Markdown => {
            MarkdownParser::new(config, resolver)
                .parse(&text, source)
                .await
        }
        SourceFormat::Json => parse_json(&text, source, config)?,
    };

    let outcome = reconcile(list, map);
    stats.unmapped_labels = outcome.unmapped.len();

    let snapshot = ListSnapshot::new(outcome.list);
    let summary = storage
        .write_snapshot(&source.name, &snapshot, &stats)
        .await?;

    log::info!(
        "Source '{}': {} resources in {} categories ({} ms)",
        source.name,
        snapshot.count,
        snapshot.list.categories.len(),
        stats.duration_ms()
    );
    if stats.ai_resolved + stats.ai_skipped > 0 {
        log::info!(
            "AI fallback: {} resolved, {} skipped, {} unparsed",
            stats.ai_resolved,
            stats.ai_skipped,
            stats.unparsed
        );
    }
    if stats.unmapped_labels > 0 {
        log::warn!(
            "{} category labels had no mapping entry: {}",
            stats.unmapped_labels,
            outcome.unmapped.join(", ")
        );
    }

    Ok(summary)
}

/// Ingest every configured source.
///
/// A failed source is logged and skipped so one bad fetch cannot take the
/// rest of the run down; the call errors only when no source succeeds.
pub async fn run_pipeline(
    config: &Config,
    map: &CategoryMap,
    resolver: &dyn AmbiguityResolver,
    storage: &dyn ListStorage,
) -> Result<()> {
    if config.sources.is_empty() {
        return Err(AppError::config("No sources configured"));
    }

    let fetcher = DocumentFetcher::new(&config.fetch)?;
    let mut failures = 0;

    for source in &config.sources {
        if let Err(error) = run_source(config, map, source, resolver, &fetcher, storage).await {
            failures += 1;
            log::error!("Source '{}' failed: {}", source.name, error);
        }
    }

    if failures == config.sources.len() {
        return Err(AppError::validation("All sources failed"));
    }

    Ok(())
}
