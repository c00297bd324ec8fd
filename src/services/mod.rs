//! Service layer for the ingestion application.
//!
//! This module contains the I/O-facing collaborators:
//! - Document fetching (`DocumentFetcher`)
//! - Ambiguous-line resolution (`AmbiguityResolver` and implementations)

mod fetcher;
mod resolver;

pub use fetcher::{DocumentFetcher, raw_document_url};
pub use resolver::{
    AmbiguityResolver, DisabledResolver, ModelResolver, Resolution, estimate_cost, resolve_batch,
    resolver_from_env,
};
