//! Pipeline entry points for ingestion operations.
//!
//! - `classify` / `extract`: deterministic per-line parsing
//! - `MarkdownParser`: single-pass document parse with resolver escalation
//! - `parse_json`: pre-categorized JSON source ingestion
//! - `reconcile`: canonical-taxonomy normalization
//! - `run_pipeline` / `run_source`: fetch -> parse -> reconcile -> store

pub mod classify;
pub mod extract;
pub mod hierarchy;
pub mod json;
pub mod parse;
#[allow(clippy::module_inception)]
pub mod pipeline;
pub mod reconcile;

pub use classify::{LineKind, classify, looks_ambiguous};
pub use extract::extract;
pub use hierarchy::{ParseContext, categorize, dedupe};
pub use json::parse_json;
pub use parse::{MarkdownParser, count_ambiguous};
pub use pipeline::{run_pipeline, run_source};
pub use reconcile::{ReconcileOutcome, reconcile};
