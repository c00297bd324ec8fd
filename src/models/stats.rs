// src/models/stats.rs

//! Parse run statistics.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Counters collected over one parse run, written alongside the snapshot
/// for operator visibility.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParseStats {
    /// Run start time
    pub start_time: DateTime<Utc>,

    /// Run end time
    pub end_time: DateTime<Utc>,

    /// Total lines examined
    pub line_count: usize,

    /// Resources extracted by the deterministic path
    pub resource_count: usize,

    /// Lines dropped as noise
    pub noise_count: usize,

    /// Ambiguous lines resolved by the model
    pub ai_resolved: usize,

    /// Ambiguous lines the model flagged as non-resources
    pub ai_skipped: usize,

    /// Ambiguous lines neither path could parse
    pub unparsed: usize,

    /// Category labels missing from the mapping table
    pub unmapped_labels: usize,
}

impl ParseStats {
    /// Start a stats record at the current time.
    pub fn begin() -> Self {
        let now = Utc::now();
        Self {
            start_time: now,
            end_time: now,
            line_count: 0,
            resource_count: 0,
            noise_count: 0,
            ai_resolved: 0,
            ai_skipped: 0,
            unparsed: 0,
            unmapped_labels: 0,
        }
    }

    /// Close the record at the current time.
    pub fn finish(&mut self) {
        self.end_time = Utc::now();
    }

    /// Run duration in milliseconds.
    pub fn duration_ms(&self) -> i64 {
        (self.end_time - self.start_time).num_milliseconds()
    }
}
