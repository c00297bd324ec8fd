//! Category mapping table (legacy label -> canonical category).

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// The fixed canonical top-level taxonomy the site is organized around.
pub const CANONICAL_CATEGORIES: [&str; 9] = [
    "Intro & Learning",
    "Protocols & Transport",
    "Encoding & Codecs",
    "Players & Clients",
    "Media Tools",
    "Standards & Industry",
    "Infrastructure & Delivery",
    "General Tools",
    "Community & Events",
];

/// One mapping table row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MappingEntry {
    /// Incoming label as it appears in legacy/alternate sources
    pub legacy: String,

    /// Canonical top-level category it belongs to
    pub canonical: String,
}

/// Lookup table reconciling incoming category labels onto the canonical
/// taxonomy.
///
/// The table is data, not code: it lives in `data/category_map.toml` and
/// can be audited and edited without touching parsing logic. Built-in
/// defaults apply when no file is present.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryMap {
    /// Mapping rows, ordered as authored
    pub entries: Vec<MappingEntry>,

    /// Exact-match lookup built from `entries` at load time
    #[serde(skip)]
    lookup: HashMap<String, String>,
}

impl CategoryMap {
    /// Load the mapping table from a TOML file and validate it.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let mut map: Self = toml::from_str(&content)?;
        map.build()?;
        Ok(map)
    }

    /// Load from a TOML file, falling back to built-in defaults.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(&path) {
            Ok(map) => map,
            Err(e) => {
                log::warn!(
                    "Mapping table load failed from {:?}: {}. Using built-in table.",
                    path.as_ref(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Build the lookup map, enforcing the table invariants.
    ///
    /// Every legacy label must map to exactly one canonical name (exact
    /// duplicates are tolerated, contradictions are not), and every
    /// canonical name must be one of the nine fixed categories.
    pub fn build(&mut self) -> Result<()> {
        let mut lookup: HashMap<String, String> = HashMap::new();

        for entry in &self.entries {
            if !CANONICAL_CATEGORIES.contains(&entry.canonical.as_str()) {
                return Err(AppError::mapping(format!(
                    "'{}' maps to unknown canonical category '{}'",
                    entry.legacy, entry.canonical
                )));
            }

            if let Some(existing) = lookup.get(&entry.legacy) {
                if existing != &entry.canonical {
                    return Err(AppError::mapping(format!(
                        "'{}' maps to both '{}' and '{}'",
                        entry.legacy, existing, entry.canonical
                    )));
                }
                continue;
            }

            lookup.insert(entry.legacy.clone(), entry.canonical.clone());
        }

        self.lookup = lookup;
        Ok(())
    }

    /// Resolve an incoming label by exact match.
    ///
    /// Returns `None` for unknown labels; the caller decides on the
    /// passthrough and the data-quality warning.
    pub fn resolve(&self, label: &str) -> Option<&str> {
        self.lookup.get(label).map(String::as_str)
    }

    /// Number of mapping rows.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for CategoryMap {
    fn default() -> Self {
        let mut map = Self {
            entries: defaults::default_entries(),
            lookup: HashMap::new(),
        };
        map.build().expect("built-in mapping table is valid");
        map
    }
}

mod defaults {
    use super::MappingEntry;

    fn entry(legacy: &str, canonical: &str) -> MappingEntry {
        MappingEntry {
            legacy: legacy.to_string(),
            canonical: canonical.to_string(),
        }
    }

    pub fn default_entries() -> Vec<MappingEntry> {
        vec![
            // Learning material
            entry("Introduction", "Intro & Learning"),
            entry("Learning", "Intro & Learning"),
            entry("Tutorials", "Intro & Learning"),
            entry("Books", "Intro & Learning"),
            entry("Talks & Presentations", "Intro & Learning"),
            // Streaming protocols
            entry("HLS", "Protocols & Transport"),
            entry("DASH", "Protocols & Transport"),
            entry("MPEG-DASH", "Protocols & Transport"),
            entry("Adaptive Streaming", "Protocols & Transport"),
            entry("Streaming Protocols", "Protocols & Transport"),
            entry("RTMP", "Protocols & Transport"),
            entry("RTSP", "Protocols & Transport"),
            entry("SRT", "Protocols & Transport"),
            entry("RIST", "Protocols & Transport"),
            entry("WebRTC", "Protocols & Transport"),
            // Codecs and encoders
            entry("FFMPEG", "Encoding & Codecs"),
            entry("FFmpeg", "Encoding & Codecs"),
            entry("Codecs", "Encoding & Codecs"),
            entry("Encoding", "Encoding & Codecs"),
            entry("Encoding Tools", "Encoding & Codecs"),
            entry("Transcoding", "Encoding & Codecs"),
            entry("AV1", "Encoding & Codecs"),
            entry("HEVC", "Encoding & Codecs"),
            entry("VP9", "Encoding & Codecs"),
            // Playback
            entry("Players", "Players & Clients"),
            entry("Web Players", "Players & Clients"),
            entry("Mobile & Web Players", "Players & Clients"),
            entry("Smart TV", "Players & Clients"),
            entry("Roku", "Players & Clients"),
            entry("Chromecast", "Players & Clients"),
            entry("iOS/tvOS", "Players & Clients"),
            entry("Android", "Players & Clients"),
            // Media handling
            entry("Subtitles", "Media Tools"),
            entry("Subtitles & Captions", "Media Tools"),
            entry("Audio", "Media Tools"),
            entry("DRM", "Media Tools"),
            entry("Ads", "Media Tools"),
            entry("QoE", "Media Tools"),
            // Standards bodies and specs
            entry("Specs & Standards", "Standards & Industry"),
            entry("MPEG", "Standards & Industry"),
            entry("Vendors & Industry", "Standards & Industry"),
            // Delivery
            entry("CDN", "Infrastructure & Delivery"),
            entry("Cloud", "Infrastructure & Delivery"),
            entry("Origin Servers", "Infrastructure & Delivery"),
            entry("Packaging", "Infrastructure & Delivery"),
            // Assorted tooling
            entry("Tools", "General Tools"),
            entry("CLI Tools", "General Tools"),
            entry("Testing", "General Tools"),
            entry("Media Analysis", "General Tools"),
            // Community
            entry("Community", "Community & Events"),
            entry("Conferences", "Community & Events"),
            entry("Events", "Community & Events"),
            entry("Podcasts", "Community & Events"),
        ]
    }
}
