//! Application configuration structures.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// HTTP fetch behavior settings
    #[serde(default)]
    pub fetch: FetchConfig,

    /// Parsing behavior settings
    #[serde(default)]
    pub parse: ParseConfig,

    /// AI fallback resolver settings
    #[serde(default)]
    pub ai: AiConfig,

    /// Path to the category mapping table
    #[serde(default = "defaults::mapping_path")]
    pub mapping_path: String,

    /// Source documents to ingest
    #[serde(default)]
    pub sources: Vec<SourceInfo>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.fetch.user_agent.trim().is_empty() {
            return Err(AppError::validation("fetch.user_agent is empty"));
        }
        if self.fetch.timeout_secs == 0 {
            return Err(AppError::validation("fetch.timeout_secs must be > 0"));
        }
        if self.parse.uncategorized_label.trim().is_empty() {
            return Err(AppError::validation(
                "parse.uncategorized_label is empty",
            ));
        }
        if self.ai.request_delay_ms < 200 {
            return Err(AppError::validation(
                "ai.request_delay_ms must be >= 200 (rate limit ceiling is 5 req/s)",
            ));
        }
        if self.ai.max_tokens == 0 {
            return Err(AppError::validation("ai.max_tokens must be > 0"));
        }
        for source in &self.sources {
            if source.url.trim().is_empty() {
                return Err(AppError::validation(format!(
                    "source '{}' has an empty url",
                    source.name
                )));
            }
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            fetch: FetchConfig::default(),
            parse: ParseConfig::default(),
            ai: AiConfig::default(),
            mapping_path: defaults::mapping_path(),
            sources: Vec::new(),
        }
    }
}

/// HTTP client behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
        }
    }
}

/// Parsing behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParseConfig {
    /// Category assigned to resources seen before any heading
    #[serde(default = "defaults::uncategorized_label")]
    pub uncategorized_label: String,

    /// Escalate lines the deterministic path cannot parse to the resolver
    #[serde(default = "defaults::ai_escalation")]
    pub ai_escalation: bool,
}

impl Default for ParseConfig {
    fn default() -> Self {
        Self {
            uncategorized_label: defaults::uncategorized_label(),
            ai_escalation: defaults::ai_escalation(),
        }
    }
}

/// AI fallback resolver settings.
///
/// The credential itself is never stored here; `api_key_env` names the
/// environment variable to read at construction time. A missing variable
/// disables the resolver, it is not an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiConfig {
    /// Environment variable holding the API key
    #[serde(default = "defaults::api_key_env")]
    pub api_key_env: String,

    /// Chat-completions endpoint URL
    #[serde(default = "defaults::ai_base_url")]
    pub base_url: String,

    /// Model identifier
    #[serde(default = "defaults::ai_model")]
    pub model: String,

    /// Completion token ceiling per request
    #[serde(default = "defaults::ai_max_tokens")]
    pub max_tokens: u32,

    /// Fixed delay between batch requests in milliseconds
    #[serde(default = "defaults::ai_request_delay")]
    pub request_delay_ms: u64,

    /// Estimated USD cost per resolved line, for operator reporting
    #[serde(default = "defaults::ai_cost_per_line")]
    pub cost_per_line: f64,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            api_key_env: defaults::api_key_env(),
            base_url: defaults::ai_base_url(),
            model: defaults::ai_model(),
            max_tokens: defaults::ai_max_tokens(),
            request_delay_ms: defaults::ai_request_delay(),
            cost_per_line: defaults::ai_cost_per_line(),
        }
    }
}

/// A named source document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceInfo {
    /// Short name used in logs and output paths
    pub name: String,

    /// Document URL (GitHub repository URLs are rewritten to raw README)
    pub url: String,

    /// Source format
    #[serde(default)]
    pub format: SourceFormat,
}

/// Input document format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SourceFormat {
    /// Awesome-list markdown document
    #[default]
    Markdown,
    /// Pre-categorized JSON export
    Json,
}

mod defaults {
    // Fetch defaults
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; awesome-ingest/1.0)".into()
    }
    pub fn timeout() -> u64 {
        30
    }

    // Parse defaults
    pub fn uncategorized_label() -> String {
        "Uncategorized".into()
    }
    pub fn ai_escalation() -> bool {
        true
    }

    // AI defaults
    pub fn api_key_env() -> String {
        "OPENAI_API_KEY".into()
    }
    pub fn ai_base_url() -> String {
        "https://api.openai.com/v1/chat/completions".into()
    }
    pub fn ai_model() -> String {
        "gpt-4o-mini".into()
    }
    pub fn ai_max_tokens() -> u32 {
        512
    }
    pub fn ai_request_delay() -> u64 {
        200
    }
    pub fn ai_cost_per_line() -> f64 {
        0.002
    }

    // Mapping defaults
    pub fn mapping_path() -> String {
        "data/category_map.toml".into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_default_config_ok() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn validate_rejects_empty_user_agent() {
        let mut config = Config::default();
        config.fetch.user_agent = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_fast_ai_delay() {
        let mut config = Config::default();
        config.ai.request_delay_ms = 50;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_empty_source_url() {
        let mut config = Config::default();
        config.sources.push(SourceInfo {
            name: "bad".to_string(),
            url: "".to_string(),
            format: SourceFormat::Markdown,
        });
        assert!(config.validate().is_err());
    }

    #[test]
    fn source_format_default_is_markdown() {
        assert_eq!(SourceFormat::default(), SourceFormat::Markdown);
    }
}
