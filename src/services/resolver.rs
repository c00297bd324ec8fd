// src/services/resolver.rs

//! AI fallback resolver for lines the deterministic parser cannot handle.
//!
//! The resolver is a pluggable capability: [`DisabledResolver`] is selected
//! when no API credential is configured and answers `None` without any
//! network traffic, so the parsing pipeline completes unassisted. The live
//! [`ModelResolver`] sends the line plus its category context to a hosted
//! chat-completions endpoint and decodes a strict-JSON answer.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::models::AiConfig;
use crate::pipeline::ParseContext;
use crate::utils::text::strip_code_fence;
use crate::utils::url::{ensure_scheme, is_valid};

/// Instruction sent with every ambiguous line.
const SYSTEM_PROMPT: &str = "You classify single lines from an awesome-list \
markdown document. Answer with one JSON object and nothing else. For a \
resource line: {\"kind\":\"resource\",\"title\":...,\"url\":...,\
\"description\":...}. For a heading: {\"kind\":\"category\",\"name\":...} or \
{\"kind\":\"subcategory\",\"name\":...}. For navigation links, footnotes, or \
anything that is not a resource: {\"kind\":\"skip\"}.";

/// Outcome of resolving one ambiguous line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The line is a resource entry
    Resource {
        title: String,
        url: String,
        description: String,
    },
    /// The line is really a category heading
    Category { name: String },
    /// The line is really a subcategory heading
    Subcategory { name: String },
    /// The line is not a resource at all; drop it silently
    Skip,
}

/// Strategy interface for ambiguous-line resolution.
///
/// `resolve` never raises: a malformed model answer, a transport error, or
/// a disabled resolver all come back as `None` and the parse continues
/// without that line.
#[async_trait]
pub trait AmbiguityResolver: Send + Sync {
    /// Whether this resolver will perform network calls.
    fn is_enabled(&self) -> bool;

    /// Resolve one line, or `None` if no confident answer exists.
    async fn resolve(&self, line: &str, context: &ParseContext) -> Option<Resolution>;
}

/// Select a resolver from credential presence.
///
/// A missing credential is a valid, handled state: the disabled resolver
/// is returned and a single warning is logged.
pub fn resolver_from_env(config: &AiConfig) -> Box<dyn AmbiguityResolver> {
    match std::env::var(&config.api_key_env) {
        Ok(key) if !key.trim().is_empty() => match ModelResolver::new(config.clone(), key) {
            Ok(resolver) => Box::new(resolver),
            Err(e) => {
                log::warn!("AI resolver unavailable ({e}); ambiguous lines will be dropped");
                Box::new(DisabledResolver)
            }
        },
        _ => {
            log::warn!(
                "{} not set; AI fallback disabled, ambiguous lines will be dropped",
                config.api_key_env
            );
            Box::new(DisabledResolver)
        }
    }
}

/// Estimate the USD cost of resolving a number of ambiguous lines.
///
/// Operator-facing reporting only; nothing enforces the estimate.
pub fn estimate_cost(ambiguous_lines: usize, cost_per_line: f64) -> f64 {
    ambiguous_lines as f64 * cost_per_line
}

/// Resolve an ordered batch of lines sequentially.
///
/// Requests are neither parallelized nor reordered; a fixed delay between
/// them keeps the request rate under the provider limit.
pub async fn resolve_batch(
    resolver: &dyn AmbiguityResolver,
    items: &[(String, ParseContext)],
    delay: Duration,
) -> Vec<Option<Resolution>> {
    let mut results = Vec::with_capacity(items.len());

    for (i, (line, context)) in items.iter().enumerate() {
        if i > 0 && resolver.is_enabled() && !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        results.push(resolver.resolve(line, context).await);
    }

    results
}

/// No-op resolver used when no credential is configured.
pub struct DisabledResolver;

#[async_trait]
impl AmbiguityResolver for DisabledResolver {
    fn is_enabled(&self) -> bool {
        false
    }

    async fn resolve(&self, _line: &str, _context: &ParseContext) -> Option<Resolution> {
        None
    }
}

/// Chat-completions request body.
#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
}

/// One chat message.
#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

/// Chat-completions response body (the fields we read).
#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

/// The JSON answer the model is instructed to produce.
#[derive(Debug, Deserialize)]
struct ModelAnswer {
    kind: String,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    name: Option<String>,
}

/// Live resolver backed by a hosted chat-completions endpoint.
pub struct ModelResolver {
    config: AiConfig,
    api_key: String,
    client: Client,
}

impl ModelResolver {
    /// Create a live resolver with the given credential.
    pub fn new(config: AiConfig, api_key: String) -> crate::error::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()?;
        Ok(Self {
            config,
            api_key,
            client,
        })
    }

    /// Build the user prompt for one line.
    fn prompt(line: &str, context: &ParseContext) -> String {
        let mut prompt = String::new();
        if let Some(category) = &context.category {
            prompt.push_str(&format!("Current category: {category}\n"));
        }
        if let Some(subcategory) = &context.subcategory {
            prompt.push_str(&format!("Current subcategory: {subcategory}\n"));
        }
        prompt.push_str(&format!("Line: {line}"));
        prompt
    }

    /// Perform the completion call and return the raw answer text.
    async fn complete(&self, prompt: String) -> crate::error::Result<String> {
        let request = ChatRequest {
            model: self.config.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: prompt,
                },
            ],
            max_tokens: self.config.max_tokens,
            temperature: 0.0,
        };

        let response = self
            .client
            .post(&self.config.base_url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?
            .error_for_status()?;

        let body: ChatResponse = response.json().await?;
        let content = body
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .unwrap_or_default();
        Ok(content)
    }

    /// Decode and validate a model answer into a [`Resolution`].
    fn decode_answer(text: &str) -> Option<Resolution> {
        let stripped = strip_code_fence(text);
        let answer: ModelAnswer = serde_json::from_str(stripped).ok()?;

        match answer.kind.as_str() {
            "resource" => {
                let title = answer.title.filter(|t| !t.trim().is_empty())?;
                let url = ensure_scheme(&answer.url.filter(|u| !u.trim().is_empty())?);
                if !is_valid(&url) {
                    return None;
                }
                Some(Resolution::Resource {
                    title: title.trim().to_string(),
                    url,
                    description: answer.description.unwrap_or_default().trim().to_string(),
                })
            }
            "category" => {
                let name = answer.name.filter(|n| !n.trim().is_empty())?;
                Some(Resolution::Category {
                    name: name.trim().to_string(),
                })
            }
            "subcategory" => {
                let name = answer.name.filter(|n| !n.trim().is_empty())?;
                Some(Resolution::Subcategory {
                    name: name.trim().to_string(),
                })
            }
            "skip" => Some(Resolution::Skip),
            _ => None,
        }
    }
}

#[async_trait]
impl AmbiguityResolver for ModelResolver {
    fn is_enabled(&self) -> bool {
        true
    }

    async fn resolve(&self, line: &str, context: &ParseContext) -> Option<Resolution> {
        let prompt = Self::prompt(line, context);

        let text = match self.complete(prompt).await {
            Ok(text) => text,
            Err(e) => {
                log::warn!("AI resolve failed at line {}: {e}", context.line_number);
                return None;
            }
        };

        let resolution = Self::decode_answer(&text);
        if resolution.is_none() {
            log::warn!(
                "AI answer for line {} was not usable JSON: {}",
                context.line_number,
                text.trim()
            );
        }
        resolution
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_resource_answer() {
        let text = r#"{"kind":"resource","title":"FFmpeg","url":"https://ffmpeg.org","description":"Media toolkit."}"#;
        assert_eq!(
            ModelResolver::decode_answer(text),
            Some(Resolution::Resource {
                title: "FFmpeg".to_string(),
                url: "https://ffmpeg.org".to_string(),
                description: "Media toolkit.".to_string(),
            })
        );
    }

    #[test]
    fn test_decode_fenced_answer() {
        let text = "```json\n{\"kind\":\"skip\"}\n```";
        assert_eq!(ModelResolver::decode_answer(text), Some(Resolution::Skip));
    }

    #[test]
    fn test_decode_category_answer() {
        let text = r#"{"kind":"category","name":"Encoding & Codecs"}"#;
        assert_eq!(
            ModelResolver::decode_answer(text),
            Some(Resolution::Category {
                name: "Encoding & Codecs".to_string()
            })
        );
    }

    #[test]
    fn test_decode_normalizes_scheme() {
        let text = r#"{"kind":"resource","title":"Example","url":"example.org"}"#;
        match ModelResolver::decode_answer(text) {
            Some(Resolution::Resource { url, .. }) => assert_eq!(url, "https://example.org"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_decode_rejects_missing_fields() {
        assert_eq!(
            ModelResolver::decode_answer(r#"{"kind":"resource","title":"No URL"}"#),
            None
        );
        assert_eq!(
            ModelResolver::decode_answer(r#"{"kind":"category"}"#),
            None
        );
        assert_eq!(ModelResolver::decode_answer("not json at all"), None);
        assert_eq!(
            ModelResolver::decode_answer(r#"{"kind":"mystery"}"#),
            None
        );
    }

    #[test]
    fn test_estimate_cost() {
        assert_eq!(estimate_cost(0, 0.002), 0.0);
        assert!((estimate_cost(150, 0.002) - 0.3).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_disabled_resolver_returns_none() {
        let resolver = DisabledResolver;
        let ctx = ParseContext::default();
        assert_eq!(resolver.resolve("- [broken](http://", &ctx).await, None);
    }

    #[tokio::test]
    async fn test_batch_preserves_order_when_disabled() {
        let resolver = DisabledResolver;
        let items = vec![
            ("- [a](x".to_string(), ParseContext::default()),
            ("- [b](y".to_string(), ParseContext::default()),
        ];
        let results = resolve_batch(&resolver, &items, Duration::from_millis(200)).await;
        assert_eq!(results, vec![None, None]);
    }
}
