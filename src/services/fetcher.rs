// src/services/fetcher.rs

//! Source document fetching.

use std::time::Duration;

use reqwest::Client;

use crate::error::{AppError, Result};
use crate::models::FetchConfig;

/// Fetches source documents over HTTP.
pub struct DocumentFetcher {
    client: Client,
}

impl DocumentFetcher {
    /// Create a fetcher with a configured HTTP client.
    pub fn new(config: &FetchConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client })
    }

    /// Fetch a document as text.
    ///
    /// Fatal on network errors, non-2xx statuses, and empty bodies; the
    /// returned error carries the source URL. No line processing starts
    /// before a successful fetch.
    pub async fn fetch(&self, url: &str) -> Result<String> {
        let target = raw_document_url(url);

        let response = self
            .client
            .get(&target)
            .send()
            .await
            .map_err(|e| AppError::fetch(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::fetch(url, format!("HTTP status {status}")));
        }

        let body = response.text().await.map_err(|e| AppError::fetch(url, e))?;
        if body.trim().is_empty() {
            return Err(AppError::fetch(url, "empty response body"));
        }

        Ok(body)
    }
}

/// Rewrite a GitHub repository URL to its raw README form.
///
/// `https://github.com/{owner}/{repo}` becomes
/// `https://raw.githubusercontent.com/{owner}/{repo}/HEAD/README.md`.
/// Anything else (raw URLs, deep paths, other hosts) passes through.
pub fn raw_document_url(url: &str) -> String {
    let Some(rest) = url
        .strip_prefix("https://github.com/")
        .or_else(|| url.strip_prefix("http://github.com/"))
    else {
        return url.to_string();
    };

    let segments: Vec<&str> = rest.trim_end_matches('/').split('/').collect();
    if segments.len() == 2 && segments.iter().all(|s| !s.is_empty()) {
        return format!(
            "https://raw.githubusercontent.com/{}/{}/HEAD/README.md",
            segments[0], segments[1]
        );
    }

    url.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_document_url_repo_root() {
        assert_eq!(
            raw_document_url("https://github.com/example/awesome-video"),
            "https://raw.githubusercontent.com/example/awesome-video/HEAD/README.md"
        );
        assert_eq!(
            raw_document_url("https://github.com/example/awesome-video/"),
            "https://raw.githubusercontent.com/example/awesome-video/HEAD/README.md"
        );
    }

    #[test]
    fn test_raw_document_url_passthrough() {
        let raw = "https://raw.githubusercontent.com/example/list/HEAD/README.md";
        assert_eq!(raw_document_url(raw), raw);

        let deep = "https://github.com/example/list/blob/main/data.json";
        assert_eq!(raw_document_url(deep), deep);

        let other = "https://example.com/list.md";
        assert_eq!(raw_document_url(other), other);
    }
}
