// src/utils/url.rs

//! URL normalization utilities.

use url::Url;

/// Normalize a raw link target to an absolute URL with a scheme.
///
/// Markdown sources frequently carry scheme-less links (`example.org/docs`);
/// the site contract requires absolute URLs, so `https://` is prefixed when
/// no scheme is present. Protocol-relative links (`//example.org`) get the
/// `https:` scheme. Already-absolute URLs pass through untouched.
///
/// # Examples
/// ```
/// use awesome_ingest::utils::url::ensure_scheme;
///
/// assert_eq!(ensure_scheme("example.org"), "https://example.org");
/// assert_eq!(
///     ensure_scheme("http://example.org"),
///     "http://example.org"
/// );
/// ```
pub fn ensure_scheme(raw: &str) -> String {
    let trimmed = raw.trim();

    if trimmed.starts_with("//") {
        return format!("https:{trimmed}");
    }

    if trimmed.contains("://") {
        return trimmed.to_string();
    }

    format!("https://{trimmed}")
}

/// Check whether a string parses as an absolute URL.
pub fn is_valid(url: &str) -> bool {
    Url::parse(url).is_ok()
}

/// Extract the host from a URL string.
///
/// # Examples
/// ```
/// use awesome_ingest::utils::url::host_of;
///
/// assert_eq!(
///     host_of("https://example.com/path"),
///     Some("example.com".to_string())
/// );
/// ```
pub fn host_of(url: &str) -> Option<String> {
    Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(|s| s.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_scheme_missing() {
        assert_eq!(ensure_scheme("example.org"), "https://example.org");
        assert_eq!(
            ensure_scheme("example.org/path?q=1"),
            "https://example.org/path?q=1"
        );
    }

    #[test]
    fn test_ensure_scheme_present() {
        assert_eq!(ensure_scheme("https://example.org"), "https://example.org");
        assert_eq!(ensure_scheme("http://example.org"), "http://example.org");
        assert_eq!(ensure_scheme("ftp://example.org"), "ftp://example.org");
    }

    #[test]
    fn test_ensure_scheme_protocol_relative() {
        assert_eq!(
            ensure_scheme("//cdn.example.org/lib.js"),
            "https://cdn.example.org/lib.js"
        );
    }

    #[test]
    fn test_is_valid() {
        assert!(is_valid("https://example.org"));
        assert!(!is_valid("example.org"));
        assert!(!is_valid("not a url"));
    }

    #[test]
    fn test_host_of() {
        assert_eq!(
            host_of("https://sub.example.com:8080/path"),
            Some("sub.example.com".to_string())
        );
        assert_eq!(host_of("no-scheme"), None);
    }
}
