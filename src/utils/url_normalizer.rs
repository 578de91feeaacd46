//! URL normalization for link creation.
//!
//! Submitted URLs are trimmed and given an `https://` scheme when none of the
//! web schemes is present. The stored value is the trimmed string itself; the
//! parse only checks that it is a structurally valid absolute URL.

use url::Url;

/// Errors that can occur during URL normalization.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum UrlNormalizationError {
    #[error("URL is empty")]
    Empty,

    #[error("{0}")]
    InvalidFormat(String),

    #[error("URL has no host")]
    MissingHost,
}

/// Normalizes a raw URL submitted for shortening.
///
/// # Rules
///
/// 1. Surrounding whitespace is trimmed
/// 2. A value starting with `http://` or `https://` is kept as-is
/// 3. Anything else is prefixed with `https://`
/// 4. The result must parse as an absolute URL with a non-empty host
///
/// # Errors
///
/// Returns [`UrlNormalizationError`] if the value is empty, does not parse, or
/// has no host.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(normalize_url("example.com/page").unwrap(), "https://example.com/page");
/// assert_eq!(normalize_url(" http://a.io ").unwrap(), "http://a.io");
/// ```
pub fn normalize_url(raw: &str) -> Result<String, UrlNormalizationError> {
    let trimmed = raw.trim();

    if trimmed.is_empty() {
        return Err(UrlNormalizationError::Empty);
    }

    let normalized = if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    };

    let parsed =
        Url::parse(&normalized).map_err(|e| UrlNormalizationError::InvalidFormat(e.to_string()))?;

    if !parsed.host_str().is_some_and(|host| !host.is_empty()) {
        return Err(UrlNormalizationError::MissingHost);
    }

    Ok(normalized)
}
