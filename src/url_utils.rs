//! URL helpers for extracted links and images.
//!
//! Hrefs and image sources are returned as written unless the caller supplies
//! a base URL, in which case relative references are made absolute.

use url::Url;

use crate::patterns::{DATA_URI, UNRESOLVABLE_SCHEME};

/// Whether a `src`/`href` value is an inline `data:` URI.
#[must_use]
pub fn is_data_uri(value: &str) -> bool {
    DATA_URI.is_match(value)
}

/// Resolve a link or image reference against an optional base.
///
/// Without a base the value is returned unchanged. With one, relative
/// references are joined onto it. Scripted and non-navigational schemes
/// (`javascript:`, `mailto:`, `tel:`, `data:` ...), fragment-only references
/// and values the base cannot join are returned unchanged.
#[must_use]
pub fn resolve_url(value: &str, base: Option<&Url>) -> String {
    let Some(base) = base else {
        return value.to_string();
    };

    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') || UNRESOLVABLE_SCHEME.is_match(trimmed) {
        return value.to_string();
    }

    match base.join(trimmed) {
        Ok(resolved) => resolved.to_string(),
        Err(_) => value.to_string(),
    }
}
