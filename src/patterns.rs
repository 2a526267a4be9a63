//! Compiled regex patterns shared by the input adapters and the extractor.
//!
//! All patterns are compiled once on first use with `LazyLock`.

#![allow(clippy::expect_used)]

use std::sync::LazyLock;

use regex::Regex;

/// Runs of whitespace, collapsed to one space in rendered text.
pub static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("WHITESPACE_RUN regex"));

/// Inline `data:` URI (image sources suppressed by `no_data_img_src`).
pub static DATA_URI: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*data:").expect("DATA_URI regex"));

/// Four numbers of a `data-struktur-rect` value, comma or space separated.
///
/// Accepts `"10,20,300,120"`, `"10 20 300 120"` and `"10.5, 20, 300.25, 120"`.
pub static RECT_VALUE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^\s*(-?[0-9]*\.?[0-9]+(?:e-?[0-9]+)?)[\s,]+(-?[0-9]*\.?[0-9]+(?:e-?[0-9]+)?)[\s,]+(-?[0-9]*\.?[0-9]+(?:e-?[0-9]+)?)[\s,]+(-?[0-9]*\.?[0-9]+(?:e-?[0-9]+)?)\s*$",
    )
    .expect("RECT_VALUE regex")
});

/// One `property: value` pair of an inline style declaration list.
pub static STYLE_DECLARATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)([a-z-]+)\s*:\s*([^;]+?)\s*(?:!important)?\s*(?:;|$)")
        .expect("STYLE_DECLARATION regex")
});

/// URL schemes that are never resolved against a base URL.
pub static UNRESOLVABLE_SCHEME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(javascript|mailto|tel|data|about|blob):")
        .expect("UNRESOLVABLE_SCHEME regex")
});

/// Collapse whitespace runs and trim.
#[must_use]
pub fn normalize_whitespace(text: &str) -> String {
    WHITESPACE_RUN.replace_all(text.trim(), " ").into_owned()
}
