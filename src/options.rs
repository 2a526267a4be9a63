//! Configuration options for structure detection.
//!
//! `Options` holds the thresholds and flags for one detection run. Build it
//! with `Default::default()` and struct update syntax, or merge caller-supplied
//! `OptionsOverrides` (the camelCase JSON configuration) onto the defaults with
//! [`Options::merged`], which validates every value.

use serde::Deserialize;
use url::Url;

use crate::error::{Error, Result};

/// Default allow-list of tags that may form a repeated structure.
pub const DEFAULT_STRUCTURE_TAGS: &[&str] =
    &["div", "article", "p", "section", "span", "aside", "li", "dd"];

/// Configuration options for structure detection.
///
/// All fields are public for easy configuration. Use `Default::default()`
/// for the documented defaults.
///
/// # Example
///
/// ```rust
/// use rs_struktur::Options;
///
/// let options = Options {
///     n: 4,
///     fulltext: true,
///     ..Options::default()
/// };
/// assert_eq!(options.min_width, 200.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[allow(clippy::struct_excessive_bools)]
pub struct Options {
    /// Minimum sibling repetition, and minimum size of an alignment set.
    ///
    /// Default: `6`
    pub n: usize,

    /// A child counts toward width alignment only if wider than this (px).
    ///
    /// Default: `200.0`
    pub min_width: f64,

    /// A child counts toward height alignment only if taller than this (px).
    ///
    /// Default: `100.0`
    pub min_height: f64,

    /// Lower-cased tags allowed to form a structure.
    ///
    /// Default: `div, article, p, section, span, aside, li, dd`
    pub structure_tags: Vec<String>,

    /// Maximum relative deviation from the mean for an aligned set.
    ///
    /// Default: `0.125`
    pub error_margin: f64,

    /// Border the members of every kept structure.
    ///
    /// Presentation only; never changes the returned data.
    ///
    /// Default: `false`
    pub highlight_struktur: bool,

    /// Border every node that produced a content item in a kept structure.
    ///
    /// Default: `false`
    pub highlight_content: bool,

    /// Blank out image sources that are inline `data:` URIs.
    ///
    /// Default: `true`
    pub no_data_img_src: bool,

    /// Annotate items with the class list of the element they came from.
    ///
    /// Default: `false`
    pub add_class: bool,

    /// Emit one whole-text item per member instead of per-node text items.
    ///
    /// Default: `false`
    pub fulltext: bool,

    /// Keep a member's items only if they include a link with text.
    ///
    /// Default: `true`
    pub only_objects_with_links: bool,

    /// Drop a structure whose member list equals an earlier structure's.
    ///
    /// A container whose children align in both width and height yields the
    /// same members twice, once per axis. Enable this to keep only the first.
    ///
    /// Default: `false`
    pub collapse_duplicate_structures: bool,

    /// Resolve link and image URLs against this base.
    ///
    /// Default: `None` (URLs are returned as written)
    pub base_url: Option<Url>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            n: 6,
            min_width: 200.0,
            min_height: 100.0,
            structure_tags: DEFAULT_STRUCTURE_TAGS.iter().map(|t| (*t).to_string()).collect(),
            error_margin: 0.125,
            highlight_struktur: false,
            highlight_content: false,
            no_data_img_src: true,
            add_class: false,
            fulltext: false,
            only_objects_with_links: true,
            collapse_duplicate_structures: false,
            base_url: None,
        }
    }
}

/// Caller-supplied overrides, keyed the way the JSON configuration spells them.
///
/// Every field is optional; absent fields keep their default.
///
/// ```rust
/// use rs_struktur::{Options, OptionsOverrides};
///
/// let overrides: OptionsOverrides =
///     serde_json::from_str(r#"{"N": 7, "highlightStruktur": true}"#)?;
/// let options = Options::merged(overrides)?;
/// assert_eq!(options.n, 7);
/// assert!(options.highlight_struktur);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct OptionsOverrides {
    #[serde(rename = "N")]
    pub n: Option<usize>,
    pub min_width: Option<f64>,
    pub min_height: Option<f64>,
    pub structure_tags: Option<Vec<String>>,
    pub error_margin: Option<f64>,
    pub highlight_struktur: Option<bool>,
    pub highlight_content: Option<bool>,
    pub no_data_img_src: Option<bool>,
    pub add_class: Option<bool>,
    pub fulltext: Option<bool>,
    pub only_objects_with_links: Option<bool>,
    pub collapse_duplicate_structures: Option<bool>,
    pub base_url: Option<String>,
}

impl Options {
    /// Merge overrides onto the defaults and validate the result.
    pub fn merged(overrides: OptionsOverrides) -> Result<Self> {
        Self::default().with_overrides(overrides)
    }

    /// Merge overrides onto these options and validate the result.
    pub fn with_overrides(self, overrides: OptionsOverrides) -> Result<Self> {
        let base_url = match overrides.base_url {
            Some(raw) => Some(Url::parse(raw.trim()).map_err(|e| Error::InvalidOption {
                name: "baseUrl",
                reason: e.to_string(),
            })?),
            None => self.base_url,
        };

        let merged = Self {
            n: overrides.n.unwrap_or(self.n),
            min_width: overrides.min_width.unwrap_or(self.min_width),
            min_height: overrides.min_height.unwrap_or(self.min_height),
            structure_tags: overrides
                .structure_tags
                .map_or(self.structure_tags, |tags| normalize_tags(&tags)),
            error_margin: overrides.error_margin.unwrap_or(self.error_margin),
            highlight_struktur: overrides.highlight_struktur.unwrap_or(self.highlight_struktur),
            highlight_content: overrides.highlight_content.unwrap_or(self.highlight_content),
            no_data_img_src: overrides.no_data_img_src.unwrap_or(self.no_data_img_src),
            add_class: overrides.add_class.unwrap_or(self.add_class),
            fulltext: overrides.fulltext.unwrap_or(self.fulltext),
            only_objects_with_links: overrides
                .only_objects_with_links
                .unwrap_or(self.only_objects_with_links),
            collapse_duplicate_structures: overrides
                .collapse_duplicate_structures
                .unwrap_or(self.collapse_duplicate_structures),
            base_url,
        };

        merged.validate()?;
        Ok(merged)
    }

    /// Parse a JSON overrides document and merge it onto the defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let overrides: OptionsOverrides = serde_json::from_str(json)?;
        Self::merged(overrides)
    }

    /// Check that every threshold is usable.
    pub fn validate(&self) -> Result<()> {
        if self.n == 0 {
            return Err(invalid("N", "must be at least 1"));
        }
        if !self.error_margin.is_finite() || self.error_margin <= 0.0 {
            return Err(invalid("errorMargin", "must be a finite number greater than 0"));
        }
        if !self.min_width.is_finite() || self.min_width < 0.0 {
            return Err(invalid("minWidth", "must be a finite number >= 0"));
        }
        if !self.min_height.is_finite() || self.min_height < 0.0 {
            return Err(invalid("minHeight", "must be a finite number >= 0"));
        }
        if self.structure_tags.is_empty() {
            return Err(invalid("structureTags", "must name at least one tag"));
        }
        Ok(())
    }

    /// Whether `tag` (lower-cased) is on the structure allow-list.
    #[must_use]
    pub fn is_structure_tag(&self, tag: &str) -> bool {
        self.structure_tags.iter().any(|t| t == tag)
    }
}

fn invalid(name: &'static str, reason: &str) -> Error {
    Error::InvalidOption {
        name,
        reason: reason.to_string(),
    }
}

fn normalize_tags(tags: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = tag.trim().to_ascii_lowercase();
        if !tag.is_empty() && !out.contains(&tag) {
            out.push(tag);
        }
    }
    out
}
