//! # rs-struktur
//!
//! Detects repeated visual structures in a rendered web page (product grids,
//! search result lists, news teasers) and extracts their content as JSON.
//!
//! A structure is a run of at least `N` same-tag siblings whose rendered boxes
//! share a height or a width within a relative tolerance. Each member is
//! reduced to its links, images and visible text.
//!
//! ## Quick Start
//!
//! ```rust
//! use rs_struktur::{detect_html, ContentItem, Options};
//!
//! let mut html = String::from("<body>");
//! for i in 0..3 {
//!     html.push_str(&format!(
//!         r#"<div data-struktur-rect="0,{},300,150"><a href="/p/{i}">Item {i}</a></div>"#,
//!         i * 150
//!     ));
//! }
//! html.push_str("</body>");
//!
//! let options = Options { n: 3, ..Options::default() };
//! let result = detect_html(&html, &options)?;
//! let record = result.get("structure_0").unwrap();
//! assert_eq!(record.len(), 3);
//! assert!(matches!(&record.members[0][0], ContentItem::Link { text, .. } if text == "Item 0"));
//! # Ok::<(), rs_struktur::Error>(())
//! ```
//!
//! ## Input
//!
//! Layout comes from a rendering collaborator. Two serialized forms are read:
//! annotated HTML (see [`html`]) and JSON snapshots (see [`snapshot`]). Callers
//! holding their own tree can build a [`NodeTree`] directly and call
//! [`detect_structures`].

mod error;
mod options;
mod patterns;
mod result;

/// Arena-backed rendered node tree.
pub mod tree;

/// Structure detection stages and the pipeline running them.
pub mod detector;

/// Annotated HTML input and highlighted HTML output.
pub mod html;

/// JSON snapshot input.
pub mod snapshot;

/// Character encoding detection and transcoding.
pub mod encoding;

/// URL utilities for data URIs and link resolution.
pub mod url_utils;

// Public API - re-exports
pub use error::{Error, Result};
pub use options::{Options, OptionsOverrides, DEFAULT_STRUCTURE_TAGS};
pub use result::{ContentItem, DetectResult, RunMetadata, StructureRecord};
pub use tree::{BoundingBox, ComputedStyle, Element, NodeFilter, NodeId, NodeTree, Page, Visibility};

/// Detects structures in the subtree rooted at `root`.
///
/// Never fails: nodes missing attributes or geometry simply contribute
/// nothing. With highlighting enabled the tree's presentation annotations
/// are updated for kept structures.
///
/// # Example
///
/// ```rust
/// use rs_struktur::{detect_structures, BoundingBox, Element, NodeTree, Options};
///
/// let mut tree = NodeTree::new();
/// let body = tree.add_element(None, Element::new("body"));
/// for i in 0..6 {
///     let li = tree.add_element(
///         Some(body),
///         Element::new("li").with_bounds(BoundingBox::new(0.0, f64::from(i) * 40.0, 250.0, 40.0)),
///     );
///     let a = tree.add_element(Some(li), Element::new("a").with_attr("href", "/x"));
///     tree.add_text(Some(a), "More");
/// }
///
/// let result = detect_structures(&tree, body, &Options::default());
/// assert_eq!(result.metadata.num_candidate_structures, 1);
/// assert_eq!(result.len(), 1);
/// ```
#[must_use]
pub fn detect_structures(tree: &NodeTree, root: NodeId, options: &Options) -> DetectResult {
    detector::run(tree, root, options)
}

/// Detects structures in annotated HTML, rooted at `<body>`.
///
/// # Example
///
/// ```rust
/// use rs_struktur::{detect_html, Options};
///
/// let result = detect_html("<body><p>Nothing repeats here</p></body>", &Options::default())?;
/// assert!(result.is_empty());
/// assert!(result.to_json()?.starts_with(r#"{"metadata":{"numCandidateStructures":0,"#));
/// # Ok::<(), rs_struktur::Error>(())
/// ```
#[allow(clippy::missing_errors_doc)]
pub fn detect_html(html: &str, options: &Options) -> Result<DetectResult> {
    let page = html::parse_annotated_html(html)?;
    Ok(detect_structures(&page.tree, page.root, options))
}

/// Detects structures in annotated HTML bytes with automatic encoding detection.
///
/// The charset comes from a byte order mark or a `<meta>` declaration and
/// defaults to UTF-8. Invalid sequences become U+FFFD rather than errors.
///
/// ```rust
/// use rs_struktur::{detect_html_bytes, Options};
///
/// let html = b"<meta charset=\"ISO-8859-1\"><body><p>Caf\xE9</p></body>";
/// assert!(detect_html_bytes(html, &Options::default())?.is_empty());
/// # Ok::<(), rs_struktur::Error>(())
/// ```
#[allow(clippy::missing_errors_doc)]
pub fn detect_html_bytes(html: &[u8], options: &Options) -> Result<DetectResult> {
    let html_str = encoding::transcode_to_utf8(html);
    detect_html(&html_str, options)
}

/// Detects structures in a JSON snapshot, rooted at its top-level element.
#[allow(clippy::missing_errors_doc)]
pub fn detect_snapshot(json: &str, options: &Options) -> Result<DetectResult> {
    let page = snapshot::parse_snapshot(json)?;
    Ok(detect_structures(&page.tree, page.root, options))
}
