//! JSON snapshot input.
//!
//! A rendering context can serialize what it sees into nested JSON and hand
//! that across to the host process:
//!
//! ```json
//! {"type": "element", "tag": "div", "attrs": {"class": "card"},
//!  "rect": {"x": 0, "y": 0, "width": 300, "height": 120},
//!  "style": {"display": "block", "visibility": "visible"},
//!  "innerText": "Buy\n9.99",
//!  "children": [{"type": "text", "text": "Buy"}]}
//! ```
//!
//! Only `type` is required. Nodes of any other `type` (comments, CDATA ...)
//! are kept as opaque nodes. The top-level node is the analysis root.

use std::collections::BTreeMap;

use serde::de::Error as _;
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::tree::{BoundingBox, ComputedStyle, Element, NodeId, NodeTree, Page, Visibility};

/// Deepest JSON nesting accepted (two levels per DOM level).
pub const MAX_NESTING: usize = 4096;

/// One node of a snapshot document.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotNode {
    /// `element`, `text`, or anything else for an opaque node.
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub tag: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub attrs: BTreeMap<String, String>,
    #[serde(default)]
    pub rect: Option<BoundingBox>,
    #[serde(default)]
    pub style: Option<SnapshotStyle>,
    #[serde(default)]
    pub inner_text: Option<String>,
    #[serde(default)]
    pub children: Vec<SnapshotNode>,
}

/// Computed style as the snapshot reports it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SnapshotStyle {
    #[serde(default)]
    pub display: Option<String>,
    #[serde(default)]
    pub visibility: Option<String>,
}

impl From<SnapshotStyle> for ComputedStyle {
    fn from(style: SnapshotStyle) -> Self {
        let defaults = ComputedStyle::default();
        Self {
            display: style
                .display
                .map(|d| d.trim().to_ascii_lowercase())
                .filter(|d| !d.is_empty())
                .unwrap_or(defaults.display),
            visibility: style
                .visibility
                .as_deref()
                .and_then(Visibility::parse)
                .unwrap_or(defaults.visibility),
        }
    }
}

/// Parse a JSON snapshot into a page rooted at its top-level node.
///
/// Nesting is bounded by [`MAX_NESTING`] rather than serde_json's default
/// recursion limit, which real pages exceed.
pub fn parse_snapshot(json: &str) -> Result<Page> {
    let depth = nesting_depth(json);
    if depth > MAX_NESTING {
        return Err(Error::Json(serde_json::Error::custom(format!(
            "snapshot nested {depth} levels deep, limit is {MAX_NESTING}"
        ))));
    }

    let mut de = serde_json::Deserializer::from_str(json);
    de.disable_recursion_limit();
    let root = SnapshotNode::deserialize(serde_stacker::Deserializer::new(&mut de))?;
    de.end()?;
    from_snapshot(root)
}

/// Maximum bracket nesting of a JSON document, ignoring string contents.
fn nesting_depth(json: &str) -> usize {
    let (mut depth, mut max) = (0usize, 0usize);
    let (mut in_string, mut escaped) = (false, false);
    for b in json.bytes() {
        if in_string {
            match b {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match b {
            b'"' => in_string = true,
            b'{' | b'[' => {
                depth += 1;
                max = max.max(depth);
            }
            b'}' | b']' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    max
}

/// Build a page from an already deserialized snapshot.
///
/// The top-level node must be an element, and every element needs a `tag`.
pub fn from_snapshot(root: SnapshotNode) -> Result<Page> {
    if root.kind != "element" {
        return Err(Error::MissingRoot);
    }

    let mut tree = NodeTree::new();
    let mut stack: Vec<(SnapshotNode, Option<NodeId>)> = vec![(root, None)];

    while let Some((node, parent)) = stack.pop() {
        match node.kind.as_str() {
            "element" => {
                let Some(tag) = node.tag else {
                    return Err(Error::Json(serde_json::Error::custom(
                        "element node without `tag`",
                    )));
                };
                let element = Element {
                    tag: tag.trim().to_ascii_lowercase(),
                    attrs: node
                        .attrs
                        .into_iter()
                        .map(|(name, value)| (name.to_ascii_lowercase(), value))
                        .collect(),
                    style: node.style.map(ComputedStyle::from).unwrap_or_default(),
                    bounds: node.rect,
                    rendered_text: node.inner_text,
                };
                let id = tree.add_element(parent, element);
                stack.extend(node.children.into_iter().rev().map(|child| (child, Some(id))));
            }
            "text" => {
                tree.add_text(parent, node.text.as_deref().unwrap_or_default());
            }
            _ => {
                tree.add_other(parent);
            }
        }
    }

    let root = tree.root().ok_or(Error::MissingRoot)?;
    Ok(Page { tree, root })
}
