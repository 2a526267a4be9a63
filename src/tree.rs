//! Rendered node tree.
//!
//! The rendering collaborator hands the detector a tree of elements and text
//! nodes that already carries layout: a bounding box and the computed
//! `display`/`visibility` of every element. `NodeTree` stores that tree in an
//! arena; nodes refer to each other by `NodeId`, an index into the arena, so
//! parent links never own anything and node identity is a plain integer.
//!
//! The detector only reads the tree. The one thing it may write is a
//! presentation annotation (a highlight border), kept beside the arena in a
//! `RefCell` so that annotating does not require `&mut` access.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::ops::Index;

use serde::{Deserialize, Serialize};

use crate::patterns::normalize_whitespace;

/// Identifier of a node within one `NodeTree`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// Position of the node in the arena (document order of insertion).
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

/// Rendered bounding box of an element, in CSS pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    #[must_use]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Whether the box occupies any space at all.
    #[must_use]
    pub fn has_size(&self) -> bool {
        self.width + self.height > 0.0
    }
}

/// Computed CSS `visibility`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    Visible,
    Hidden,
    Collapse,
}

impl Visibility {
    /// Parse a CSS keyword. Unknown keywords yield `None`.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "visible" => Some(Self::Visible),
            "hidden" => Some(Self::Hidden),
            "collapse" => Some(Self::Collapse),
            _ => None,
        }
    }
}

/// The computed style flags the detector looks at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComputedStyle {
    /// Computed `display`, lower-cased.
    pub display: String,
    pub visibility: Visibility,
}

impl Default for ComputedStyle {
    fn default() -> Self {
        Self {
            display: "block".to_string(),
            visibility: Visibility::Visible,
        }
    }
}

impl ComputedStyle {
    #[must_use]
    pub fn is_display_none(&self) -> bool {
        self.display == "none"
    }
}

/// Element payload of a node.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Element {
    /// Lower-cased tag name.
    pub tag: String,
    /// Attributes in source order.
    pub attrs: Vec<(String, String)>,
    pub style: ComputedStyle,
    /// Rendered box; `None` when the renderer reported no geometry.
    pub bounds: Option<BoundingBox>,
    /// Visible text as reported by the renderer (`innerText`), if supplied.
    pub rendered_text: Option<String>,
}

impl Element {
    #[must_use]
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_attr(mut self, name: &str, value: &str) -> Self {
        self.attrs.push((name.to_ascii_lowercase(), value.to_string()));
        self
    }

    #[must_use]
    pub fn with_bounds(mut self, bounds: BoundingBox) -> Self {
        self.bounds = Some(bounds);
        self
    }

    #[must_use]
    pub fn with_style(mut self, style: ComputedStyle) -> Self {
        self.style = style;
        self
    }

    /// Attribute value by (lower-case) name.
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }
}

/// What a node is.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeData {
    Element(Element),
    Text(String),
    /// Comments, processing instructions and anything else the renderer
    /// reports. Never visited by the detector.
    Other,
}

/// One node of the arena.
#[derive(Debug, Clone)]
pub struct Node {
    pub data: NodeData,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    #[must_use]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    #[must_use]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    #[must_use]
    pub fn as_element(&self) -> Option<&Element> {
        match &self.data {
            NodeData::Element(el) => Some(el),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match &self.data {
            NodeData::Text(text) => Some(text),
            _ => None,
        }
    }
}

/// Which node kinds a traversal yields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeFilter {
    Elements,
    Text,
    ElementsAndText,
}

impl NodeFilter {
    fn accepts(self, data: &NodeData) -> bool {
        match (self, data) {
            (_, NodeData::Other) => false,
            (Self::Elements, NodeData::Element(_))
            | (Self::Text, NodeData::Text(_))
            | (Self::ElementsAndText, _) => true,
            _ => false,
        }
    }
}

/// Arena of rendered nodes.
#[derive(Debug, Clone, Default)]
pub struct NodeTree {
    nodes: Vec<Node>,
    highlights: RefCell<BTreeMap<NodeId, String>>,
}

impl NodeTree {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The first node added, which every adapter uses as the tree root.
    #[must_use]
    pub fn root(&self) -> Option<NodeId> {
        if self.nodes.is_empty() {
            None
        } else {
            Some(NodeId(0))
        }
    }

    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// Append an element under `parent` (or as a detached root).
    pub fn add_element(&mut self, parent: Option<NodeId>, element: Element) -> NodeId {
        self.push(parent, NodeData::Element(element))
    }

    /// Append a text node under `parent`.
    pub fn add_text(&mut self, parent: Option<NodeId>, text: &str) -> NodeId {
        self.push(parent, NodeData::Text(text.to_string()))
    }

    /// Append an opaque node (comment etc.) under `parent`.
    pub fn add_other(&mut self, parent: Option<NodeId>) -> NodeId {
        self.push(parent, NodeData::Other)
    }

    fn push(&mut self, parent: Option<NodeId>, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len());
        let parent = parent.filter(|p| p.0 < self.nodes.len());
        self.nodes.push(Node {
            data,
            parent,
            children: Vec::new(),
        });
        if let Some(p) = parent {
            self.nodes[p.0].children.push(id);
        }
        id
    }

    #[must_use]
    pub fn element(&self, id: NodeId) -> Option<&Element> {
        self.get(id).and_then(Node::as_element)
    }

    #[must_use]
    pub fn tag(&self, id: NodeId) -> Option<&str> {
        self.element(id).map(|el| el.tag.as_str())
    }

    #[must_use]
    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id).and_then(|el| el.attr(name))
    }

    /// Whitespace-normalized `class` attribute; `None` when absent or blank.
    #[must_use]
    pub fn class_name(&self, id: NodeId) -> Option<String> {
        self.attr(id, "class")
            .map(normalize_whitespace)
            .filter(|c| !c.is_empty())
    }

    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map_or(&[], Node::children)
    }

    /// Direct element children in document order.
    pub fn element_children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.children(id)
            .iter()
            .copied()
            .filter(|c| self.get(*c).is_some_and(|n| n.as_element().is_some()))
    }

    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(Node::parent)
    }

    /// Nearest ancestor that is an element.
    #[must_use]
    pub fn parent_element(&self, id: NodeId) -> Option<NodeId> {
        let mut current = self.parent(id);
        while let Some(p) = current {
            if self.get(p).is_some_and(|n| n.as_element().is_some()) {
                return Some(p);
            }
            current = self.parent(p);
        }
        None
    }

    /// Rendered box of an element; unknown geometry counts as 0×0.
    #[must_use]
    pub fn bounds(&self, id: NodeId) -> BoundingBox {
        self.element(id).and_then(|el| el.bounds).unwrap_or_default()
    }

    /// Whether an element is shown: not `display: none`, `visibility:
    /// visible`, and a box with some size (when the renderer reported one).
    #[must_use]
    pub fn is_visible(&self, id: NodeId) -> bool {
        let Some(el) = self.element(id) else {
            return false;
        };
        if el.style.is_display_none() || el.style.visibility != Visibility::Visible {
            return false;
        }
        el.bounds.is_none_or(|b| b.has_size())
    }

    /// Whether a text node's nearest element ancestor is visible.
    #[must_use]
    pub fn is_text_visible(&self, id: NodeId) -> bool {
        self.parent_element(id).is_some_and(|p| self.is_visible(p))
    }

    /// Depth-first, document-order traversal of `root` and its descendants,
    /// yielding only the node kinds `filter` accepts.
    #[must_use]
    pub fn descendants(&self, root: NodeId, filter: NodeFilter) -> Descendants<'_> {
        let stack = if self.get(root).is_some() { vec![root] } else { Vec::new() };
        Descendants {
            tree: self,
            stack,
            filter,
        }
    }

    /// Visible text of a subtree, the way a renderer reports `innerText`:
    /// the renderer-supplied value trimmed when there is one, otherwise every
    /// visible text node whitespace-normalized and joined by single spaces.
    #[must_use]
    pub fn rendered_text(&self, id: NodeId) -> String {
        if let Some(text) = self.element(id).and_then(|el| el.rendered_text.as_deref()) {
            return text.trim().to_string();
        }
        let pieces: Vec<String> = self
            .descendants(id, NodeFilter::Text)
            .filter(|t| self.is_text_visible(*t))
            .filter_map(|t| self.get(t).and_then(Node::as_text))
            .map(normalize_whitespace)
            .filter(|t| !t.is_empty())
            .collect();
        pieces.join(" ")
    }

    /// Record a border style on a node.
    pub fn highlight(&self, id: NodeId, border: &str) {
        self.highlights.borrow_mut().insert(id, border.to_string());
    }

    /// Border recorded on a node, if any.
    #[must_use]
    pub fn highlight_of(&self, id: NodeId) -> Option<String> {
        self.highlights.borrow().get(&id).cloned()
    }

    #[must_use]
    pub fn highlighted_count(&self) -> usize {
        self.highlights.borrow().len()
    }

    pub fn clear_highlights(&self) {
        self.highlights.borrow_mut().clear();
    }
}

impl Index<NodeId> for NodeTree {
    type Output = Node;

    fn index(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }
}

/// A rendered page: the node tree and the node to analyze (usually `<body>`).
#[derive(Debug, Clone)]
pub struct Page {
    pub tree: NodeTree,
    pub root: NodeId,
}

/// Iterator returned by [`NodeTree::descendants`].
pub struct Descendants<'a> {
    tree: &'a NodeTree,
    stack: Vec<NodeId>,
    filter: NodeFilter,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        while let Some(id) = self.stack.pop() {
            let node = &self.tree[id];
            self.stack.extend(node.children.iter().rev().copied());
            if self.filter.accepts(&node.data) {
                return Some(id);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (NodeTree, NodeId, NodeId, NodeId, NodeId) {
        // <div><a href="/x">Buy <b>now</b></a><!-- --><span>tail</span></div>
        let mut tree = NodeTree::new();
        let div = tree.add_element(None, Element::new("DIV").with_attr("class", "  card   big "));
        let a = tree.add_element(Some(div), Element::new("a").with_attr("href", "/x"));
        let buy = tree.add_text(Some(a), "Buy ");
        let b = tree.add_element(Some(a), Element::new("b"));
        tree.add_text(Some(b), "now");
        tree.add_other(Some(div));
        let span = tree.add_element(Some(div), Element::new("span"));
        tree.add_text(Some(span), "tail");
        (tree, div, a, buy, span)
    }

    #[test]
    fn test_descendants_document_order() {
        let (tree, div, a, buy, span) = sample();
        let elements: Vec<NodeId> = tree.descendants(div, NodeFilter::Elements).collect();
        assert_eq!(elements.len(), 4);
        assert_eq!(elements[0], div);
        assert_eq!(elements[1], a);
        assert_eq!(elements[3], span);

        let all: Vec<NodeId> = tree.descendants(div, NodeFilter::ElementsAndText).collect();
        assert_eq!(all.len(), 7);
        assert_eq!(all[2], buy);
    }

    #[test]
    fn test_text_helpers() {
        let (tree, div, a, _, _) = sample();
        assert_eq!(tree.rendered_text(a), "Buy now");
        assert_eq!(tree.rendered_text(div), "Buy now tail");
        assert_eq!(tree.tag(div), Some("div"));
        assert_eq!(tree.class_name(div).as_deref(), Some("card big"));
        assert_eq!(tree.attr(a, "href"), Some("/x"));
    }

    #[test]
    fn test_rendered_text_prefers_renderer_value() {
        let mut tree = NodeTree::new();
        let div = tree.add_element(
            None,
            Element {
                rendered_text: Some("  Buy now\n\ntail \n".to_string()),
                ..Element::new("div")
            },
        );
        tree.add_text(Some(div), "ignored");
        assert_eq!(tree.rendered_text(div), "Buy now\n\ntail");
    }

    #[test]
    fn test_visibility_rules() {
        let mut tree = NodeTree::new();
        let root = tree.add_element(None, Element::new("div"));
        let shown = tree.add_element(
            Some(root),
            Element::new("p").with_bounds(BoundingBox::new(0.0, 0.0, 10.0, 0.0)),
        );
        let collapsed = tree.add_element(
            Some(root),
            Element::new("p").with_bounds(BoundingBox::new(0.0, 0.0, 0.0, 0.0)),
        );
        let hidden = tree.add_element(
            Some(root),
            Element::new("p").with_style(ComputedStyle {
                display: "block".into(),
                visibility: Visibility::Hidden,
            }),
        );
        let none = tree.add_element(
            Some(root),
            Element::new("p").with_style(ComputedStyle {
                display: "none".into(),
                visibility: Visibility::Visible,
            }),
        );
        let text = tree.add_text(Some(collapsed), "gone");

        assert!(tree.is_visible(root));
        assert!(tree.is_visible(shown));
        assert!(!tree.is_visible(collapsed));
        assert!(!tree.is_visible(hidden));
        assert!(!tree.is_visible(none));
        assert!(!tree.is_text_visible(text));
        assert_eq!(tree.rendered_text(root), "");
    }

    #[test]
    fn test_highlights_are_separate_from_nodes() {
        let (tree, div, a, ..) = sample();
        assert_eq!(tree.highlighted_count(), 0);
        tree.highlight(div, "1px solid red");
        tree.highlight(a, "1px solid blue");
        assert_eq!(tree.highlight_of(div).as_deref(), Some("1px solid red"));
        assert_eq!(tree.highlighted_count(), 2);
        tree.clear_highlights();
        assert!(tree.highlight_of(a).is_none());
    }

    #[test]
    fn test_missing_node_is_harmless() {
        let tree = NodeTree::new();
        assert!(tree.root().is_none());
        assert_eq!(tree.descendants(NodeId(3), NodeFilter::Elements).count(), 0);
        assert!(tree.children(NodeId(3)).is_empty());
        assert!(!tree.is_visible(NodeId(3)));
    }
}
