//! Content extraction from one structure member.
//!
//! The member's subtree is walked in document order over elements and text
//! nodes. Anchors become links, images become image items, and remaining
//! visible text becomes text items (or, in fulltext mode, one item holding
//! the member's whole visible text).

use crate::options::Options;
use crate::result::ContentItem;
use crate::tree::{Element, NodeData, NodeFilter, NodeId, NodeTree};
use crate::url_utils::{is_data_uri, resolve_url};

use super::state::WalkState;

/// A content item together with the node that produced it.
///
/// The node id is only used for highlighting and never leaves the crate's
/// result types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extracted {
    pub source: NodeId,
    pub item: ContentItem,
}

/// Extract readable content from the subtree rooted at `member`.
#[must_use]
pub fn extract_content(tree: &NodeTree, member: NodeId, options: &Options) -> Vec<Extracted> {
    let mut state = WalkState::new();
    let mut out = Vec::new();

    for node in tree.descendants(member, NodeFilter::ElementsAndText) {
        match &tree[node].data {
            NodeData::Element(el) if el.tag == "a" => {
                if let Some(item) = extract_link(tree, node, el, options) {
                    state.consume_text_under(tree, node);
                    out.push(Extracted { source: node, item });
                }
            }
            NodeData::Element(el) if el.tag == "img" => {
                if let Some(item) = extract_image(tree, node, el, options) {
                    out.push(Extracted { source: node, item });
                }
            }
            NodeData::Text(text) => {
                if options.fulltext || state.is_consumed(node) || !tree.is_text_visible(node) {
                    continue;
                }
                let text = text.trim();
                if text.is_empty() {
                    continue;
                }
                let Some(parent) = tree.parent_element(node) else {
                    continue;
                };
                out.push(Extracted {
                    source: parent,
                    item: ContentItem::Text {
                        text: text.to_string(),
                        class: class_of(tree, parent, options),
                    },
                });
            }
            NodeData::Element(_) | NodeData::Other => {}
        }
    }

    if options.fulltext {
        let text = tree.rendered_text(member);
        if !text.is_empty() {
            out.push(Extracted {
                source: member,
                item: ContentItem::Fulltext {
                    text,
                    class: class_of(tree, member, options),
                },
            });
        }
    }

    out
}

/// An anchor with a non-blank href and visible text.
fn extract_link(
    tree: &NodeTree,
    node: NodeId,
    el: &Element,
    options: &Options,
) -> Option<ContentItem> {
    let href = el.attr("href").filter(|h| !h.trim().is_empty())?;
    let text = tree.rendered_text(node);
    if text.is_empty() {
        return None;
    }
    Some(ContentItem::Link {
        href: resolve_url(href, options.base_url.as_ref()),
        text,
        class: class_of(tree, node, options),
    })
}

/// An image with a `src` attribute, unless both source and alt end up empty.
fn extract_image(
    tree: &NodeTree,
    node: NodeId,
    el: &Element,
    options: &Options,
) -> Option<ContentItem> {
    let raw = el.attr("src")?;
    let src = if options.no_data_img_src && is_data_uri(raw) {
        String::new()
    } else {
        resolve_url(raw, options.base_url.as_ref())
    };
    let alt = el.attr("alt").map(|a| a.trim().to_string());

    if src.trim().is_empty() && alt.as_deref().is_none_or(str::is_empty) {
        return None;
    }
    Some(ContentItem::Image {
        src,
        alt,
        class: class_of(tree, node, options),
    })
}

fn class_of(tree: &NodeTree, node: NodeId, options: &Options) -> Option<String> {
    if options.add_class {
        tree.class_name(node)
    } else {
        None
    }
}
