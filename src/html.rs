//! Annotated HTML input and highlighted HTML output.
//!
//! A renderer-side script can stamp every element with its layout before
//! serializing the DOM:
//!
//! ```html
//! <div class="card" data-struktur-rect="16,240,300,180"
//!      data-struktur-style="display:block;visibility:visible">...</div>
//! ```
//!
//! `parse_annotated_html` reads that back into a `NodeTree` using `dom_query`.
//! Elements without `data-struktur-style` fall back to their inline `style`
//! and `hidden` attributes. `visibility` inherits the way CSS does, and every
//! descendant of a `display: none` element gets an empty box, as a renderer
//! would report it.

use dom_query::{Document, NodeRef};

use crate::error::{Error, Result};
use crate::patterns::{RECT_VALUE, STYLE_DECLARATION};
use crate::tree::{BoundingBox, ComputedStyle, Element, NodeData, NodeId, NodeTree, Page, Visibility};

/// Attribute carrying an element's rendered box as `x,y,width,height`.
pub const RECT_ATTR: &str = "data-struktur-rect";

/// Attribute carrying an element's computed `display` and `visibility`.
pub const STYLE_ATTR: &str = "data-struktur-style";

const ANNOTATION_PREFIX: &str = "data-struktur-";

/// Elements a browser never renders.
const UNRENDERED_TAGS: &[&str] = &["head", "noscript", "script", "style", "template"];

const VOID_TAGS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param",
    "source", "track", "wbr",
];

/// Style state handed from an element to its children.
#[derive(Debug, Clone, Copy, Default)]
struct Inherited {
    visibility: Visibility,
    inside_display_none: bool,
}

/// Parse annotated HTML into a page rooted at `<body>`.
pub fn parse_annotated_html(html: &str) -> Result<Page> {
    let document = Document::from(html);
    let bodies = document.select("body");
    let Some(body) = bodies.nodes().first().cloned() else {
        return Err(Error::MissingRoot);
    };

    let mut tree = NodeTree::new();
    let mut stack: Vec<(NodeRef, Option<NodeId>, Inherited)> =
        vec![(body, None, Inherited::default())];

    while let Some((node, parent, inherited)) = stack.pop() {
        if node.is_element() {
            let (element, for_children) = convert_element(&node, inherited);
            let id = tree.add_element(parent, element);
            for child in node.children().into_iter().rev() {
                stack.push((child, Some(id), for_children));
            }
        } else if node.is_text() {
            tree.add_text(parent, &node.text());
        } else {
            tree.add_other(parent);
        }
    }

    let root = tree.root().ok_or(Error::MissingRoot)?;
    Ok(Page { tree, root })
}

fn convert_element(node: &NodeRef, inherited: Inherited) -> (Element, Inherited) {
    let tag = node
        .node_name()
        .map(|t| t.to_ascii_lowercase())
        .unwrap_or_default();

    let attrs: Vec<(String, String)> = node
        .attrs()
        .iter()
        .map(|attr| (attr.name.local.as_ref().to_ascii_lowercase(), attr.value.to_string()))
        .filter(|(name, _)| !name.starts_with(ANNOTATION_PREFIX))
        .collect();

    let declared = node
        .attr(STYLE_ATTR)
        .or_else(|| node.attr("style"))
        .map(|s| parse_style(&s))
        .unwrap_or_default();

    let display = declared.display.unwrap_or_else(|| {
        if UNRENDERED_TAGS.contains(&tag.as_str()) || node.attr("hidden").is_some() {
            "none".to_string()
        } else {
            "block".to_string()
        }
    });
    let visibility = declared.visibility.unwrap_or(inherited.visibility);

    let bounds = if inherited.inside_display_none {
        Some(BoundingBox::default())
    } else {
        node.attr(RECT_ATTR).and_then(|v| parse_rect(&v))
    };

    let style = ComputedStyle { display, visibility };
    let for_children = Inherited {
        visibility,
        inside_display_none: inherited.inside_display_none || style.is_display_none(),
    };

    let element = Element {
        tag,
        attrs,
        style,
        bounds,
        rendered_text: None,
    };
    (element, for_children)
}

/// Declared `display`/`visibility` of a style declaration list.
#[derive(Debug, Default, PartialEq)]
struct DeclaredStyle {
    display: Option<String>,
    visibility: Option<Visibility>,
}

fn parse_style(declarations: &str) -> DeclaredStyle {
    let mut style = DeclaredStyle::default();
    for caps in STYLE_DECLARATION.captures_iter(declarations) {
        let value = caps[2].trim().to_ascii_lowercase();
        match caps[1].to_ascii_lowercase().as_str() {
            "display" => style.display = Some(value),
            "visibility" => {
                if let Some(v) = Visibility::parse(&value) {
                    style.visibility = Some(v);
                }
            }
            _ => {}
        }
    }
    style
}

/// Parse an `x,y,width,height` rect. Negative sizes clamp to zero.
#[must_use]
pub fn parse_rect(value: &str) -> Option<BoundingBox> {
    let caps = RECT_VALUE.captures(value)?;
    let mut nums = [0.0_f64; 4];
    for (i, slot) in nums.iter_mut().enumerate() {
        *slot = caps[i + 1].parse::<f64>().ok().filter(|v| v.is_finite())?;
    }
    let [x, y, width, height] = nums;
    Some(BoundingBox::new(x, y, width.max(0.0), height.max(0.0)))
}

/// Serialize the subtree at `node` back to HTML.
///
/// Highlight borders recorded on the tree are merged into each element's
/// `style` attribute; layout annotations are not written back.
#[must_use]
pub fn to_html(tree: &NodeTree, node: NodeId) -> String {
    enum Step {
        Open(NodeId),
        Close(NodeId),
    }

    let mut out = String::new();
    let mut steps = vec![Step::Open(node)];

    while let Some(step) = steps.pop() {
        match step {
            Step::Open(id) => match tree.get(id).map(|n| &n.data) {
                Some(NodeData::Element(el)) => {
                    push_start_tag(&mut out, el, tree.highlight_of(id).as_deref());
                    if VOID_TAGS.contains(&el.tag.as_str()) {
                        continue;
                    }
                    steps.push(Step::Close(id));
                    steps.extend(tree.children(id).iter().rev().map(|c| Step::Open(*c)));
                }
                Some(NodeData::Text(text)) => {
                    let raw = tree
                        .parent_element(id)
                        .and_then(|p| tree.tag(p))
                        .is_some_and(|t| t == "script" || t == "style");
                    if raw {
                        out.push_str(text);
                    } else {
                        out.push_str(&escape_text(text));
                    }
                }
                Some(NodeData::Other) | None => {}
            },
            Step::Close(id) => {
                if let Some(tag) = tree.tag(id) {
                    out.push_str("</");
                    out.push_str(tag);
                    out.push('>');
                }
            }
        }
    }

    out
}

fn push_start_tag(out: &mut String, el: &Element, border: Option<&str>) {
    out.push('<');
    out.push_str(&el.tag);

    let mut wrote_style = false;
    for (name, value) in &el.attrs {
        let value = if name == "style" {
            wrote_style = true;
            merge_border(value, border)
        } else {
            value.clone()
        };
        push_attr(out, name, &value);
    }
    if !wrote_style {
        if let Some(border) = border {
            push_attr(out, "style", &format!("border: {border}"));
        }
    }
    out.push('>');
}

fn merge_border(style: &str, border: Option<&str>) -> String {
    match border {
        Some(border) => {
            let style = style.trim().trim_end_matches(';');
            if style.is_empty() {
                format!("border: {border}")
            } else {
                format!("{style}; border: {border}")
            }
        }
        None => style.to_string(),
    }
}

fn push_attr(out: &mut String, name: &str, value: &str) {
    out.push(' ');
    out.push_str(name);
    out.push_str("=\"");
    out.push_str(&value.replace('&', "&amp;").replace('"', "&quot;"));
    out.push('"');
}

fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
