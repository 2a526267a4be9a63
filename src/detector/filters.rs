//! Post-extraction filters.
//!
//! The object filter empties a member's item list when it carries nothing
//! worth keeping. The structure filter then drops any structure with an
//! empty member.

use crate::options::Options;
use crate::result::StructureRecord;

use super::content::Extracted;

/// Apply the object filter to one member's extraction, emptying it when it
/// fails.
#[must_use]
pub fn filter_object(mut extracted: Vec<Extracted>, options: &Options) -> Vec<Extracted> {
    let keep = !options.only_objects_with_links
        || extracted.iter().any(|e| e.item.is_link_with_text());
    if !keep {
        extracted.clear();
    }
    extracted
}

/// Whether an assembled record survives the structure filter.
#[must_use]
pub fn keep_structure(record: &StructureRecord) -> bool {
    !record.members.is_empty() && record.members.iter().all(|items| !items.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::ContentItem;
    use crate::tree::{Element, NodeTree};

    fn survives(items: &[ContentItem], options: &Options) -> bool {
        let mut tree = NodeTree::new();
        let node = tree.add_element(None, Element::new("div"));
        let extracted: Vec<Extracted> = items
            .iter()
            .map(|item| Extracted {
                source: node,
                item: item.clone(),
            })
            .collect();
        !filter_object(extracted, options).is_empty()
    }

    fn text(t: &str) -> ContentItem {
        ContentItem::Text {
            text: t.into(),
            class: None,
        }
    }

    fn link(t: &str) -> ContentItem {
        ContentItem::Link {
            href: "/x".into(),
            text: t.into(),
            class: None,
        }
    }

    #[test]
    fn test_object_filter_requires_link_with_text() {
        let options = Options::default();
        assert!(survives(&[text("a"), link("Buy")], &options));
        assert!(!survives(&[text("a")], &options));
        assert!(!survives(&[link("  ")], &options));
        assert!(!survives(&[], &options));
    }

    #[test]
    fn test_object_filter_disabled_keeps_text_only_lists() {
        let relaxed = Options {
            only_objects_with_links: false,
            ..Options::default()
        };
        assert!(survives(&[text("only text")], &relaxed));
        assert!(!survives(&[], &relaxed));
    }

    #[test]
    fn test_keep_structure_rejects_any_empty_member() {
        let full = StructureRecord {
            members: vec![vec![link("a")], vec![link("b")]],
        };
        let holed = StructureRecord {
            members: vec![vec![link("a")], vec![]],
        };
        assert!(keep_structure(&full));
        assert!(!keep_structure(&holed));
        assert!(!keep_structure(&StructureRecord::default()));
    }
}
