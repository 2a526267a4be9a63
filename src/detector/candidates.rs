//! Candidate discovery.
//!
//! A candidate is a container whose direct children repeat one allowed tag
//! at least `n` times. Every element under the root is examined, nested
//! containers included, since repeated structures nest (a grid of cards each
//! holding a list of tags).

use crate::options::Options;
use crate::tree::{NodeFilter, NodeId, NodeTree};

/// A container and one of its repeated child tags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateGroup {
    pub container: NodeId,
    pub tag: String,
    /// Children carrying `tag`, in document order.
    pub children: Vec<NodeId>,
}

/// Find every (container, tag) pair under `root` with enough repetition.
///
/// Groups come out in document order of their containers; a container with
/// several qualifying tags yields one group per tag, ordered by the tag's
/// first appearance among its children.
#[must_use]
pub fn find_candidates(tree: &NodeTree, root: NodeId, options: &Options) -> Vec<CandidateGroup> {
    let mut groups = Vec::new();

    for element in tree.descendants(root, NodeFilter::Elements) {
        let children: Vec<NodeId> = tree.element_children(element).collect();
        if children.len() < options.n {
            continue;
        }

        // (tag, matching children), in order of first appearance
        let mut by_tag: Vec<(&str, Vec<NodeId>)> = Vec::new();
        for child in children {
            let Some(tag) = tree.tag(child) else { continue };
            if !options.is_structure_tag(tag) {
                continue;
            }
            match by_tag.iter_mut().find(|(t, _)| *t == tag) {
                Some((_, members)) => members.push(child),
                None => by_tag.push((tag, vec![child])),
            }
        }

        groups.extend(
            by_tag
                .into_iter()
                .filter(|(_, members)| members.len() >= options.n)
                .map(|(tag, members)| CandidateGroup {
                    container: element,
                    tag: tag.to_string(),
                    children: members,
                }),
        );
    }

    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::Element;

    fn options(n: usize) -> Options {
        Options {
            n,
            ..Options::default()
        }
    }

    #[test]
    fn test_counts_only_allowed_tags() {
        let mut tree = NodeTree::new();
        let body = tree.add_element(None, Element::new("body"));
        let list = tree.add_element(Some(body), Element::new("ul"));
        for _ in 0..3 {
            tree.add_element(Some(list), Element::new("li"));
        }
        let table = tree.add_element(Some(body), Element::new("table"));
        for _ in 0..3 {
            tree.add_element(Some(table), Element::new("tr"));
        }

        let groups = find_candidates(&tree, body, &options(3));
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].container, list);
        assert_eq!(groups[0].tag, "li");
        assert_eq!(groups[0].children.len(), 3);
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let mut tree = NodeTree::new();
        let body = tree.add_element(None, Element::new("body"));
        for _ in 0..4 {
            tree.add_element(Some(body), Element::new("div"));
        }
        assert_eq!(find_candidates(&tree, body, &options(4)).len(), 1);
        assert!(find_candidates(&tree, body, &options(5)).is_empty());
    }

    #[test]
    fn test_root_is_a_container_but_its_ancestors_are_not() {
        let mut tree = NodeTree::new();
        let body = tree.add_element(None, Element::new("body"));
        for _ in 0..3 {
            tree.add_element(Some(body), Element::new("section"));
        }
        let list = tree.add_element(Some(body), Element::new("ul"));
        for _ in 0..3 {
            tree.add_element(Some(list), Element::new("li"));
        }

        let groups = find_candidates(&tree, body, &options(3));
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].container, body);
        assert_eq!(groups[0].tag, "section");
        assert_eq!(groups[1].container, list);

        let groups = find_candidates(&tree, list, &options(3));
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].container, list);
    }

    #[test]
    fn test_multiple_tags_and_text_children() {
        let mut tree = NodeTree::new();
        let body = tree.add_element(None, Element::new("body"));
        for _ in 0..3 {
            tree.add_element(Some(body), Element::new("p"));
            tree.add_text(Some(body), "\n");
            tree.add_element(Some(body), Element::new("div"));
        }
        tree.add_element(Some(body), Element::new("span"));

        let groups = find_candidates(&tree, body, &options(3));
        let tags: Vec<&str> = groups.iter().map(|g| g.tag.as_str()).collect();
        assert_eq!(tags, vec!["p", "div"]);
    }

    #[test]
    fn test_nested_containers_each_produce_candidates() {
        let mut tree = NodeTree::new();
        let body = tree.add_element(None, Element::new("body"));
        let mut first = None;
        for _ in 0..3 {
            let card = tree.add_element(Some(body), Element::new("article"));
            first.get_or_insert(card);
            for _ in 0..3 {
                tree.add_element(Some(card), Element::new("span"));
            }
        }

        let groups = find_candidates(&tree, body, &options(3));
        assert_eq!(groups.len(), 4);
        assert_eq!(groups[0].container, body);
        assert_eq!(groups[0].tag, "article");
        assert_eq!(Some(groups[1].container), first);
        assert!(groups[1..].iter().all(|g| g.tag == "span"));
    }
}
