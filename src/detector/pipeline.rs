//! Detection pipeline.
//!
//! Runs the stages in order: candidate discovery, geometric alignment, then
//! per structure and per member content extraction and the object filter,
//! and finally the structure filter over each assembled record.

use std::time::Instant;

use tracing::debug;

use crate::options::Options;
use crate::result::{DetectResult, RunMetadata, StructureRecord};
use crate::tree::{NodeId, NodeTree};

use super::alignment::{align_candidates, Structure};
use super::candidates::find_candidates;
use super::content::{extract_content, Extracted};
use super::filters::{filter_object, keep_structure};

/// Border drawn around members of kept structures.
pub const STRUCTURE_BORDER: &str = "2px solid #e53935";

/// Border drawn around nodes that produced content items.
pub const CONTENT_BORDER: &str = "1px dashed #1e88e5";

/// Find the aligned structures under `root`, before any content filtering.
#[must_use]
pub fn discover_structures(tree: &NodeTree, root: NodeId, options: &Options) -> Vec<Structure> {
    let candidates = find_candidates(tree, root, options);
    debug!(candidates = candidates.len(), "candidate groups found");

    let structures = align_candidates(tree, &candidates, options);
    debug!(structures = structures.len(), "structures aligned");

    structures
}

/// Extract one structure's members, each passed through the object filter.
#[must_use]
pub fn extract_structure(
    tree: &NodeTree,
    structure: &Structure,
    options: &Options,
) -> Vec<Vec<Extracted>> {
    structure
        .members
        .iter()
        .map(|member| filter_object(extract_content(tree, *member, options), options))
        .collect()
}

/// Run the full detection over the subtree rooted at `root`.
#[must_use]
pub fn run(tree: &NodeTree, root: NodeId, options: &Options) -> DetectResult {
    let start = Instant::now();

    let structures = discover_structures(tree, root, options);
    let num_candidate_structures = structures.len();

    let mut records = Vec::new();
    for structure in &structures {
        let members = extract_structure(tree, structure, options);
        let record = StructureRecord {
            members: members
                .iter()
                .map(|items| items.iter().map(|e| e.item.clone()).collect())
                .collect(),
        };

        if !keep_structure(&record) {
            debug!(
                container = structure.container.index(),
                tag = %structure.tag,
                "structure dropped: a member produced no content"
            );
            continue;
        }

        highlight(tree, structure, &members, options);
        records.push(record);
    }

    let metadata = RunMetadata {
        num_candidate_structures,
        time_elapsed_ms: start.elapsed().as_secs_f64() * 1000.0,
    };
    debug!(
        kept = records.len(),
        candidates = num_candidate_structures,
        elapsed_ms = metadata.time_elapsed_ms,
        "detection finished"
    );

    DetectResult::new(records, metadata)
}

fn highlight(tree: &NodeTree, structure: &Structure, members: &[Vec<Extracted>], options: &Options) {
    if options.highlight_struktur {
        for member in &structure.members {
            tree.highlight(*member, STRUCTURE_BORDER);
        }
    }
    if options.highlight_content {
        for extracted in members.iter().flatten() {
            tree.highlight(extracted.source, CONTENT_BORDER);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::ContentItem;
    use crate::tree::{BoundingBox, Element};

    /// Body holding `count` 300x150 cards, each with a title link and a
    /// price; `bare` lists the cards that get no link.
    fn cards(count: usize, bare: &[usize]) -> (NodeTree, NodeId) {
        let mut tree = NodeTree::new();
        let body = tree.add_element(None, Element::new("body"));
        for i in 0..count {
            let card = tree.add_element(
                Some(body),
                Element::new("div")
                    .with_attr("class", "card")
                    .with_bounds(BoundingBox::new(0.0, i as f64 * 150.0, 300.0, 150.0)),
            );
            if !bare.contains(&i) {
                let a = tree.add_element(
                    Some(card),
                    Element::new("a").with_attr("href", &format!("/item/{i}")),
                );
                tree.add_text(Some(a), &format!("Item {i}"));
            }
            let price = tree.add_element(Some(card), Element::new("span"));
            tree.add_text(Some(price), "9.99");
        }
        (tree, body)
    }

    fn options(n: usize) -> Options {
        Options {
            n,
            ..Options::default()
        }
    }

    #[test]
    fn test_run_extracts_every_member() {
        let (tree, body) = cards(3, &[]);
        let result = run(&tree, body, &options(3));

        // Height and width both align: the same cards appear twice.
        assert_eq!(result.metadata.num_candidate_structures, 2);
        assert_eq!(result.len(), 2);
        let record = result.get("structure_0").unwrap();
        assert_eq!(record.len(), 3);
        assert_eq!(
            record.members[1],
            vec![
                ContentItem::Link {
                    href: "/item/1".into(),
                    text: "Item 1".into(),
                    class: None
                },
                ContentItem::Text {
                    text: "9.99".into(),
                    class: None
                },
            ]
        );
        assert_eq!(result.get("structure_0"), result.get("structure_1"));
    }

    #[test]
    fn test_member_without_link_drops_structure() {
        let (tree, body) = cards(3, &[2]);
        let result = run(&tree, body, &options(3));
        assert!(result.is_empty());
        assert_eq!(result.metadata.num_candidate_structures, 2);

        let relaxed = Options {
            only_objects_with_links: false,
            ..options(3)
        };
        assert_eq!(run(&tree, body, &relaxed).len(), 2);
    }

    #[test]
    fn test_highlighting_does_not_change_output() {
        let (tree, body) = cards(3, &[]);
        let plain = run(&tree, body, &options(3));
        assert_eq!(tree.highlighted_count(), 0);

        let highlighted = Options {
            highlight_struktur: true,
            highlight_content: true,
            ..options(3)
        };
        let result = run(&tree, body, &highlighted);
        assert_eq!(
            result.records().collect::<Vec<_>>(),
            plain.records().collect::<Vec<_>>()
        );
        // 3 cards + 3 links + 3 price spans
        assert_eq!(tree.highlighted_count(), 9);
    }
}
