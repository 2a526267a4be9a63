//! Geometric alignment of candidate groups.
//!
//! A group becomes a structure when its children line up: enough of them
//! share (within a relative tolerance) the same rendered height, or the same
//! rendered width. Each axis is judged on its own, so one group can qualify
//! twice and yield the same members once per axis.

use std::collections::HashSet;

use tracing::trace;

use super::candidates::CandidateGroup;
use crate::options::Options;
use crate::tree::{NodeId, NodeTree};

/// Axis along which a structure's members agree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Alignment {
    Width,
    Height,
}

/// Ordered sibling nodes confirmed as one repeated unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Structure {
    pub container: NodeId,
    pub tag: String,
    pub alignment: Alignment,
    /// All children of the container with `tag`, in document order.
    pub members: Vec<NodeId>,
}

/// Whether a set of measurements is large enough and close enough to its
/// mean: `len >= n` and `|v - mean| / mean < error_margin` for every value.
///
/// The whole set passes or fails together; outliers are not pruned. An empty
/// set, or one whose mean is not positive, never qualifies.
#[must_use]
pub fn is_aligned(values: &[f64], n: usize, error_margin: f64) -> bool {
    if values.is_empty() || values.len() < n {
        return false;
    }
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    if mean <= 0.0 || !mean.is_finite() {
        return false;
    }
    values
        .iter()
        .all(|v| (v - mean).abs() / mean < error_margin)
}

/// Keep the candidate groups whose children align by height or width.
///
/// Heights are checked first, then widths; a group passing both appears
/// twice unless `collapse_duplicate_structures` is set, in which case any
/// structure whose members equal an earlier one is dropped.
#[must_use]
pub fn align_candidates(
    tree: &NodeTree,
    candidates: &[CandidateGroup],
    options: &Options,
) -> Vec<Structure> {
    let mut structures = Vec::new();
    let mut seen: HashSet<Vec<NodeId>> = HashSet::new();

    for candidate in candidates {
        let mut widths = Vec::new();
        let mut heights = Vec::new();
        for child in &candidate.children {
            let rect = tree.bounds(*child);
            if rect.width > options.min_width && rect.height > 0.0 {
                widths.push(rect.width);
            }
            if rect.height > options.min_height && rect.width > 0.0 {
                heights.push(rect.height);
            }
        }

        for (alignment, values) in [(Alignment::Height, &heights), (Alignment::Width, &widths)] {
            if !is_aligned(values, options.n, options.error_margin) {
                trace!(
                    container = candidate.container.index(),
                    tag = %candidate.tag,
                    ?alignment,
                    measured = values.len(),
                    "candidate not aligned"
                );
                continue;
            }
            if options.collapse_duplicate_structures && !seen.insert(candidate.children.clone()) {
                continue;
            }
            structures.push(Structure {
                container: candidate.container,
                tag: candidate.tag.clone(),
                alignment,
                members: candidate.children.clone(),
            });
        }
    }

    structures
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detector::candidates::find_candidates;
    use crate::tree::{BoundingBox, Element};

    fn grid(sizes: &[(f64, f64)]) -> (NodeTree, NodeId) {
        let mut tree = NodeTree::new();
        let body = tree.add_element(None, Element::new("body"));
        for (i, (w, h)) in sizes.iter().enumerate() {
            tree.add_element(
                Some(body),
                Element::new("div").with_bounds(BoundingBox::new(0.0, i as f64 * h, *w, *h)),
            );
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
    fn test_outlier_fails_whole_set() {
        assert!(!is_aligned(&[210.0, 212.0, 209.0, 400.0], 4, 0.125));
        assert!(is_aligned(&[210.0, 212.0, 209.0], 3, 0.125));
    }

    #[test]
    fn test_small_deviation_qualifies() {
        assert!(is_aligned(&[300.0, 305.0, 298.0], 3, 0.125));
    }

    #[test]
    fn test_empty_and_short_sets_never_qualify() {
        assert!(!is_aligned(&[], 0, 0.125));
        assert!(!is_aligned(&[300.0, 300.0], 3, 0.125));
        assert!(!is_aligned(&[0.0, 0.0, 0.0], 3, 0.125));
    }

    #[test]
    fn test_width_alignment_emits_members_in_order() {
        // Heights vary wildly, widths agree.
        let (tree, body) = grid(&[(300.0, 120.0), (305.0, 400.0), (298.0, 150.0)]);
        let candidates = find_candidates(&tree, body, &options(3));
        let structures = align_candidates(&tree, &candidates, &options(3));

        assert_eq!(structures.len(), 1);
        assert_eq!(structures[0].alignment, Alignment::Width);
        assert_eq!(structures[0].members, candidates[0].children);
    }

    #[test]
    fn test_both_axes_yield_duplicate_unless_collapsed() {
        let (tree, body) = grid(&[(300.0, 120.0); 3]);
        let candidates = find_candidates(&tree, body, &options(3));

        let structures = align_candidates(&tree, &candidates, &options(3));
        assert_eq!(structures.len(), 2);
        assert_eq!(structures[0].alignment, Alignment::Height);
        assert_eq!(structures[1].alignment, Alignment::Width);
        assert_eq!(structures[0].members, structures[1].members);

        let collapsing = Options {
            collapse_duplicate_structures: true,
            ..options(3)
        };
        let structures = align_candidates(&tree, &candidates, &collapsing);
        assert_eq!(structures.len(), 1);
        assert_eq!(structures[0].alignment, Alignment::Height);
    }

    #[test]
    fn test_small_and_collapsed_children_do_not_count() {
        // Too narrow for width alignment, too short for height alignment.
        let (tree, body) = grid(&[(150.0, 80.0); 4]);
        let candidates = find_candidates(&tree, body, &options(4));
        assert_eq!(candidates.len(), 1);
        assert!(align_candidates(&tree, &candidates, &options(4)).is_empty());

        // Wide but zero height: excluded from the width set too.
        let (tree, body) = grid(&[(300.0, 0.0); 4]);
        let candidates = find_candidates(&tree, body, &options(4));
        assert!(align_candidates(&tree, &candidates, &options(4)).is_empty());
    }
}
