//! Per-walk extraction state.
//!
//! Tracks the text nodes already captured inside an extracted link so the
//! same text is never emitted again as a standalone text item. A fresh state
//! is created for every structure member; nothing carries over between walks.

use std::collections::HashSet;

use crate::tree::{NodeFilter, NodeId, NodeTree};

/// Consumed text nodes of one structure-member walk.
#[derive(Debug, Default)]
pub struct WalkState {
    consumed: HashSet<NodeId>,
}

impl WalkState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark every text node under `node` as consumed.
    pub fn consume_text_under(&mut self, tree: &NodeTree, node: NodeId) {
        self.consumed
            .extend(tree.descendants(node, NodeFilter::Text));
    }

    /// Whether a text node was already captured by a link.
    #[must_use]
    pub fn is_consumed(&self, node: NodeId) -> bool {
        self.consumed.contains(&node)
    }
}
