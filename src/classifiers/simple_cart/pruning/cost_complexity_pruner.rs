use crate::classifiers::simple_cart::nodes::{DecisionTree, NodeId};
use crate::classifiers::simple_cart::pruning::{PruneSequence, PruneSequenceEntry};
use log::debug;

/// Minimal cost-complexity (weakest link) pruning.
#[derive(Debug, Default, Clone, Copy)]
pub struct CostComplexityPruner;

impl CostComplexityPruner {
    pub fn new() -> Self {
        Self
    }

    /// Collapses `tree` down to its root, one weakest link at a time, and
    /// records every step. `tree` ends up as a single leaf.
    pub fn build_prune_sequence(&self, tree: &mut DecisionTree) -> PruneSequence {
        tree.refresh_subtree_stats();
        let mut entries = vec![PruneSequenceEntry::snapshot(tree, 0.0, None, Vec::new())];
        let mut last_alpha = 0.0;

        while let Some((node, alpha)) = Self::weakest_link(tree) {
            let alpha = alpha.max(last_alpha);
            let removed = tree.collapse(node);
            tree.refresh_subtree_stats();
            entries.push(PruneSequenceEntry::snapshot(tree, alpha, Some(node), removed));
            last_alpha = alpha;
        }

        debug!("prune sequence has {} entries", entries.len());
        PruneSequence::new(entries)
    }

    /// Split node with the smallest alpha, the first in pre-order on ties.
    fn weakest_link(tree: &DecisionTree) -> Option<(NodeId, f64)> {
        let mut best: Option<(NodeId, f64)> = None;
        for id in tree.preorder() {
            let Some(alpha) = tree.node(id).alpha() else {
                continue;
            };
            if best.is_none_or(|(_, a)| alpha < a) {
                best = Some((id, alpha));
            }
        }
        best
    }
}
