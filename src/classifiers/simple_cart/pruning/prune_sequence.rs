use crate::classifiers::simple_cart::nodes::{DecisionTree, NodeId};
use serde::{Deserialize, Serialize};

/// One step of the nested pruning sequence and the size of the tree after it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PruneSequenceEntry {
    pub alpha: f64,
    pub num_nodes: usize,
    pub num_leaves: usize,
    pub training_errors: f64,
    /// `None` for the unpruned tree at index 0.
    pub collapsed_node: Option<NodeId>,
    pub removed_nodes: Vec<NodeId>,
}

impl PruneSequenceEntry {
    pub(crate) fn snapshot(
        tree: &DecisionTree,
        alpha: f64,
        collapsed_node: Option<NodeId>,
        removed_nodes: Vec<NodeId>,
    ) -> Self {
        Self {
            alpha,
            num_nodes: tree.num_nodes(),
            num_leaves: tree.num_leaves(),
            training_errors: tree.training_errors(),
            collapsed_node,
            removed_nodes,
        }
    }
}

/// Entries ordered by non-decreasing alpha, starting with the unpruned tree.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PruneSequence {
    entries: Vec<PruneSequenceEntry>,
}

impl PruneSequence {
    pub(crate) fn new(entries: Vec<PruneSequenceEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[PruneSequenceEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn alphas(&self) -> Vec<f64> {
        self.entries.iter().map(|e| e.alpha).collect()
    }

    /// Largest index whose alpha does not exceed `alpha`; 0 if none does.
    pub fn index_for_alpha(&self, alpha: f64) -> usize {
        self.entries
            .iter()
            .rposition(|e| e.alpha <= alpha)
            .unwrap_or(0)
    }

    /// Applies the collapse recorded at `index` to `tree`.
    pub(crate) fn apply(&self, tree: &mut DecisionTree, index: usize) {
        if let Some(node) = self.entries.get(index).and_then(|e| e.collapsed_node) {
            tree.collapse(node);
        }
    }

    /// Collapses `tree`, a copy of the unpruned tree, up to entry `upto`.
    pub fn replay(&self, tree: &mut DecisionTree, upto: usize) {
        let upto = upto.min(self.entries.len().saturating_sub(1));
        for index in 1..=upto {
            self.apply(tree, index);
        }
        tree.refresh_subtree_stats();
    }
}
