use crate::classifiers::simple_cart::instance_conditional_test::SplitTest;
use crate::utils::distribution::max_index;
use serde::{Deserialize, Serialize};

/// Index of a node inside the arena of its [`DecisionTree`](super::DecisionTree).
pub type NodeId = usize;

/// Training statistics recorded for every node, split or leaf.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NodeStats {
    pub class_distribution: Vec<f64>,
    pub class_value: usize,
    pub total_weight: f64,
    /// Misclassified weight if this node were a leaf.
    pub num_incorrect_at_node: f64,
    /// Misclassified weight summed over the leaves below this node.
    pub num_incorrect_in_subtree: f64,
}

impl NodeStats {
    pub fn from_distribution(class_distribution: Vec<f64>) -> Self {
        let total_weight: f64 = class_distribution.iter().sum();
        let class_value = max_index(&class_distribution);
        let correct = class_distribution.get(class_value).copied().unwrap_or(0.0);
        let num_incorrect_at_node = (total_weight - correct).max(0.0);
        Self {
            class_distribution,
            class_value,
            total_weight,
            num_incorrect_at_node,
            num_incorrect_in_subtree: num_incorrect_at_node,
        }
    }

    pub fn num_correct_at_node(&self) -> f64 {
        self.total_weight - self.num_incorrect_at_node
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum NodeKind {
    Leaf,
    Split {
        test: SplitTest,
        /// Fraction of the non-missing training weight sent to each child.
        branch_proportions: [f64; 2],
        children: [NodeId; 2],
        /// Cost-complexity of collapsing this subtree into a leaf.
        alpha: f64,
    },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TreeNode {
    pub stats: NodeStats,
    pub kind: NodeKind,
}

impl TreeNode {
    pub fn leaf(stats: NodeStats) -> Self {
        Self {
            stats,
            kind: NodeKind::Leaf,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, NodeKind::Leaf)
    }

    pub fn children(&self) -> Option<[NodeId; 2]> {
        match &self.kind {
            NodeKind::Leaf => None,
            NodeKind::Split { children, .. } => Some(*children),
        }
    }

    pub fn split_test(&self) -> Option<&SplitTest> {
        match &self.kind {
            NodeKind::Leaf => None,
            NodeKind::Split { test, .. } => Some(test),
        }
    }

    pub fn branch_proportions(&self) -> Option<[f64; 2]> {
        match &self.kind {
            NodeKind::Leaf => None,
            NodeKind::Split {
                branch_proportions, ..
            } => Some(*branch_proportions),
        }
    }

    pub fn alpha(&self) -> Option<f64> {
        match &self.kind {
            NodeKind::Leaf => None,
            NodeKind::Split { alpha, .. } => Some(*alpha),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_from_distribution_use_majority_class() {
        let stats = NodeStats::from_distribution(vec![1.5, 4.0, 0.5]);

        assert_eq!(stats.class_value, 1);
        assert!((stats.total_weight - 6.0).abs() < 1e-12);
        assert!((stats.num_incorrect_at_node - 2.0).abs() < 1e-12);
        assert!((stats.num_correct_at_node() - 4.0).abs() < 1e-12);
        assert_eq!(stats.num_incorrect_in_subtree, stats.num_incorrect_at_node);
    }

    #[test]
    fn leaf_has_no_split_information() {
        let node = TreeNode::leaf(NodeStats::from_distribution(vec![2.0, 0.0]));

        assert!(node.is_leaf());
        assert!(node.children().is_none());
        assert!(node.split_test().is_none());
        assert!(node.branch_proportions().is_none());
        assert!(node.alpha().is_none());
    }
}
