use crate::classifiers::simple_cart::instance_conditional_test::{
    InstanceConditionalTest, SplitTest,
};
use crate::classifiers::simple_cart::nodes::{NodeId, NodeKind, NodeStats, TreeNode};
use crate::core::instance_header::InstanceHeader;
use crate::core::instances::Instance;
use crate::utils::distribution::{add_scaled, normalize};
use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// Binary tree stored as an arena. Collapsed subtrees stay in the arena but
/// are no longer reachable from the root.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    nodes: Vec<TreeNode>,
    root: NodeId,
    num_classes: usize,
    train_weight_at_root: f64,
}

impl DecisionTree {
    pub(crate) fn new(num_classes: usize, train_weight_at_root: f64) -> Self {
        Self {
            nodes: Vec::new(),
            root: 0,
            num_classes,
            train_weight_at_root,
        }
    }

    pub(crate) fn push_node(&mut self, node: TreeNode) -> NodeId {
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    pub(crate) fn set_split(
        &mut self,
        id: NodeId,
        test: SplitTest,
        branch_proportions: [f64; 2],
        children: [NodeId; 2],
    ) {
        self.nodes[id].kind = NodeKind::Split {
            test,
            branch_proportions,
            children,
            alpha: f64::INFINITY,
        };
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> &TreeNode {
        &self.nodes[id]
    }

    pub fn num_classes(&self) -> usize {
        self.num_classes
    }

    pub fn train_weight_at_root(&self) -> f64 {
        self.train_weight_at_root
    }

    /// Reachable node ids, parents before children, left before right.
    pub fn preorder(&self) -> Vec<NodeId> {
        self.preorder_from(self.root)
    }

    fn preorder_from(&self, start: NodeId) -> Vec<NodeId> {
        let mut order = Vec::new();
        if self.nodes.is_empty() {
            return order;
        }
        let mut stack = vec![start];
        while let Some(id) = stack.pop() {
            order.push(id);
            if let Some([left, right]) = self.nodes[id].children() {
                stack.push(right);
                stack.push(left);
            }
        }
        order
    }

    pub fn num_nodes(&self) -> usize {
        self.preorder().len()
    }

    pub fn num_leaves(&self) -> usize {
        self.preorder()
            .into_iter()
            .filter(|&id| self.nodes[id].is_leaf())
            .count()
    }

    pub fn num_inner_nodes(&self) -> usize {
        self.num_nodes() - self.num_leaves()
    }

    /// Weighted training misclassifications of the current tree.
    pub fn training_errors(&self) -> f64 {
        self.preorder()
            .into_iter()
            .filter(|&id| self.nodes[id].is_leaf())
            .map(|id| self.nodes[id].stats.num_incorrect_at_node)
            .sum()
    }

    /// Recomputes `num_incorrect_in_subtree` and the alpha of every reachable
    /// split node. Returns the leaf count below each node, indexed by id.
    pub(crate) fn refresh_subtree_stats(&mut self) -> Vec<usize> {
        let mut leaves = vec![0usize; self.nodes.len()];
        for id in self.preorder().into_iter().rev() {
            let children = self.nodes[id].children();
            match children {
                None => {
                    leaves[id] = 1;
                    let stats = &mut self.nodes[id].stats;
                    stats.num_incorrect_in_subtree = stats.num_incorrect_at_node;
                }
                Some([left, right]) => {
                    leaves[id] = leaves[left] + leaves[right];
                    let subtree_errors = self.nodes[left].stats.num_incorrect_in_subtree
                        + self.nodes[right].stats.num_incorrect_in_subtree;
                    let node = &mut self.nodes[id];
                    node.stats.num_incorrect_in_subtree = subtree_errors;
                    let new_alpha = (node.stats.num_incorrect_at_node - subtree_errors)
                        / (leaves[id] as f64 - 1.0);
                    if let NodeKind::Split { alpha, .. } = &mut node.kind {
                        *alpha = new_alpha;
                    }
                }
            }
        }
        leaves
    }

    /// Turns `id` into a leaf and returns the ids of the detached descendants.
    pub(crate) fn collapse(&mut self, id: NodeId) -> Vec<NodeId> {
        let removed: Vec<NodeId> = self.preorder_from(id).into_iter().skip(1).collect();
        let node = &mut self.nodes[id];
        node.kind = NodeKind::Leaf;
        node.stats.num_incorrect_in_subtree = node.stats.num_incorrect_at_node;
        removed
    }

    /// Class probabilities for `instance`. Unknown test outcomes are resolved
    /// by mixing both children with the training branch proportions.
    pub fn distribution_for_instance(&self, instance: &dyn Instance) -> Vec<f64> {
        if self.nodes.is_empty() {
            let mut uniform = vec![0.0; self.num_classes];
            normalize(&mut uniform);
            return uniform;
        }
        self.distribution_at(self.root, instance)
    }

    fn distribution_at(&self, id: NodeId, instance: &dyn Instance) -> Vec<f64> {
        let node = &self.nodes[id];
        match &node.kind {
            NodeKind::Leaf => {
                let mut distribution = node.stats.class_distribution.clone();
                normalize(&mut distribution);
                distribution
            }
            NodeKind::Split {
                test,
                branch_proportions,
                children,
                ..
            } => match test.branch_for_instance(instance) {
                Some(branch) => self.distribution_at(children[branch], instance),
                None => {
                    let mut mixed = vec![0.0; self.num_classes];
                    for (child, &proportion) in children.iter().zip(branch_proportions) {
                        let child_distribution = self.distribution_at(*child, instance);
                        add_scaled(&mut mixed, &child_distribution, proportion);
                    }
                    mixed
                }
            },
        }
    }

    /// Indented text rendering, one line per branch.
    pub fn to_text(&self, header: &InstanceHeader) -> String {
        let mut out = String::new();
        if self.nodes.is_empty() {
            return out;
        }
        let root = &self.nodes[self.root];
        if root.is_leaf() {
            let _ = write!(out, ": {}", Self::leaf_label(&root.stats, header));
        } else {
            self.write_subtree(self.root, header, 0, &mut out);
        }
        out
    }

    fn write_subtree(&self, id: NodeId, header: &InstanceHeader, level: usize, out: &mut String) {
        let node = &self.nodes[id];
        let (Some(test), Some(children)) = (node.split_test(), node.children()) else {
            return;
        };
        for (branch, &child) in children.iter().enumerate() {
            if !out.is_empty() {
                out.push('\n');
            }
            out.push_str(&"|  ".repeat(level));
            out.push_str(&test.describe_condition_for_branch(branch, header));
            let child_node = &self.nodes[child];
            if child_node.is_leaf() {
                let _ = write!(out, ": {}", Self::leaf_label(&child_node.stats, header));
            } else {
                self.write_subtree(child, header, level + 1, out);
            }
        }
    }

    fn leaf_label(stats: &NodeStats, header: &InstanceHeader) -> String {
        format!(
            "{}({}/{})",
            header.class_label(stats.class_value),
            fmt_weight(stats.num_correct_at_node()),
            fmt_weight(stats.num_incorrect_at_node)
        )
    }
}

fn fmt_weight(w: f64) -> String {
    if (w - w.round()).abs() < 1e-9 {
        format!("{:.1}", w.round())
    } else {
        format!("{w:.2}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifiers::simple_cart::instance_conditional_test::NumericAttributeBinaryTest;
    use crate::core::instances::DenseInstance;
    use crate::testing::datasets::numeric_header;

    const EPS: f64 = 1e-12;

    /// x1 <= 5 -> (x2 <= 2 -> c0 | c1) | c1
    fn small_tree() -> DecisionTree {
        let mut tree = DecisionTree::new(2, 10.0);
        let root = tree.push_node(TreeNode::leaf(NodeStats::from_distribution(vec![4.0, 6.0])));
        let inner = tree.push_node(TreeNode::leaf(NodeStats::from_distribution(vec![4.0, 2.0])));
        let a = tree.push_node(TreeNode::leaf(NodeStats::from_distribution(vec![4.0, 0.0])));
        let b = tree.push_node(TreeNode::leaf(NodeStats::from_distribution(vec![0.0, 2.0])));
        let right = tree.push_node(TreeNode::leaf(NodeStats::from_distribution(vec![0.0, 4.0])));
        tree.set_split(
            inner,
            SplitTest::Numeric(NumericAttributeBinaryTest::new(1, 2.0)),
            [4.0 / 6.0, 2.0 / 6.0],
            [a, b],
        );
        tree.set_split(
            root,
            SplitTest::Numeric(NumericAttributeBinaryTest::new(0, 5.0)),
            [0.6, 0.4],
            [inner, right],
        );
        tree
    }

    fn instance(x1: f64, x2: f64) -> DenseInstance {
        DenseInstance::new(numeric_header(2, 2), vec![x1, x2, f64::NAN], 1.0)
    }

    #[test]
    fn preorder_visits_parents_first() {
        let tree = small_tree();
        assert_eq!(tree.preorder(), vec![0, 1, 2, 3, 4]);
        assert_eq!(tree.num_nodes(), 5);
        assert_eq!(tree.num_leaves(), 3);
        assert_eq!(tree.num_inner_nodes(), 2);
    }

    #[test]
    fn known_values_route_to_a_single_leaf() {
        let tree = small_tree();
        assert_eq!(tree.distribution_for_instance(&instance(3.0, 1.0)), vec![1.0, 0.0]);
        assert_eq!(tree.distribution_for_instance(&instance(3.0, 4.0)), vec![0.0, 1.0]);
        assert_eq!(tree.distribution_for_instance(&instance(8.0, 1.0)), vec![0.0, 1.0]);
    }

    #[test]
    fn missing_value_mixes_children_by_branch_proportions() {
        let tree = small_tree();
        let d = tree.distribution_for_instance(&instance(f64::NAN, 1.0));
        assert!((d[0] - 0.6).abs() < EPS);
        assert!((d[1] - 0.4).abs() < EPS);
        assert!((d.iter().sum::<f64>() - 1.0).abs() < EPS);

        let d = tree.distribution_for_instance(&instance(f64::NAN, f64::NAN));
        assert!((d[0] - 0.6 * 4.0 / 6.0).abs() < EPS);
        assert!((d.iter().sum::<f64>() - 1.0).abs() < EPS);
    }

    #[test]
    fn refresh_subtree_stats_computes_alphas() {
        let mut tree = small_tree();
        let leaves = tree.refresh_subtree_stats();

        assert_eq!(leaves[0], 3);
        assert_eq!(leaves[1], 2);
        assert_eq!(tree.node(1).alpha(), Some(2.0));
        assert_eq!(tree.node(0).alpha(), Some(2.0));
        assert_eq!(tree.node(0).stats.num_incorrect_in_subtree, 0.0);
        assert_eq!(tree.training_errors(), 0.0);
    }

    #[test]
    fn collapse_detaches_descendants() {
        let mut tree = small_tree();
        let removed = tree.collapse(1);

        assert_eq!(removed, vec![2, 3]);
        assert!(tree.node(1).is_leaf());
        assert_eq!(tree.preorder(), vec![0, 1, 4]);
        assert_eq!(tree.training_errors(), 2.0);
    }

    #[test]
    fn to_text_renders_nested_branches() {
        let tree = small_tree();
        let text = tree.to_text(&numeric_header(2, 2));
        let expected = "x1 <= 5\n\
                        |  x2 <= 2: c0(4.0/0.0)\n\
                        |  x2 > 2: c1(2.0/0.0)\n\
                        x1 > 5: c1(4.0/0.0)";
        assert_eq!(text, expected);
    }

    #[test]
    fn single_leaf_text() {
        let mut tree = DecisionTree::new(2, 3.0);
        tree.push_node(TreeNode::leaf(NodeStats::from_distribution(vec![2.0, 1.0])));
        assert_eq!(tree.to_text(&numeric_header(2, 2)), ": c0(2.0/1.0)");
    }
}
