use crate::classifiers::simple_cart::instance_conditional_test::{
    InstanceConditionalTest, SplitTest,
};
use crate::classifiers::simple_cart::nodes::{DecisionTree, NodeId, NodeStats, TreeNode};
use crate::classifiers::simple_cart::options::CartOptions;
use crate::classifiers::simple_cart::split_criteria::SplitCriterion;
use crate::classifiers::simple_cart::split_search::{SplitSearch, WeightedRow, class_distribution};
use crate::core::instances::Instances;

/// Grows an unpruned tree by recursive binary partitioning.
pub struct TreeBuilder<'a> {
    data: &'a Instances,
    search: SplitSearch<'a>,
    attributes: Vec<usize>,
    num_classes: usize,
}

impl<'a> TreeBuilder<'a> {
    pub fn new(
        data: &'a Instances,
        criterion: &'a dyn SplitCriterion,
        options: &CartOptions,
    ) -> Self {
        let num_classes = data.number_of_classes();
        Self {
            data,
            search: SplitSearch::new(criterion, options.min_num_obj, options.heuristic, num_classes),
            attributes: data.header().predictor_indices(),
            num_classes,
        }
    }

    pub fn build(&self) -> DecisionTree {
        let rows = WeightedRow::all(self.data);
        let total_weight = rows.iter().map(|r| r.weight).sum();
        let mut tree = DecisionTree::new(self.num_classes, total_weight);
        self.grow(&mut tree, rows);
        tree.refresh_subtree_stats();
        tree
    }

    fn grow(&self, tree: &mut DecisionTree, rows: Vec<WeightedRow>) -> NodeId {
        let distribution = class_distribution(self.data, &rows, self.num_classes);
        let id = tree.push_node(TreeNode::leaf(NodeStats::from_distribution(distribution)));

        let Some(candidate) = self.search.best_split(self.data, &rows, &self.attributes) else {
            return id;
        };
        let proportions = candidate.branch_proportions();
        let [left_rows, right_rows] = self.partition(&rows, &candidate.test, proportions);
        drop(rows);

        let left = self.grow(tree, left_rows);
        let right = self.grow(tree, right_rows);
        tree.set_split(id, candidate.test, proportions, [left, right]);
        id
    }

    /// Sends every row down its branch. Rows with an unknown outcome go to
    /// both branches with their weight scaled by the branch proportion.
    fn partition(
        &self,
        rows: &[WeightedRow],
        test: &SplitTest,
        proportions: [f64; 2],
    ) -> [Vec<WeightedRow>; 2] {
        let mut branches: [Vec<WeightedRow>; 2] = [Vec::new(), Vec::new()];
        for row in rows {
            match test.branch_for_instance(self.data.instance(row.index)) {
                Some(branch) => branches[branch].push(*row),
                None => {
                    for (branch, proportion) in branches.iter_mut().zip(proportions) {
                        let weight = row.weight * proportion;
                        if weight > 0.0 {
                            branch.push(WeightedRow::new(row.index, weight));
                        }
                    }
                }
            }
        }
        branches
    }
}
