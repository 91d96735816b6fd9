use crate::classifiers::simple_cart::instance_conditional_test::{
    NominalAttributeBinaryTest, NumericAttributeBinaryTest, SplitTest,
};
use crate::classifiers::simple_cart::split_criteria::SplitCriterion;
use crate::core::instances::{Instance, Instances};
use crate::utils::distribution::{max_index, num_non_zero_entries, sum};
use log::warn;
use std::cmp::Ordering;

/// Multi-class nominal attributes with more present categories than this use
/// the ordering heuristic when it is enabled.
pub const SMALL_CATEGORY_LIMIT: usize = 4;

/// Largest category count the exhaustive partition search enumerates.
pub const MAX_EXHAUSTIVE_CATEGORIES: usize = 63;

const MIN_GAIN: f64 = 1e-12;

/// A row of the dataset seen through a node: the row index and its
/// (possibly fractional) weight at that node.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WeightedRow {
    pub index: usize,
    pub weight: f64,
}

impl WeightedRow {
    pub fn new(index: usize, weight: f64) -> Self {
        Self { index, weight }
    }

    /// Every row of `data` at its own weight, dropping non-positive weights.
    pub fn all(data: &Instances) -> Vec<WeightedRow> {
        data.iter()
            .enumerate()
            .filter(|(_, inst)| inst.weight() > 0.0)
            .map(|(i, inst)| WeightedRow::new(i, inst.weight()))
            .collect()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SplitCandidate {
    pub test: SplitTest,
    pub gain: f64,
    /// Non-missing weight sent to each branch.
    pub branch_weights: [f64; 2],
}

impl SplitCandidate {
    pub fn branch_proportions(&self) -> [f64; 2] {
        let total = self.branch_weights[0] + self.branch_weights[1];
        if total > 0.0 {
            [self.branch_weights[0] / total, self.branch_weights[1] / total]
        } else {
            [0.5, 0.5]
        }
    }
}

/// Weighted class distribution of `rows`.
pub fn class_distribution(data: &Instances, rows: &[WeightedRow], num_classes: usize) -> Vec<f64> {
    let mut distribution = vec![0.0; num_classes];
    for row in rows {
        if let Some(class) = data.instance(row.index).class_value() {
            if let Some(slot) = distribution.get_mut(class as usize) {
                *slot += row.weight;
            }
        }
    }
    distribution
}

/// Best binary split search over a set of attributes.
pub struct SplitSearch<'a> {
    criterion: &'a dyn SplitCriterion,
    min_num_obj: f64,
    heuristic: bool,
    num_classes: usize,
}

impl<'a> SplitSearch<'a> {
    pub fn new(
        criterion: &'a dyn SplitCriterion,
        min_num_obj: f64,
        heuristic: bool,
        num_classes: usize,
    ) -> Self {
        Self {
            criterion,
            min_num_obj,
            heuristic,
            num_classes,
        }
    }

    /// Maximum-gain split over `attributes`, ties going to the attribute
    /// listed first. `None` when the node should become a leaf.
    pub fn best_split(
        &self,
        data: &Instances,
        rows: &[WeightedRow],
        attributes: &[usize],
    ) -> Option<SplitCandidate> {
        let node_distribution = class_distribution(data, rows, self.num_classes);
        if sum(&node_distribution) < 2.0 * self.min_num_obj
            || num_non_zero_entries(&node_distribution) <= 1
        {
            return None;
        }
        let majority_class = max_index(&node_distribution);

        let mut best: Option<SplitCandidate> = None;
        for &attribute in attributes {
            let Some(attr) = data.header().attribute_at_index(attribute) else {
                continue;
            };
            let candidate = if attr.is_numeric() {
                self.numeric_split(data, rows, attribute)
            } else if let Some(num_values) = attr.num_values() {
                self.nominal_split(data, rows, attribute, num_values, majority_class)
            } else {
                None
            };
            if let Some(candidate) = candidate {
                if candidate.gain > MIN_GAIN
                    && best.as_ref().is_none_or(|b| candidate.gain > b.gain)
                {
                    best = Some(candidate);
                }
            }
        }
        best
    }

    /// Best `value <= threshold` split of a numeric attribute; thresholds are
    /// midpoints between consecutive distinct values.
    pub fn numeric_split(
        &self,
        data: &Instances,
        rows: &[WeightedRow],
        attribute: usize,
    ) -> Option<SplitCandidate> {
        let mut observed: Vec<(f64, usize, f64)> = rows
            .iter()
            .filter_map(|row| {
                let inst = data.instance(row.index);
                if inst.is_missing_at_index(attribute) {
                    return None;
                }
                let value = inst.value_at_index(attribute)?;
                let class = inst.class_value()? as usize;
                Some((value, class, row.weight))
            })
            .collect();
        if observed.len() < 2 {
            return None;
        }
        observed.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal));

        let mut parent = vec![0.0; self.num_classes];
        for &(_, class, weight) in &observed {
            parent[class] += weight;
        }
        let total = sum(&parent);

        let mut left = vec![0.0; self.num_classes];
        let mut right = parent.clone();
        let mut left_weight = 0.0;
        let mut best: Option<SplitCandidate> = None;

        for i in 0..observed.len() - 1 {
            let (value, class, weight) = observed[i];
            left[class] += weight;
            right[class] -= weight;
            left_weight += weight;

            let next = observed[i + 1].0;
            if next <= value {
                continue;
            }
            let right_weight = total - left_weight;
            if left_weight < self.min_num_obj || right_weight < self.min_num_obj {
                continue;
            }
            let gain = self
                .criterion
                .get_merit_of_split(&parent, &[left.as_slice(), right.as_slice()]);
            if best.as_ref().is_none_or(|b| gain > b.gain) {
                let mut threshold = (value + next) / 2.0;
                if threshold >= next {
                    threshold = value;
                }
                best = Some(SplitCandidate {
                    test: SplitTest::Numeric(NumericAttributeBinaryTest::new(attribute, threshold)),
                    gain,
                    branch_weights: [left_weight, right_weight],
                });
            }
        }
        best
    }

    /// Best two-way partition of the categories present at the node.
    pub fn nominal_split(
        &self,
        data: &Instances,
        rows: &[WeightedRow],
        attribute: usize,
        num_values: usize,
        majority_class: usize,
    ) -> Option<SplitCandidate> {
        let per_category = self.category_distributions(data, rows, attribute, num_values);
        let present: Vec<usize> = (0..num_values)
            .filter(|&k| sum(&per_category[k]) > 0.0)
            .collect();
        if present.len() < 2 {
            return None;
        }

        if self.num_classes == 2 {
            return self.ordered_prefix_split(attribute, &per_category, &present, 0);
        }
        if self.heuristic && present.len() > SMALL_CATEGORY_LIMIT {
            return self.ordered_prefix_split(attribute, &per_category, &present, majority_class);
        }
        if present.len() > MAX_EXHAUSTIVE_CATEGORIES {
            warn!(
                "attribute {attribute} has {} categories at a node; falling back to ordered search",
                present.len()
            );
            return self.ordered_prefix_split(attribute, &per_category, &present, majority_class);
        }
        self.exhaustive_split(attribute, &per_category, &present)
    }

    fn category_distributions(
        &self,
        data: &Instances,
        rows: &[WeightedRow],
        attribute: usize,
        num_values: usize,
    ) -> Vec<Vec<f64>> {
        let mut per_category = vec![vec![0.0; self.num_classes]; num_values];
        for row in rows {
            let inst = data.instance(row.index);
            if inst.is_missing_at_index(attribute) {
                continue;
            }
            let (Some(value), Some(class)) = (inst.value_at_index(attribute), inst.class_value())
            else {
                continue;
            };
            let category = value as usize;
            if category < num_values {
                per_category[category][class as usize] += row.weight;
            }
        }
        per_category
    }

    /// Sorts the present categories by their proportion of `class` and tries
    /// every contiguous prefix as the left branch.
    pub(crate) fn ordered_prefix_split(
        &self,
        attribute: usize,
        per_category: &[Vec<f64>],
        present: &[usize],
        class: usize,
    ) -> Option<SplitCandidate> {
        let proportion = |k: usize| per_category[k][class] / sum(&per_category[k]);
        let mut order = present.to_vec();
        order.sort_by(|&a, &b| proportion(a).partial_cmp(&proportion(b)).unwrap_or(Ordering::Equal));

        let mut best: Option<SplitCandidate> = None;
        for cut in 1..order.len() {
            let (left, right) = order.split_at(cut);
            if let Some(candidate) = self.evaluate_partition(attribute, per_category, left, right) {
                if best.as_ref().is_none_or(|b| candidate.gain > b.gain) {
                    best = Some(candidate);
                }
            }
        }
        best
    }

    /// Tries all `2^(n-1) - 1` partitions of the present categories, keeping
    /// the last one on the right.
    pub(crate) fn exhaustive_split(
        &self,
        attribute: usize,
        per_category: &[Vec<f64>],
        present: &[usize],
    ) -> Option<SplitCandidate> {
        let n = present.len();
        let mut best: Option<SplitCandidate> = None;
        for mask in 1u64..(1u64 << (n - 1)) {
            let mut left = Vec::with_capacity(n);
            let mut right = Vec::with_capacity(n);
            for (i, &k) in present.iter().enumerate() {
                if i < n - 1 && mask & (1u64 << i) != 0 {
                    left.push(k);
                } else {
                    right.push(k);
                }
            }
            if let Some(candidate) = self.evaluate_partition(attribute, per_category, &left, &right)
            {
                if best.as_ref().is_none_or(|b| candidate.gain > b.gain) {
                    best = Some(candidate);
                }
            }
        }
        best
    }

    fn evaluate_partition(
        &self,
        attribute: usize,
        per_category: &[Vec<f64>],
        left: &[usize],
        right: &[usize],
    ) -> Option<SplitCandidate> {
        let accumulate = |categories: &[usize]| {
            let mut dist = vec![0.0; self.num_classes];
            for &k in categories {
                for (d, w) in dist.iter_mut().zip(&per_category[k]) {
                    *d += w;
                }
            }
            dist
        };
        let left_dist = accumulate(left);
        let right_dist = accumulate(right);
        let left_weight = sum(&left_dist);
        let right_weight = sum(&right_dist);
        if left_weight < self.min_num_obj || right_weight < self.min_num_obj {
            return None;
        }

        let parent: Vec<f64> = left_dist.iter().zip(&right_dist).map(|(l, r)| l + r).collect();
        let gain = self
            .criterion
            .get_merit_of_split(&parent, &[left_dist.as_slice(), right_dist.as_slice()]);
        Some(SplitCandidate {
            test: SplitTest::Nominal(NominalAttributeBinaryTest::new(
                attribute,
                left.to_vec(),
                right.to_vec(),
            )),
            gain,
            branch_weights: [left_weight, right_weight],
        })
    }
}
