use crate::classifiers::simple_cart::split_criteria::SplitCriterion;

#[derive(Debug, Default, Clone, Copy)]
pub struct GiniSplitCriterion;

impl GiniSplitCriterion {
    pub fn new() -> Self {
        Self
    }

    pub fn compute_gini(&self, distribution: &[f64], distribution_sum_of_weights: f64) -> f64 {
        if distribution_sum_of_weights <= 0.0 {
            return 0.0;
        }
        let mut gini = 1.0;
        for &w in distribution {
            let rel_freq = w / distribution_sum_of_weights;
            gini -= rel_freq * rel_freq;
        }
        gini
    }
}

impl SplitCriterion for GiniSplitCriterion {
    fn impurity(&self, distribution: &[f64]) -> f64 {
        self.compute_gini(distribution, distribution.iter().sum())
    }

    fn get_merit_of_split(
        &self,
        pre_split_distribution: &[f64],
        post_split_dists: &[&[f64]],
    ) -> f64 {
        let dist_weights: Vec<f64> = post_split_dists
            .iter()
            .map(|dist| dist.iter().sum())
            .collect();
        let total_weight: f64 = dist_weights.iter().sum();
        if total_weight <= 0.0 {
            return 0.0;
        }

        let mut weighted_gini = 0.0;
        for (dist, &w) in post_split_dists.iter().zip(&dist_weights) {
            weighted_gini += (w / total_weight) * self.compute_gini(dist, w);
        }

        self.impurity(pre_split_distribution) - weighted_gini
    }
}
