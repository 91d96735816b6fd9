pub trait SplitCriterion {
    /// Impurity of a weighted class distribution.
    fn impurity(&self, distribution: &[f64]) -> f64;

    /// Impurity reduction obtained by splitting `pre_split_distribution` into
    /// `post_split_dists`.
    fn get_merit_of_split(&self, pre_split_distribution: &[f64], post_split_dists: &[&[f64]])
    -> f64;
}
