use crate::classifiers::simple_cart::nodes::DecisionTree;
use crate::classifiers::simple_cart::options::CartOptions;
use crate::classifiers::simple_cart::pruning::{CostComplexityPruner, PruneSequence};
use crate::classifiers::simple_cart::split_criteria::SplitCriterion;
use crate::classifiers::simple_cart::tree_builder::TreeBuilder;
use crate::core::instances::{Instance, Instances};
use crate::error::CartError;
use crate::utils::distribution::max_index;
use log::{debug, info};
use rand::Rng;
use serde::{Deserialize, Serialize};

const TIE_TOLERANCE: f64 = 1e-9;

/// Cross-validated error of every entry of the main prune sequence and the
/// entry picked from it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CvSelection {
    /// Held-out misclassified weight per main sequence index, summed over folds.
    pub errors: Vec<f64>,
    /// Total held-out weight.
    pub total_weight: f64,
    pub min_error: f64,
    /// Set when the one-standard-error rule was applied.
    pub standard_error: Option<f64>,
    pub chosen_index: usize,
    pub chosen_alpha: f64,
}

/// Scores the main prune sequence by growing and pruning a tree on every fold.
pub struct CrossValidationSelector<'a> {
    criterion: &'a dyn SplitCriterion,
    options: &'a CartOptions,
}

impl<'a> CrossValidationSelector<'a> {
    pub fn new(criterion: &'a dyn SplitCriterion, options: &'a CartOptions) -> Self {
        Self { criterion, options }
    }

    pub fn select<R: Rng + ?Sized>(
        &self,
        data: &Instances,
        sequence: &PruneSequence,
        rng: &mut R,
    ) -> Result<CvSelection, CartError> {
        if sequence.is_empty() {
            return Err(CartError::InvalidData("empty prune sequence".into()));
        }
        let num_folds = self.options.num_folds_pruning;
        let mut folds = data.clone();
        folds.randomize(rng);
        folds.stratify(num_folds)?;

        let main_alphas = sequence.alphas();
        let mut errors = vec![0.0; main_alphas.len()];
        let mut total_weight = 0.0;

        for fold in 0..num_folds {
            let train = folds.train_cv(num_folds, fold);
            let test = folds.test_cv(num_folds, fold);
            let fold_errors = self.fold_errors(&train, &test, &main_alphas);
            debug!("fold {fold}: held-out errors {fold_errors:?}");
            for (total, e) in errors.iter_mut().zip(&fold_errors) {
                *total += e;
            }
            total_weight += test.sum_of_weights();
        }

        let selection = Self::choose(errors, total_weight, &main_alphas, self.options.use_one_se);
        info!(
            "selected prune step {} of {} (alpha {:.4}, cv error {:.3}/{:.3})",
            selection.chosen_index,
            main_alphas.len() - 1,
            selection.chosen_alpha,
            selection.errors[selection.chosen_index],
            selection.total_weight
        );
        Ok(selection)
    }

    /// Held-out misclassified weight of the fold tree aligned to each main alpha.
    fn fold_errors(&self, train: &Instances, test: &Instances, main_alphas: &[f64]) -> Vec<f64> {
        let unpruned = TreeBuilder::new(train, self.criterion, self.options).build();
        let mut scratch = unpruned.clone();
        let fold_sequence = CostComplexityPruner::new().build_prune_sequence(&mut scratch);

        let mut tree = unpruned;
        let mut applied = 0;
        let mut out = Vec::with_capacity(main_alphas.len());
        for &alpha in main_alphas {
            let target = fold_sequence.index_for_alpha(alpha);
            while applied < target {
                applied += 1;
                fold_sequence.apply(&mut tree, applied);
            }
            out.push(Self::misclassified_weight(&tree, test));
        }
        out
    }

    fn misclassified_weight(tree: &DecisionTree, test: &Instances) -> f64 {
        test.iter()
            .filter_map(|inst| {
                let actual = inst.class_value()? as usize;
                let predicted = max_index(&tree.distribution_for_instance(inst));
                (predicted != actual).then(|| inst.weight())
            })
            .sum()
    }

    /// Minimum error with ties going to the later (more pruned) entry, or the
    /// most pruned entry within one binomial standard error of the minimum.
    pub(crate) fn choose(
        errors: Vec<f64>,
        total_weight: f64,
        alphas: &[f64],
        use_one_se: bool,
    ) -> CvSelection {
        let min_error = errors.iter().copied().fold(f64::INFINITY, f64::min);
        let standard_error = use_one_se.then(|| {
            if total_weight > 0.0 {
                (min_error * (total_weight - min_error) / total_weight)
                    .max(0.0)
                    .sqrt()
            } else {
                0.0
            }
        });
        let bound = min_error + standard_error.unwrap_or(0.0) + TIE_TOLERANCE;
        let chosen_index = errors.iter().rposition(|&e| e <= bound).unwrap_or(0);

        CvSelection {
            chosen_alpha: alphas.get(chosen_index).copied().unwrap_or(0.0),
            errors,
            total_weight,
            min_error,
            standard_error,
            chosen_index,
        }
    }
}
