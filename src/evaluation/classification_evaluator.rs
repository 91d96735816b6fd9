use crate::classifiers::Classifier;
use crate::core::instances::{Instance, Instances};
use crate::error::CartError;
use crate::evaluation::Measurement;
use crate::utils::distribution::max_index;

/// Weighted confusion matrix over predicted versus actual classes.
#[derive(Debug, Clone)]
pub struct ClassificationEvaluator {
    num_classes: usize,
    /// `confusion[actual][predicted]`
    confusion: Vec<Vec<f64>>,
    total_weight: f64,
    instances_seen: u64,
}

impl ClassificationEvaluator {
    pub fn new(num_classes: usize) -> Self {
        Self {
            num_classes,
            confusion: vec![vec![0.0; num_classes]; num_classes],
            total_weight: 0.0,
            instances_seen: 0,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new(self.num_classes);
    }

    /// Records one prediction. Rows without a class label are ignored.
    pub fn add_result(&mut self, instance: &dyn Instance, distribution: &[f64]) {
        let Some(actual) = instance.class_value() else {
            return;
        };
        let actual = actual as usize;
        let predicted = max_index(distribution);
        if actual >= self.num_classes || predicted >= self.num_classes {
            return;
        }
        let weight = instance.weight();
        self.confusion[actual][predicted] += weight;
        self.total_weight += weight;
        self.instances_seen += 1;
    }

    pub fn instances_seen(&self) -> u64 {
        self.instances_seen
    }

    pub fn total_weight(&self) -> f64 {
        self.total_weight
    }

    pub fn confusion_matrix(&self) -> &[Vec<f64>] {
        &self.confusion
    }

    fn correct_weight(&self) -> f64 {
        (0..self.num_classes).map(|c| self.confusion[c][c]).sum()
    }

    /// Weighted fraction correctly classified; NaN before any result.
    pub fn accuracy(&self) -> f64 {
        if self.total_weight <= 0.0 {
            return f64::NAN;
        }
        self.correct_weight() / self.total_weight
    }

    /// Cohen's kappa; 0 before any result.
    pub fn kappa(&self) -> f64 {
        if self.total_weight <= 0.0 {
            return 0.0;
        }
        let observed = self.correct_weight() / self.total_weight;
        let mut chance = 0.0;
        for c in 0..self.num_classes {
            let actual: f64 = self.confusion[c].iter().sum();
            let predicted: f64 = self.confusion.iter().map(|row| row[c]).sum();
            chance += (actual / self.total_weight) * (predicted / self.total_weight);
        }
        if chance < 1.0 {
            (observed - chance) / (1.0 - chance)
        } else {
            1.0
        }
    }

    pub fn performance(&self) -> Vec<Measurement> {
        vec![
            Measurement::new("instances", self.instances_seen as f64),
            Measurement::new("accuracy", self.accuracy()),
            Measurement::new("kappa", self.kappa()),
        ]
    }
}

/// Scores `classifier` on every row of `data`.
pub fn evaluate_model(
    classifier: &dyn Classifier,
    data: &Instances,
) -> Result<ClassificationEvaluator, CartError> {
    let mut evaluator = ClassificationEvaluator::new(data.number_of_classes());
    for instance in data.iter() {
        let distribution = classifier.distribution_for_instance(instance)?;
        evaluator.add_result(instance, &distribution);
    }
    Ok(evaluator)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifiers::SimpleCart;
    use crate::classifiers::simple_cart::CartOptions;
    use crate::core::instances::DenseInstance;
    use crate::testing::datasets::{numeric_header, separable_numeric};

    fn row(class: f64, weight: f64) -> DenseInstance {
        DenseInstance::new(numeric_header(1, 2), vec![0.0, class], weight)
    }

    #[test]
    fn empty_evaluator_reports_nan_accuracy_and_zero_kappa() {
        let eval = ClassificationEvaluator::new(2);
        assert!(eval.accuracy().is_nan());
        assert_eq!(eval.kappa(), 0.0);
        assert_eq!(eval.instances_seen(), 0);
    }

    #[test]
    fn weighted_accuracy_and_kappa() {
        let mut eval = ClassificationEvaluator::new(2);
        eval.add_result(&row(0.0, 2.0), &[0.9, 0.1]);
        eval.add_result(&row(0.0, 1.0), &[0.2, 0.8]);
        eval.add_result(&row(1.0, 1.0), &[0.3, 0.7]);

        assert!((eval.accuracy() - 0.75).abs() < 1e-12);
        // observed 0.75, chance 0.75 * 0.5 + 0.25 * 0.5 = 0.5
        assert!((eval.kappa() - 0.5).abs() < 1e-12);
        assert_eq!(eval.confusion_matrix()[0], vec![2.0, 1.0]);
    }

    #[test]
    fn unlabeled_rows_are_ignored() {
        let mut eval = ClassificationEvaluator::new(2);
        eval.add_result(&row(f64::NAN, 1.0), &[1.0, 0.0]);
        assert_eq!(eval.instances_seen(), 0);
        assert_eq!(eval.total_weight(), 0.0);
    }

    #[test]
    fn reset_clears_results() {
        let mut eval = ClassificationEvaluator::new(2);
        eval.add_result(&row(1.0, 1.0), &[0.0, 1.0]);
        eval.reset();
        assert_eq!(eval.instances_seen(), 0);
        assert!(eval.accuracy().is_nan());
    }

    #[test]
    fn evaluate_model_scores_a_trained_tree() {
        let data = separable_numeric();
        let mut cart = SimpleCart::new(CartOptions::default());
        cart.build_classifier(&data).unwrap();

        let eval = evaluate_model(&cart, &data).unwrap();
        assert_eq!(eval.accuracy(), 1.0);
        assert_eq!(eval.kappa(), 1.0);
        let names: Vec<String> = eval.performance().into_iter().map(|m| m.name).collect();
        assert_eq!(names, vec!["instances", "accuracy", "kappa"]);
    }

    #[test]
    fn evaluate_model_requires_training() {
        let data = separable_numeric();
        let cart = SimpleCart::default();
        assert!(matches!(evaluate_model(&cart, &data), Err(CartError::NotTrained)));
    }
}
