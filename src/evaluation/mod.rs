mod classification_evaluator;
mod measurement;
mod summary;

pub use classification_evaluator::{ClassificationEvaluator, evaluate_model};
pub use measurement::Measurement;
pub use summary::EvaluationSummary;
