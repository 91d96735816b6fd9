mod cost_complexity_pruner;
mod cross_validation_selector;
mod prune_sequence;

pub use cost_complexity_pruner::CostComplexityPruner;
pub use cross_validation_selector::{CrossValidationSelector, CvSelection};
pub use prune_sequence::{PruneSequence, PruneSequenceEntry};
