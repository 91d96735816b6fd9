use crate::error::CartError;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Training parameters of [`SimpleCart`](super::SimpleCart).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct CartOptions {
    #[schemars(
        title = "Seed",
        description = "Seed for shuffling, subsampling and fold assignment"
    )]
    pub seed: u64,

    #[schemars(
        title = "Min Num Obj",
        description = "Minimal weight of instances on each side of a split",
        range(min = 0.0)
    )]
    pub min_num_obj: f64,

    #[schemars(
        title = "Num Folds Pruning",
        description = "Number of cross-validation folds used to select the pruning level",
        range(min = 2)
    )]
    pub num_folds_pruning: usize,

    #[schemars(
        title = "Prune",
        description = "Select a cost-complexity pruned tree by cross-validation"
    )]
    pub prune: bool,

    #[schemars(
        title = "Heuristic",
        description = "Order categories by class proportion instead of exhaustive search for multi-class nominal attributes"
    )]
    pub heuristic: bool,

    #[schemars(
        title = "Use 1 SE",
        description = "Pick the smallest tree within one standard error of the minimal CV error"
    )]
    pub use_one_se: bool,

    #[schemars(
        title = "Size Per",
        description = "Fraction of the training data used, in (0, 1]",
        range(min = 0.0, max = 1.0)
    )]
    pub size_per: f64,
}

impl Default for CartOptions {
    fn default() -> Self {
        Self {
            seed: 1,
            min_num_obj: 2.0,
            num_folds_pruning: 5,
            prune: true,
            heuristic: true,
            use_one_se: false,
            size_per: 1.0,
        }
    }
}

impl CartOptions {
    pub fn validate(&self) -> Result<(), CartError> {
        if !(self.size_per > 0.0 && self.size_per <= 1.0) {
            return Err(CartError::invalid_option(
                "size_per",
                format!("must be in (0, 1], got {}", self.size_per),
            ));
        }
        if !self.min_num_obj.is_finite() || self.min_num_obj < 0.0 {
            return Err(CartError::invalid_option(
                "min_num_obj",
                format!("must be a finite non-negative number, got {}", self.min_num_obj),
            ));
        }
        if self.prune && self.num_folds_pruning < 2 {
            return Err(CartError::invalid_option(
                "num_folds_pruning",
                format!("at least 2 folds are required, got {}", self.num_folds_pruning),
            ));
        }
        Ok(())
    }
}
