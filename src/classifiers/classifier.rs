use crate::core::instances::{Instance, Instances};
use crate::error::CartError;
use crate::utils::distribution::max_index;

pub trait Classifier {
    fn build_classifier(&mut self, data: &Instances) -> Result<(), CartError>;

    /// Class membership probabilities, one entry per class label.
    fn distribution_for_instance(&self, instance: &dyn Instance) -> Result<Vec<f64>, CartError>;

    fn classify_instance(&self, instance: &dyn Instance) -> Result<usize, CartError> {
        let distribution = self.distribution_for_instance(instance)?;
        Ok(max_index(&distribution))
    }
}
