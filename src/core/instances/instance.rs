use crate::core::instance_header::InstanceHeader;

/// A single weighted row. Missing values are stored as `NaN`; nominal values
/// are stored as the category index.
pub trait Instance {
    fn weight(&self) -> f64;
    fn set_weight(&mut self, new_value: f64);
    fn value_at_index(&self, index: usize) -> Option<f64>;
    fn is_missing_at_index(&self, index: usize) -> bool;
    fn number_of_attributes(&self) -> usize;
    fn class_index(&self) -> usize;
    fn class_value(&self) -> Option<f64>;
    fn is_class_missing(&self) -> bool;
    fn number_of_classes(&self) -> usize;
    fn to_vec(&self) -> Vec<f64>;
    fn header(&self) -> &InstanceHeader;
}
