use crate::core::instance_header::InstanceHeader;
use crate::core::instances::Instance;
use std::fmt;
use std::sync::Arc;

#[derive(Clone)]
pub struct DenseInstance {
    header: Arc<InstanceHeader>,
    values: Vec<f64>,
    weight: f64,
}

impl DenseInstance {
    pub fn new(header: Arc<InstanceHeader>, values: Vec<f64>, weight: f64) -> Self {
        Self {
            header,
            values,
            weight,
        }
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }
}

impl Instance for DenseInstance {
    fn weight(&self) -> f64 {
        self.weight
    }

    fn set_weight(&mut self, new_value: f64) {
        self.weight = new_value;
    }

    fn value_at_index(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied()
    }

    fn is_missing_at_index(&self, index: usize) -> bool {
        self.values.get(index).is_none_or(|v| v.is_nan())
    }

    fn number_of_attributes(&self) -> usize {
        self.values.len()
    }

    fn class_index(&self) -> usize {
        self.header.class_index()
    }

    fn class_value(&self) -> Option<f64> {
        self.value_at_index(self.class_index())
            .filter(|v| !v.is_nan())
    }

    fn is_class_missing(&self) -> bool {
        self.class_value().is_none()
    }

    fn number_of_classes(&self) -> usize {
        self.header.number_of_classes()
    }

    fn to_vec(&self) -> Vec<f64> {
        self.values.clone()
    }

    fn header(&self) -> &InstanceHeader {
        &self.header
    }
}

impl fmt::Debug for DenseInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DenseInstance")
            .field("values", &self.values)
            .field("weight", &self.weight)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::datasets::weather_header;

    #[test]
    fn class_value_is_none_when_missing() {
        let header = weather_header();
        let class_index = header.class_index();
        let mut values = vec![0.0; header.number_of_attributes()];
        values[class_index] = f64::NAN;

        let inst = DenseInstance::new(header, values, 1.0);
        assert!(inst.is_class_missing());
        assert_eq!(inst.class_value(), None);
    }

    #[test]
    fn out_of_range_index_counts_as_missing() {
        let inst = DenseInstance::new(weather_header(), vec![0.0, 1.0], 1.0);
        assert!(inst.is_missing_at_index(10));
        assert_eq!(inst.value_at_index(10), None);
    }

    #[test]
    fn set_weight_overrides_weight() {
        let mut inst = DenseInstance::new(weather_header(), vec![0.0; 5], 1.0);
        inst.set_weight(0.25);
        assert_eq!(inst.weight(), 0.25);
    }
}
