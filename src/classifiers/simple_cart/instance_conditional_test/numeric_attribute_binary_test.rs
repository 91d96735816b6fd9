use crate::classifiers::simple_cart::instance_conditional_test::InstanceConditionalTest;
use crate::core::instance_header::InstanceHeader;
use crate::core::instances::Instance;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NumericAttributeBinaryTest {
    attribute_index: usize,
    attribute_value: f64,
}

impl NumericAttributeBinaryTest {
    /// `value <= attribute_value` takes branch 0.
    pub fn new(attribute_index: usize, attribute_value: f64) -> Self {
        Self {
            attribute_index,
            attribute_value,
        }
    }

    pub fn attribute_index(&self) -> usize {
        self.attribute_index
    }

    /// The split point.
    pub fn split_value(&self) -> f64 {
        self.attribute_value
    }

    pub fn branch_for_value(&self, value: f64) -> Option<usize> {
        if value.is_nan() {
            return None;
        }
        if value <= self.attribute_value {
            return Some(0);
        }
        Some(1)
    }
}

impl InstanceConditionalTest for NumericAttributeBinaryTest {
    fn branch_for_instance(&self, instance: &dyn Instance) -> Option<usize> {
        if instance.is_missing_at_index(self.attribute_index) {
            return None;
        }
        self.branch_for_value(instance.value_at_index(self.attribute_index)?)
    }

    fn describe_condition_for_branch(&self, branch: usize, header: &InstanceHeader) -> String {
        let name = header
            .attribute_at_index(self.attribute_index)
            .map(|a| a.name())
            .unwrap_or_else(|| format!("#{}", self.attribute_index));
        let op = if branch == 0 { "<=" } else { ">" };
        format!("{name} {op} {}", self.attribute_value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct MockInstance {
        values: Vec<f64>,
    }

    impl MockInstance {
        fn new(values: Vec<f64>) -> Self {
            Self { values }
        }
    }

    impl Instance for MockInstance {
        fn weight(&self) -> f64 {
            1.0
        }
        fn set_weight(&mut self, _new_value: f64) {
            unimplemented!()
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
            unimplemented!()
        }
        fn class_value(&self) -> Option<f64> {
            unimplemented!()
        }
        fn is_class_missing(&self) -> bool {
            unimplemented!()
        }
        fn number_of_classes(&self) -> usize {
            unimplemented!()
        }
        fn to_vec(&self) -> Vec<f64> {
            self.values.clone()
        }
        fn header(&self) -> &InstanceHeader {
            unimplemented!()
        }
    }

    #[test]
    fn test_branch_for_instance_returns_zero_when_value_less_then_split() {
        let test = NumericAttributeBinaryTest::new(0, 5.0);
        let instance = MockInstance::new(vec![3.0]);

        assert_eq!(test.branch_for_instance(&instance), Some(0));
    }

    #[test]
    fn test_branch_for_instance_returns_one_when_value_greater_then_split() {
        let test = NumericAttributeBinaryTest::new(0, 5.0);
        let instance = MockInstance::new(vec![8.0]);

        assert_eq!(test.branch_for_instance(&instance), Some(1));
    }

    #[test]
    fn test_value_equal_to_split_goes_left() {
        let test = NumericAttributeBinaryTest::new(0, 5.0);
        let instance = MockInstance::new(vec![5.0]);

        assert_eq!(test.branch_for_instance(&instance), Some(0));
    }

    #[test]
    fn test_branch_for_instance_returns_none_when_value_missing() {
        let test = NumericAttributeBinaryTest::new(0, 5.0);

        assert!(test.branch_for_instance(&MockInstance::new(vec![f64::NAN])).is_none());
        assert!(test.branch_for_instance(&MockInstance::new(vec![])).is_none());
    }

    #[test]
    fn test_describe_condition_uses_attribute_name() {
        let header = crate::testing::datasets::numeric_header(2, 2);
        let test = NumericAttributeBinaryTest::new(1, 4.75);

        assert_eq!(test.describe_condition_for_branch(0, &header), "x2 <= 4.75");
        assert_eq!(test.describe_condition_for_branch(1, &header), "x2 > 4.75");
    }
}
