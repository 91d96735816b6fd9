use crate::classifiers::simple_cart::instance_conditional_test::InstanceConditionalTest;
use crate::core::instance_header::InstanceHeader;
use crate::core::instances::Instance;
use serde::{Deserialize, Serialize};

/// Routes the categories in `left_values` to branch 0 and those in
/// `right_values` to branch 1. Any other category has an unknown outcome.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NominalAttributeBinaryTest {
    attribute_index: usize,
    left_values: Vec<usize>,
    right_values: Vec<usize>,
}

impl NominalAttributeBinaryTest {
    pub fn new(attribute_index: usize, mut left_values: Vec<usize>, mut right_values: Vec<usize>) -> Self {
        left_values.sort_unstable();
        right_values.sort_unstable();
        Self {
            attribute_index,
            left_values,
            right_values,
        }
    }

    pub fn attribute_index(&self) -> usize {
        self.attribute_index
    }

    pub fn left_values(&self) -> &[usize] {
        &self.left_values
    }

    pub fn right_values(&self) -> &[usize] {
        &self.right_values
    }

    fn values_for_branch(&self, branch: usize) -> &[usize] {
        if branch == 0 {
            &self.left_values
        } else {
            &self.right_values
        }
    }
}

impl InstanceConditionalTest for NominalAttributeBinaryTest {
    fn branch_for_instance(&self, instance: &dyn Instance) -> Option<usize> {
        if instance.is_missing_at_index(self.attribute_index) {
            return None;
        }
        let value = instance.value_at_index(self.attribute_index)? as usize;

        if self.left_values.binary_search(&value).is_ok() {
            Some(0)
        } else if self.right_values.binary_search(&value).is_ok() {
            Some(1)
        } else {
            None
        }
    }

    fn describe_condition_for_branch(&self, branch: usize, header: &InstanceHeader) -> String {
        let attr = header.attribute_at_index(self.attribute_index);
        let name = attr
            .map(|a| a.name())
            .unwrap_or_else(|| format!("#{}", self.attribute_index));
        let labels: Vec<String> = self
            .values_for_branch(branch)
            .iter()
            .map(|&v| {
                let label = attr
                    .map(|a| a.format_value(v as f64))
                    .unwrap_or_else(|| v.to_string());
                format!("({label})")
            })
            .collect();
        format!("{name} = {}", labels.join("|"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::instances::DenseInstance;
    use crate::testing::datasets::weather_header;

    fn instance_with_outlook(outlook: f64) -> DenseInstance {
        DenseInstance::new(weather_header(), vec![outlook, 70.0, 80.0, 0.0, 0.0], 1.0)
    }

    #[test]
    fn routes_categories_to_their_side() {
        let test = NominalAttributeBinaryTest::new(0, vec![2, 0], vec![1]);

        assert_eq!(test.left_values(), &[0, 2]);
        assert_eq!(test.branch_for_instance(&instance_with_outlook(0.0)), Some(0));
        assert_eq!(test.branch_for_instance(&instance_with_outlook(1.0)), Some(1));
        assert_eq!(test.branch_for_instance(&instance_with_outlook(2.0)), Some(0));
    }

    #[test]
    fn missing_and_unseen_categories_are_unknown() {
        let test = NominalAttributeBinaryTest::new(0, vec![0], vec![1]);

        assert_eq!(test.branch_for_instance(&instance_with_outlook(f64::NAN)), None);
        assert_eq!(test.branch_for_instance(&instance_with_outlook(2.0)), None);
    }

    #[test]
    fn describe_condition_lists_labels() {
        let header = weather_header();
        let test = NominalAttributeBinaryTest::new(0, vec![0, 2], vec![1]);

        assert_eq!(
            test.describe_condition_for_branch(0, &header),
            "outlook = (sunny)|(rainy)"
        );
        assert_eq!(
            test.describe_condition_for_branch(1, &header),
            "outlook = (overcast)"
        );
    }
}
