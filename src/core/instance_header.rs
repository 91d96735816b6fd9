use crate::core::attributes::{Attribute, AttributeRef};
use crate::error::CartError;
use std::fmt;

pub struct InstanceHeader {
    relation_name: String,
    pub attributes: Vec<AttributeRef>,
    class_index: usize,
}

impl InstanceHeader {
    pub fn new(
        relation_name: String,
        attributes: Vec<AttributeRef>,
        class_index: usize,
    ) -> InstanceHeader {
        InstanceHeader {
            relation_name,
            attributes,
            class_index,
        }
    }

    pub fn class_attribute(&self) -> Option<&dyn Attribute> {
        self.attribute_at_index(self.class_index)
    }

    pub fn number_of_attributes(&self) -> usize {
        self.attributes.len()
    }

    pub fn relation_name(&self) -> &str {
        &self.relation_name
    }

    pub fn attribute_at_index(&self, index: usize) -> Option<&dyn Attribute> {
        self.attributes
            .get(index)
            .map(|attr| attr.as_ref() as &dyn Attribute)
    }

    pub fn index_of_attribute(&self, name: &str) -> Option<usize> {
        self.attributes.iter().position(|attr| attr.name() == name)
    }

    pub fn class_index(&self) -> usize {
        self.class_index
    }

    pub fn number_of_classes(&self) -> usize {
        self.class_attribute()
            .and_then(|attr| attr.num_values())
            .unwrap_or(0)
    }

    /// Indices of every attribute except the class.
    pub fn predictor_indices(&self) -> Vec<usize> {
        (0..self.attributes.len())
            .filter(|&i| i != self.class_index)
            .collect()
    }

    pub fn class_label(&self, class_value: usize) -> String {
        self.class_attribute()
            .map(|attr| attr.format_value(class_value as f64))
            .unwrap_or_else(|| class_value.to_string())
    }

    /// Rejects headers the tree learner cannot handle: the class must be a
    /// nominal attribute with at least one label.
    pub fn check_capabilities(&self) -> Result<(), CartError> {
        let class = self.class_attribute().ok_or_else(|| {
            CartError::Unsupported(format!(
                "class index {} is out of range for {} attributes",
                self.class_index,
                self.attributes.len()
            ))
        })?;

        if !class.is_nominal() {
            return Err(CartError::Unsupported(format!(
                "class attribute '{}' must be nominal",
                class.name()
            )));
        }
        if self.number_of_classes() == 0 {
            return Err(CartError::Unsupported(format!(
                "class attribute '{}' has an empty domain",
                class.name()
            )));
        }

        for attr in &self.attributes {
            if !attr.is_nominal() && !attr.is_numeric() {
                return Err(CartError::Unsupported(format!(
                    "attribute '{}' is neither nominal nor numeric",
                    attr.name()
                )));
            }
        }
        Ok(())
    }

    /// Fails unless `other` declares the same attributes, in the same order,
    /// with the same domains and class index.
    pub fn check_compatible(&self, other: &InstanceHeader) -> Result<(), CartError> {
        if self.class_index != other.class_index
            || self.attributes.len() != other.attributes.len()
        {
            return Err(CartError::InvalidData(format!(
                "headers differ: {} attributes (class {}) vs {} attributes (class {})",
                self.attributes.len(),
                self.class_index,
                other.attributes.len(),
                other.class_index
            )));
        }
        for (mine, theirs) in self.attributes.iter().zip(&other.attributes) {
            if mine.arff_representation() != theirs.arff_representation() {
                return Err(CartError::InvalidData(format!(
                    "attribute '{}' differs between headers",
                    mine.name()
                )));
            }
        }
        Ok(())
    }
}

impl fmt::Debug for InstanceHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InstanceHeader")
            .field("relation_name", &self.relation_name)
            .field("class_index", &self.class_index)
            .field("n_attributes", &self.attributes.len())
            .finish()
    }
}
