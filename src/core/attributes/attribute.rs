use super::{NominalAttribute, NumericAttribute};
use std::any::Any;
use std::fmt;
use std::sync::Arc;

pub type AttributeRef = Arc<dyn Attribute + Send + Sync>;

pub trait Attribute: Any + Send + Sync {
    fn name(&self) -> String;

    fn as_any(&self) -> &dyn Any;

    fn arff_representation(&self) -> String;

    fn is_nominal(&self) -> bool {
        self.as_any().is::<NominalAttribute>()
    }

    fn is_numeric(&self) -> bool {
        self.as_any().is::<NumericAttribute>()
    }

    /// Number of categories for nominal attributes, `None` otherwise.
    fn num_values(&self) -> Option<usize> {
        self.as_any()
            .downcast_ref::<NominalAttribute>()
            .map(|nominal| nominal.values.len())
    }

    /// Human readable form of a stored value.
    fn format_value(&self, value: f64) -> String {
        if value.is_nan() {
            return "?".to_string();
        }
        match self.as_any().downcast_ref::<NominalAttribute>() {
            Some(nominal) => nominal
                .values
                .get(value as usize)
                .cloned()
                .unwrap_or_else(|| format!("#{}", value as usize)),
            None => format!("{value}"),
        }
    }
}

impl fmt::Debug for dyn Attribute + Send + Sync {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.arff_representation())
    }
}
