use crate::core::attributes::Attribute;
use std::any::Any;
use std::collections::HashMap;

#[derive(Clone, Debug)]
pub struct NominalAttribute {
    pub name: String,
    pub values: Vec<String>,
    pub label_to_index: HashMap<String, usize>,
}

impl NominalAttribute {
    pub fn new(name: String) -> NominalAttribute {
        NominalAttribute {
            name,
            values: Vec::new(),
            label_to_index: HashMap::new(),
        }
    }

    pub fn with_values(name: String, values: Vec<String>) -> NominalAttribute {
        let label_to_index = values
            .iter()
            .enumerate()
            .map(|(i, v)| (v.clone(), i))
            .collect();
        NominalAttribute {
            name,
            values,
            label_to_index,
        }
    }

    pub fn index_of_value(&self, v: &str) -> Option<usize> {
        self.label_to_index.get(v).copied()
    }

    pub fn enumerate_values(&self) -> impl Iterator<Item = (usize, &String)> {
        self.values.iter().enumerate()
    }
}

impl Attribute for NominalAttribute {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn arff_representation(&self) -> String {
        format!("@attribute {} {{{}}}", self.name, self.values.join(","))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn with_values_builds_lookup_table() {
        let attr = NominalAttribute::with_values(
            "outlook".into(),
            vec!["sunny".into(), "overcast".into(), "rainy".into()],
        );

        assert_eq!(attr.index_of_value("rainy"), Some(2));
        assert_eq!(attr.index_of_value("snowy"), None);
        assert_eq!(attr.num_values(), Some(3));
        assert!(attr.is_nominal());
        assert!(!attr.is_numeric());
    }

    #[test]
    fn format_value_falls_back_to_index_for_unknown_category() {
        let attr = NominalAttribute::with_values("c".into(), vec!["a".into(), "b".into()]);

        assert_eq!(attr.format_value(1.0), "b");
        assert_eq!(attr.format_value(7.0), "#7");
        assert_eq!(attr.format_value(f64::NAN), "?");
    }

    #[test]
    fn arff_representation_lists_domain() {
        let attr = NominalAttribute::with_values("play".into(), vec!["yes".into(), "no".into()]);
        assert_eq!(attr.arff_representation(), "@attribute play {yes,no}");
    }
}
