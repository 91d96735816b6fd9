//! Small in-memory datasets shared by the unit tests.

use crate::core::attributes::{AttributeRef, NominalAttribute, NumericAttribute};
use crate::core::instance_header::InstanceHeader;
use crate::core::instances::Instances;
use std::sync::Arc;

fn nominal(name: &str, values: &[&str]) -> AttributeRef {
    Arc::new(NominalAttribute::with_values(
        name.to_string(),
        values.iter().map(|v| v.to_string()).collect(),
    )) as AttributeRef
}

fn numeric(name: &str) -> AttributeRef {
    Arc::new(NumericAttribute::new(name.to_string())) as AttributeRef
}

fn class_labels(num_classes: usize) -> Vec<String> {
    (0..num_classes).map(|c| format!("c{c}")).collect()
}

pub fn weather_header() -> Arc<InstanceHeader> {
    Arc::new(InstanceHeader::new(
        "weather".into(),
        vec![
            nominal("outlook", &["sunny", "overcast", "rainy"]),
            numeric("temperature"),
            numeric("humidity"),
            nominal("windy", &["TRUE", "FALSE"]),
            nominal("play", &["yes", "no"]),
        ],
        4,
    ))
}

/// The classic 14-row weather data with numeric temperature and humidity.
pub fn weather_nominal() -> Instances {
    const ROWS: [[f64; 5]; 14] = [
        [0.0, 85.0, 85.0, 1.0, 1.0],
        [0.0, 80.0, 90.0, 0.0, 1.0],
        [1.0, 83.0, 86.0, 1.0, 0.0],
        [2.0, 70.0, 96.0, 1.0, 0.0],
        [2.0, 68.0, 80.0, 1.0, 0.0],
        [2.0, 65.0, 70.0, 0.0, 1.0],
        [1.0, 64.0, 65.0, 0.0, 0.0],
        [0.0, 72.0, 95.0, 1.0, 1.0],
        [0.0, 69.0, 70.0, 1.0, 0.0],
        [2.0, 75.0, 80.0, 1.0, 0.0],
        [0.0, 75.0, 70.0, 0.0, 0.0],
        [1.0, 72.0, 90.0, 0.0, 0.0],
        [1.0, 81.0, 75.0, 1.0, 0.0],
        [2.0, 71.0, 91.0, 0.0, 1.0],
    ];

    let mut data = Instances::new(weather_header());
    for row in ROWS {
        data.add_values(row.to_vec(), 1.0);
    }
    data
}

pub fn numeric_header(num_attributes: usize, num_classes: usize) -> Arc<InstanceHeader> {
    let mut attributes: Vec<AttributeRef> = (0..num_attributes)
        .map(|i| numeric(&format!("x{}", i + 1)))
        .collect();
    let labels = class_labels(num_classes);
    let labels: Vec<&str> = labels.iter().map(String::as_str).collect();
    attributes.push(nominal("class", &labels));
    Arc::new(InstanceHeader::new(
        "numeric".into(),
        attributes,
        num_attributes,
    ))
}

/// One nominal predictor with `num_categories` values followed by the class.
pub fn nominal_header(num_categories: usize, num_classes: usize) -> Arc<InstanceHeader> {
    let categories: Vec<String> = (0..num_categories).map(|k| format!("v{k}")).collect();
    let categories: Vec<&str> = categories.iter().map(String::as_str).collect();
    let labels = class_labels(num_classes);
    let labels: Vec<&str> = labels.iter().map(String::as_str).collect();
    Arc::new(InstanceHeader::new(
        "nominal".into(),
        vec![nominal("a", &categories), nominal("class", &labels)],
        1,
    ))
}

/// Ten rows, two classes, perfectly separated by `x1` around 5.0; `x2` is
/// distributed identically in both classes.
pub fn separable_numeric() -> Instances {
    const ROWS: [[f64; 3]; 10] = [
        [1.0, 4.0, 0.0],
        [7.0, 2.0, 1.0],
        [1.5, 1.0, 0.0],
        [7.5, 5.0, 1.0],
        [2.0, 5.0, 0.0],
        [8.0, 1.0, 1.0],
        [2.5, 2.0, 0.0],
        [8.5, 4.0, 1.0],
        [3.0, 3.0, 0.0],
        [9.0, 3.0, 1.0],
    ];

    let mut data = Instances::new(numeric_header(2, 2));
    for row in ROWS {
        data.add_values(row.to_vec(), 1.0);
    }
    data
}
