pub mod arff;

pub use arff::ArffLoader;
