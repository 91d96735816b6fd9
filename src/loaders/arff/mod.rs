mod arff_loader;
mod parser;

pub use arff_loader::ArffLoader;
