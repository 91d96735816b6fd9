pub mod instance_conditional_test;
pub mod nodes;
mod options;
pub mod pruning;
mod simple_cart;
pub mod split_criteria;
pub mod split_search;
pub mod tree_builder;

pub use options::CartOptions;
pub use simple_cart::{ModelDump, SimpleCart};
