mod classifier;
pub mod simple_cart;

pub use classifier::Classifier;
pub use simple_cart::SimpleCart;
