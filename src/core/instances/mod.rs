mod dense_instance;
mod instance;
mod instances;

pub use dense_instance::DenseInstance;
pub use instance::Instance;
pub use instances::Instances;
