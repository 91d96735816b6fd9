pub mod args;
pub mod logger;
pub mod schema;
