pub mod distribution;
pub mod file_parsing;
