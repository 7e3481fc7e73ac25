pub mod error;
pub mod point;
pub mod types;
