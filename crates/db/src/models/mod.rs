//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - `Deserialize` DTOs for request payloads and query parameters
//! - `Serialize` views for shaped responses

pub mod item;
pub mod point;
