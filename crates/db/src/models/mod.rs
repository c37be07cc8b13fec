//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - `Deserialize` DTOs for the JSON request bodies that target it
//! - Composite response shapes that attach related rows

pub mod category;
pub mod product;
