//! Domain types and rules shared by the database, media and API crates.

pub mod error;
pub mod inventory;
pub mod media;
pub mod types;
