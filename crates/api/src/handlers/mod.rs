//! Request handlers.
//!
//! Each submodule provides async handler functions for one resource.
//! Handlers delegate to the repositories in `stockroom_db` and the media
//! store in [`AppState`](crate::state::AppState), mapping errors via
//! [`AppError`](crate::error::AppError).

pub mod category;
pub mod product;
pub mod upload;
