//! Media host clients.
//!
//! [`CloudinaryStore`] implements [`stockroom_core::media::MediaStore`]
//! against Cloudinary's signed upload API.

pub mod cloudinary;
pub mod config;

pub use cloudinary::CloudinaryStore;
pub use config::{CloudinaryConfig, MediaConfigError};
