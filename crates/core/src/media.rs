//! The external media host seen from the rest of the system.
//!
//! [`MediaStore`] is the only seam between request handling and the image
//! host: production wires in the Cloudinary client from `stockroom_media`,
//! tests wire in an in-memory fake.

use async_trait::async_trait;

/// A file accepted by the media host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedMedia {
    /// Public HTTPS URL of the stored object.
    pub url: String,
    /// Key the host assigned to the object (without folder).
    pub key: String,
}

/// Errors from the media host layer.
#[derive(Debug, thiserror::Error)]
pub enum MediaError {
    /// The request never produced a response (network, DNS, TLS, timeout).
    #[error("Media host request failed: {0}")]
    Request(String),

    /// The host answered with a non-2xx status.
    #[error("Media host error ({status}): {body}")]
    Api { status: u16, body: String },

    /// The host has no object under the given key.
    #[error("Media object not found: {0}")]
    NotFound(String),

    /// The host answered 2xx but the body was not what we expected.
    #[error("Unexpected media host response: {0}")]
    InvalidResponse(String),
}

/// Upload and destroy operations against an image host.
#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Store `bytes` under `folder` and return the hosted URL and key.
    async fn upload(
        &self,
        bytes: &[u8],
        content_type: &str,
        folder: &str,
    ) -> Result<UploadedMedia, MediaError>;

    /// Remove the object previously stored under `key` in `folder`.
    async fn destroy(&self, key: &str, folder: &str) -> Result<(), MediaError>;
}
