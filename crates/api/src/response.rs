//! Response bodies that are not plain database models.

use serde::Serialize;
use stockroom_core::types::ProductId;

/// Body of a successful `DELETE /products/{productId}`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteProductResponse {
    pub id: ProductId,
    /// Whether the product image was also removed from the media host.
    /// `false` when there was no image or the remote delete failed.
    pub image_removed: bool,
}
