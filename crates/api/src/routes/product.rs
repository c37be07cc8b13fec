//! Route definitions for products.

use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use axum::Router;

use crate::handlers::product;
use crate::state::AppState;

/// Headroom above the image limit for the text fields and multipart framing.
const FORM_OVERHEAD_BYTES: usize = 64 * 1024;

/// Product routes, mounted at the root.
///
/// ```text
/// GET    /                        -> list (?search=)
/// POST   /                        -> create (multipart)
/// GET    /products                -> list (?search=)
/// POST   /products                -> create (multipart)
/// GET    /products/{productId}    -> get_by_id
/// PUT    /products/{productId}    -> update (multipart)
/// DELETE /products/{productId}    -> delete
/// ```
pub fn router(max_image_bytes: usize) -> Router<AppState> {
    Router::new()
        .route("/", get(product::list).post(product::create))
        .route("/products", get(product::list).post(product::create))
        .route(
            "/products/{id}",
            get(product::get_by_id)
                .put(product::update)
                .delete(product::delete),
        )
        .layer(DefaultBodyLimit::max(body_limit(max_image_bytes)))
}

fn body_limit(max_image_bytes: usize) -> usize {
    max_image_bytes.saturating_add(FORM_OVERHEAD_BYTES)
}
