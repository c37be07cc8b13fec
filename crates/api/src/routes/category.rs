//! Route definitions for categories and the new-arrivals report.

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::category;
use crate::state::AppState;

/// Category routes, mounted at the root.
///
/// ```text
/// GET    /categories                      -> list (with products)
/// POST   /categories                      -> create
/// POST   /categories/add-product          -> add_product
/// DELETE /categories/{categoryId}         -> delete
/// GET    /categories/{categoryId}/products -> list_products
/// GET    /newArrivals                     -> new_arrivals
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/categories", get(category::list).post(category::create))
        .route("/categories/add-product", post(category::add_product))
        .route("/categories/{id}", delete(category::delete))
        .route("/categories/{id}/products", get(category::list_products))
        .route("/newArrivals", get(category::new_arrivals))
}
