pub mod category;
pub mod health;
pub mod product;

use axum::Router;

use crate::state::AppState;

/// Build the application route tree.
///
/// Route hierarchy:
///
/// ```text
/// /health                                  service + database health
///
/// /                                        list, create products
/// /products                                list, create products
/// /products/{productId}                    get, update, delete
///
/// /categories                              list (with products), create
/// /categories/add-product                  link product to category
/// /categories/{categoryId}                 delete
/// /categories/{categoryId}/products        products in category
///
/// /newArrivals                             recent products by category
/// ```
pub fn app_routes(max_image_bytes: usize) -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(product::router(max_image_bytes))
        .merge(category::router())
}
