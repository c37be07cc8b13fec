//! Handlers for the `/categories` resource and the new-arrivals report.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use stockroom_core::error::CoreError;
use stockroom_core::inventory::new_arrivals_cutoff;
use stockroom_core::types::DbId;
use stockroom_db::models::category::{
    AddProductToCategory, Category, CategoryWithProducts, CreateCategory,
};
use stockroom_db::models::product::{Product, ProductWithCategories};
use stockroom_db::repositories::{CategoryRepo, ProductRepo};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// POST /categories
pub async fn create(
    State(state): State<AppState>,
    Json(mut input): Json<CreateCategory>,
) -> AppResult<(StatusCode, Json<Category>)> {
    input.name = input.name.trim().to_string();
    input.description = input
        .description
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty());
    input
        .validate()
        .map_err(|e| AppError::Core(CoreError::Validation(e.to_string())))?;

    let category = CategoryRepo::create(&state.pool, &input).await?;
    tracing::info!(category_id = category.id, name = %category.name, "Category created");
    Ok((StatusCode::CREATED, Json(category)))
}

/// GET /categories
///
/// Every category with its products eagerly included.
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<CategoryWithProducts>>> {
    let categories = CategoryRepo::list_with_products(&state.pool).await?;
    Ok(Json(categories))
}

/// GET /categories/{categoryId}/products
pub async fn list_products(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Vec<Product>>> {
    if !CategoryRepo::exists(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::not_found("ProductCategory", id)));
    }
    let products = CategoryRepo::list_products(&state.pool, id).await?;
    Ok(Json(products))
}

/// DELETE /categories/{categoryId}
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    if CategoryRepo::delete(&state.pool, id).await? {
        tracing::info!(category_id = id, "Category deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::not_found("ProductCategory", id)))
    }
}

/// POST /categories/add-product
///
/// Links an existing product to an existing category. Linking twice is a no-op.
pub async fn add_product(
    State(state): State<AppState>,
    Json(input): Json<AddProductToCategory>,
) -> AppResult<Json<ProductWithCategories>> {
    if !CategoryRepo::exists(&state.pool, input.category_id).await? {
        return Err(AppError::Core(CoreError::not_found(
            "ProductCategory",
            input.category_id,
        )));
    }
    if ProductRepo::find_by_id(&state.pool, input.product_id)
        .await?
        .is_none()
    {
        return Err(AppError::Core(CoreError::not_found(
            "Product",
            input.product_id,
        )));
    }

    CategoryRepo::link_product(&state.pool, input.product_id, input.category_id).await?;

    let product = ProductRepo::find_with_categories(&state.pool, input.product_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("Product", input.product_id)))?;
    Ok(Json(product))
}

/// GET /newArrivals
///
/// Categories with products created in the last two months, each listing
/// only those products, newest first.
pub async fn new_arrivals(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<CategoryWithProducts>>> {
    let since = new_arrivals_cutoff(chrono::Utc::now());
    let categories = CategoryRepo::new_arrivals(&state.pool, since).await?;
    Ok(Json(categories))
}
