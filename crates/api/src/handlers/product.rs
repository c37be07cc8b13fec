//! Handlers for the product resource.
//!
//! Create and update accept multipart forms (see [`super::upload`]) and talk
//! to the media host before touching the database. Image removal is fatal on
//! update but only logged on delete, so a product can always be deleted even
//! when the media host is unavailable.

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use stockroom_core::error::CoreError;
use stockroom_core::inventory::{media_folder_from_url, media_key_from_url};
use stockroom_core::types::{DbId, ProductId};
use stockroom_db::models::product::{CreateProduct, ProductWithCategories, UpdateProduct};
use stockroom_db::repositories::{CategoryRepo, ProductRepo};

use crate::error::{AppError, AppResult};
use crate::handlers::upload::read_product_form;
use crate::query::ProductSearchParams;
use crate::response::DeleteProductResponse;
use crate::state::AppState;

/// GET / and GET /products
///
/// Optional `?search=` filters by a case-insensitive substring of the name.
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ProductSearchParams>,
) -> AppResult<Json<Vec<ProductWithCategories>>> {
    let products = ProductRepo::list(&state.pool, params.search.as_deref()).await?;
    let products = ProductRepo::attach_categories(&state.pool, products).await?;
    Ok(Json(products))
}

/// GET /products/{productId}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> AppResult<Json<ProductWithCategories>> {
    let product = ProductRepo::find_with_categories(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("Product", id)))?;
    Ok(Json(product))
}

/// POST / and POST /products
///
/// Requires `name`, `price`, `stockQuantity`, `categoryId` and an `image`
/// file. The image is uploaded first; if the insert then fails the remote
/// image is left behind.
pub async fn create(
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<ProductWithCategories>)> {
    let form = read_product_form(multipart, state.config.max_image_bytes).await?;
    let input = form.into_new_product()?;

    ensure_category_exists(&state, input.category_id).await?;
    if ProductRepo::find_by_id(&state.pool, input.id).await?.is_some() {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Product with id {} already exists",
            input.id
        ))));
    }

    let uploaded = state
        .media
        .upload(
            &input.image.bytes,
            &input.image.content_type,
            &state.config.media_folder,
        )
        .await?;

    let row = CreateProduct {
        id: input.id,
        name: input.name,
        price: input.price,
        stock_quantity: input.stock_quantity,
        image_url: Some(uploaded.url),
    };
    let product = match ProductRepo::create_in_category(&state.pool, &row, input.category_id).await
    {
        Ok(product) => product,
        Err(e) => {
            tracing::warn!(
                product_id = %row.id,
                media_key = %uploaded.key,
                "Product insert failed after image upload; remote image is orphaned"
            );
            return Err(e.into());
        }
    };

    let categories = ProductRepo::categories_of(&state.pool, product.id).await?;
    tracing::info!(product_id = %product.id, category_id = input.category_id, "Product created");

    Ok((
        StatusCode::CREATED,
        Json(ProductWithCategories {
            product,
            categories,
        }),
    ))
}

/// PUT /products/{productId}
///
/// Every form field is optional. A new `image` replaces the old one (the old
/// remote object is destroyed first and a failure there aborts the request).
/// A `categoryId` replaces all existing category links with that one.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
    multipart: Multipart,
) -> AppResult<Json<ProductWithCategories>> {
    let existing = ProductRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("Product", id)))?;

    let form = read_product_form(multipart, state.config.max_image_bytes).await?;
    let patch = form.into_patch()?;

    if let Some(category_id) = patch.category_id {
        ensure_category_exists(&state, category_id).await?;
    }

    let mut image_url = None;
    if let Some(image) = &patch.image {
        if let Some((key, folder)) = stored_media(&state, existing.image_url.as_deref()) {
            state.media.destroy(&key, &folder).await?;
            tracing::debug!(
                product_id = %id,
                media_key = %key,
                folder = %folder,
                "Previous image destroyed"
            );
        }

        let uploaded = state
            .media
            .upload(&image.bytes, &image.content_type, &state.config.media_folder)
            .await?;
        image_url = Some(uploaded.url);
    }

    let input = UpdateProduct {
        name: patch.name,
        price: patch.price,
        stock_quantity: patch.stock_quantity,
        image_url,
    };
    let product = ProductRepo::update(&state.pool, id, &input, patch.category_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("Product", id)))?;

    let categories = ProductRepo::categories_of(&state.pool, id).await?;
    tracing::info!(product_id = %id, "Product updated");

    Ok(Json(ProductWithCategories {
        product,
        categories,
    }))
}

/// DELETE /products/{productId}
///
/// Remote image removal is best effort; the row is deleted regardless.
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> AppResult<Json<DeleteProductResponse>> {
    let existing = ProductRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("Product", id)))?;

    let mut image_removed = false;
    if let Some((key, folder)) = stored_media(&state, existing.image_url.as_deref()) {
        match state.media.destroy(&key, &folder).await {
            Ok(()) => image_removed = true,
            Err(e) => tracing::warn!(
                product_id = %id,
                media_key = %key,
                error = %e,
                "Failed to remove product image; deleting product anyway"
            ),
        }
    }

    if !ProductRepo::delete(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::not_found("Product", id)));
    }
    tracing::info!(product_id = %id, image_removed, "Product deleted");

    Ok(Json(DeleteProductResponse { id, image_removed }))
}

/// Key and folder of a stored image URL. Images whose URL carries no
/// folder are assumed to live in the configured one.
fn stored_media(state: &AppState, image_url: Option<&str>) -> Option<(String, String)> {
    let url = image_url?;
    let key = media_key_from_url(url)?;
    let folder = media_folder_from_url(url).unwrap_or_else(|| state.config.media_folder.clone());
    Some((key, folder))
}

async fn ensure_category_exists(state: &AppState, category_id: DbId) -> AppResult<()> {
    if CategoryRepo::exists(&state.pool, category_id).await? {
        Ok(())
    } else {
        Err(AppError::Core(CoreError::not_found(
            "ProductCategory",
            category_id,
        )))
    }
}
