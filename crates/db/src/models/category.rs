//! Product category entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use stockroom_core::types::{DbId, ProductId, Timestamp};
use validator::Validate;

use crate::models::product::Product;

/// A category row from the `product_categories` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new category.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCategory {
    #[validate(length(min = 1, max = 255, message = "name must be 1-255 characters"))]
    pub name: String,
    #[validate(length(max = 2000, message = "description must be at most 2000 characters"))]
    pub description: Option<String>,
}

/// Body of `POST /categories/add-product`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddProductToCategory {
    pub product_id: ProductId,
    pub category_id: DbId,
}

/// A category together with (a subset of) its products.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryWithProducts {
    #[serde(flatten)]
    pub category: Category,
    pub products: Vec<Product>,
}

/// A product row tagged with one category it belongs to. Produced by
/// join queries and folded into [`CategoryWithProducts`].
#[derive(Debug, Clone, FromRow)]
pub struct CategoryProductRow {
    pub category_id: DbId,
    #[sqlx(flatten)]
    pub product: Product,
}

/// A category row tagged with one product it contains. Produced by join
/// queries and folded into product responses.
#[derive(Debug, Clone, FromRow)]
pub struct ProductCategoryRow {
    pub product_id: ProductId,
    #[sqlx(flatten)]
    pub category: Category,
}
