//! Product entity model and DTOs.

use serde::Serialize;
use sqlx::FromRow;
use stockroom_core::types::{ProductId, Timestamp};

use crate::models::category::Category;

/// A product row from the `products` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: f64,
    pub stock_quantity: i32,
    pub image_url: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Values for inserting a product. Built by handlers after the image upload.
#[derive(Debug, Clone)]
pub struct CreateProduct {
    pub id: ProductId,
    pub name: String,
    pub price: f64,
    pub stock_quantity: i32,
    pub image_url: Option<String>,
}

/// Values for updating a product. `None` fields keep their stored value.
#[derive(Debug, Clone, Default)]
pub struct UpdateProduct {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub stock_quantity: Option<i32>,
    pub image_url: Option<String>,
}

/// A product together with every category it is linked to.
#[derive(Debug, Clone, Serialize)]
pub struct ProductWithCategories {
    #[serde(flatten)]
    pub product: Product,
    pub categories: Vec<Category>,
}
