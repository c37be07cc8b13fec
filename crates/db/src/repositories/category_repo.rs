//! Repository for the `product_categories` table.

use std::collections::HashMap;

use sqlx::PgPool;
use stockroom_core::types::{DbId, ProductId, Timestamp};

use crate::models::category::{
    Category, CategoryProductRow, CategoryWithProducts, CreateCategory,
};
use crate::models::product::Product;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, description, created_at, updated_at";

/// Product columns qualified with the `p` alias, for join queries.
const PRODUCT_COLUMNS: &str =
    "p.id, p.name, p.price, p.stock_quantity, p.image_url, p.created_at, p.updated_at";

/// Provides CRUD operations for product categories.
pub struct CategoryRepo;

impl CategoryRepo {
    /// Insert a new category, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateCategory) -> Result<Category, sqlx::Error> {
        let query = format!(
            "INSERT INTO product_categories (name, description)
             VALUES ($1, $2)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Category>(&query)
            .bind(&input.name)
            .bind(&input.description)
            .fetch_one(pool)
            .await
    }

    /// Whether a category with the given ID exists.
    pub async fn exists(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM product_categories WHERE id = $1)")
            .bind(id)
            .fetch_one(pool)
            .await
    }

    /// List all categories ordered by name.
    pub async fn list(pool: &PgPool) -> Result<Vec<Category>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM product_categories ORDER BY name");
        sqlx::query_as::<_, Category>(&query).fetch_all(pool).await
    }

    /// List all categories, each with every linked product (newest first).
    pub async fn list_with_products(
        pool: &PgPool,
    ) -> Result<Vec<CategoryWithProducts>, sqlx::Error> {
        let categories = Self::list(pool).await?;

        let query = format!(
            "SELECT l.category_id, {PRODUCT_COLUMNS}
             FROM product_category_links l
             JOIN products p ON p.id = l.product_id
             ORDER BY p.created_at DESC"
        );
        let rows = sqlx::query_as::<_, CategoryProductRow>(&query)
            .fetch_all(pool)
            .await?;

        Ok(group_products(categories, rows))
    }

    /// Products linked to one category, newest first.
    pub async fn list_products(
        pool: &PgPool,
        category_id: DbId,
    ) -> Result<Vec<Product>, sqlx::Error> {
        let query = format!(
            "SELECT {PRODUCT_COLUMNS}
             FROM products p
             JOIN product_category_links l ON l.product_id = p.id
             WHERE l.category_id = $1
             ORDER BY p.created_at DESC"
        );
        sqlx::query_as::<_, Product>(&query)
            .bind(category_id)
            .fetch_all(pool)
            .await
    }

    /// Link a product to a category. Linking an already linked pair is a no-op.
    pub async fn link_product(
        pool: &PgPool,
        product_id: ProductId,
        category_id: DbId,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO product_category_links (product_id, category_id)
             VALUES ($1, $2)
             ON CONFLICT (product_id, category_id) DO NOTHING",
        )
        .bind(product_id)
        .bind(category_id)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Categories with at least one product created at or after `since`,
    /// each carrying only those products, newest first.
    pub async fn new_arrivals(
        pool: &PgPool,
        since: Timestamp,
    ) -> Result<Vec<CategoryWithProducts>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM product_categories c
             WHERE EXISTS (
                 SELECT 1 FROM product_category_links l
                 JOIN products p ON p.id = l.product_id
                 WHERE l.category_id = c.id AND p.created_at >= $1
             )
             ORDER BY c.name"
        );
        let categories = sqlx::query_as::<_, Category>(&query)
            .bind(since)
            .fetch_all(pool)
            .await?;

        let query = format!(
            "SELECT l.category_id, {PRODUCT_COLUMNS}
             FROM product_category_links l
             JOIN products p ON p.id = l.product_id
             WHERE p.created_at >= $1
             ORDER BY p.created_at DESC"
        );
        let rows = sqlx::query_as::<_, CategoryProductRow>(&query)
            .bind(since)
            .fetch_all(pool)
            .await?;

        let mut grouped = group_products(categories, rows);
        // A product created between the two queries can leave a category empty.
        grouped.retain(|c| !c.products.is_empty());
        Ok(grouped)
    }

    /// Delete a category by ID. Links cascade; products are kept.
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM product_categories WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

/// Fold `(category_id, product)` rows under their categories, keeping the
/// category order and the row order within each category.
fn group_products(
    categories: Vec<Category>,
    rows: Vec<CategoryProductRow>,
) -> Vec<CategoryWithProducts> {
    let mut by_category: HashMap<DbId, Vec<Product>> = HashMap::new();
    for row in rows {
        by_category
            .entry(row.category_id)
            .or_default()
            .push(row.product);
    }

    categories
        .into_iter()
        .map(|category| {
            let products = by_category.remove(&category.id).unwrap_or_default();
            CategoryWithProducts { category, products }
        })
        .collect()
}
