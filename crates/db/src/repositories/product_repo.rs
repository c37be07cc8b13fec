//! Repository for the `products` table and its category links.

use std::collections::HashMap;

use sqlx::PgPool;
use stockroom_core::types::{DbId, ProductId};

use crate::models::category::{Category, ProductCategoryRow};
use crate::models::product::{CreateProduct, Product, ProductWithCategories, UpdateProduct};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, price, stock_quantity, image_url, created_at, updated_at";

/// Provides CRUD operations for products.
pub struct ProductRepo;

impl ProductRepo {
    /// Insert a product and link it to exactly one category, atomically.
    ///
    /// Fails with a foreign key violation (SQLSTATE 23503) if the category
    /// does not exist; nothing is written in that case.
    pub async fn create_in_category(
        pool: &PgPool,
        input: &CreateProduct,
        category_id: DbId,
    ) -> Result<Product, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO products (id, name, price, stock_quantity, image_url)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        let product = sqlx::query_as::<_, Product>(&query)
            .bind(input.id)
            .bind(&input.name)
            .bind(input.price)
            .bind(input.stock_quantity)
            .bind(&input.image_url)
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query("INSERT INTO product_category_links (product_id, category_id) VALUES ($1, $2)")
            .bind(product.id)
            .bind(category_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(product)
    }

    /// Find a product by its ID.
    pub async fn find_by_id(pool: &PgPool, id: ProductId) -> Result<Option<Product>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM products WHERE id = $1");
        sqlx::query_as::<_, Product>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List products, newest first, optionally filtered by a case-insensitive
    /// substring of the name.
    pub async fn list(pool: &PgPool, search: Option<&str>) -> Result<Vec<Product>, sqlx::Error> {
        let pattern = search
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| format!("%{}%", escape_like(s)));

        let query = format!(
            "SELECT {COLUMNS} FROM products
             WHERE ($1::TEXT IS NULL OR name ILIKE $1 ESCAPE '\\')
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Product>(&query)
            .bind(pattern)
            .fetch_all(pool)
            .await
    }

    /// Update a product. Only non-`None` fields in `input` are applied.
    ///
    /// When `category_id` is given, the product's category links are reset
    /// to exactly that one category in the same transaction.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: ProductId,
        input: &UpdateProduct,
        category_id: Option<DbId>,
    ) -> Result<Option<Product>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE products SET
                name = COALESCE($2, name),
                price = COALESCE($3, price),
                stock_quantity = COALESCE($4, stock_quantity),
                image_url = COALESCE($5, image_url)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let Some(product) = sqlx::query_as::<_, Product>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(input.price)
            .bind(input.stock_quantity)
            .bind(&input.image_url)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(None);
        };

        if let Some(category_id) = category_id {
            sqlx::query("DELETE FROM product_category_links WHERE product_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;
            sqlx::query(
                "INSERT INTO product_category_links (product_id, category_id) VALUES ($1, $2)",
            )
            .bind(id)
            .bind(category_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(Some(product))
    }

    /// Permanently delete a product by ID. Links, sales and purchases cascade.
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: ProductId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Categories linked to one product, ordered by name.
    pub async fn categories_of(
        pool: &PgPool,
        product_id: ProductId,
    ) -> Result<Vec<Category>, sqlx::Error> {
        sqlx::query_as::<_, Category>(
            "SELECT c.id, c.name, c.description, c.created_at, c.updated_at
             FROM product_categories c
             JOIN product_category_links l ON l.category_id = c.id
             WHERE l.product_id = $1
             ORDER BY c.name",
        )
        .bind(product_id)
        .fetch_all(pool)
        .await
    }

    /// Load one product with its categories.
    pub async fn find_with_categories(
        pool: &PgPool,
        id: ProductId,
    ) -> Result<Option<ProductWithCategories>, sqlx::Error> {
        let Some(product) = Self::find_by_id(pool, id).await? else {
            return Ok(None);
        };
        let categories = Self::categories_of(pool, id).await?;
        Ok(Some(ProductWithCategories {
            product,
            categories,
        }))
    }

    /// Attach categories to a batch of products with a single query,
    /// preserving the input order.
    pub async fn attach_categories(
        pool: &PgPool,
        products: Vec<Product>,
    ) -> Result<Vec<ProductWithCategories>, sqlx::Error> {
        if products.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<ProductId> = products.iter().map(|p| p.id).collect();
        let rows = sqlx::query_as::<_, ProductCategoryRow>(
            "SELECT l.product_id, c.id, c.name, c.description, c.created_at, c.updated_at
             FROM product_category_links l
             JOIN product_categories c ON c.id = l.category_id
             WHERE l.product_id = ANY($1)
             ORDER BY c.name",
        )
        .bind(&ids)
        .fetch_all(pool)
        .await?;

        let mut by_product: HashMap<ProductId, Vec<Category>> = HashMap::new();
        for row in rows {
            by_product
                .entry(row.product_id)
                .or_default()
                .push(row.category);
        }

        Ok(products
            .into_iter()
            .map(|product| {
                let categories = by_product.remove(&product.id).unwrap_or_default();
                ProductWithCategories {
                    product,
                    categories,
                }
            })
            .collect())
    }
}

/// Escape `LIKE` metacharacters so user input matches literally.
fn escape_like(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::escape_like;

    #[test]
    fn escape_like_passes_plain_text() {
        assert_eq!(escape_like("boots"), "boots");
    }

    #[test]
    fn escape_like_escapes_wildcards() {
        assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
    }
}
