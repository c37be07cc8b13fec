//! Integration tests for the new-arrivals and category listing queries.

use chrono::{Duration, Utc};
use sqlx::PgPool;
use stockroom_core::inventory::new_arrivals_cutoff;
use stockroom_db::models::category::CreateCategory;
use stockroom_db::models::product::{CreateProduct, Product};
use stockroom_db::repositories::{CategoryRepo, ProductRepo};
use uuid::Uuid;

async fn category(pool: &PgPool, name: &str) -> i64 {
    CategoryRepo::create(
        pool,
        &CreateCategory {
            name: name.to_string(),
            description: Some(format!("{name} things")),
        },
    )
    .await
    .unwrap()
    .id
}

/// Create a product in `category_id` and backdate it by `age_days`.
async fn product_aged(pool: &PgPool, category_id: i64, name: &str, age_days: i64) -> Product {
    let input = CreateProduct {
        id: Uuid::new_v4(),
        name: name.to_string(),
        price: 10.0,
        stock_quantity: 1,
        image_url: None,
    };
    let product = ProductRepo::create_in_category(pool, &input, category_id)
        .await
        .unwrap();
    sqlx::query("UPDATE products SET created_at = $2 WHERE id = $1")
        .bind(product.id)
        .bind(Utc::now() - Duration::days(age_days))
        .execute(pool)
        .await
        .unwrap();
    ProductRepo::find_by_id(pool, product.id).await.unwrap().unwrap()
}

#[sqlx::test(migrations = "./migrations")]
async fn test_new_arrivals_only_recent_categories_and_products(pool: PgPool) {
    let fresh = category(&pool, "Fresh").await;
    let stale = category(&pool, "Stale").await;
    let _empty = category(&pool, "Empty").await;

    product_aged(&pool, fresh, "old-in-fresh", 120).await;
    product_aged(&pool, fresh, "week-old", 7).await;
    product_aged(&pool, fresh, "today", 0).await;
    product_aged(&pool, stale, "ancient", 200).await;

    let result = CategoryRepo::new_arrivals(&pool, new_arrivals_cutoff(Utc::now()))
        .await
        .unwrap();

    assert_eq!(result.len(), 1, "only categories with recent products");
    assert_eq!(result[0].category.id, fresh);

    let names: Vec<&str> = result[0].products.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["today", "week-old"]);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_new_arrivals_sorted_newest_first(pool: PgPool) {
    let cat = category(&pool, "Sorted").await;
    for (name, age) in [("b", 20), ("a", 40), ("c", 5)] {
        product_aged(&pool, cat, name, age).await;
    }

    let result = CategoryRepo::new_arrivals(&pool, new_arrivals_cutoff(Utc::now()))
        .await
        .unwrap();
    let products = &result[0].products;
    assert!(products
        .windows(2)
        .all(|pair| pair[0].created_at >= pair[1].created_at));
    assert_eq!(products[0].name, "c");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_new_arrivals_empty_when_nothing_recent(pool: PgPool) {
    let cat = category(&pool, "Dusty").await;
    product_aged(&pool, cat, "relic", 90).await;

    let result = CategoryRepo::new_arrivals(&pool, new_arrivals_cutoff(Utc::now()))
        .await
        .unwrap();
    assert!(result.is_empty());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_list_with_products_includes_empty_categories(pool: PgPool) {
    let full = category(&pool, "Full").await;
    let empty = category(&pool, "Bare").await;
    product_aged(&pool, full, "one", 1).await;
    product_aged(&pool, full, "two", 300).await;

    let listed = CategoryRepo::list_with_products(&pool).await.unwrap();
    assert_eq!(listed.len(), 2);

    let bare = listed.iter().find(|c| c.category.id == empty).unwrap();
    assert!(bare.products.is_empty());

    let full = listed.iter().find(|c| c.category.id == full).unwrap();
    assert_eq!(full.products.len(), 2);
    assert_eq!(full.products[0].name, "one");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_link_product_is_idempotent(pool: PgPool) {
    let a = category(&pool, "First").await;
    let b = category(&pool, "Second").await;
    let product = product_aged(&pool, a, "linked", 0).await;

    CategoryRepo::link_product(&pool, product.id, b).await.unwrap();
    CategoryRepo::link_product(&pool, product.id, b).await.unwrap();

    let in_b = CategoryRepo::list_products(&pool, b).await.unwrap();
    assert_eq!(in_b.len(), 1);
    let categories = ProductRepo::categories_of(&pool, product.id).await.unwrap();
    assert_eq!(categories.len(), 2);
}
