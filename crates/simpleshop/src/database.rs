use crate::errors::AppError;
use crate::models::{Category, Product, ProductQuery};
use sqlx::PgPool;

#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_categories(&self) -> Result<Vec<Category>, AppError> {
        let categories = sqlx::query_as(
            r#"
            SELECT id, name
            FROM categories
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(categories)
    }

    pub async fn get_category(&self, id: i64) -> Result<Option<Category>, AppError> {
        let category = sqlx::query_as("SELECT id, name FROM categories WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(category)
    }

    pub async fn list_products(&self, query: &ProductQuery) -> Result<Vec<Product>, AppError> {
        let products = sqlx::query_as(
            r#"
            SELECT id, category_id, sku, name, price, in_stock, attributes
            FROM products
            WHERE ($1::BIGINT IS NULL OR category_id = $1)
              AND (NOT $2 OR in_stock)
            ORDER BY id
            "#,
        )
        .bind(query.category_id)
        .bind(query.in_stock_only)
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    pub async fn count_products(&self) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
