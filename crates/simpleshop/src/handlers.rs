use axum::{
    Extension, Json,
    extract::{Path, Query},
    http::StatusCode,
};
use serde_json::{Value, json};

use crate::{
    database::Database,
    errors::AppError,
    models::{Category, Product, ProductQuery},
};

pub async fn health_check() -> StatusCode {
    StatusCode::OK
}

pub async fn list_categories(
    Extension(db): Extension<Database>,
) -> Result<Json<Vec<Category>>, AppError> {
    let categories = db.list_categories().await?;
    Ok(Json(categories))
}

pub async fn get_category(
    Extension(db): Extension<Database>,
    Path(id): Path<i64>,
) -> Result<Json<Category>, AppError> {
    let category = db.get_category(id).await?.ok_or(AppError::NotFound)?;
    Ok(Json(category))
}

pub async fn list_products(
    Extension(db): Extension<Database>,
    Query(query): Query<ProductQuery>,
) -> Result<Json<Vec<Product>>, AppError> {
    let products = db.list_products(&query).await?;
    Ok(Json(products))
}

/// Catalog size, useful to check that seeding worked.
pub async fn get_stats(Extension(db): Extension<Database>) -> Result<Json<Value>, AppError> {
    let categories = db.list_categories().await?.len();
    let products = db.count_products().await?;

    Ok(Json(json!({
        "categories": categories,
        "products": products,
    })))
}
