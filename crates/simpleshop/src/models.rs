use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Category {
    pub id: i64,
    /// Localized names as a JSON object, e.g. `{"en": "Shoes"}`.
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Product {
    pub id: i64,
    pub category_id: i64,
    pub sku: String,
    pub name: String,
    pub price: f64,
    pub in_stock: bool,
    pub attributes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ProductQuery {
    pub category_id: Option<i64>,
    #[serde(default)]
    pub in_stock_only: bool,
}
