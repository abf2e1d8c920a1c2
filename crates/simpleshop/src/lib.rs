pub mod database;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod seeds;

use axum::{
    Extension, Router,
    http::{HeaderValue, Method, header},
    routing::get,
};
use sqlx::PgPool;
use tower_http::{
    cors::{Any, CorsLayer},
    set_header::SetResponseHeaderLayer,
};

use crate::{
    database::Database,
    handlers::{get_category, get_stats, health_check, list_categories, list_products},
};

pub fn create_router(pool: PgPool) -> Router {
    let db = Database::new(pool);

    let cors = CorsLayer::new()
        .allow_methods([Method::GET])
        .allow_headers(Any)
        .allow_origin(Any);

    Router::new()
        .route("/health", get(health_check))
        .route("/stats", get(get_stats))
        .route("/categories", get(list_categories))
        .route("/categories/{id}", get(get_category))
        .route("/products", get(list_products))
        .layer(Extension(db))
        .layer(cors)
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
}

pub async fn run_server(pool: PgPool, port: u16) -> anyhow::Result<()> {
    let app = create_router(pool);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;

    tracing::info!("Server running on http://0.0.0.0:{}", port);

    axum::serve(listener, app).await?;

    Ok(())
}
