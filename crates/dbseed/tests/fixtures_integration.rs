//! Integration tests for loading JSON fixtures into Postgres.
//!
//! To run these tests, you need:
//! 1. A PostgreSQL database
//! 2. DATABASE_URL environment variable set
//!
//! Run with: `DATABASE_URL=postgres://... cargo nextest run -p dbseed fixtures`
//!
//! Note: Each test creates its own uniquely named table and drops it when
//! done, so they can safely run against a development database.

use std::env;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use dbseed::prelude::*;
use sqlx::{PgPool, postgres::PgPoolOptions};

/// Get database pool, skipping tests if DATABASE_URL is not set.
async fn get_test_pool() -> Option<PgPool> {
    let database_url = match env::var("DATABASE_URL") {
        Ok(url) => url,
        Err(_) => {
            eprintln!("Skipping test: DATABASE_URL not set");
            return None;
        }
    };

    match PgPoolOptions::new()
        .max_connections(2)
        .connect(&database_url)
        .await
    {
        Ok(pool) => Some(pool),
        Err(e) => {
            eprintln!("Skipping test: Failed to connect to database: {e}");
            None
        }
    }
}

/// Creates a scratch table with a unique name.
async fn create_table(pool: &PgPool, prefix: &str) -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .subsec_nanos();
    let table = format!("{prefix}_{}_{nanos}", std::process::id());

    sqlx::query(&format!(
        r#"
        CREATE TABLE {table} (
            id BIGINT PRIMARY KEY,
            name TEXT NOT NULL,
            price DOUBLE PRECISION,
            active BOOLEAN,
            meta TEXT
        )
        "#
    ))
    .execute(pool)
    .await
    .expect("Failed to create test table");

    table
}

async fn drop_table(pool: &PgPool, table: &str) {
    let _ = sqlx::query(&format!("DROP TABLE IF EXISTS {table}"))
        .execute(pool)
        .await;
}

fn write_fixture(dir: &Path, name: &str, content: &str) {
    std::fs::write(dir.join(format!("{name}.json")), content).unwrap();
}

#[tokio::test]
async fn test_fixture_rows_are_coerced_and_inserted() {
    let Some(pool) = get_test_pool().await else {
        return;
    };
    let table = create_table(&pool, "dbseed_items").await;
    let dir = tempfile::tempdir().unwrap();
    write_fixture(
        dir.path(),
        "items",
        r#"[
            {"id": "1", "name": "Boot", "price": "19.5", "active": "true", "meta": {"size": 42}},
            {"id": 2, "name": "Hat", "price": null, "active": false, "meta": null}
        ]"#,
    );

    let source = FixtureSource::new("items").table(table.as_str());
    let inserted = source.load(&pool, dir.path()).await.unwrap();
    assert_eq!(inserted, 2);

    let row: (String, Option<f64>, Option<bool>, Option<String>) = sqlx::query_as(&format!(
        "SELECT name, price, active, meta FROM {table} WHERE id = 1"
    ))
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(row.0, "Boot");
    assert_eq!(row.1, Some(19.5));
    assert_eq!(row.2, Some(true));
    assert_eq!(row.3.as_deref(), Some(r#"{"size":42}"#));

    let price: Option<f64> = sqlx::query_scalar(&format!("SELECT price FROM {table} WHERE id = 2"))
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(price, None);

    drop_table(&pool, &table).await;
}

#[tokio::test]
async fn test_failed_insert_is_isolated_by_runner() {
    let Some(pool) = get_test_pool().await else {
        return;
    };
    let table = create_table(&pool, "dbseed_isolated").await;
    let dir = tempfile::tempdir().unwrap();
    write_fixture(dir.path(), "good", r#"[{"id": 1, "name": "ok"}]"#);
    write_fixture(dir.path(), "bad", r#"[{"id": 2, "no_such_column": "x"}]"#);
    write_fixture(dir.path(), "later", r#"[{"id": 3, "name": "still runs"}]"#);

    let mut registry = Registry::new();
    for name in ["good", "bad", "later"] {
        let source = FixtureSource::new(name).table(table.as_str());
        registry.register_for_env_named(
            "",
            move |seeder: Seeder| {
                let source = source.clone();
                async move {
                    seeder.seed_from_source(&source).await?;
                    Ok(())
                }
            },
            name,
        );
    }

    let runner = Runner::new(SeedResources::new(pool.clone()).with_fixture_dir(dir.path()));
    let report = runner.execute(&registry, &SelectionCriteria::all()).await;

    let failed: Vec<&str> = report.failed().map(|o| o.name.as_str()).collect();
    assert_eq!(failed, vec!["bad"]);

    let count: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 2);

    drop_table(&pool, &table).await;
}
