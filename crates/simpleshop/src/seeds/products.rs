use dbseed::Seeder;
use dbseed::sources::FixtureSource;
use fake::Fake;
use fake::faker::lorem::en::Words;
use rand::Rng;
use serde_json::json;
use uuid::Uuid;

/// Number of random products inserted for the `test` environment.
const TEST_PRODUCT_COUNT: usize = 100;

/// Offset keeping generated product ids clear of the fixture ids.
const GENERATED_ID_BASE: i64 = 10_000;

pub async fn products_seeder(seeder: Seeder) -> anyhow::Result<()> {
    seeder.seed_from_json("products").await?;
    Ok(())
}

pub async fn test_products_seeder(seeder: Seeder) -> anyhow::Result<()> {
    let category_ids: Vec<i64> = sqlx::query_scalar("SELECT id FROM categories ORDER BY id")
        .fetch_all(seeder.pool())
        .await?;
    anyhow::ensure!(
        !category_ids.is_empty(),
        "no categories to attach products to; run categories_seeder first"
    );

    let rows: Vec<(i64, i64, String, f64)> = {
        let mut rng = rand::thread_rng();
        (0..TEST_PRODUCT_COUNT)
            .map(|i| {
                let category_id = category_ids[rng.gen_range(0..category_ids.len())];
                let words: Vec<String> = Words(2..4).fake_with_rng(&mut rng);
                let price = f64::from(rng.gen_range(100..50_000_u32)) / 100.0;
                (GENERATED_ID_BASE + i as i64, category_id, words.join(" "), price)
            })
            .collect()
    };

    for (id, category_id, name, price) in rows {
        sqlx::query(
            r#"
            INSERT INTO products (id, category_id, sku, name, price)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(id)
        .bind(category_id)
        .bind(Uuid::new_v4().to_string())
        .bind(json!({ "en": name }).to_string())
        .bind(price)
        .execute(seeder.pool())
        .await?;
    }

    Ok(())
}

/// Loads the product fixtures into a separate demo table.
pub async fn demo_products_seeder(seeder: Seeder) -> anyhow::Result<()> {
    sqlx::query("CREATE TABLE IF NOT EXISTS demo_products (LIKE products INCLUDING DEFAULTS)")
        .execute(seeder.pool())
        .await?;

    let source = FixtureSource::new("products").table("demo_products");
    let inserted = seeder.seed_from_source(&source).await?;
    tracing::info!(seeder = seeder.name(), "Loaded {} demo products", inserted);

    Ok(())
}
