use dbseed::Seeder;
use fake::Fake;
use fake::faker::lorem::en::Word;
use rand::Rng;
use serde_json::json;

/// Number of random categories inserted for the `test` environment.
const TEST_CATEGORY_COUNT: usize = 100;

pub async fn categories_seeder(seeder: Seeder) -> anyhow::Result<()> {
    seeder.seed_from_json("categories").await?;
    Ok(())
}

pub async fn test_categories_seeder(seeder: Seeder) -> anyhow::Result<()> {
    let rows: Vec<(i64, String)> = {
        let mut rng = rand::thread_rng();
        (0..TEST_CATEGORY_COUNT)
            .map(|_| {
                let id = rng.gen_range(1_000..i64::from(u16::MAX));
                let word: String = Word().fake_with_rng(&mut rng);
                (id, json!({ "en": word }).to_string())
            })
            .collect()
    };

    for (id, name) in rows {
        sqlx::query("INSERT INTO categories (id, name) VALUES ($1, $2) ON CONFLICT (id) DO NOTHING")
            .bind(id)
            .bind(name)
            .execute(seeder.pool())
            .await?;
    }

    Ok(())
}
