//! Example: Run seeders programmatically, without the command-line wrapper.
//!
//! This registers a few seeders for different environments:
//! - a common seeder creating and filling a `colors` table
//! - a `stage` seeder adding extra rows
//! - a `stage` seeder that always fails, to show failure isolation
//!
//! Run with:
//! ```
//! cargo run -p dbseed --example seed_programmatic
//! ```

use dbseed::prelude::*;
use tracing_subscriber::EnvFilter;

async fn colors_seeder(seeder: Seeder) -> anyhow::Result<()> {
    sqlx::query("CREATE TABLE IF NOT EXISTS colors (id BIGINT PRIMARY KEY, name TEXT NOT NULL)")
        .execute(seeder.pool())
        .await?;

    for (id, name) in [(1_i64, "red"), (2, "green"), (3, "blue")] {
        sqlx::query("INSERT INTO colors (id, name) VALUES ($1, $2) ON CONFLICT (id) DO NOTHING")
            .bind(id)
            .bind(name)
            .execute(seeder.pool())
            .await?;
    }

    Ok(())
}

async fn stage_colors_seeder(seeder: Seeder) -> anyhow::Result<()> {
    sqlx::query(
        "INSERT INTO colors (id, name) VALUES (100, 'stage-magenta') ON CONFLICT (id) DO NOTHING",
    )
    .execute(seeder.pool())
    .await?;
    Ok(())
}

async fn broken_seeder(_seeder: Seeder) -> anyhow::Result<()> {
    anyhow::bail!("this seeder always fails")
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Connect to database
    let config = SeedConfig::from_env()?;
    let resources = config.connect().await?;

    let mut registry = Registry::new();
    registry.register(colors_seeder)?;
    registry.register_for_env("stage", stage_colors_seeder)?;
    registry.register_for_env_named("stage", broken_seeder, "always_broken");

    let criteria = SelectionCriteria::new().for_env("stage");
    let report = Runner::new(resources).execute(&registry, &criteria).await;

    // Summary output
    for outcome in report.outcomes() {
        match outcome.error() {
            None => tracing::info!(
                "  {} (started {}): ok in {:?}",
                outcome.name,
                outcome.started_at,
                outcome.elapsed
            ),
            Some(err) => tracing::info!(
                "  {} (started {}): failed ({})",
                outcome.name,
                outcome.started_at,
                err
            ),
        }
    }

    report.into_result()?;
    Ok(())
}
