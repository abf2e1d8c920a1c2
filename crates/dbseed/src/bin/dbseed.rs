//! Seeds a database straight from a directory of JSON fixture files.
//!
//! Every `<name>.json` file becomes a seeder called `<name>` that inserts its
//! records into the table `<name>`. Without `--seed` the seeders that would run
//! are listed.
//!
//! Run with:
//! ```
//! cargo run -p dbseed --bin dbseed -- --fixtures db/seeds/data --seed
//! ```

use std::path::PathBuf;

use clap::Parser;
use dbseed::prelude::*;
use dbseed::sources::register_fixture_dir;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "dbseed", about = "Seed a database from JSON fixture files")]
struct Cli {
    /// Directory holding one JSON fixture file per table
    #[arg(long)]
    fixtures: Option<PathBuf>,

    /// Environment the fixture seeders are registered for (common when empty)
    #[arg(long, default_value = "")]
    fixture_env: String,

    #[command(flatten)]
    seed: SeedArgs,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = SeedConfig::from_env()?;
    if let Some(dir) = cli.fixtures {
        config.fixture_dir = dir;
    }

    let mut registry = Registry::new();
    let count = register_fixture_dir(&mut registry, &config.fixture_dir, &cli.fixture_env)?;
    tracing::info!(
        "Registered {} fixture seeders from {}",
        count,
        config.fixture_dir.display()
    );

    with_seeder(
        &cli.seed,
        &registry,
        || config.connect(),
        || async {
            let criteria = cli.seed.criteria();
            for entry in registry.select(&criteria) {
                let env = if entry.is_common() {
                    "common"
                } else {
                    entry.environment()
                };
                println!("{} ({})", entry.name(), env);
            }
            Ok(())
        },
    )
    .await
}
