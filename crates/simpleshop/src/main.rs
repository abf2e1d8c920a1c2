use clap::Parser;
use dbseed::prelude::*;
use simpleshop::{run_server, seeds};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Example shop API. Pass `--seed` to fill the database instead of serving.
#[derive(Debug, Parser)]
#[command(name = "simpleshop")]
struct Cli {
    /// Port the API listens on
    #[arg(long, env = "PORT", default_value_t = 3001)]
    port: u16,

    #[command(flatten)]
    seed: SeedArgs,
}

fn init_logging() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();
    let config = SeedConfig::from_env()?;

    tracing::info!("Connecting to database at {}", config.database_url);

    let resources = config.connect().await?;
    let pool = resources.pool().clone();

    sqlx::migrate!("./migrations").run(&pool).await?;

    let mut registry = Registry::new();
    seeds::register(&mut registry)?;

    with_seeder(
        &cli.seed,
        &registry,
        || async { Ok(resources) },
        || run_server(pool, cli.port),
    )
    .await
}
