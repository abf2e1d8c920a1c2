//! Command-line entry point.
//!
//! [`SeedArgs`] holds the seeding flags and can be flattened into an
//! application's own `clap` parser. [`with_seeder`] then either runs the
//! application or, when `--seed` is given, runs the selected seeders instead.
//!
//! ```rust,ignore
//! #[derive(Parser)]
//! struct Cli {
//!     #[command(flatten)]
//!     seed: SeedArgs,
//! }
//!
//! let cli = Cli::parse();
//! with_seeder(&cli.seed, &registry, || config.connect(), || run_app()).await
//! ```

use std::ffi::OsString;
use std::future::Future;

use clap::{ArgAction, Args, Parser};

use crate::db::SeedResources;
use crate::error::SeedError;
use crate::registry::Registry;
use crate::runner::Runner;
use crate::selector::SelectionCriteria;

/// Seeding flags.
#[derive(Debug, Clone, Default, Args)]
pub struct SeedArgs {
    /// Run the registered seeders instead of the application
    #[arg(long)]
    pub seed: bool,

    /// Only run seeders registered for this environment (plus common seeders)
    #[arg(long)]
    pub env: Option<String>,

    /// Comma separated names of the seeders to run
    #[arg(long, value_delimiter = ',')]
    pub names: Vec<String>,

    /// With --env and without --names, skip seeders registered without an environment
    #[arg(
        long,
        default_value_t = false,
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true",
        action = ArgAction::Set
    )]
    pub skip_common: bool,
}

#[derive(Debug, Parser)]
#[command(name = "seed")]
struct SeedCommand {
    #[command(flatten)]
    args: SeedArgs,
}

impl SeedArgs {
    /// Parses the seeding flags from the process arguments, exiting on error.
    pub fn parse() -> Self {
        SeedCommand::parse().args
    }

    pub fn try_parse_from<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        SeedCommand::try_parse_from(args).map(|cmd| cmd.args)
    }

    pub fn criteria(&self) -> SelectionCriteria {
        SelectionCriteria::new()
            .for_env(self.env.clone().unwrap_or_default())
            .for_names(&self.names)
            .skip_common(self.skip_common)
    }
}

/// Runs `app`, or the selected seeders when `--seed` is set.
///
/// In seed mode `app` is never called: seeding is a one-shot batch and the
/// caller is expected to exit afterwards. `connect` is only awaited in seed
/// mode; its failure aborts the run before any seeder is selected. Any failed
/// seeder turns into [`SeedError::SeedersFailed`] once the whole batch ran.
pub async fn with_seeder<C, CFut, A, AFut, E>(
    args: &SeedArgs,
    registry: &Registry,
    connect: C,
    app: A,
) -> Result<(), E>
where
    C: FnOnce() -> CFut,
    CFut: Future<Output = Result<SeedResources, SeedError>>,
    A: FnOnce() -> AFut,
    AFut: Future<Output = Result<(), E>>,
    E: From<SeedError>,
{
    if !args.seed {
        return app().await;
    }

    let resources = connect().await?;
    Runner::new(resources)
        .execute(registry, &args.criteria())
        .await
        .into_result()?;

    Ok(())
}
