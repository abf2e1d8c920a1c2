//! Handle passed to every seeder callback.

use std::path::{Path, PathBuf};

use sqlx::PgPool;

use crate::error::FixtureError;
use crate::registry::SeederEntry;
use crate::sources::FixtureSource;

/// Default directory for JSON fixture files, relative to the working directory.
pub const DEFAULT_FIXTURE_DIR: &str = "db/seeds/data";

/// Resources shared by every seeder in a run.
///
/// The pool is owned by the caller; seeders only borrow connections from it.
#[derive(Debug, Clone)]
pub struct SeedResources {
    pool: PgPool,
    fixture_dir: PathBuf,
}

impl SeedResources {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            fixture_dir: PathBuf::from(DEFAULT_FIXTURE_DIR),
        }
    }

    /// Sets the directory JSON fixtures are read from.
    pub fn with_fixture_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.fixture_dir = dir.into();
        self
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub fn fixture_dir(&self) -> &Path {
        &self.fixture_dir
    }
}

/// Database handle and metadata for the seeder currently running.
///
/// A fresh `Seeder` is built for every invocation.
#[derive(Debug, Clone)]
pub struct Seeder {
    resources: SeedResources,
    name: String,
    environment: String,
}

impl Seeder {
    pub(crate) fn for_entry(resources: &SeedResources, entry: &SeederEntry) -> Self {
        Self {
            resources: resources.clone(),
            name: entry.name().to_string(),
            environment: entry.environment().to_string(),
        }
    }

    pub fn pool(&self) -> &PgPool {
        self.resources.pool()
    }

    /// Name of the running seeder.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Environment the running seeder was registered for (empty when common).
    pub fn environment(&self) -> &str {
        &self.environment
    }

    pub fn fixture_dir(&self) -> &Path {
        self.resources.fixture_dir()
    }

    /// Inserts every record of `<fixture_dir>/<source>.json` into the table `source`.
    ///
    /// Returns the number of inserted rows.
    pub async fn seed_from_json(&self, source: &str) -> Result<u64, FixtureError> {
        self.seed_from_source(&FixtureSource::new(source)).await
    }

    /// Inserts every record of a fixture source, honouring its table and directory overrides.
    pub async fn seed_from_source(&self, source: &FixtureSource) -> Result<u64, FixtureError> {
        source.load(self.pool(), self.fixture_dir()).await
    }
}
