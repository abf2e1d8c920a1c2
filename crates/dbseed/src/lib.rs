//! Named, environment-scoped database seeders.
//!
//! Applications register seed functions in a [`Registry`], then run a subset
//! of them selected by environment and/or name. Every seeder runs behind a
//! failure boundary: a failing or panicking seeder is reported and the run
//! continues with the next one.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use dbseed::prelude::*;
//!
//! async fn categories_seeder(seeder: Seeder) -> anyhow::Result<()> {
//!     seeder.seed_from_json("categories").await?;
//!     Ok(())
//! }
//!
//! let mut registry = Registry::new();
//! registry.register(categories_seeder)?;
//! registry.register_for_test(test_categories_seeder)?;
//!
//! let criteria = SelectionCriteria::new().for_env("test");
//! let report = dbseed::execute(&registry, pool, &criteria).await;
//! ```

pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod names;
pub mod registry;
pub mod runner;
pub mod selector;
pub mod sources;

pub use db::Seeder;
pub use error::{FixtureError, RegistryError, SeedError};
pub use registry::{Registration, Registry, SeederEntry};
pub use runner::{ExecutionReport, Runner, SeedOutcome, SeedStatus, execute};
pub use selector::SelectionCriteria;

pub mod prelude {
    //! Convenient re-exports for common usage.

    pub use crate::cli::{SeedArgs, with_seeder};
    pub use crate::config::SeedConfig;
    pub use crate::db::{SeedResources, Seeder};
    pub use crate::error::{FixtureError, RegistryError, SeedError};
    pub use crate::registry::{COMMON_ENV, Registration, Registry, TEST_ENV};
    pub use crate::runner::{ExecutionReport, Runner, SeedOutcome, SeedStatus};
    pub use crate::selector::SelectionCriteria;
    pub use crate::sources::FixtureSource;
}
