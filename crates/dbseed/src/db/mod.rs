//! Database side of seeding.
//!
//! The [`Seeder`] handle gives callbacks access to the shared pool and to
//! fixture loading; [`InsertStatement`] turns fixture records into
//! parameterized inserts.

mod seeder;
mod statement;

pub use seeder::{DEFAULT_FIXTURE_DIR, SeedResources, Seeder};
pub use statement::InsertStatement;
