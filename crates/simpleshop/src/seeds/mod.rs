//! Seeders for the shop catalog.
//!
//! Common seeders load the JSON fixtures in `db/seeds/data`; the `test`
//! environment adds randomized bulk data on top.

mod categories;
mod products;

use dbseed::{Registration, RegistryError, Registry};

pub use categories::{categories_seeder, test_categories_seeder};
pub use products::{demo_products_seeder, products_seeder, test_products_seeder};

/// Environment of the seeders that build a small demo catalog.
pub const DEMO_ENV: &str = "demo";

/// Registers every shop seeder, in the order they must run.
pub fn register(registry: &mut Registry) -> Result<(), RegistryError> {
    registry.register(categories_seeder)?;
    registry.register(products_seeder)?;
    registry.register_for_test(test_categories_seeder)?;
    registry.register_for_test(test_products_seeder)?;

    Registration::new("demo_products")
        .env(DEMO_ENV)
        .complete(registry, demo_products_seeder)?;

    Ok(())
}
