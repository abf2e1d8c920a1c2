//! Fixture data sources for seeders.
//!
//! - [`FixtureSource`]: a JSON file of flat records inserted row by row
//! - [`FixtureValue`]: coercion of fixture values before binding
//! - [`register_fixture_dir`]: one seeder per JSON file in a directory

mod json;
mod value;

pub use json::{FixtureRow, FixtureSource, discover, parse_rows, register_fixture_dir};
pub use value::FixtureValue;
