//! Error types for registration, fixture loading, and seeding runs.

use std::path::PathBuf;

use thiserror::Error;

/// Configuration errors raised while registering seeders.
///
/// These are fatal: they surface immediately to the registering caller and
/// are never retried.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error(
        "Cannot derive a seeder name from `{type_name}`; register it with an explicit name instead"
    )]
    UnnamedSeeder { type_name: String },
    #[error("Registration `{name}` is already completed; a registration can be used only once")]
    AlreadyCompleted { name: String },
}

#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("IO error reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("JSON parse error in {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Fixture {} must be an array of flat objects: {reason}", .path.display())]
    Shape { path: PathBuf, reason: String },
    #[error("Invalid SQL identifier: {0:?}")]
    InvalidIdentifier(String),
    #[error("Row has no columns")]
    EmptyRow,
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("Database connection failed: {0}")]
    Connect(#[source] sqlx::Error),
    #[error("{} seeder(s) failed: {}", .failed.len(), .failed.join(", "))]
    SeedersFailed { failed: Vec<String> },
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error(transparent)]
    Fixture(#[from] FixtureError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeders_failed_lists_names() {
        let err = SeedError::SeedersFailed {
            failed: vec!["users".into(), "orders".into()],
        };
        assert_eq!(err.to_string(), "2 seeder(s) failed: users, orders");
    }

    #[test]
    fn test_fixture_shape_mentions_path() {
        let err = FixtureError::Shape {
            path: PathBuf::from("db/seeds/data/users.json"),
            reason: "expected an array".into(),
        };
        assert!(err.to_string().contains("db/seeds/data/users.json"));
    }
}
