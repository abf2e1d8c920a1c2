//! JSON fixture loading.

use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use sqlx::PgPool;
use tracing::info;

use crate::db::{InsertStatement, Seeder};
use crate::error::FixtureError;
use crate::registry::Registry;

/// A flat key-value record read from a fixture file.
pub type FixtureRow = Map<String, Value>;

/// A JSON fixture file holding an array of flat records.
///
/// By default the file `<dir>/<name>.json` is inserted into the table `name`.
#[derive(Debug, Clone)]
pub struct FixtureSource {
    name: String,
    table: Option<String>,
    dir: Option<PathBuf>,
}

impl FixtureSource {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            table: None,
            dir: None,
        }
    }

    /// Inserts into `table` instead of the table named after the source.
    pub fn table(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }

    /// Reads the file from `dir` instead of the run's fixture directory.
    pub fn dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dir = Some(dir.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn table_name(&self) -> &str {
        self.table.as_deref().unwrap_or(&self.name)
    }

    /// Path of the fixture file, falling back to `default_dir`.
    pub fn path(&self, default_dir: &Path) -> PathBuf {
        self.dir
            .as_deref()
            .unwrap_or(default_dir)
            .join(format!("{}.json", self.name))
    }

    /// Reads and parses the fixture file.
    pub async fn read_rows(&self, default_dir: &Path) -> Result<Vec<FixtureRow>, FixtureError> {
        let path = self.path(default_dir);
        let content = tokio::fs::read_to_string(&path)
            .await
            .map_err(|source| FixtureError::Io {
                path: path.clone(),
                source,
            })?;

        parse_rows(&path, &content)
    }

    /// Inserts every record, one statement per row. Returns the number of inserted rows.
    pub async fn load(&self, pool: &PgPool, default_dir: &Path) -> Result<u64, FixtureError> {
        let rows = self.read_rows(default_dir).await?;
        let table = self.table_name();

        let mut inserted = 0;
        for row in &rows {
            let stmt = InsertStatement::build(table, row)?;
            inserted += stmt.execute(pool).await?;
        }

        info!("Inserted {} rows into {} from {}", inserted, table, self.name);
        Ok(inserted)
    }
}

/// Parses fixture content: a JSON array of objects.
pub fn parse_rows(path: &Path, content: &str) -> Result<Vec<FixtureRow>, FixtureError> {
    let value: Value = serde_json::from_str(content).map_err(|source| FixtureError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    let Value::Array(items) = value else {
        return Err(FixtureError::Shape {
            path: path.to_path_buf(),
            reason: "expected a top-level array".to_string(),
        });
    };

    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| match item {
            Value::Object(row) => Ok(row),
            other => Err(FixtureError::Shape {
                path: path.to_path_buf(),
                reason: format!("element {i} is {}, expected an object", json_kind(&other)),
            }),
        })
        .collect()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Lists the `*.json` fixture sources in `dir`, sorted by name.
pub fn discover(dir: &Path) -> Result<Vec<FixtureSource>, FixtureError> {
    let io_err = |source| FixtureError::Io {
        path: dir.to_path_buf(),
        source,
    };

    let mut names = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(io_err)? {
        let path = entry.map_err(io_err)?.path();
        if !path.extension().is_some_and(|ext| ext == "json") {
            continue;
        }
        if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
            names.push(stem.to_string());
        }
    }
    names.sort();

    Ok(names
        .into_iter()
        .map(|name| FixtureSource::new(name).dir(dir))
        .collect())
}

/// Registers one seeder per fixture file in `dir`, named after the file.
///
/// Returns the number of registered seeders.
pub fn register_fixture_dir(
    registry: &mut Registry,
    dir: &Path,
    environment: &str,
) -> Result<usize, FixtureError> {
    let sources = discover(dir)?;
    let count = sources.len();

    for source in sources {
        let name = source.name().to_string();
        registry.register_for_env_named(
            environment,
            move |seeder: Seeder| {
                let source = source.clone();
                async move {
                    seeder.seed_from_source(&source).await?;
                    Ok(())
                }
            },
            name,
        );
    }

    Ok(count)
}
