//! Single-row insert statements built from fixture records.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};
use sqlx::PgPool;
use sqlx::postgres::{PgArguments, Postgres};
use sqlx::query::Query;

use crate::error::FixtureError;
use crate::sources::FixtureValue;

static TABLE_IDENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*(\.[A-Za-z_][A-Za-z0-9_]*)?$")
        .expect("valid table pattern")
});

static COLUMN_IDENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("valid column pattern"));

/// An `insert into` statement with positional parameters.
///
/// NULL values are written as literals so they fit any column type; every
/// other value gets a `$n` placeholder bound in column order.
///
/// # Example
/// ```ignore
/// let row = json!({"id": "100", "name": "common"});
/// let stmt = InsertStatement::build("categories", row.as_object().unwrap())?;
/// assert_eq!(stmt.sql(), "insert into categories (id, name) values ($1, $2)");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct InsertStatement {
    table: String,
    columns: Vec<String>,
    values: Vec<FixtureValue>,
}

impl InsertStatement {
    /// Builds a statement for one flat record, coercing each value.
    pub fn build(table: &str, row: &Map<String, Value>) -> Result<Self, FixtureError> {
        if !TABLE_IDENT.is_match(table) {
            return Err(FixtureError::InvalidIdentifier(table.to_string()));
        }
        if row.is_empty() {
            return Err(FixtureError::EmptyRow);
        }

        let mut columns = Vec::with_capacity(row.len());
        let mut values = Vec::with_capacity(row.len());

        for (column, value) in row {
            if !COLUMN_IDENT.is_match(column) {
                return Err(FixtureError::InvalidIdentifier(column.clone()));
            }
            columns.push(column.clone());
            values.push(FixtureValue::coerce(value));
        }

        Ok(Self {
            table: table.to_string(),
            columns,
            values,
        })
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Coerced values in column order, including NULLs.
    pub fn values(&self) -> &[FixtureValue] {
        &self.values
    }

    /// Values that are bound to placeholders, in parameter order.
    pub fn args(&self) -> Vec<&FixtureValue> {
        self.values.iter().filter(|v| !v.is_null()).collect()
    }

    pub fn sql(&self) -> String {
        let mut param_idx = 0;
        let placeholders: Vec<String> = self
            .values
            .iter()
            .map(|value| {
                if value.is_null() {
                    "NULL".to_string()
                } else {
                    param_idx += 1;
                    format!("${param_idx}")
                }
            })
            .collect();

        format!(
            "insert into {} ({}) values ({})",
            self.table,
            self.columns.join(", "),
            placeholders.join(", ")
        )
    }

    /// Executes the statement, returning the number of affected rows.
    pub async fn execute(&self, pool: &PgPool) -> Result<u64, sqlx::Error> {
        let sql = self.sql();
        let query = self
            .values
            .iter()
            .fold(sqlx::query(&sql), |query, value| bind_value(query, value));

        let result = query.execute(pool).await?;
        Ok(result.rows_affected())
    }
}

fn bind_value<'q>(
    query: Query<'q, Postgres, PgArguments>,
    value: &'q FixtureValue,
) -> Query<'q, Postgres, PgArguments> {
    match value {
        FixtureValue::Null => query,
        FixtureValue::Bool(b) => query.bind(*b),
        FixtureValue::Int(i) => query.bind(*i),
        FixtureValue::Float(f) => query.bind(*f),
        FixtureValue::Text(s) => query.bind(s.as_str()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_prepare_statement() {
        let stmt = InsertStatement::build(
            "categories",
            &row(json!({"id": "100", "name": "common"})),
        )
        .unwrap();

        assert_eq!(
            stmt.sql(),
            "insert into categories (id, name) values ($1, $2)"
        );
        assert_eq!(
            stmt.values(),
            &[
                FixtureValue::Int(100),
                FixtureValue::Text("common".to_string())
            ]
        );
    }

    #[test]
    fn test_null_rendered_as_literal() {
        let stmt = InsertStatement::build(
            "products",
            &row(json!({"a": 1, "b": null, "c": "x"})),
        )
        .unwrap();

        assert_eq!(
            stmt.sql(),
            "insert into products (a, b, c) values ($1, NULL, $2)"
        );
        assert_eq!(stmt.args().len(), 2);
    }

    #[test]
    fn test_schema_qualified_table() {
        let stmt = InsertStatement::build("shop.products", &row(json!({"id": 1}))).unwrap();
        assert_eq!(stmt.sql(), "insert into shop.products (id) values ($1)");
    }

    #[test]
    fn test_rejects_bad_table() {
        let err = InsertStatement::build("users; drop table x", &row(json!({"id": 1})));
        assert!(matches!(err, Err(FixtureError::InvalidIdentifier(_))));
    }

    #[test]
    fn test_rejects_bad_column() {
        let err = InsertStatement::build("users", &row(json!({"id)": 1})));
        assert!(matches!(err, Err(FixtureError::InvalidIdentifier(ref c)) if c == "id)"));
    }

    #[test]
    fn test_rejects_empty_row() {
        let err = InsertStatement::build("users", &Map::new());
        assert!(matches!(err, Err(FixtureError::EmptyRow)));
    }
}
