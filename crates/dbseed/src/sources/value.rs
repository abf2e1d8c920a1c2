//! Coercion of fixture values into bindable SQL values.

use serde_json::Value;

/// A fixture value after coercion.
#[derive(Debug, Clone, PartialEq)]
pub enum FixtureValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl FixtureValue {
    /// Coerces a JSON value.
    ///
    /// Strings that look like integers, floats or booleans become those
    /// types. Arrays and objects are stored as their JSON text.
    pub fn coerce(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(*b),
            Value::Number(n) => n
                .as_i64()
                .map(Self::Int)
                .or_else(|| n.as_f64().map(Self::Float))
                .unwrap_or_else(|| Self::Text(n.to_string())),
            Value::String(s) => Self::coerce_str(s),
            Value::Array(_) | Value::Object(_) => Self::Text(value.to_string()),
        }
    }

    pub fn coerce_str(s: &str) -> Self {
        if let Ok(i) = s.parse::<i64>() {
            return Self::Int(i);
        }
        // "inf" and "NaN" parse as f64 but are meant as text
        if let Some(f) = s.parse::<f64>().ok().filter(|f| f.is_finite()) {
            return Self::Float(f);
        }
        match s {
            "t" | "T" | "true" | "TRUE" | "True" => return Self::Bool(true),
            "f" | "F" | "false" | "FALSE" | "False" => return Self::Bool(false),
            _ => {}
        }

        Self::Text(s.to_string())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}
