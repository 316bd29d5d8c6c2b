use std::fmt;

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

/// Recipe identifier as returned by Spoonacular. Integer `1` and string `"1"` are distinct.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RecipeId {
    Int(i64),
    Str(String),
}

impl RecipeId {
    /// Extract a usable id from a JSON value. Floats, booleans, null, arrays and objects are not ids.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_i64().map(Self::Int),
            Value::String(s) => Some(Self::Str(s.clone())),
            _ => None,
        }
    }
}

impl fmt::Display for RecipeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::Str(s) => f.write_str(s),
        }
    }
}

/// One recipe's full detail payload. Everything except `id` is kept opaque.
#[derive(Debug, Clone, PartialEq)]
pub struct RecipeRecord {
    id: RecipeId,
    fields: Map<String, Value>,
}

impl RecipeRecord {
    /// Wrap a JSON value, returning it unchanged if it is not an object with a valid `id`.
    pub fn from_value(value: Value) -> Result<Self, Value> {
        match value {
            Value::Object(fields) => match fields.get("id").and_then(RecipeId::from_value) {
                Some(id) => Ok(Self { id, fields }),
                None => Err(Value::Object(fields)),
            },
            other => Err(other),
        }
    }

    pub fn id(&self) -> &RecipeId {
        &self.id
    }

    #[cfg(test)]
    pub(crate) fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }
}

impl Serialize for RecipeRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.fields.serialize(serializer)
    }
}
