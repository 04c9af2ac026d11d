//! Response Schema Descriptions
//!
//! An explicit description of the result shape the engine must produce.
//! The same description is rendered into the request (Gemini's OpenAPI
//! subset) and used to validate the engine's output before it is
//! deserialized into a typed result.

use serde::{Serialize, Serializer};
use serde_json::{json, Map, Value};

/// Declared shape of a structured response
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseSchema {
    String,
    Integer,
    Array(Box<ResponseSchema>),
    /// Object with required, ordered properties
    Object(Vec<(String, ResponseSchema)>),
}

/// First place where a value departs from its schema
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("at {path}: expected {expected}, found {found}")]
pub struct SchemaMismatch {
    pub path: String,
    pub expected: String,
    pub found: String,
}

impl ResponseSchema {
    pub fn string() -> Self {
        ResponseSchema::String
    }

    pub fn integer() -> Self {
        ResponseSchema::Integer
    }

    pub fn array_of(items: ResponseSchema) -> Self {
        ResponseSchema::Array(Box::new(items))
    }

    pub fn object<K: Into<String>>(properties: impl IntoIterator<Item = (K, ResponseSchema)>) -> Self {
        ResponseSchema::Object(
            properties
                .into_iter()
                .map(|(name, schema)| (name.into(), schema))
                .collect(),
        )
    }

    fn type_name(&self) -> &'static str {
        match self {
            ResponseSchema::String => "STRING",
            ResponseSchema::Integer => "INTEGER",
            ResponseSchema::Array(_) => "ARRAY",
            ResponseSchema::Object(_) => "OBJECT",
        }
    }

    /// Render as a Gemini `responseSchema` value.
    pub fn to_json(&self) -> Value {
        match self {
            ResponseSchema::String | ResponseSchema::Integer => json!({ "type": self.type_name() }),
            ResponseSchema::Array(items) => json!({
                "type": self.type_name(),
                "items": items.to_json(),
            }),
            ResponseSchema::Object(properties) => {
                let mut props = Map::new();
                for (name, schema) in properties {
                    props.insert(name.clone(), schema.to_json());
                }
                let names: Vec<&str> = properties.iter().map(|(n, _)| n.as_str()).collect();
                json!({
                    "type": self.type_name(),
                    "properties": props,
                    "required": names,
                    "propertyOrdering": names,
                })
            }
        }
    }

    /// Check `value` against this schema.
    ///
    /// Extra object keys are tolerated; missing ones are not.
    pub fn validate(&self, value: &Value) -> Result<(), SchemaMismatch> {
        self.validate_at(value, "$")
    }

    fn validate_at(&self, value: &Value, path: &str) -> Result<(), SchemaMismatch> {
        let mismatch = |expected: &str| SchemaMismatch {
            path: path.to_string(),
            expected: expected.to_string(),
            found: describe(value),
        };

        match self {
            ResponseSchema::String => value.is_string().then_some(()).ok_or_else(|| mismatch("string")),
            ResponseSchema::Integer => {
                if value.is_i64() || value.is_u64() {
                    Ok(())
                } else {
                    Err(mismatch("integer"))
                }
            }
            ResponseSchema::Array(items) => {
                let elements = value.as_array().ok_or_else(|| mismatch("array"))?;
                for (i, element) in elements.iter().enumerate() {
                    items.validate_at(element, &format!("{path}[{i}]"))?;
                }
                Ok(())
            }
            ResponseSchema::Object(properties) => {
                let object = value.as_object().ok_or_else(|| mismatch("object"))?;
                for (name, schema) in properties {
                    let child_path = format!("{path}.{name}");
                    match object.get(name) {
                        Some(child) => schema.validate_at(child, &child_path)?,
                        None => {
                            return Err(SchemaMismatch {
                                path: child_path,
                                expected: "required property".to_string(),
                                found: "nothing".to_string(),
                            })
                        }
                    }
                }
                Ok(())
            }
        }
    }
}

impl Serialize for ResponseSchema {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

fn describe(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => format!("boolean {b}"),
        Value::Number(n) => format!("number {n}"),
        Value::String(s) => format!("string {s:?}"),
        Value::Array(a) => format!("array of {}", a.len()),
        Value::Object(_) => "object".to_string(),
    }
}

/// A typed engine result that declares its own schema
pub trait StructuredOutput: serde::de::DeserializeOwned {
    fn schema() -> ResponseSchema;
}
