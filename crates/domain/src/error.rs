//! Validation error type for the domain layer
//!
//! Validation failures are returned as values, never raised: every constructor
//! in this crate returns `Result<T, ValidationError>`.

use serde::Serialize;
use serde_json::{json, Map, Value};
use thiserror::Error;

/// A malformed or out-of-range input, with optional structured details
/// (which field, which values were allowed).
#[derive(Debug, Clone, PartialEq, Serialize, Error)]
#[error("{message}")]
pub struct ValidationError {
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            details: None,
        }
    }

    /// Attach structured details to the error.
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Error for a required property that is absent or empty.
    pub fn required(field: &str) -> Self {
        Self::new(format!("Property {field} is required.")).with_details(json!({ "field": field }))
    }

    /// Prefix the error with the property that failed validation.
    ///
    /// Existing details are kept; when they are a JSON object the field name
    /// is added to them.
    pub fn for_field(self, field: &str) -> Self {
        let details = match self.details {
            Some(Value::Object(mut map)) => {
                map.insert("field".to_string(), Value::from(field));
                Value::Object(map)
            }
            Some(other) => json!({ "field": field, "cause": other }),
            None => {
                let mut map = Map::new();
                map.insert("field".to_string(), Value::from(field));
                Value::Object(map)
            }
        };

        Self {
            message: format!("Property {field} failed validation. {}", self.message),
            details: Some(details),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn details(&self) -> Option<&Value> {
        self.details.as_ref()
    }
}
