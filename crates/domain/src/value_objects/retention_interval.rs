//! Retention window for stored retrieval events.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ValidationError;

/// Maximum length of an interval descriptor
const MAX_INTERVAL_LENGTH: usize = 64;

/// An interval descriptor such as `1 week` or `30 days`.
///
/// The value is opaque to the domain: the store interprets it. Construction
/// only checks that it is non-empty and made of characters an interval
/// literal can contain.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RetentionInterval(String);

impl RetentionInterval {
    /// Create a validated retention interval.
    ///
    /// # Errors
    ///
    /// Returns a `ValidationError` if the trimmed value is empty, longer than
    /// 64 characters, contains characters other than ASCII letters, digits,
    /// whitespace and `:.+`, or is negative (a `-` sign or `ago`).
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::new("RetentionInterval cannot be empty."));
        }
        if trimmed.len() > MAX_INTERVAL_LENGTH {
            return Err(ValidationError::new(format!(
                "RetentionInterval cannot exceed {} characters.",
                MAX_INTERVAL_LENGTH
            )));
        }
        if let Some(c) = trimmed
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || c.is_ascii_whitespace() || ":.+".contains(*c)))
        {
            return Err(ValidationError::new(format!(
                "RetentionInterval contains an unsupported character: {c:?}."
            )));
        }
        // A negative interval puts the cutoff in the future and deletes every row.
        if trimmed
            .split_ascii_whitespace()
            .any(|word| word.eq_ignore_ascii_case("ago"))
        {
            return Err(ValidationError::new("RetentionInterval must not be negative."));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for RetentionInterval {
    fn default() -> Self {
        Self("1 week".to_string())
    }
}

impl fmt::Display for RetentionInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for RetentionInterval {
    type Error = ValidationError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<RetentionInterval> for String {
    fn from(interval: RetentionInterval) -> String {
        interval.0
    }
}
