//! Retrieval phase value object.

use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fmt;

use crate::error::ValidationError;

/// Coarse stage of a retrieval attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Phase {
    /// Looking up candidate providers in the indexer
    Indexer,
    /// Asking a candidate whether it serves the content
    Query,
    /// Transferring the content
    Retrieval,
}

impl Phase {
    /// Every accepted phase, in wire order.
    pub const ALL: &'static [Phase] = &[Phase::Indexer, Phase::Query, Phase::Retrieval];

    /// Validate a raw phase string.
    ///
    /// # Errors
    ///
    /// Returns a `ValidationError` naming the allowed values when `value` is
    /// not one of them. Matching is exact (case-sensitive).
    pub fn create(value: &str) -> Result<Self, ValidationError> {
        match value {
            "indexer" => Ok(Phase::Indexer),
            "query" => Ok(Phase::Query),
            "retrieval" => Ok(Phase::Retrieval),
            _ => {
                let allowed: Vec<&str> = Self::ALL.iter().map(Phase::as_str).collect();
                Err(ValidationError::new(format!(
                    "Phase must be created with one of the following values: [{}].",
                    allowed.join(",")
                ))
                .with_details(json!({ "allowedValues": allowed })))
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Indexer => "indexer",
            Phase::Query => "query",
            Phase::Retrieval => "retrieval",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Phase {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::create(s)
    }
}

impl TryFrom<String> for Phase {
    type Error = ValidationError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::create(&s)
    }
}

impl From<Phase> for String {
    fn from(phase: Phase) -> String {
        phase.as_str().to_string()
    }
}
