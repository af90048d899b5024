//! Retrieval event kind value object.

use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fmt;

use crate::error::ValidationError;

/// Kind of lifecycle event reported during a retrieval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum EventName {
    CandidatesFound,
    CandidatesFiltered,
    Started,
    Connected,
    QueryAsked,
    QueryAskedFiltered,
    Proposed,
    Accepted,
    FirstByteReceived,
    Failure,
    Success,
}

impl EventName {
    /// Every accepted event name, in wire order.
    pub const ALL: &'static [EventName] = &[
        EventName::CandidatesFound,
        EventName::CandidatesFiltered,
        EventName::Started,
        EventName::Connected,
        EventName::QueryAsked,
        EventName::QueryAskedFiltered,
        EventName::Proposed,
        EventName::Accepted,
        EventName::FirstByteReceived,
        EventName::Failure,
        EventName::Success,
    ];

    /// Validate a raw event name string.
    ///
    /// # Errors
    ///
    /// Returns a `ValidationError` naming the allowed values when `value` is
    /// not one of them.
    pub fn create(value: &str) -> Result<Self, ValidationError> {
        Self::ALL
            .iter()
            .copied()
            .find(|name| name.as_str() == value)
            .ok_or_else(|| {
                let allowed: Vec<&str> = Self::ALL.iter().map(EventName::as_str).collect();
                ValidationError::new(format!(
                    "EventName must be created with one of the following values: [{}].",
                    allowed.join(",")
                ))
                .with_details(json!({ "allowedValues": allowed }))
            })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EventName::CandidatesFound => "candidates-found",
            EventName::CandidatesFiltered => "candidates-filtered",
            EventName::Started => "started",
            EventName::Connected => "connected",
            EventName::QueryAsked => "query-asked",
            EventName::QueryAskedFiltered => "query-asked-filtered",
            EventName::Proposed => "proposed",
            EventName::Accepted => "accepted",
            EventName::FirstByteReceived => "first-byte-received",
            EventName::Failure => "failure",
            EventName::Success => "success",
        }
    }
}

impl fmt::Display for EventName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for EventName {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::create(s)
    }
}

impl TryFrom<String> for EventName {
    type Error = ValidationError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::create(&s)
    }
}

impl From<EventName> for String {
    fn from(name: EventName) -> String {
        name.as_str().to_string()
    }
}
