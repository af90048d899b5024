//! Validated timestamp newtypes
//!
//! `EventTime` and `PhaseStartTime` accept any reasonable date string and
//! normalize it to a canonical UTC ISO-8601 value:
//! - millisecond precision (sub-millisecond digits are truncated)
//! - fixed width, `Z` suffixed, e.g. `2022-01-01T00:00:00.000Z`

use chrono::{DateTime, NaiveDate, NaiveDateTime, SubsecRound, TimeZone, Timelike, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ValidationError;

/// Canonical rendering of every stored timestamp.
const CANONICAL_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

/// Offset-less date-times, read as UTC.
const NAIVE_DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Parse a date string into a UTC instant truncated to milliseconds.
///
/// Tries RFC 3339, then RFC 2822, then the naive formats above, then a bare
/// `YYYY-MM-DD` (midnight UTC). Leap seconds (second 60) are rejected since
/// they have no canonical rendering.
fn parse_date_string(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    let parsed = DateTime::parse_from_rfc3339(value)
        .or_else(|_| DateTime::parse_from_rfc2822(value))
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NAIVE_DATE_TIME_FORMATS
                .iter()
                .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
                .map(|naive| Utc.from_utc_datetime(&naive))
        })
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
                .map(|naive| Utc.from_utc_datetime(&naive))
        })?;

    if parsed.nanosecond() >= 1_000_000_000 {
        return None;
    }
    Some(parsed.trunc_subsecs(3))
}

// ============================================================================
// EventTime
// ============================================================================

/// When a retrieval event occurred (UTC, millisecond precision)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EventTime(DateTime<Utc>);

impl EventTime {
    /// Create a validated event time from a raw date string.
    ///
    /// # Errors
    ///
    /// Returns a `ValidationError` when the value is absent or does not denote
    /// a calendar date-time.
    pub fn create(value: Option<&str>) -> Result<Self, ValidationError> {
        value
            .and_then(parse_date_string)
            .map(Self)
            .ok_or_else(|| ValidationError::new("EventTime must be created with a valid date string."))
    }

    /// Canonical UTC ISO-8601 string, e.g. `1970-01-02T00:00:00.000Z`.
    pub fn value(&self) -> String {
        self.0.format(CANONICAL_FORMAT).to_string()
    }

    pub fn as_datetime(&self) -> DateTime<Utc> {
        self.0
    }
}

impl fmt::Display for EventTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(CANONICAL_FORMAT))
    }
}

impl TryFrom<String> for EventTime {
    type Error = ValidationError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::create(Some(&s))
    }
}

impl From<EventTime> for String {
    fn from(time: EventTime) -> String {
        time.value()
    }
}

// ============================================================================
// PhaseStartTime
// ============================================================================

/// When the phase an event belongs to started (UTC, millisecond precision)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PhaseStartTime(DateTime<Utc>);

impl PhaseStartTime {
    /// Create a validated phase start time from a raw date string.
    ///
    /// # Errors
    ///
    /// Returns a `ValidationError` when the value is absent or does not denote
    /// a calendar date-time.
    pub fn create(value: Option<&str>) -> Result<Self, ValidationError> {
        value
            .and_then(parse_date_string)
            .map(Self)
            .ok_or_else(|| {
                ValidationError::new("PhaseStartTime must be created with a valid date string.")
            })
    }

    /// Canonical UTC ISO-8601 string, e.g. `1970-01-01T00:00:00.000Z`.
    pub fn value(&self) -> String {
        self.0.format(CANONICAL_FORMAT).to_string()
    }

    pub fn as_datetime(&self) -> DateTime<Utc> {
        self.0
    }
}

impl fmt::Display for PhaseStartTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(CANONICAL_FORMAT))
    }
}

impl TryFrom<String> for PhaseStartTime {
    type Error = ValidationError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::create(Some(&s))
    }
}

impl From<PhaseStartTime> for String {
    fn from(time: PhaseStartTime) -> String {
        time.value()
    }
}
