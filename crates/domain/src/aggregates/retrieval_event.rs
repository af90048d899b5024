//! RetrievalEvent aggregate - one lifecycle event of a content retrieval
//!
//! # Rustic DDD Design
//!
//! - **Private fields**: read-only accessors, no `&mut` methods
//! - **Newtypes**: `Phase`, `EventName`, `PhaseStartTime`, `EventTime`
//! - **Valid by construction**: `create()` is the only way to obtain one

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ValidationError;
use crate::value_objects::{EventName, EventTime, Phase, PhaseStartTime};

/// Raw, unvalidated event record as submitted by a reporting instance.
///
/// Required fields are `Option` so absence can be reported as a
/// `ValidationError` naming the field instead of a deserialization failure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetrievalEventProps {
    #[serde(default)]
    pub retrieval_id: Option<String>,
    #[serde(default)]
    pub instance_id: Option<String>,
    #[serde(default)]
    pub cid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_provider_id: Option<String>,
    #[serde(default)]
    pub phase: Option<String>,
    #[serde(default)]
    pub phase_start_time: Option<String>,
    #[serde(default)]
    pub event_name: Option<String>,
    #[serde(default)]
    pub event_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_details: Option<Value>,
}

impl RetrievalEventProps {
    /// Read a raw JSON record.
    ///
    /// # Errors
    ///
    /// Returns a `ValidationError` when the value is not an object or one of
    /// its known fields has the wrong JSON type.
    pub fn from_json(value: Value) -> Result<Self, ValidationError> {
        serde_json::from_value(value).map_err(|e| {
            ValidationError::new(format!("Event record could not be read: {e}."))
        })
    }
}

/// Returns the value of a required string property, treating empty strings
/// as missing.
fn required<'a>(value: &'a Option<String>, field: &str) -> Result<&'a str, ValidationError> {
    match value.as_deref() {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ValidationError::required(field)),
    }
}

/// A fully validated retrieval event.
///
/// # Invariants
///
/// - `retrieval_id`, `instance_id` and `cid` are non-empty
/// - `phase` and `event_name` are members of their closed sets
/// - `phase_start_time` and `event_time` are canonical UTC instants
///
/// Identity is not enforced: two events with equal fields are equal and may
/// both be stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RetrievalEvent {
    retrieval_id: String,
    instance_id: String,
    cid: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    storage_provider_id: Option<String>,
    phase: Phase,
    phase_start_time: PhaseStartTime,
    event_name: EventName,
    event_time: EventTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    event_details: Option<Value>,
}

impl RetrievalEvent {
    // =========================================================================
    // Constructor
    // =========================================================================

    /// Validate a raw record into an event.
    ///
    /// Required properties are checked first, in the order `retrievalId`,
    /// `instanceId`, `cid`, `phase`, `phaseStartTime`, `eventName`,
    /// `eventTime`; then `phase`, `phaseStartTime`, `eventName` and
    /// `eventTime` are validated in that order. The first failure is returned.
    ///
    /// # Errors
    ///
    /// Returns a `ValidationError` naming the missing property, or the
    /// property whose value failed validation.
    ///
    /// # Example
    ///
    /// ```
    /// use event_recorder_domain::{RetrievalEvent, RetrievalEventProps};
    ///
    /// let props = RetrievalEventProps {
    ///     retrieval_id: Some("r1".into()),
    ///     instance_id: Some("i1".into()),
    ///     cid: Some("c1".into()),
    ///     phase: Some("query".into()),
    ///     phase_start_time: Some("1970-01-01T00:00:00.000Z".into()),
    ///     event_name: Some("connected".into()),
    ///     event_time: Some("1970-01-02T00:00:00.000Z".into()),
    ///     ..Default::default()
    /// };
    ///
    /// let event = RetrievalEvent::create(props).unwrap();
    /// assert_eq!(event.phase_start_time().value(), "1970-01-01T00:00:00.000Z");
    /// ```
    pub fn create(props: RetrievalEventProps) -> Result<Self, ValidationError> {
        let retrieval_id = required(&props.retrieval_id, "retrievalId")?;
        let instance_id = required(&props.instance_id, "instanceId")?;
        let cid = required(&props.cid, "cid")?;
        let phase = required(&props.phase, "phase")?;
        let phase_start_time = required(&props.phase_start_time, "phaseStartTime")?;
        let event_name = required(&props.event_name, "eventName")?;
        let event_time = required(&props.event_time, "eventTime")?;

        let phase = Phase::create(phase).map_err(|e| e.for_field("phase"))?;
        let phase_start_time = PhaseStartTime::create(Some(phase_start_time))
            .map_err(|e| e.for_field("phaseStartTime"))?;
        let event_name = EventName::create(event_name).map_err(|e| e.for_field("eventName"))?;
        let event_time =
            EventTime::create(Some(event_time)).map_err(|e| e.for_field("eventTime"))?;

        Ok(Self {
            retrieval_id: retrieval_id.to_string(),
            instance_id: instance_id.to_string(),
            cid: cid.to_string(),
            storage_provider_id: props.storage_provider_id,
            phase,
            phase_start_time,
            event_name,
            event_time,
            event_details: props.event_details,
        })
    }

    // =========================================================================
    // Accessors (read-only)
    // =========================================================================

    /// Correlates all events of one retrieval attempt.
    #[inline]
    pub fn retrieval_id(&self) -> &str {
        &self.retrieval_id
    }

    /// Identifies the reporting client.
    #[inline]
    pub fn instance_id(&self) -> &str {
        &self.instance_id
    }

    /// Identifies the content being retrieved.
    #[inline]
    pub fn cid(&self) -> &str {
        &self.cid
    }

    #[inline]
    pub fn storage_provider_id(&self) -> Option<&str> {
        self.storage_provider_id.as_deref()
    }

    #[inline]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[inline]
    pub fn phase_start_time(&self) -> PhaseStartTime {
        self.phase_start_time
    }

    #[inline]
    pub fn event_name(&self) -> EventName {
        self.event_name
    }

    #[inline]
    pub fn event_time(&self) -> EventTime {
        self.event_time
    }

    /// Opaque structured payload, stored as-is.
    #[inline]
    pub fn event_details(&self) -> Option<&Value> {
        self.event_details.as_ref()
    }
}
