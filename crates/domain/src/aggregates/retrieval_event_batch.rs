//! RetrievalEventBatch - a submission of events validated independently
//!
//! A batch never fails because of its elements. Each raw record is validated
//! on its own; valid ones are kept, invalid ones are set aside with the reason
//! and reported through a warning log. Only a submission without an `events`
//! collection is rejected.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::aggregates::retrieval_event::{RetrievalEvent, RetrievalEventProps};
use crate::error::ValidationError;

/// Raw batch submission.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RetrievalEventBatchProps {
    /// Raw event records. `None` when the submission has no `events` field.
    #[serde(default)]
    pub events: Option<Vec<Value>>,
}

impl RetrievalEventBatchProps {
    pub fn new(events: Vec<Value>) -> Self {
        Self {
            events: Some(events),
        }
    }
}

/// A raw record that failed validation, kept for diagnostics only.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IgnoredEvent {
    pub event: Value,
    pub error: ValidationError,
}

/// A validated collection of retrieval events.
///
/// # Invariants
///
/// - every element of `events()` is a valid `RetrievalEvent`
/// - events keep their submission order
/// - an empty batch is valid
#[derive(Debug, Clone, PartialEq)]
pub struct RetrievalEventBatch {
    events: Vec<RetrievalEvent>,
    ignored: Vec<IgnoredEvent>,
}

impl RetrievalEventBatch {
    /// Validate a raw submission, partitioning it into accepted and ignored
    /// events.
    ///
    /// # Errors
    ///
    /// Returns a `ValidationError` only when `events` is absent. Invalid
    /// elements never make this fail, even if every element is invalid.
    pub fn create(props: RetrievalEventBatchProps) -> Result<Self, ValidationError> {
        let raw_events = props
            .events
            .ok_or_else(|| ValidationError::required("events"))?;
        let total = raw_events.len();

        let (events, ignored) = raw_events.into_iter().fold(
            (Vec::with_capacity(total), Vec::new()),
            |(mut events, mut ignored), raw| {
                match RetrievalEventProps::from_json(raw.clone()).and_then(RetrievalEvent::create) {
                    Ok(event) => events.push(event),
                    Err(error) => ignored.push(IgnoredEvent { event: raw, error }),
                }
                (events, ignored)
            },
        );

        if !ignored.is_empty() {
            let ignored_events = serde_json::to_string(&ignored).unwrap_or_default();
            tracing::warn!(
                ignored = ignored.len(),
                total,
                ignored_events = %ignored_events,
                "Could not validate entire event batch. {}/{} were invalid and will be skipped.",
                ignored.len(),
                total
            );
        }

        Ok(Self { events, ignored })
    }

    /// Validated events, in submission order.
    pub fn events(&self) -> &[RetrievalEvent] {
        &self.events
    }

    /// Records that were dropped during validation.
    pub fn ignored(&self) -> &[IgnoredEvent] {
        &self.ignored
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl From<RetrievalEvent> for RetrievalEventBatch {
    fn from(event: RetrievalEvent) -> Self {
        Self {
            events: vec![event],
            ignored: Vec::new(),
        }
    }
}
