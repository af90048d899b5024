//! Event Recorder domain.
//!
//! Validated value objects and aggregates for retrieval event telemetry.
//! Nothing in this crate performs I/O; every constructor returns
//! `Result<T, ValidationError>`.

pub mod aggregates;
pub mod error;
pub mod value_objects;

pub use aggregates::{
    IgnoredEvent, RetrievalEvent, RetrievalEventBatch, RetrievalEventBatchProps,
    RetrievalEventProps,
};
pub use error::ValidationError;
pub use value_objects::{EventName, EventTime, Phase, PhaseStartTime, RetentionInterval};
