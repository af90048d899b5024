//! Aggregate roots - domain objects that own their related data
//!
//! Aggregates here are immutable once built: construction validates, and
//! there are no `&mut` methods.

pub mod retrieval_event;
pub mod retrieval_event_batch;

pub use retrieval_event::{RetrievalEvent, RetrievalEventProps};
pub use retrieval_event_batch::{IgnoredEvent, RetrievalEventBatch, RetrievalEventBatchProps};
