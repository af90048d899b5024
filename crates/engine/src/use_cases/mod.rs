//! Use cases - orchestration between the API layer and the store.

pub mod retrieval_events;

pub use retrieval_events::RetrievalEventUseCases;
