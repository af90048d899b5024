//! Retrieval event use cases.

mod delete_old_events;
mod save_retrieval_event;

use std::sync::Arc;

pub use delete_old_events::DeleteOldEvents;
pub use save_retrieval_event::SaveRetrievalEvent;

/// Container for retrieval event use cases.
pub struct RetrievalEventUseCases {
    pub save: Arc<SaveRetrievalEvent>,
    pub delete_old: Arc<DeleteOldEvents>,
}

impl RetrievalEventUseCases {
    pub fn new(save: Arc<SaveRetrievalEvent>, delete_old: Arc<DeleteOldEvents>) -> Self {
        Self { save, delete_old }
    }
}
