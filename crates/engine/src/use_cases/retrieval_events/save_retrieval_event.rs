//! Persist a validated batch of retrieval events.

use std::sync::Arc;

use event_recorder_domain::RetrievalEventBatch;

use crate::infrastructure::ports::{RepoError, RetrievalEventRepo};

pub struct SaveRetrievalEvent {
    repo: Arc<dyn RetrievalEventRepo>,
}

impl SaveRetrievalEvent {
    pub fn new(repo: Arc<dyn RetrievalEventRepo>) -> Self {
        Self { repo }
    }

    /// Write every accepted event of `batch` in one store operation.
    ///
    /// Store failures are logged and returned unchanged.
    pub async fn execute(&self, batch: &RetrievalEventBatch) -> Result<(), RepoError> {
        self.repo.save_batch(batch).await.map_err(|e| {
            tracing::error!(error = %e, events = batch.len(), "Could not save retrieval events");
            e
        })?;

        tracing::info!(
            events = batch.len(),
            ignored = batch.ignored().len(),
            "Saved retrieval event batch"
        );
        Ok(())
    }
}
