//! Application state and composition.

use std::sync::Arc;

use event_recorder_domain::RetentionInterval;

use crate::api::auth::ApiKey;
use crate::infrastructure::ports::RetrievalEventRepo;
use crate::use_cases::retrieval_events::{
    DeleteOldEvents, RetrievalEventUseCases, SaveRetrievalEvent,
};

/// Main application state.
///
/// Passed to HTTP handlers via Axum state.
pub struct App {
    pub use_cases: UseCases,
    /// `None` leaves ingestion open.
    pub api_key: Option<ApiKey>,
}

/// Container for all use cases.
pub struct UseCases {
    pub retrieval_events: RetrievalEventUseCases,
}

impl App {
    /// Create a new App with all dependencies wired up.
    pub fn new(
        repo: Arc<dyn RetrievalEventRepo>,
        retention_interval: RetentionInterval,
        api_key: Option<ApiKey>,
    ) -> Self {
        let save = Arc::new(SaveRetrievalEvent::new(repo.clone()));
        let delete_old = Arc::new(DeleteOldEvents::new(repo, retention_interval));

        Self {
            use_cases: UseCases {
                retrieval_events: RetrievalEventUseCases::new(save, delete_old),
            },
            api_key,
        }
    }
}
