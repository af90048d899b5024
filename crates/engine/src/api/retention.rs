//! Daily retention run.
//!
//! Deletes aged events once a day at 00:00 UTC. A failed run is logged and
//! the schedule carries on with the next day.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, NaiveTime, Utc};
use tokio::task::JoinHandle;
use tracing::Instrument;

use crate::infrastructure::correlation::CorrelationId;
use crate::use_cases::retrieval_events::DeleteOldEvents;

const ONE_DAY: Duration = Duration::from_secs(24 * 60 * 60);

/// Time left from `now` until the next 00:00 UTC.
pub fn duration_until_next_run(now: DateTime<Utc>) -> Duration {
    now.date_naive()
        .succ_opt()
        .map(|tomorrow| tomorrow.and_time(NaiveTime::MIN).and_utc())
        .and_then(|next_run| (next_run - now).to_std().ok())
        .unwrap_or(ONE_DAY)
}

/// Spawn the retention loop on the current runtime.
pub fn spawn_daily(delete_old: Arc<DeleteOldEvents>) -> JoinHandle<()> {
    tracing::info!(interval = %delete_old.interval(), "Retention job scheduled daily at 00:00 UTC");
    tokio::spawn(async move {
        loop {
            let wait = duration_until_next_run(Utc::now());
            tracing::debug!(seconds = wait.as_secs(), "Next retention run scheduled");
            tokio::time::sleep(wait).await;
            run_once(&delete_old).await;
        }
    })
}

/// Run one retention pass. Failures are logged, never returned.
pub async fn run_once(delete_old: &DeleteOldEvents) {
    let correlation_id = CorrelationId::new();
    async {
        if let Err(e) = delete_old.execute().await {
            tracing::error!(error = %e, "Error while executing delete old events use case");
        }
    }
    .instrument(correlation_id.span("delete_old_events"))
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use event_recorder_domain::RetentionInterval;

    use crate::infrastructure::ports::{MockRetrievalEventRepo, RepoError};

    #[test]
    fn next_run_is_the_coming_midnight() {
        let now = Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap();
        assert_eq!(duration_until_next_run(now), Duration::from_secs(12 * 60 * 60));

        let now = Utc.with_ymd_and_hms(2024, 3, 10, 23, 59, 59).unwrap();
        assert_eq!(duration_until_next_run(now), Duration::from_secs(1));
    }

    #[test]
    fn at_midnight_waits_a_full_day() {
        let now = Utc.with_ymd_and_hms(2024, 3, 10, 0, 0, 0).unwrap();
        assert_eq!(duration_until_next_run(now), ONE_DAY);
    }

    #[test]
    fn crosses_month_and_year_boundaries() {
        let now = Utc.with_ymd_and_hms(2023, 12, 31, 18, 0, 0).unwrap();
        assert_eq!(duration_until_next_run(now), Duration::from_secs(6 * 60 * 60));
    }

    #[tokio::test]
    async fn run_once_deletes_with_configured_interval() {
        let mut repo = MockRetrievalEventRepo::new();
        repo.expect_delete_old_events()
            .withf(|interval| interval.as_str() == "30 days")
            .times(1)
            .returning(|_| Ok(7));

        let delete_old =
            DeleteOldEvents::new(Arc::new(repo), RetentionInterval::new("30 days").unwrap());
        run_once(&delete_old).await;
    }

    #[tokio::test]
    async fn run_once_swallows_store_failures() {
        let mut repo = MockRetrievalEventRepo::new();
        repo.expect_delete_old_events()
            .times(1)
            .returning(|_| Err(RepoError::unavailable("delete_old_events", "pool timed out")));

        let delete_old = DeleteOldEvents::new(Arc::new(repo), RetentionInterval::default());
        run_once(&delete_old).await;
    }
}
