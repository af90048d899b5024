//! Postgres test harness for E2E testing.
//!
//! Provides testcontainer-based Postgres instance management for integration tests.

use std::time::Duration;

use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use testcontainers::{core::WaitFor, runners::AsyncRunner, ContainerAsync, GenericImage};
use tokio::time::sleep;

use crate::infrastructure::postgres::ensure_schema;

/// Password used for Postgres test containers.
pub const TEST_POSTGRES_PASSWORD: &str = "testpassword";

/// Postgres test harness managing container lifecycle.
pub struct PostgresTestHarness {
    _container: ContainerAsync<GenericImage>,
    pool: PgPool,
}

impl PostgresTestHarness {
    /// Start a new Postgres container, connect, and create the schema.
    ///
    /// # Errors
    ///
    /// Returns an error if the container fails to start or connection cannot be established.
    pub async fn start() -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let container: ContainerAsync<GenericImage> =
            postgres_image(TEST_POSTGRES_PASSWORD).start().await;
        let port = container.get_host_port_ipv4(5432).await;

        let options = PgConnectOptions::new()
            .host("127.0.0.1")
            .port(port)
            .username("postgres")
            .password(TEST_POSTGRES_PASSWORD)
            .database("postgres");
        let pool = connect_with_retry(options).await?;
        ensure_schema(&pool).await?;

        Ok(Self {
            _container: container,
            pool,
        })
    }

    /// Clone the pool for use in other components.
    pub fn pool(&self) -> PgPool {
        self.pool.clone()
    }

    /// Number of stored retrieval events.
    pub async fn count_events(&self) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM retrieval_events")
            .fetch_one(&self.pool)
            .await
    }
}

/// Pinned Postgres image. Readiness is verified by `connect_with_retry`.
pub fn postgres_image(password: &str) -> GenericImage {
    GenericImage::new("postgres", "16-alpine")
        .with_env_var("POSTGRES_PASSWORD", password)
        .with_exposed_port(5432)
        .with_wait_for(WaitFor::seconds(2))
}

/// Connect to Postgres with exponential backoff (500ms doubling, capped at 5s).
pub async fn connect_with_retry(
    options: PgConnectOptions,
) -> Result<PgPool, Box<dyn std::error::Error + Send + Sync>> {
    let max_attempts = 30;
    let max_delay = Duration::from_secs(5);

    let mut delay = Duration::from_millis(500);
    let mut last_err: Option<String> = None;

    for attempt in 1..=max_attempts {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(5))
            .connect_with(options.clone())
            .await;

        match pool {
            Ok(pool) => match sqlx::query("SELECT 1").execute(&pool).await {
                Ok(_) => {
                    tracing::info!(attempt, "Postgres connection established and verified");
                    return Ok(pool);
                }
                Err(e) => last_err = Some(format!("Connection test query failed: {e}")),
            },
            Err(e) => last_err = Some(e.to_string()),
        }

        tracing::debug!(
            attempt,
            delay_ms = delay.as_millis(),
            error = last_err.as_deref().unwrap_or("unknown"),
            "Retrying Postgres connection"
        );

        sleep(delay).await;
        delay = std::cmp::min(delay.saturating_mul(2), max_delay);
    }

    Err(format!(
        "Failed to connect to Postgres after {max_attempts} attempts: {:?}",
        last_err
    )
    .into())
}
