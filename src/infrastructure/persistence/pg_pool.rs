use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::{info, warn};

use crate::application::ports::RepositoryError;
use crate::presentation::config::DatabaseSettings;

const INITIAL_RETRY_DELAY: Duration = Duration::from_millis(500);

/// Builds the connection pool, retrying with exponential backoff up to the
/// configured attempt budget.
pub async fn create_pool(url: &str, settings: &DatabaseSettings) -> Result<PgPool, RepositoryError> {
    let mut delay = INITIAL_RETRY_DELAY;

    for attempt in 0..=settings.connect_retries {
        match PgPoolOptions::new()
            .max_connections(settings.max_connections)
            .connect(url)
            .await
        {
            Ok(pool) => {
                info!(attempt, "PostgreSQL connection pool established");
                return Ok(pool);
            }
            Err(e) if attempt < settings.connect_retries => {
                warn!(
                    error = %e,
                    attempt,
                    next_delay_ms = delay.as_millis() as u64,
                    "PostgreSQL connection failed, retrying"
                );
                tokio::time::sleep(delay).await;
                delay *= 2;
            }
            Err(e) => return Err(RepositoryError::ConnectionFailed(e.to_string())),
        }
    }

    Err(RepositoryError::ConnectionFailed(
        "connection attempts exhausted".to_string(),
    ))
}
