//! Postgres auth event repository.

use async_trait::async_trait;
use vestry_application::{AuthEvent, AuthEventRepository};
use vestry_core::{AppError, AppResult};

/// Auth event repository over a Postgres pool.
#[derive(Clone)]
pub struct PostgresAuthEventRepository {
    pool: sqlx::PgPool,
}

impl PostgresAuthEventRepository {
    /// Creates a repository over an existing pool.
    #[must_use]
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuthEventRepository for PostgresAuthEventRepository {
    async fn record(&self, event: AuthEvent) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO auth_events (subject, event_type, outcome, ip_address, user_agent)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(event.subject)
        .bind(event.event_type)
        .bind(event.outcome)
        .bind(event.ip_address)
        .bind(event.user_agent)
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to record auth event: {error}")))?;

        Ok(())
    }
}
