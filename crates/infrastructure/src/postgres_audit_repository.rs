//! Postgres audit log repository.

use async_trait::async_trait;
use vestry_application::{AuditEvent, AuditRepository};
use vestry_core::{AppError, AppResult};

/// Audit repository over a Postgres pool.
#[derive(Clone)]
pub struct PostgresAuditRepository {
    pool: sqlx::PgPool,
}

impl PostgresAuditRepository {
    /// Creates a repository over an existing pool.
    #[must_use]
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuditRepository for PostgresAuditRepository {
    async fn append_event(&self, event: AuditEvent) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO audit_log (tenant_id, subject, action, resource_type, resource_id, detail)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(event.tenant_id.as_uuid())
        .bind(event.subject)
        .bind(event.action.as_str())
        .bind(event.resource_type)
        .bind(event.resource_id)
        .bind(event.detail)
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to append audit event: {error}")))?;

        Ok(())
    }
}
