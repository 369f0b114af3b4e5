//! Redis-backed session records.
//!
//! One key per issued access token, named `{prefix}:{token_hash}` and
//! expired by Redis TTL so revocation needs no sweeper.

use async_trait::async_trait;
use chrono::Utc;
use redis::AsyncCommands;
use vestry_application::{SessionRecord, SessionRepository};
use vestry_core::{AppError, AppResult};

/// Session repository over a Redis client.
#[derive(Debug, Clone)]
pub struct RedisSessionRepository {
    client: redis::Client,
    key_prefix: String,
}

impl RedisSessionRepository {
    /// Creates a repository with the given key prefix.
    #[must_use]
    pub fn new(client: redis::Client, key_prefix: impl Into<String>) -> Self {
        Self {
            client,
            key_prefix: key_prefix.into(),
        }
    }

    fn key_for(&self, token_hash: &str) -> String {
        format!("{}:{}", self.key_prefix, token_hash)
    }

    async fn connection(&self) -> AppResult<redis::aio::MultiplexedConnection> {
        self.client
            .get_multiplexed_async_connection()
            .await
            .map_err(|error| AppError::Internal(format!("failed to connect to redis: {error}")))
    }
}

#[async_trait]
impl SessionRepository for RedisSessionRepository {
    async fn save(&self, token_hash: &str, record: &SessionRecord) -> AppResult<()> {
        let key = self.key_for(token_hash);
        let ttl_seconds = record.expires_at.timestamp() - Utc::now().timestamp();

        let mut connection = self.connection().await?;

        if ttl_seconds <= 0 {
            connection
                .del::<_, i64>(key)
                .await
                .map_err(|error| {
                    AppError::Internal(format!("failed to delete session record: {error}"))
                })?;
            return Ok(());
        }

        let encoded = serde_json::to_string(record).map_err(|error| {
            AppError::Internal(format!("failed to encode session record: {error}"))
        })?;

        let ttl_seconds = u64::try_from(ttl_seconds)
            .map_err(|error| AppError::Internal(format!("invalid session ttl: {error}")))?;

        connection
            .set_ex::<_, _, ()>(key, encoded, ttl_seconds)
            .await
            .map_err(|error| AppError::Internal(format!("failed to save session record: {error}")))
    }

    async fn find(&self, token_hash: &str) -> AppResult<Option<SessionRecord>> {
        let key = self.key_for(token_hash);
        let mut connection = self.connection().await?;

        let encoded: Option<String> = connection
            .get(key)
            .await
            .map_err(|error| AppError::Internal(format!("failed to load session record: {error}")))?;

        let record = encoded
            .as_deref()
            .map(|value| {
                serde_json::from_str::<SessionRecord>(value).map_err(|error| {
                    AppError::Internal(format!("failed to decode session record: {error}"))
                })
            })
            .transpose()?;

        // Redis TTL already expires keys; the timestamp check covers clock
        // drift between writer and reader.
        Ok(record.filter(|record| record.expires_at > Utc::now()))
    }

    async fn delete(&self, token_hash: &str) -> AppResult<()> {
        let key = self.key_for(token_hash);
        let mut connection = self.connection().await?;

        connection
            .del::<_, i64>(key)
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to delete session record: {error}"))
            })?;

        Ok(())
    }
}
