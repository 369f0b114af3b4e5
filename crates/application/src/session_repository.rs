//! Server-side session records.
//!
//! The server keeps one record per issued access token, keyed by the
//! token's SHA-256 hash. The record carries the principal exactly as it
//! was resolved at login; grants changed afterwards take effect at the
//! next login.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use vestry_core::AppResult;
use vestry_domain::{OrganizationSummary, Principal};

/// Session state stored under a token hash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    /// The principal resolved at login, permissions included.
    pub principal: Principal,
    /// Organization summary captured at login.
    pub organization: Option<OrganizationSummary>,
    /// Hard expiry; `find` never returns records past this instant.
    pub expires_at: DateTime<Utc>,
}

/// Repository port for token-keyed session records.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Stores a record under a token hash, replacing any previous one.
    async fn save(&self, token_hash: &str, record: &SessionRecord) -> AppResult<()>;

    /// Loads the record for a token hash, `None` when absent or expired.
    async fn find(&self, token_hash: &str) -> AppResult<Option<SessionRecord>>;

    /// Deletes the record for a token hash. Must be idempotent.
    async fn delete(&self, token_hash: &str) -> AppResult<()>;
}
