//! Authentication event recording.

use std::sync::Arc;

use async_trait::async_trait;
use vestry_core::AppResult;

/// One authentication-related event for the audit trail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthEvent {
    /// Subject the event concerns, when known.
    pub subject: Option<String>,
    /// Event type, e.g. "login_attempt" or "logout".
    pub event_type: String,
    /// Outcome, e.g. "success" or "invalid_password".
    pub outcome: String,
    /// Client IP address from the request, when available.
    pub ip_address: Option<String>,
    /// User-Agent header from the request, when available.
    pub user_agent: Option<String>,
}

/// Repository port for auth event persistence.
#[async_trait]
pub trait AuthEventRepository: Send + Sync {
    /// Appends one event.
    async fn record(&self, event: AuthEvent) -> AppResult<()>;
}

/// Application service for recording authentication events.
#[derive(Clone)]
pub struct AuthEventService {
    repository: Arc<dyn AuthEventRepository>,
}

impl AuthEventService {
    /// Creates the service from a repository implementation.
    #[must_use]
    pub fn new(repository: Arc<dyn AuthEventRepository>) -> Self {
        Self { repository }
    }

    /// Records one event.
    pub async fn record_event(&self, event: AuthEvent) -> AppResult<()> {
        self.repository.record(event).await
    }
}
