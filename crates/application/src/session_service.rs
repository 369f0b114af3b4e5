//! Session lifecycle.
//!
//! The session service is an explicit, injectable owner of the current
//! session. `login` persists the session and then resolves the
//! principal's permission set before its future resolves, so a caller
//! that has awaited `login` can rely on `has_permission` immediately.
//! `restore` repopulates from durable storage without re-resolving:
//! persisted permissions may be stale until the next login if grants
//! changed server-side in the meantime.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use vestry_core::AppResult;
use vestry_domain::{OrganizationSummary, Principal, Session};

use crate::role_permission_resolver::RolePermissionResolver;

/// Durable storage port for the persisted session.
///
/// Holds the three persisted fields (token, principal, organization) as
/// one record; `clear` removes all of them.
#[async_trait]
pub trait SessionStorage: Send + Sync {
    /// Persists the session, replacing any previous record.
    async fn save(&self, session: &Session) -> AppResult<()>;

    /// Loads the persisted session, if any.
    async fn load(&self) -> AppResult<Option<Session>>;

    /// Removes the persisted session. Must be idempotent.
    async fn clear(&self) -> AppResult<()>;
}

/// Owner of the current session.
#[derive(Clone)]
pub struct SessionService {
    storage: Arc<dyn SessionStorage>,
    resolver: RolePermissionResolver,
    current: Arc<RwLock<Session>>,
}

impl SessionService {
    /// Creates a session service starting from the empty session.
    #[must_use]
    pub fn new(storage: Arc<dyn SessionStorage>, resolver: RolePermissionResolver) -> Self {
        Self {
            storage,
            resolver,
            current: Arc::new(RwLock::new(Session::empty())),
        }
    }

    /// Repopulates the in-memory session from durable storage.
    ///
    /// Called once at process start. Permissions are taken as persisted;
    /// no re-resolution happens here.
    pub async fn restore(&self) -> AppResult<Session> {
        let persisted = self.storage.load().await?.unwrap_or_default();
        *self.current.write().await = persisted.clone();
        Ok(persisted)
    }

    /// Establishes a new session and resolves its permission set.
    ///
    /// The session replaces the previous one in memory and storage first,
    /// then the principal's primary role is resolved and the grants are
    /// merged in. The returned future resolves only after the merge, so
    /// there is no window where a caller awaiting `login` observes an
    /// unresolved principal. If a second login or a logout lands while
    /// resolution is in flight, the newer state wins and the stale
    /// resolution result is discarded.
    pub async fn login(
        &self,
        token: impl Into<String>,
        principal: Principal,
        organization: Option<OrganizationSummary>,
    ) -> AppResult<Session> {
        let token = token.into();
        let session = Session::authenticated(token.clone(), principal.clone(), organization);

        *self.current.write().await = session.clone();
        self.storage.save(&session).await?;

        let resolved = match principal.primary_role_name() {
            Some(role_name) => {
                let (role_id, permissions) = self.resolver.resolve_grants(role_name).await;
                principal.with_resolved_permissions(role_id, permissions)
            }
            None => principal,
        };

        let merged = {
            let mut current = self.current.write().await;
            if current.token.as_deref() == Some(token.as_str()) {
                current.principal = Some(resolved);
                Some(current.clone())
            } else {
                // A newer login or a logout replaced this session while
                // resolution was in flight.
                None
            }
        };

        match merged {
            Some(session) => {
                self.storage.save(&session).await?;
                Ok(session)
            }
            None => Ok(self.current.read().await.clone()),
        }
    }

    /// Clears the session in memory and storage. Idempotent; safe to call
    /// from any state.
    pub async fn logout(&self) -> AppResult<()> {
        *self.current.write().await = Session::empty();
        self.storage.clear().await
    }

    /// Returns a snapshot of the current session.
    pub async fn current(&self) -> Session {
        self.current.read().await.clone()
    }
}
