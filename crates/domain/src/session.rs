//! Session state.

use serde::{Deserialize, Serialize};

use crate::principal::{OrganizationSummary, Principal};

/// The authenticated session: token, principal, and organization summary.
///
/// Fully replaced on login, fully cleared on logout. The session service
/// exclusively owns the live copy; everything else sees snapshots.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Opaque bearer token, present while authenticated.
    pub token: Option<String>,
    /// The authenticated principal, present while authenticated.
    pub principal: Option<Principal>,
    /// Summary of the organization the principal operates in.
    pub organization: Option<OrganizationSummary>,
}

impl Session {
    /// Returns the empty, unauthenticated session.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Creates an authenticated session.
    #[must_use]
    pub fn authenticated(
        token: impl Into<String>,
        principal: Principal,
        organization: Option<OrganizationSummary>,
    ) -> Self {
        Self {
            token: Some(token.into()),
            principal: Some(principal),
            organization,
        }
    }

    /// Returns whether a principal is present.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.principal.is_some()
    }
}

#[cfg(test)]
mod tests {
    use vestry_core::TenantId;

    use crate::principal::Principal;

    use super::Session;

    #[test]
    fn empty_session_is_unauthenticated() {
        assert!(!Session::empty().is_authenticated());
    }

    #[test]
    fn authenticated_session_carries_all_three_fields() {
        let principal = Principal::headquarters(
            TenantId::new(),
            "National Office",
            "hq@example.org",
            Vec::new(),
        );
        let session = Session::authenticated("raw-token", principal, None);

        assert!(session.is_authenticated());
        assert_eq!(session.token.as_deref(), Some("raw-token"));
        assert!(session.organization.is_none());
    }
}
