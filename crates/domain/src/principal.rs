//! Principal types.
//!
//! The authenticated actor is one of three kinds: a user belonging to an
//! organization or headquarters, an organization acting as its own
//! principal, or a headquarters entity. One normalizing constructor per
//! kind replaces the ad hoc field mapping the three login flows would
//! otherwise duplicate.

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use vestry_core::TenantId;

use crate::permission::PermissionRecord;
use crate::role::RoleId;

/// Unique identifier for a user record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(Uuid);

impl UserId {
    /// Creates a new random user identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a user identifier from an existing UUID value.
    #[must_use]
    pub fn from_uuid(value: Uuid) -> Self {
        Self(value)
    }

    /// Returns the underlying UUID value.
    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for UserId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Which tenant a user belongs to, and what kind of tenant it is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "tenant_id", rename_all = "snake_case")]
pub enum Affiliation {
    /// Member of a local organization.
    Organization(TenantId),
    /// Member of a headquarters entity.
    Headquarters(TenantId),
}

impl Affiliation {
    /// Returns the tenant the affiliation points at.
    #[must_use]
    pub fn tenant_id(&self) -> TenantId {
        match self {
            Self::Organization(tenant_id) | Self::Headquarters(tenant_id) => *tenant_id,
        }
    }
}

/// Lightweight organization projection carried in the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizationSummary {
    /// Tenant identifier of the organization.
    pub tenant_id: TenantId,
    /// Display name.
    pub name: String,
    /// Contact email, if one is on file.
    pub email: Option<String>,
}

/// The authenticated actor, represented uniformly in the session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Principal {
    /// An individual user affiliated with an organization or headquarters.
    User {
        /// Stable user identifier.
        id: UserId,
        /// Full display name.
        full_name: String,
        /// Login email.
        email: String,
        /// Tenant affiliation with kind discriminator.
        affiliation: Affiliation,
        /// Role names assigned to the user.
        roles: Vec<String>,
        /// Resolved role identifier, once the resolver has run.
        role_id: Option<RoleId>,
        /// Resolved permission set; empty until resolution completes.
        permissions: Vec<PermissionRecord>,
    },
    /// A local organization acting as its own principal.
    Organization {
        /// Tenant identifier of the organization.
        tenant_id: TenantId,
        /// Organization name.
        name: String,
        /// Login email.
        email: String,
        /// Role names assigned to the organization account.
        roles: Vec<String>,
        /// Resolved role identifier, once the resolver has run.
        role_id: Option<RoleId>,
        /// Resolved permission set; empty until resolution completes.
        permissions: Vec<PermissionRecord>,
    },
    /// A headquarters entity overseeing organizations.
    Headquarters {
        /// Tenant identifier of the headquarters.
        tenant_id: TenantId,
        /// Headquarters name.
        name: String,
        /// Login email.
        email: String,
        /// Role names assigned to the headquarters account.
        roles: Vec<String>,
        /// Resolved role identifier, once the resolver has run.
        role_id: Option<RoleId>,
        /// Resolved permission set; empty until resolution completes.
        permissions: Vec<PermissionRecord>,
    },
}

impl Principal {
    /// Normalizes a user login into a principal. Permissions start empty
    /// and are merged in after role resolution.
    #[must_use]
    pub fn user(
        id: UserId,
        full_name: impl Into<String>,
        email: impl Into<String>,
        affiliation: Affiliation,
        roles: Vec<String>,
    ) -> Self {
        Self::User {
            id,
            full_name: full_name.into(),
            email: email.into(),
            affiliation,
            roles,
            role_id: None,
            permissions: Vec::new(),
        }
    }

    /// Normalizes an organization login into a principal.
    #[must_use]
    pub fn organization(
        tenant_id: TenantId,
        name: impl Into<String>,
        email: impl Into<String>,
        roles: Vec<String>,
    ) -> Self {
        Self::Organization {
            tenant_id,
            name: name.into(),
            email: email.into(),
            roles,
            role_id: None,
            permissions: Vec::new(),
        }
    }

    /// Normalizes a headquarters login into a principal.
    #[must_use]
    pub fn headquarters(
        tenant_id: TenantId,
        name: impl Into<String>,
        email: impl Into<String>,
        roles: Vec<String>,
    ) -> Self {
        Self::Headquarters {
            tenant_id,
            name: name.into(),
            email: email.into(),
            roles,
            role_id: None,
            permissions: Vec::new(),
        }
    }

    /// Returns a stable subject string for audit and storage keys.
    #[must_use]
    pub fn subject(&self) -> String {
        match self {
            Self::User { id, .. } => id.to_string(),
            Self::Organization { tenant_id, .. } | Self::Headquarters { tenant_id, .. } => {
                tenant_id.to_string()
            }
        }
    }

    /// Returns the display name for the principal.
    #[must_use]
    pub fn display_name(&self) -> &str {
        match self {
            Self::User { full_name, .. } => full_name.as_str(),
            Self::Organization { name, .. } | Self::Headquarters { name, .. } => name.as_str(),
        }
    }

    /// Returns the login email.
    #[must_use]
    pub fn email(&self) -> &str {
        match self {
            Self::User { email, .. }
            | Self::Organization { email, .. }
            | Self::Headquarters { email, .. } => email.as_str(),
        }
    }

    /// Returns the tenant the principal operates in.
    #[must_use]
    pub fn tenant_id(&self) -> TenantId {
        match self {
            Self::User { affiliation, .. } => affiliation.tenant_id(),
            Self::Organization { tenant_id, .. } | Self::Headquarters { tenant_id, .. } => {
                *tenant_id
            }
        }
    }

    /// Returns the role names assigned to the principal.
    #[must_use]
    pub fn role_names(&self) -> &[String] {
        match self {
            Self::User { roles, .. }
            | Self::Organization { roles, .. }
            | Self::Headquarters { roles, .. } => roles.as_slice(),
        }
    }

    /// Returns the first assigned role name, the one the resolver uses.
    #[must_use]
    pub fn primary_role_name(&self) -> Option<&str> {
        self.role_names().first().map(String::as_str)
    }

    /// Returns the resolved role identifier, if resolution has run.
    #[must_use]
    pub fn role_id(&self) -> Option<RoleId> {
        match self {
            Self::User { role_id, .. }
            | Self::Organization { role_id, .. }
            | Self::Headquarters { role_id, .. } => *role_id,
        }
    }

    /// Returns the resolved permission set.
    #[must_use]
    pub fn permissions(&self) -> &[PermissionRecord] {
        match self {
            Self::User { permissions, .. }
            | Self::Organization { permissions, .. }
            | Self::Headquarters { permissions, .. } => permissions.as_slice(),
        }
    }

    /// Returns whether the principal holds a permission with this name.
    #[must_use]
    pub fn has_permission_name(&self, name: &str) -> bool {
        self.permissions()
            .iter()
            .any(|permission| permission.name == name)
    }

    /// Merges a resolution result into the principal.
    ///
    /// The permission set must reflect exactly what is reachable from the
    /// role through the role-permission join; there are no per-principal
    /// overrides to preserve.
    #[must_use]
    pub fn with_resolved_permissions(
        mut self,
        resolved_role_id: Option<RoleId>,
        resolved: Vec<PermissionRecord>,
    ) -> Self {
        match &mut self {
            Self::User {
                role_id,
                permissions,
                ..
            }
            | Self::Organization {
                role_id,
                permissions,
                ..
            }
            | Self::Headquarters {
                role_id,
                permissions,
                ..
            } => {
                *role_id = resolved_role_id;
                *permissions = resolved;
            }
        }

        self
    }
}

#[cfg(test)]
mod tests {
    use vestry_core::TenantId;

    use crate::permission::{HttpMethod, PermissionId, PermissionRecord};
    use crate::role::RoleId;

    use super::{Affiliation, Principal, UserId};

    fn sample_permission(id: i64, name: &str) -> PermissionRecord {
        PermissionRecord {
            id: PermissionId::new(id),
            name: name.to_owned(),
            path: "/api/members".to_owned(),
            method: HttpMethod::Get,
            description: String::new(),
        }
    }

    #[test]
    fn user_constructor_starts_with_empty_permissions() {
        let principal = Principal::user(
            UserId::new(),
            "Grace Obi",
            "grace@example.org",
            Affiliation::Organization(TenantId::new()),
            vec!["Administrator".to_owned()],
        );

        assert!(principal.permissions().is_empty());
        assert!(principal.role_id().is_none());
        assert_eq!(principal.primary_role_name(), Some("Administrator"));
    }

    #[test]
    fn resolution_merge_replaces_role_and_permissions() {
        let principal = Principal::organization(
            TenantId::new(),
            "Hope Chapel",
            "office@hopechapel.org",
            vec!["Administrator".to_owned()],
        );

        let merged = principal.with_resolved_permissions(
            Some(RoleId::new(3)),
            vec![sample_permission(7, "View Members")],
        );

        assert_eq!(merged.role_id(), Some(RoleId::new(3)));
        assert!(merged.has_permission_name("View Members"));
        assert!(!merged.has_permission_name("Manage Roles"));
    }

    #[test]
    fn affiliation_yields_its_tenant() {
        let tenant_id = TenantId::new();
        assert_eq!(
            Affiliation::Headquarters(tenant_id).tenant_id(),
            tenant_id
        );
    }
}
