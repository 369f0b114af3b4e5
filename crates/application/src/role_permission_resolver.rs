//! Role-permission resolution.
//!
//! Resolution is deliberately forgiving: a missing role or a failed
//! catalog read leaves the caller with no permissions instead of an
//! error. The session stays usable, just under-permissioned, and the
//! next login retries from scratch. There is no caching layer; every
//! login re-resolves.

use std::collections::BTreeSet;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;
use vestry_core::AppResult;
use vestry_domain::{PermissionRecord, RoleId, RoleRecord};

/// Port for role and grant lookups.
///
/// The server backs this with the relational store; embedded clients back
/// it with the REST surface over HTTP.
#[async_trait]
pub trait RoleCatalog: Send + Sync {
    /// Lists every role.
    async fn list_roles(&self) -> AppResult<Vec<RoleRecord>>;

    /// Lists the permissions granted to a role through the
    /// role-permission join. May contain duplicates when the join yields
    /// overlapping rows.
    async fn list_role_permissions(&self, role_id: RoleId) -> AppResult<Vec<PermissionRecord>>;
}

/// Resolves a role name to its identifier and permission set.
#[derive(Clone)]
pub struct RolePermissionResolver {
    catalog: Arc<dyn RoleCatalog>,
}

impl RolePermissionResolver {
    /// Creates a resolver over a catalog implementation.
    #[must_use]
    pub fn new(catalog: Arc<dyn RoleCatalog>) -> Self {
        Self { catalog }
    }

    /// Resolves a role name to its identifier by exact match over the
    /// role list. `None` means the role does not exist or the catalog
    /// was unreachable; both are non-fatal.
    pub async fn resolve_role_id(&self, role_name: &str) -> Option<RoleId> {
        let roles = match self.catalog.list_roles().await {
            Ok(roles) => roles,
            Err(error) => {
                warn!(%error, role_name, "role list fetch failed during resolution");
                return None;
            }
        };

        roles
            .into_iter()
            .find(|role| role.name == role_name)
            .map(|role| role.id)
    }

    /// Resolves the permission set granted to a role, deduplicated by
    /// permission id. Transport failures log and yield the empty set.
    pub async fn resolve_permissions(&self, role_id: RoleId) -> Vec<PermissionRecord> {
        let permissions = match self.catalog.list_role_permissions(role_id).await {
            Ok(permissions) => permissions,
            Err(error) => {
                warn!(%error, %role_id, "role permission fetch failed during resolution");
                return Vec::new();
            }
        };

        let mut seen = BTreeSet::new();
        permissions
            .into_iter()
            .filter(|permission| seen.insert(permission.id))
            .collect()
    }

    /// Resolves a role name to `(role_id, permissions)` in one step.
    pub async fn resolve_grants(&self, role_name: &str) -> (Option<RoleId>, Vec<PermissionRecord>) {
        let Some(role_id) = self.resolve_role_id(role_name).await else {
            return (None, Vec::new());
        };

        let permissions = self.resolve_permissions(role_id).await;
        (Some(role_id), permissions)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use vestry_core::{AppError, AppResult};
    use vestry_domain::{HttpMethod, PermissionId, PermissionRecord, RoleId, RoleRecord};

    use super::{RoleCatalog, RolePermissionResolver};

    struct FakeRoleCatalog {
        roles: Vec<RoleRecord>,
        permissions: Vec<PermissionRecord>,
    }

    #[async_trait]
    impl RoleCatalog for FakeRoleCatalog {
        async fn list_roles(&self) -> AppResult<Vec<RoleRecord>> {
            Ok(self.roles.clone())
        }

        async fn list_role_permissions(
            &self,
            _role_id: RoleId,
        ) -> AppResult<Vec<PermissionRecord>> {
            Ok(self.permissions.clone())
        }
    }

    struct FailingRoleCatalog;

    #[async_trait]
    impl RoleCatalog for FailingRoleCatalog {
        async fn list_roles(&self) -> AppResult<Vec<RoleRecord>> {
            Err(AppError::Internal("connection refused".to_owned()))
        }

        async fn list_role_permissions(
            &self,
            _role_id: RoleId,
        ) -> AppResult<Vec<PermissionRecord>> {
            Err(AppError::Internal("connection refused".to_owned()))
        }
    }

    fn permission(id: i64, name: &str) -> PermissionRecord {
        PermissionRecord {
            id: PermissionId::new(id),
            name: name.to_owned(),
            path: "/api/records".to_owned(),
            method: HttpMethod::Get,
            description: String::new(),
        }
    }

    #[tokio::test]
    async fn role_name_resolves_by_exact_match() {
        let resolver = RolePermissionResolver::new(Arc::new(FakeRoleCatalog {
            roles: vec![
                RoleRecord {
                    id: RoleId::new(1),
                    name: "Administrator".to_owned(),
                },
                RoleRecord {
                    id: RoleId::new(2),
                    name: "Treasurer".to_owned(),
                },
            ],
            permissions: Vec::new(),
        }));

        assert_eq!(
            resolver.resolve_role_id("Treasurer").await,
            Some(RoleId::new(2))
        );
        assert_eq!(resolver.resolve_role_id("treasurer").await, None);
    }

    #[tokio::test]
    async fn duplicate_permission_ids_collapse_to_one() {
        let resolver = RolePermissionResolver::new(Arc::new(FakeRoleCatalog {
            roles: Vec::new(),
            permissions: vec![
                permission(7, "View Members"),
                permission(9, "Manage Members"),
                permission(7, "View Members"),
            ],
        }));

        let resolved = resolver.resolve_permissions(RoleId::new(1)).await;
        assert_eq!(resolved.len(), 2);
        assert_eq!(
            resolved
                .iter()
                .filter(|entry| entry.id == PermissionId::new(7))
                .count(),
            1
        );
    }

    #[tokio::test]
    async fn catalog_failure_yields_empty_grants() {
        let resolver = RolePermissionResolver::new(Arc::new(FailingRoleCatalog));

        let (role_id, permissions) = resolver.resolve_grants("Administrator").await;
        assert!(role_id.is_none());
        assert!(permissions.is_empty());
    }
}
