//! Role and permission administration.
//!
//! Mutations are gated on the acting principal's resolved permission set
//! and every change lands in the audit log.

use std::sync::Arc;

use async_trait::async_trait;
use vestry_core::{AppError, AppResult, TenantId};
use vestry_domain::{
    AuditAction, PermissionId, PermissionRecord, Principal, RoleId, RoleRecord, permission_names,
};

use crate::role_permission_resolver::RoleCatalog;

// ---------------------------------------------------------------------------
// Ports
// ---------------------------------------------------------------------------

/// One audit log entry for a security-relevant mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditEvent {
    /// Tenant the mutation happened in.
    pub tenant_id: TenantId,
    /// Acting subject.
    pub subject: String,
    /// Stable action identifier.
    pub action: AuditAction,
    /// Resource type, e.g. "role".
    pub resource_type: String,
    /// Resource identifier.
    pub resource_id: String,
    /// Free-form detail.
    pub detail: Option<String>,
}

/// Repository port for audit log persistence.
#[async_trait]
pub trait AuditRepository: Send + Sync {
    /// Appends one audit event.
    async fn append_event(&self, event: AuditEvent) -> AppResult<()>;
}

/// A role together with its effective grants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleWithPermissions {
    /// The role record.
    pub role: RoleRecord,
    /// Permissions granted through the role-permission join.
    pub permissions: Vec<PermissionRecord>,
}

/// Input payload for creating roles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateRoleInput {
    /// Unique role name.
    pub name: String,
    /// Catalog ids to grant to the new role.
    pub permission_ids: Vec<PermissionId>,
}

/// Repository port for RBAC administration.
#[async_trait]
pub trait RbacAdminRepository: Send + Sync {
    /// Lists the full permission catalog.
    async fn list_permission_catalog(&self) -> AppResult<Vec<PermissionRecord>>;

    /// Creates a role with an initial grant set.
    async fn create_role(&self, input: CreateRoleInput) -> AppResult<RoleWithPermissions>;

    /// Replaces a role's grant set.
    async fn set_role_permissions(
        &self,
        role_id: RoleId,
        permission_ids: Vec<PermissionId>,
    ) -> AppResult<RoleWithPermissions>;

    /// Assigns a role (by name) to a subject, replacing any previous role.
    async fn assign_role_to_subject(&self, subject: &str, role_name: &str) -> AppResult<()>;
}

// ---------------------------------------------------------------------------
// Service
// ---------------------------------------------------------------------------

/// Application service for role and permission administration.
#[derive(Clone)]
pub struct SecurityAdminService {
    repository: Arc<dyn RbacAdminRepository>,
    catalog: Arc<dyn RoleCatalog>,
    audit_repository: Arc<dyn AuditRepository>,
}

impl SecurityAdminService {
    /// Creates a new security admin service.
    #[must_use]
    pub fn new(
        repository: Arc<dyn RbacAdminRepository>,
        catalog: Arc<dyn RoleCatalog>,
        audit_repository: Arc<dyn AuditRepository>,
    ) -> Self {
        Self {
            repository,
            catalog,
            audit_repository,
        }
    }

    /// Returns the permission catalog for administrative screens.
    pub async fn list_permission_catalog(
        &self,
        actor: &Principal,
    ) -> AppResult<Vec<PermissionRecord>> {
        require_any(
            actor,
            &[permission_names::VIEW_ROLES, permission_names::MANAGE_ROLES],
        )?;
        self.repository.list_permission_catalog().await
    }

    /// Returns every role with its grants, for administrative screens.
    pub async fn list_roles_with_permissions(
        &self,
        actor: &Principal,
    ) -> AppResult<Vec<RoleWithPermissions>> {
        require_any(
            actor,
            &[permission_names::VIEW_ROLES, permission_names::MANAGE_ROLES],
        )?;

        let roles = self.catalog.list_roles().await?;
        let mut result = Vec::with_capacity(roles.len());
        for role in roles {
            let permissions = self.catalog.list_role_permissions(role.id).await?;
            result.push(RoleWithPermissions { role, permissions });
        }

        Ok(result)
    }

    /// Creates a role and emits an audit event.
    pub async fn create_role(
        &self,
        actor: &Principal,
        input: CreateRoleInput,
    ) -> AppResult<RoleWithPermissions> {
        require_any(actor, &[permission_names::MANAGE_ROLES])?;

        if input.name.trim().is_empty() {
            return Err(AppError::Validation("role name must not be empty".to_owned()));
        }

        let created = self.repository.create_role(input).await?;

        self.audit_repository
            .append_event(AuditEvent {
                tenant_id: actor.tenant_id(),
                subject: actor.subject(),
                action: AuditAction::SecurityRoleCreated,
                resource_type: "role".to_owned(),
                resource_id: created.role.id.to_string(),
                detail: Some(format!("created role '{}'", created.role.name)),
            })
            .await?;

        Ok(created)
    }

    /// Replaces a role's grant set and emits an audit event.
    pub async fn set_role_permissions(
        &self,
        actor: &Principal,
        role_id: RoleId,
        permission_ids: Vec<PermissionId>,
    ) -> AppResult<RoleWithPermissions> {
        require_any(actor, &[permission_names::MANAGE_ROLES])?;

        let updated = self
            .repository
            .set_role_permissions(role_id, permission_ids)
            .await?;

        self.audit_repository
            .append_event(AuditEvent {
                tenant_id: actor.tenant_id(),
                subject: actor.subject(),
                action: AuditAction::SecurityRolePermissionsChanged,
                resource_type: "role".to_owned(),
                resource_id: updated.role.id.to_string(),
                detail: Some(format!(
                    "replaced grants of role '{}' ({} permissions)",
                    updated.role.name,
                    updated.permissions.len()
                )),
            })
            .await?;

        Ok(updated)
    }

    /// Assigns a role to a subject and emits an audit event.
    pub async fn assign_role(
        &self,
        actor: &Principal,
        subject: &str,
        role_name: &str,
    ) -> AppResult<()> {
        require_any(actor, &[permission_names::MANAGE_ROLES])?;

        self.repository
            .assign_role_to_subject(subject, role_name)
            .await?;

        self.audit_repository
            .append_event(AuditEvent {
                tenant_id: actor.tenant_id(),
                subject: actor.subject(),
                action: AuditAction::SecurityRoleAssigned,
                resource_type: "subject_role".to_owned(),
                resource_id: format!("{subject}:{role_name}"),
                detail: Some(format!("assigned role '{role_name}' to '{subject}'")),
            })
            .await
    }
}

fn require_any(actor: &Principal, any_of: &[&str]) -> AppResult<()> {
    if any_of.iter().any(|name| actor.has_permission_name(name)) {
        return Ok(());
    }

    Err(AppError::Forbidden(format!(
        "subject '{}' is missing permission '{}'",
        actor.subject(),
        any_of.join("' or '")
    )))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use tokio::sync::Mutex;
    use vestry_core::{AppResult, TenantId};
    use vestry_domain::{
        AuditAction, HttpMethod, PermissionId, PermissionRecord, Principal, RoleId, RoleRecord,
    };

    use crate::role_permission_resolver::RoleCatalog;

    use super::{
        AuditEvent, AuditRepository, CreateRoleInput, RbacAdminRepository, RoleWithPermissions,
        SecurityAdminService,
    };

    #[derive(Default)]
    struct FakeAuditRepository {
        events: Mutex<Vec<AuditEvent>>,
    }

    #[async_trait]
    impl AuditRepository for FakeAuditRepository {
        async fn append_event(&self, event: AuditEvent) -> AppResult<()> {
            self.events.lock().await.push(event);
            Ok(())
        }
    }

    struct FakeRbacAdminRepository;

    #[async_trait]
    impl RbacAdminRepository for FakeRbacAdminRepository {
        async fn list_permission_catalog(&self) -> AppResult<Vec<PermissionRecord>> {
            Ok(Vec::new())
        }

        async fn create_role(&self, input: CreateRoleInput) -> AppResult<RoleWithPermissions> {
            Ok(RoleWithPermissions {
                role: RoleRecord {
                    id: RoleId::new(9),
                    name: input.name,
                },
                permissions: Vec::new(),
            })
        }

        async fn set_role_permissions(
            &self,
            role_id: RoleId,
            permission_ids: Vec<PermissionId>,
        ) -> AppResult<RoleWithPermissions> {
            Ok(RoleWithPermissions {
                role: RoleRecord {
                    id: role_id,
                    name: "Treasurer".to_owned(),
                },
                permissions: permission_ids
                    .into_iter()
                    .map(|id| PermissionRecord {
                        id,
                        name: "View Members".to_owned(),
                        path: "/api/members".to_owned(),
                        method: HttpMethod::Get,
                        description: String::new(),
                    })
                    .collect(),
            })
        }

        async fn assign_role_to_subject(
            &self,
            _subject: &str,
            _role_name: &str,
        ) -> AppResult<()> {
            Ok(())
        }
    }

    struct EmptyRoleCatalog;

    #[async_trait]
    impl RoleCatalog for EmptyRoleCatalog {
        async fn list_roles(&self) -> AppResult<Vec<RoleRecord>> {
            Ok(Vec::new())
        }

        async fn list_role_permissions(
            &self,
            _role_id: RoleId,
        ) -> AppResult<Vec<PermissionRecord>> {
            Ok(Vec::new())
        }
    }

    fn manager_principal() -> Principal {
        Principal::organization(
            TenantId::new(),
            "Hope Chapel",
            "office@hopechapel.org",
            vec!["Administrator".to_owned()],
        )
        .with_resolved_permissions(
            Some(RoleId::new(1)),
            vec![PermissionRecord {
                id: PermissionId::new(1),
                name: "Manage Roles".to_owned(),
                path: "/api/roles".to_owned(),
                method: HttpMethod::Post,
                description: String::new(),
            }],
        )
    }

    fn volunteer_principal() -> Principal {
        Principal::organization(
            TenantId::new(),
            "Hope Chapel",
            "office@hopechapel.org",
            vec!["Volunteer".to_owned()],
        )
    }

    fn service_with_audit() -> (SecurityAdminService, Arc<FakeAuditRepository>) {
        let audit = Arc::new(FakeAuditRepository::default());
        let service = SecurityAdminService::new(
            Arc::new(FakeRbacAdminRepository),
            Arc::new(EmptyRoleCatalog),
            audit.clone(),
        );
        (service, audit)
    }

    #[tokio::test]
    async fn create_role_requires_manage_permission() {
        let (service, _) = service_with_audit();

        let result = service
            .create_role(
                &volunteer_principal(),
                CreateRoleInput {
                    name: "Usher".to_owned(),
                    permission_ids: Vec::new(),
                },
            )
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn create_role_emits_audit_event() {
        let (service, audit) = service_with_audit();

        let result = service
            .create_role(
                &manager_principal(),
                CreateRoleInput {
                    name: "Usher".to_owned(),
                    permission_ids: vec![PermissionId::new(3)],
                },
            )
            .await;
        assert!(result.is_ok());

        let events = audit.events.lock().await;
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].action, AuditAction::SecurityRoleCreated);
    }

    #[tokio::test]
    async fn blank_role_name_is_rejected() {
        let (service, _) = service_with_audit();

        let result = service
            .create_role(
                &manager_principal(),
                CreateRoleInput {
                    name: "   ".to_owned(),
                    permission_ids: Vec::new(),
                },
            )
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn assign_role_emits_audit_event() {
        let (service, audit) = service_with_audit();

        let result = service
            .assign_role(&manager_principal(), "subject-1", "Treasurer")
            .await;
        assert!(result.is_ok());

        let events = audit.events.lock().await;
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].action, AuditAction::SecurityRoleAssigned);
        assert_eq!(events[0].resource_id, "subject-1:Treasurer");
    }
}
