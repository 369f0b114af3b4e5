//! Postgres RBAC repository.
//!
//! Backs both the role catalog reads used by the resolver and the
//! administrative mutations on roles and grants.

use std::str::FromStr;

use async_trait::async_trait;
use vestry_application::{CreateRoleInput, RbacAdminRepository, RoleCatalog, RoleWithPermissions};
use vestry_core::{AppError, AppResult};
use vestry_domain::{HttpMethod, PermissionId, PermissionRecord, RoleId, RoleRecord};

mod admin;
mod catalog;

/// RBAC repository over a Postgres pool.
#[derive(Clone)]
pub struct PostgresRbacRepository {
    pool: sqlx::PgPool,
}

impl PostgresRbacRepository {
    /// Creates a repository over an existing pool.
    #[must_use]
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct RoleRow {
    id: i64,
    name: String,
}

impl From<RoleRow> for RoleRecord {
    fn from(row: RoleRow) -> Self {
        Self {
            id: RoleId::new(row.id),
            name: row.name,
        }
    }
}

#[derive(sqlx::FromRow)]
struct PermissionRow {
    id: i64,
    name: String,
    path: String,
    method: String,
    description: String,
}

fn permission_from_row(row: PermissionRow) -> AppResult<PermissionRecord> {
    let method = HttpMethod::from_str(row.method.as_str()).map_err(|error| {
        AppError::Internal(format!(
            "permission '{}' has an invalid method: {error}",
            row.name
        ))
    })?;

    Ok(PermissionRecord {
        id: PermissionId::new(row.id),
        name: row.name,
        path: row.path,
        method,
        description: row.description,
    })
}

fn map_role_conflict(error: sqlx::Error, role_name: &str) -> AppError {
    if let sqlx::Error::Database(database_error) = &error
        && database_error.kind() == sqlx::error::ErrorKind::UniqueViolation
    {
        return AppError::Conflict(format!("role '{role_name}' already exists"));
    }

    AppError::Internal(format!("failed to create role: {error}"))
}

#[async_trait]
impl RoleCatalog for PostgresRbacRepository {
    async fn list_roles(&self) -> AppResult<Vec<RoleRecord>> {
        self.list_roles_impl().await
    }

    async fn list_role_permissions(&self, role_id: RoleId) -> AppResult<Vec<PermissionRecord>> {
        self.list_role_permissions_impl(role_id).await
    }
}

#[async_trait]
impl RbacAdminRepository for PostgresRbacRepository {
    async fn list_permission_catalog(&self) -> AppResult<Vec<PermissionRecord>> {
        self.list_permission_catalog_impl().await
    }

    async fn create_role(&self, input: CreateRoleInput) -> AppResult<RoleWithPermissions> {
        self.create_role_impl(input).await
    }

    async fn set_role_permissions(
        &self,
        role_id: RoleId,
        permission_ids: Vec<PermissionId>,
    ) -> AppResult<RoleWithPermissions> {
        self.set_role_permissions_impl(role_id, permission_ids).await
    }

    async fn assign_role_to_subject(&self, subject: &str, role_name: &str) -> AppResult<()> {
        self.assign_role_to_subject_impl(subject, role_name).await
    }
}
