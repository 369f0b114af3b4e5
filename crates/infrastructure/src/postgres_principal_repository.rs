//! Postgres principal directory.
//!
//! Lookups for the three account tables feeding the login flows. Role
//! names come through a LEFT JOIN so accounts without a role still log
//! in (they just end up with no permissions).

use async_trait::async_trait;
use uuid::Uuid;
use vestry_application::{PrincipalDirectory, TenantAccountRecord, UserAccountRecord};
use vestry_core::{AppError, AppResult, TenantId};
use vestry_domain::{Affiliation, OrganizationSummary, UserId};

/// Principal directory over a Postgres pool.
#[derive(Clone)]
pub struct PostgresPrincipalRepository {
    pool: sqlx::PgPool,
}

impl PostgresPrincipalRepository {
    /// Creates a repository over an existing pool.
    #[must_use]
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct UserAccountRow {
    id: Uuid,
    full_name: String,
    email: String,
    password_hash: String,
    org_id: Option<Uuid>,
    hq_id: Option<Uuid>,
    role_name: Option<String>,
    org_name: Option<String>,
    org_email: Option<String>,
}

impl UserAccountRow {
    fn into_record(self) -> AppResult<UserAccountRecord> {
        let (affiliation, organization) = match (self.org_id, self.hq_id) {
            (Some(org_id), _) => {
                let tenant_id = TenantId::from_uuid(org_id);
                let organization = self.org_name.map(|name| OrganizationSummary {
                    tenant_id,
                    name,
                    email: self.org_email,
                });
                (Affiliation::Organization(tenant_id), organization)
            }
            (None, Some(hq_id)) => (Affiliation::Headquarters(TenantId::from_uuid(hq_id)), None),
            (None, None) => {
                return Err(AppError::Internal(format!(
                    "user '{}' has no tenant affiliation",
                    self.id
                )));
            }
        };

        Ok(UserAccountRecord {
            id: UserId::from_uuid(self.id),
            full_name: self.full_name,
            email: self.email,
            password_hash: self.password_hash,
            affiliation,
            roles: self.role_name.into_iter().collect(),
            organization,
        })
    }
}

#[derive(sqlx::FromRow)]
struct TenantAccountRow {
    id: Uuid,
    name: String,
    email: String,
    password_hash: String,
    role_name: Option<String>,
}

impl From<TenantAccountRow> for TenantAccountRecord {
    fn from(row: TenantAccountRow) -> Self {
        Self {
            tenant_id: TenantId::from_uuid(row.id),
            name: row.name,
            email: row.email,
            password_hash: row.password_hash,
            roles: row.role_name.into_iter().collect(),
        }
    }
}

#[async_trait]
impl PrincipalDirectory for PostgresPrincipalRepository {
    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<UserAccountRecord>> {
        let row = sqlx::query_as::<_, UserAccountRow>(
            r#"
            SELECT
                users.id,
                users.full_name,
                users.email,
                users.password_hash,
                users.org_id,
                users.hq_id,
                roles.name AS role_name,
                organizations.name AS org_name,
                organizations.email AS org_email
            FROM users
            LEFT JOIN roles
                ON roles.id = users.role_id
            LEFT JOIN organizations
                ON organizations.id = users.org_id
            WHERE LOWER(users.email) = LOWER($1)
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to look up user: {error}")))?;

        row.map(UserAccountRow::into_record).transpose()
    }

    async fn find_organization_by_email(
        &self,
        email: &str,
    ) -> AppResult<Option<TenantAccountRecord>> {
        let row = sqlx::query_as::<_, TenantAccountRow>(
            r#"
            SELECT
                organizations.id,
                organizations.name,
                organizations.email,
                organizations.password_hash,
                roles.name AS role_name
            FROM organizations
            LEFT JOIN roles
                ON roles.id = organizations.role_id
            WHERE LOWER(organizations.email) = LOWER($1)
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to look up organization: {error}")))?;

        Ok(row.map(TenantAccountRecord::from))
    }

    async fn find_headquarters_by_email(
        &self,
        email: &str,
    ) -> AppResult<Option<TenantAccountRecord>> {
        let row = sqlx::query_as::<_, TenantAccountRow>(
            r#"
            SELECT
                headquarters.id,
                headquarters.name,
                headquarters.email,
                headquarters.password_hash,
                roles.name AS role_name
            FROM headquarters
            LEFT JOIN roles
                ON roles.id = headquarters.role_id
            WHERE LOWER(headquarters.email) = LOWER($1)
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to look up headquarters: {error}")))?;

        Ok(row.map(TenantAccountRecord::from))
    }
}
