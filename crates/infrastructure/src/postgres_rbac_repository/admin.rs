use uuid::Uuid;
use vestry_application::{CreateRoleInput, RoleWithPermissions};

use super::*;

impl PostgresRbacRepository {
    pub(super) async fn list_permission_catalog_impl(&self) -> AppResult<Vec<PermissionRecord>> {
        let rows = sqlx::query_as::<_, PermissionRow>(
            r#"
            SELECT id, name, path, method, description
            FROM permissions
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to list permission catalog: {error}"))
        })?;

        rows.into_iter().map(permission_from_row).collect()
    }

    pub(super) async fn create_role_impl(
        &self,
        input: CreateRoleInput,
    ) -> AppResult<RoleWithPermissions> {
        let mut transaction =
            self.pool.begin().await.map_err(|error| {
                AppError::Internal(format!("failed to begin transaction: {error}"))
            })?;

        let role_id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO roles (name)
            VALUES ($1)
            RETURNING id
            "#,
        )
        .bind(input.name.trim())
        .fetch_one(&mut *transaction)
        .await
        .map_err(|error| map_role_conflict(error, input.name.as_str()))?;

        for permission_id in &input.permission_ids {
            sqlx::query(
                r#"
                INSERT INTO role_permissions (role_id, permission_id)
                VALUES ($1, $2)
                ON CONFLICT (role_id, permission_id) DO NOTHING
                "#,
            )
            .bind(role_id)
            .bind(permission_id.as_i64())
            .execute(&mut *transaction)
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to persist role grants: {error}"))
            })?;
        }

        transaction.commit().await.map_err(|error| {
            AppError::Internal(format!("failed to commit transaction: {error}"))
        })?;

        let role_id = RoleId::new(role_id);
        Ok(RoleWithPermissions {
            role: RoleRecord {
                id: role_id,
                name: input.name.trim().to_owned(),
            },
            permissions: self.list_role_permissions_impl(role_id).await?,
        })
    }

    pub(super) async fn set_role_permissions_impl(
        &self,
        role_id: RoleId,
        permission_ids: Vec<PermissionId>,
    ) -> AppResult<RoleWithPermissions> {
        let mut transaction =
            self.pool.begin().await.map_err(|error| {
                AppError::Internal(format!("failed to begin transaction: {error}"))
            })?;

        let role_name = sqlx::query_scalar::<_, String>(
            r#"
            SELECT name
            FROM roles
            WHERE id = $1
            "#,
        )
        .bind(role_id.as_i64())
        .fetch_optional(&mut *transaction)
        .await
        .map_err(|error| AppError::Internal(format!("failed to resolve role: {error}")))?
        .ok_or_else(|| AppError::NotFound(format!("role '{role_id}' was not found")))?;

        sqlx::query(
            r#"
            DELETE FROM role_permissions
            WHERE role_id = $1
            "#,
        )
        .bind(role_id.as_i64())
        .execute(&mut *transaction)
        .await
        .map_err(|error| AppError::Internal(format!("failed to clear role grants: {error}")))?;

        for permission_id in &permission_ids {
            sqlx::query(
                r#"
                INSERT INTO role_permissions (role_id, permission_id)
                VALUES ($1, $2)
                ON CONFLICT (role_id, permission_id) DO NOTHING
                "#,
            )
            .bind(role_id.as_i64())
            .bind(permission_id.as_i64())
            .execute(&mut *transaction)
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to persist role grants: {error}"))
            })?;
        }

        transaction.commit().await.map_err(|error| {
            AppError::Internal(format!("failed to commit transaction: {error}"))
        })?;

        Ok(RoleWithPermissions {
            role: RoleRecord {
                id: role_id,
                name: role_name,
            },
            permissions: self.list_role_permissions_impl(role_id).await?,
        })
    }

    pub(super) async fn assign_role_to_subject_impl(
        &self,
        subject: &str,
        role_name: &str,
    ) -> AppResult<()> {
        let subject_id = Uuid::parse_str(subject)
            .map_err(|error| AppError::Validation(format!("invalid subject '{subject}': {error}")))?;

        let role_id = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT id
            FROM roles
            WHERE name = $1
            "#,
        )
        .bind(role_name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to resolve role: {error}")))?
        .ok_or_else(|| AppError::NotFound(format!("role '{role_name}' was not found")))?;

        // The subject may live in any of the three account tables.
        for table in ["users", "organizations", "headquarters"] {
            let updated = sqlx::query(&format!(
                "UPDATE {table} SET role_id = $1 WHERE id = $2"
            ))
            .bind(role_id)
            .bind(subject_id)
            .execute(&self.pool)
            .await
            .map_err(|error| AppError::Internal(format!("failed to assign role: {error}")))?
            .rows_affected();

            if updated > 0 {
                return Ok(());
            }
        }

        Err(AppError::NotFound(format!(
            "subject '{subject}' was not found"
        )))
    }
}
