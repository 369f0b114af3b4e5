use super::*;

/// GET /api/roles - Role list consumed by the resolver.
///
/// Any authenticated principal may read this; clients resolve their own
/// role id from it at login.
pub async fn list_roles_handler(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<RoleResponse>>> {
    let roles = state
        .role_catalog
        .list_roles()
        .await?
        .into_iter()
        .map(RoleResponse::from)
        .collect();

    Ok(Json(roles))
}

/// GET /api/security/roles - Roles with grants for administrative screens.
pub async fn list_roles_with_permissions_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<Principal>,
) -> ApiResult<Json<Vec<RoleWithPermissionsResponse>>> {
    let roles = state
        .security_admin_service
        .list_roles_with_permissions(&actor)
        .await?
        .into_iter()
        .map(RoleWithPermissionsResponse::from)
        .collect();

    Ok(Json(roles))
}

/// POST /api/roles - Create a role with an initial grant set.
pub async fn create_role_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<Principal>,
    Json(payload): Json<CreateRoleRequest>,
) -> ApiResult<(StatusCode, Json<RoleWithPermissionsResponse>)> {
    let role = state
        .security_admin_service
        .create_role(
            &actor,
            vestry_application::CreateRoleInput {
                name: payload.name,
                permission_ids: payload
                    .permission_ids
                    .into_iter()
                    .map(PermissionId::new)
                    .collect(),
            },
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(RoleWithPermissionsResponse::from(role)),
    ))
}

/// PUT /api/roles/{role_id}/permissions - Replace a role's grants.
pub async fn set_role_permissions_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<Principal>,
    Path(role_id): Path<i64>,
    Json(payload): Json<SetRolePermissionsRequest>,
) -> ApiResult<Json<RoleWithPermissionsResponse>> {
    let role = state
        .security_admin_service
        .set_role_permissions(
            &actor,
            RoleId::new(role_id),
            payload
                .permission_ids
                .into_iter()
                .map(PermissionId::new)
                .collect(),
        )
        .await?;

    Ok(Json(RoleWithPermissionsResponse::from(role)))
}

/// POST /api/security/role-assignments - Assign a role to a subject.
pub async fn assign_role_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<Principal>,
    Json(payload): Json<AssignRoleRequest>,
) -> ApiResult<StatusCode> {
    state
        .security_admin_service
        .assign_role(&actor, payload.subject.as_str(), payload.role_name.as_str())
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
