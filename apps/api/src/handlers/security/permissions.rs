use super::*;

/// GET /api/role-permissions/role/{role_id} - Grants of one role.
///
/// Consumed by the resolver at login; any authenticated principal may
/// read the grants of any role.
pub async fn list_role_permissions_handler(
    State(state): State<AppState>,
    Path(role_id): Path<i64>,
) -> ApiResult<Json<RolePermissionsResponse>> {
    let permissions = state
        .role_catalog
        .list_role_permissions(RoleId::new(role_id))
        .await?
        .into_iter()
        .map(PermissionResponse::from)
        .collect();

    Ok(Json(RolePermissionsResponse { data: permissions }))
}

/// GET /api/permissions - The permission catalog.
pub async fn list_permission_catalog_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<Principal>,
) -> ApiResult<Json<Vec<PermissionResponse>>> {
    let catalog = state
        .security_admin_service
        .list_permission_catalog(&actor)
        .await?
        .into_iter()
        .map(PermissionResponse::from)
        .collect();

    Ok(Json(catalog))
}
