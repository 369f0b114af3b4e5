use serde::{Deserialize, Serialize};
use ts_rs::TS;
use vestry_application::RoleWithPermissions;
use vestry_domain::{PermissionRecord, RoleRecord};

/// Role projection.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/role-response.ts"
)]
pub struct RoleResponse {
    pub id: i64,
    pub name: String,
}

impl From<RoleRecord> for RoleResponse {
    fn from(role: RoleRecord) -> Self {
        Self {
            id: role.id.as_i64(),
            name: role.name,
        }
    }
}

/// Permission catalog entry projection.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/permission-response.ts"
)]
pub struct PermissionResponse {
    pub id: i64,
    pub name: String,
    pub path: String,
    pub method: String,
    pub description: String,
}

impl From<&PermissionRecord> for PermissionResponse {
    fn from(permission: &PermissionRecord) -> Self {
        Self {
            id: permission.id.as_i64(),
            name: permission.name.clone(),
            path: permission.path.clone(),
            method: permission.method.as_str().to_owned(),
            description: permission.description.clone(),
        }
    }
}

impl From<PermissionRecord> for PermissionResponse {
    fn from(permission: PermissionRecord) -> Self {
        Self::from(&permission)
    }
}

/// Envelope for the role-permission listing consumed by resolvers.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/role-permissions-response.ts"
)]
pub struct RolePermissionsResponse {
    pub data: Vec<PermissionResponse>,
}

/// Role with its effective grants, for administrative screens.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/role-with-permissions-response.ts"
)]
pub struct RoleWithPermissionsResponse {
    pub id: i64,
    pub name: String,
    pub permissions: Vec<PermissionResponse>,
}

impl From<RoleWithPermissions> for RoleWithPermissionsResponse {
    fn from(value: RoleWithPermissions) -> Self {
        Self {
            id: value.role.id.as_i64(),
            name: value.role.name,
            permissions: value
                .permissions
                .into_iter()
                .map(PermissionResponse::from)
                .collect(),
        }
    }
}

/// Incoming payload for role creation.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/create-role-request.ts"
)]
pub struct CreateRoleRequest {
    pub name: String,
    pub permission_ids: Vec<i64>,
}

/// Incoming payload for replacing a role's grants.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/set-role-permissions-request.ts"
)]
pub struct SetRolePermissionsRequest {
    pub permission_ids: Vec<i64>,
}

/// Incoming payload for assigning a role to a subject.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/assign-role-request.ts"
)]
pub struct AssignRoleRequest {
    pub subject: String,
    pub role_name: String,
}
