use axum::Json;
use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;

use vestry_domain::{PermissionId, Principal, RoleId};

use crate::dto::{
    AssignRoleRequest, CreateRoleRequest, PermissionResponse, RolePermissionsResponse,
    RoleResponse, RoleWithPermissionsResponse, SetRolePermissionsRequest,
};
use crate::error::ApiResult;
use crate::state::AppState;

mod permissions;
mod roles;

pub use permissions::{list_permission_catalog_handler, list_role_permissions_handler};
pub use roles::{
    assign_role_handler, create_role_handler, list_roles_handler,
    list_roles_with_permissions_handler, set_role_permissions_handler,
};
