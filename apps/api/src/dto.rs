//! Request and response types for the REST surface.

mod auth;
mod navigation;
mod security;

pub use auth::{
    LoginRequest, LoginResponse, MeResponse, OrganizationSummaryResponse, PrincipalResponse,
};
pub use navigation::NavEntryResponse;
pub use security::{
    AssignRoleRequest, CreateRoleRequest, PermissionResponse, RolePermissionsResponse,
    RoleResponse, RoleWithPermissionsResponse, SetRolePermissionsRequest,
};
