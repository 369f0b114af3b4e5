//! Application services and ports.

#![forbid(unsafe_code)]

mod auth_event_service;
mod authorization_service;
mod login_service;
mod role_permission_resolver;
mod security_admin_service;
mod session_repository;
mod session_service;
mod token_crypto;

pub use auth_event_service::{AuthEvent, AuthEventRepository, AuthEventService};
pub use authorization_service::AuthorizationService;
pub use login_service::{
    LoginContext, LoginOutcome, LoginService, PasswordHasher, PrincipalDirectory,
    TenantAccountRecord, UserAccountRecord,
};
pub use role_permission_resolver::{RoleCatalog, RolePermissionResolver};
pub use security_admin_service::{
    AuditEvent, AuditRepository, CreateRoleInput, RbacAdminRepository, RoleWithPermissions,
    SecurityAdminService,
};
pub use session_repository::{SessionRecord, SessionRepository};
pub use session_service::{SessionService, SessionStorage};
pub use token_crypto::{generate_access_token, hash_access_token};
