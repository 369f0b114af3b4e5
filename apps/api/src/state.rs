use std::sync::Arc;

use vestry_application::{
    AuthEventService, AuthorizationService, LoginService, RoleCatalog, RolePermissionResolver,
    SecurityAdminService, SessionRepository,
};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub login_service: LoginService,
    pub resolver: RolePermissionResolver,
    pub authorization_service: AuthorizationService,
    pub security_admin_service: SecurityAdminService,
    pub auth_event_service: AuthEventService,
    pub role_catalog: Arc<dyn RoleCatalog>,
    pub session_repository: Arc<dyn SessionRepository>,
    pub session_ttl: chrono::Duration,
}
