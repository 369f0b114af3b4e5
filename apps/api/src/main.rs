//! Vestry API composition root.

#![forbid(unsafe_code)]

mod auth;
mod dto;
mod error;
mod handlers;
mod middleware;
mod state;

use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::sync::Arc;

use axum::Router;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderValue, Method};
use axum::middleware::from_fn_with_state;
use axum::routing::{get, post, put};
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;
use url::Url;
use vestry_application::{
    AuthEventService, AuthorizationService, LoginService, RoleCatalog, RolePermissionResolver,
    SecurityAdminService, SessionRepository,
};
use vestry_core::AppError;
use vestry_domain::RoutePermissionMap;
use vestry_infrastructure::{
    Argon2PasswordHasher, PostgresAuditRepository, PostgresAuthEventRepository,
    PostgresPrincipalRepository, PostgresRbacRepository, RedisSessionRepository,
};

use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let migrate_only = env::args().nth(1).as_deref() == Some("migrate");

    let database_url = required_env("DATABASE_URL")?;
    let redis_url = required_env("REDIS_URL")?;
    let frontend_url =
        env::var("FRONTEND_URL").unwrap_or_else(|_| "http://localhost:3000".to_owned());

    Url::parse(&frontend_url)
        .map_err(|error| AppError::Validation(format!("invalid FRONTEND_URL: {error}")))?;

    let api_host = env::var("API_HOST").unwrap_or_else(|_| "127.0.0.1".to_owned());
    let api_port = env::var("API_PORT")
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .unwrap_or(3001);
    let session_ttl_minutes = env::var("SESSION_TTL_MINUTES")
        .ok()
        .and_then(|value| value.parse::<i64>().ok())
        .unwrap_or(480);

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&database_url)
        .await
        .map_err(|error| AppError::Internal(format!("failed to connect to database: {error}")))?;

    sqlx::migrate!("../../crates/infrastructure/migrations")
        .run(&pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to run migrations: {error}")))?;

    if migrate_only {
        info!("database migrations applied successfully");
        return Ok(());
    }

    let redis_client = redis::Client::open(redis_url.as_str())
        .map_err(|error| AppError::Validation(format!("invalid REDIS_URL: {error}")))?;
    let session_repository: Arc<dyn SessionRepository> =
        Arc::new(RedisSessionRepository::new(redis_client, "vestry:session"));

    let rbac_repository = Arc::new(PostgresRbacRepository::new(pool.clone()));
    let role_catalog: Arc<dyn RoleCatalog> = rbac_repository.clone();
    let resolver = RolePermissionResolver::new(role_catalog.clone());
    let authorization_service =
        AuthorizationService::new(RoutePermissionMap::administrative_default());

    let audit_repository = Arc::new(PostgresAuditRepository::new(pool.clone()));
    let security_admin_service = SecurityAdminService::new(
        rbac_repository.clone(),
        role_catalog.clone(),
        audit_repository,
    );

    let auth_event_repository = Arc::new(PostgresAuthEventRepository::new(pool.clone()));
    let auth_event_service = AuthEventService::new(auth_event_repository);

    let principal_repository = Arc::new(PostgresPrincipalRepository::new(pool.clone()));
    let password_hasher = Arc::new(Argon2PasswordHasher::new());
    let login_service = LoginService::new(
        principal_repository,
        password_hasher,
        auth_event_service.clone(),
    );

    let app_state = AppState {
        login_service,
        resolver,
        authorization_service,
        security_admin_service,
        auth_event_service,
        role_catalog,
        session_repository,
        session_ttl: chrono::Duration::minutes(session_ttl_minutes),
    };

    let protected_routes = Router::new()
        .route("/auth/me", get(auth::me_handler))
        .route("/api/navigation", get(handlers::navigation::navigation_handler))
        .route(
            "/api/roles",
            get(handlers::security::list_roles_handler)
                .post(handlers::security::create_role_handler),
        )
        .route(
            "/api/roles/{role_id}/permissions",
            put(handlers::security::set_role_permissions_handler),
        )
        .route(
            "/api/role-permissions/role/{role_id}",
            get(handlers::security::list_role_permissions_handler),
        )
        .route(
            "/api/permissions",
            get(handlers::security::list_permission_catalog_handler),
        )
        .route(
            "/api/security/roles",
            get(handlers::security::list_roles_with_permissions_handler),
        )
        .route(
            "/api/security/role-assignments",
            post(handlers::security::assign_role_handler),
        )
        .route_layer(from_fn_with_state(
            app_state.clone(),
            middleware::require_auth,
        ));

    let cors_layer = CorsLayer::new()
        .allow_origin(
            HeaderValue::from_str(&frontend_url)
                .map_err(|error| AppError::Internal(format!("invalid FRONTEND_URL: {error}")))?,
        )
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION]);

    let app = Router::new()
        .route("/health", get(handlers::health::health_handler))
        .route("/auth/login", post(auth::login_handler))
        .route("/auth/org/login", post(auth::org_login_handler))
        .route("/auth/hq/login", post(auth::hq_login_handler))
        .route("/auth/logout", post(auth::logout_handler))
        .merge(protected_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer)
        .with_state(app_state);

    let host = IpAddr::from_str(&api_host)
        .map_err(|error| AppError::Internal(format!("invalid API_HOST '{api_host}': {error}")))?;
    let address = SocketAddr::from((host, api_port));

    let listener = tokio::net::TcpListener::bind(address)
        .await
        .map_err(|error| AppError::Internal(format!("failed to bind listener: {error}")))?;

    info!(%address, "vestry-api listening");

    axum::serve(listener, app)
        .await
        .map_err(|error| AppError::Internal(format!("api server error: {error}")))
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

fn required_env(name: &str) -> Result<String, AppError> {
    env::var(name).map_err(|_| AppError::Validation(format!("{name} is required")))
}
