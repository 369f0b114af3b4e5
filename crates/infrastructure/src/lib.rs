//! Infrastructure adapters.

#![forbid(unsafe_code)]

mod argon2_password_hasher;
mod http_role_catalog;
mod in_memory_session_storage;
mod postgres_audit_repository;
mod postgres_auth_event_repository;
mod postgres_principal_repository;
mod postgres_rbac_repository;
mod redis_session_repository;

pub use argon2_password_hasher::Argon2PasswordHasher;
pub use http_role_catalog::HttpRoleCatalog;
pub use in_memory_session_storage::InMemorySessionStorage;
pub use postgres_audit_repository::PostgresAuditRepository;
pub use postgres_auth_event_repository::PostgresAuthEventRepository;
pub use postgres_principal_repository::PostgresPrincipalRepository;
pub use postgres_rbac_repository::PostgresRbacRepository;
pub use redis_session_repository::RedisSessionRepository;
