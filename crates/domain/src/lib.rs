//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod audit;
mod navigation;
mod permission;
mod principal;
mod role;
mod route_map;
mod session;

pub use audit::AuditAction;
pub use navigation::{NavAccess, NavEntry, default_navigation};
pub use permission::{HttpMethod, PermissionId, PermissionRecord, names as permission_names};
pub use principal::{Affiliation, OrganizationSummary, Principal, UserId};
pub use role::{RoleId, RoleRecord};
pub use route_map::{RoutePermissionMap, RouteRequirement};
pub use session::Session;
