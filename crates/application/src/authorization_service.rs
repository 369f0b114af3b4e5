//! Route authorization.
//!
//! Decisions are pure with respect to the session snapshot passed in:
//! the service holds only the static route permission map.

use std::sync::Arc;

use vestry_domain::{NavAccess, NavEntry, RoutePermissionMap, RouteRequirement, Session};

/// Authorization predicate over the route permission map.
#[derive(Clone)]
pub struct AuthorizationService {
    route_map: Arc<RoutePermissionMap>,
}

impl AuthorizationService {
    /// Creates the service over a route permission map.
    #[must_use]
    pub fn new(route_map: RoutePermissionMap) -> Self {
        Self {
            route_map: Arc::new(route_map),
        }
    }

    /// Decides whether the session may access a route.
    ///
    /// Public routes are open to everyone, including unauthenticated
    /// sessions. Every other route requires a principal holding at least
    /// one of the mapped permission names (logical OR); routes missing
    /// from the map are denied outright.
    #[must_use]
    pub fn has_permission(&self, session: &Session, route: &str) -> bool {
        match self.route_map.requirement(route) {
            RouteRequirement::Public => true,
            RouteRequirement::Unmapped => false,
            RouteRequirement::AnyOf(names) => session
                .principal
                .as_ref()
                .map(|principal| {
                    names
                        .iter()
                        .any(|name| principal.has_permission_name(name))
                })
                .unwrap_or(false),
        }
    }

    /// Returns every registered route the session may access.
    #[must_use]
    pub fn accessible_routes(&self, session: &Session) -> Vec<String> {
        self.route_map
            .routes()
            .filter(|route| self.has_permission(session, route))
            .map(str::to_owned)
            .collect()
    }

    /// Filters navigation entries down to the visible sublist.
    ///
    /// `Always` entries bypass the predicate; route-gated entries are kept
    /// when their route passes.
    #[must_use]
    pub fn visible_entries(&self, session: &Session, entries: &[NavEntry]) -> Vec<NavEntry> {
        entries
            .iter()
            .filter(|entry| match &entry.access {
                NavAccess::Always => true,
                NavAccess::Route(route) => self.has_permission(session, route),
            })
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use vestry_core::TenantId;
    use vestry_domain::{
        Affiliation, HttpMethod, NavAccess, NavEntry, PermissionId, PermissionRecord, Principal,
        RoleId, RoutePermissionMap, Session, UserId, default_navigation,
    };

    use super::AuthorizationService;

    fn permission(id: i64, name: &str) -> PermissionRecord {
        PermissionRecord {
            id: PermissionId::new(id),
            name: name.to_owned(),
            path: "/api/records".to_owned(),
            method: HttpMethod::Get,
            description: String::new(),
        }
    }

    fn session_with_permissions(names: &[&str]) -> Session {
        let principal = Principal::user(
            UserId::new(),
            "Grace Obi",
            "grace@example.org",
            Affiliation::Organization(TenantId::new()),
            vec!["Administrator".to_owned()],
        )
        .with_resolved_permissions(
            Some(RoleId::new(1)),
            names
                .iter()
                .enumerate()
                .map(|(index, name)| permission(index as i64 + 1, name))
                .collect(),
        );

        Session::authenticated("token", principal, None)
    }

    fn service() -> AuthorizationService {
        AuthorizationService::new(
            RoutePermissionMap::new()
                .public("/login")
                .permit("/members", ["View Members", "Manage Members"])
                .permit("/finance/dashboard", ["View Finance Dashboard"]),
        )
    }

    #[test]
    fn any_one_of_the_mapped_names_suffices() {
        let service = service();

        for granted in [
            &["View Members"][..],
            &["Manage Members"][..],
            &["View Members", "Manage Members"][..],
        ] {
            let session = session_with_permissions(granted);
            assert!(service.has_permission(&session, "/members"));
        }

        let neither = session_with_permissions(&["View Donors"]);
        assert!(!service.has_permission(&neither, "/members"));
    }

    #[test]
    fn unmapped_routes_are_denied_even_when_authenticated() {
        let service = service();
        let session = session_with_permissions(&["View Members"]);

        assert!(!service.has_permission(&session, "/some/unmapped/route"));
        assert!(!service.has_permission(&Session::empty(), "/some/unmapped/route"));
    }

    #[test]
    fn public_routes_are_open_to_unauthenticated_sessions() {
        let service = service();
        assert!(service.has_permission(&Session::empty(), "/login"));
    }

    #[test]
    fn finance_dashboard_scenario() {
        let service = service();

        let administrator = session_with_permissions(&["View Finance Dashboard"]);
        assert!(service.has_permission(&administrator, "/finance/dashboard"));

        let volunteer = session_with_permissions(&[]);
        assert!(!service.has_permission(&volunteer, "/finance/dashboard"));
    }

    #[test]
    fn logged_out_session_is_denied_everything_mapped() {
        let service = service();
        let session = Session::empty();

        assert!(!service.has_permission(&session, "/members"));
        assert!(!service.has_permission(&session, "/finance/dashboard"));
    }

    #[test]
    fn navigation_filter_keeps_always_entries() {
        let service = AuthorizationService::new(RoutePermissionMap::administrative_default());
        let session = session_with_permissions(&["View Members"]);

        let visible = service.visible_entries(&session, &default_navigation());

        assert!(visible.iter().any(|entry| entry.href == "/logout"));
        assert!(visible.iter().any(|entry| entry.href == "/members"));
        assert!(
            !visible
                .iter()
                .any(|entry| entry.href == "/finance/dashboard")
        );
    }

    #[test]
    fn navigation_filter_hides_route_entries_for_empty_sessions() {
        let service = AuthorizationService::new(RoutePermissionMap::administrative_default());
        let visible = service.visible_entries(&Session::empty(), &default_navigation());

        let gated = visible
            .iter()
            .filter(|entry| matches!(entry.access, NavAccess::Route(_)))
            .count();
        assert_eq!(gated, 0);
        assert!(visible.iter().any(|entry| entry.href == "/logout"));
    }

    #[test]
    fn accessible_routes_include_public_routes() {
        let service = service();
        let routes = service.accessible_routes(&Session::empty());
        assert_eq!(routes, vec!["/login".to_owned()]);
    }

    #[test]
    fn custom_entries_filter_by_their_route() {
        let service = service();
        let session = session_with_permissions(&["View Finance Dashboard"]);

        let entries = vec![
            NavEntry::route("Finance", "/finance/dashboard"),
            NavEntry::route("Members", "/members"),
            NavEntry::always("Logout", "/logout"),
        ];
        let visible = service.visible_entries(&session, &entries);

        let labels: Vec<&str> = visible.iter().map(|entry| entry.label.as_str()).collect();
        assert_eq!(labels, ["Finance", "Logout"]);
    }
}
