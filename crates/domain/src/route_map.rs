//! Route permission map.
//!
//! A static, versioned table from application route path to the permission
//! names that unlock it, plus an explicit list of public routes. Any route
//! in neither table is denied: access is granted by allow-listing only.
//! The table is maintained by hand alongside new routes; there is no
//! automated consistency check against the permission catalog.

use std::collections::{BTreeMap, BTreeSet};

/// What the map says about one route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteRequirement<'map> {
    /// Intentionally open, even to unauthenticated sessions.
    Public,
    /// Open to principals holding at least one of these permission names.
    AnyOf(&'map [String]),
    /// Not registered; denied for everyone.
    Unmapped,
}

/// Static mapping from route path to required permission names.
#[derive(Debug, Clone, Default)]
pub struct RoutePermissionMap {
    entries: BTreeMap<String, Vec<String>>,
    public_routes: BTreeSet<String>,
}

impl RoutePermissionMap {
    /// Creates an empty map. Useful for tests; production code uses
    /// [`RoutePermissionMap::administrative_default`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a protected route with the permission names that satisfy
    /// it (any one suffices).
    #[must_use]
    pub fn permit<const N: usize>(mut self, route: &str, permission_names: [&str; N]) -> Self {
        self.entries.insert(
            route.to_owned(),
            permission_names.iter().map(|name| (*name).to_owned()).collect(),
        );
        self
    }

    /// Registers an intentionally public route.
    #[must_use]
    pub fn public(mut self, route: &str) -> Self {
        self.public_routes.insert(route.to_owned());
        self
    }

    /// Looks up the requirement for a route.
    #[must_use]
    pub fn requirement(&self, route: &str) -> RouteRequirement<'_> {
        if self.public_routes.contains(route) {
            return RouteRequirement::Public;
        }

        self.entries
            .get(route)
            .map(|names| RouteRequirement::AnyOf(names.as_slice()))
            .unwrap_or(RouteRequirement::Unmapped)
    }

    /// Returns every registered route path, public routes included.
    pub fn routes(&self) -> impl Iterator<Item = &str> {
        self.public_routes
            .iter()
            .map(String::as_str)
            .chain(self.entries.keys().map(String::as_str))
    }

    /// The full administrative route table.
    ///
    /// Maintained by hand; a new page is invisible until registered here.
    #[must_use]
    pub fn administrative_default() -> Self {
        Self::new()
            .public("/login")
            .public("/org/login")
            .public("/hq/login")
            .public("/password/forgot")
            .permit("/dashboard", ["View Dashboard"])
            .permit("/members", ["View Members", "Manage Members"])
            .permit("/members/new", ["Manage Members"])
            .permit("/members/edit", ["Manage Members"])
            .permit("/members/transfers", ["Manage Members"])
            .permit("/donors", ["View Donors", "Manage Donors"])
            .permit("/donors/new", ["Manage Donors"])
            .permit("/donations", ["View Donations", "Record Donations"])
            .permit("/donations/new", ["Record Donations"])
            .permit("/donations/pledges", ["View Donations", "Record Donations"])
            .permit("/finance/dashboard", ["View Finance Dashboard"])
            .permit("/finance/income", ["View Finance Records", "Manage Finance Records"])
            .permit("/finance/expenses", ["View Finance Records", "Manage Finance Records"])
            .permit("/finance/budgets", ["Manage Budgets"])
            .permit("/finance/reports", ["View Finance Reports"])
            .permit("/programs", ["View Programs", "Manage Programs"])
            .permit("/programs/new", ["Manage Programs"])
            .permit("/events", ["View Events", "Manage Events"])
            .permit("/events/new", ["Manage Events"])
            .permit("/events/attendance", ["Record Attendance"])
            .permit("/hr/staff", ["View Staff", "Manage Staff"])
            .permit("/hr/staff/new", ["Manage Staff"])
            .permit("/hr/payroll", ["Manage Payroll"])
            .permit("/hr/leave", ["Manage Staff", "Manage Payroll"])
            .permit("/assets", ["View Assets", "Manage Assets"])
            .permit("/assets/new", ["Manage Assets"])
            .permit("/assets/maintenance", ["Manage Assets"])
            .permit("/governance/board", ["View Governance Records"])
            .permit("/governance/minutes", ["View Governance Records", "Manage Governance Records"])
            .permit("/governance/documents", ["Manage Governance Records"])
            .permit("/reports", ["View Reports"])
            .permit("/settings/users", ["Manage Users"])
            .permit("/settings/roles", ["View Roles", "Manage Roles"])
            .permit("/settings/permissions", ["View Roles"])
            .permit("/settings/organization", ["Manage Organization Profile"])
            .permit("/hq/organizations", ["View Organizations", "Manage Organizations"])
            .permit("/hq/organizations/new", ["Manage Organizations"])
            .permit("/hq/remittances", ["View Remittances", "Manage Remittances"])
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::{RoutePermissionMap, RouteRequirement};

    #[test]
    fn public_route_wins_over_everything() {
        let map = RoutePermissionMap::new()
            .public("/login")
            .permit("/members", ["View Members"]);

        assert_eq!(map.requirement("/login"), RouteRequirement::Public);
    }

    #[test]
    fn unregistered_route_is_unmapped() {
        let map = RoutePermissionMap::administrative_default();
        assert_eq!(
            map.requirement("/some/unmapped/route"),
            RouteRequirement::Unmapped
        );
    }

    #[test]
    fn finance_dashboard_requires_its_permission() {
        let map = RoutePermissionMap::administrative_default();
        match map.requirement("/finance/dashboard") {
            RouteRequirement::AnyOf(names) => {
                assert_eq!(names, ["View Finance Dashboard".to_owned()]);
            }
            other => panic!("unexpected requirement {other:?}"),
        }
    }

    proptest! {
        // Every registered route must answer as either public or guarded;
        // Unmapped is reserved for routes outside the table.
        #[test]
        fn registered_routes_never_answer_unmapped(index in 0usize..256) {
            let map = RoutePermissionMap::administrative_default();
            let routes: Vec<String> = map.routes().map(str::to_owned).collect();
            let route = &routes[index % routes.len()];
            prop_assert_ne!(map.requirement(route), RouteRequirement::Unmapped);
        }
    }
}
