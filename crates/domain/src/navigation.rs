//! Navigation entries.

use serde::{Deserialize, Serialize};

/// Visibility requirement for one navigation entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "route", rename_all = "snake_case")]
pub enum NavAccess {
    /// Always visible, regardless of session state (e.g. the logout entry).
    Always,
    /// Visible when the route permission map grants the given route.
    Route(String),
}

/// One link in the navigation menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavEntry {
    /// Menu label.
    pub label: String,
    /// Target route.
    pub href: String,
    /// Visibility requirement.
    pub access: NavAccess,
}

impl NavEntry {
    /// Creates an entry gated by its own target route.
    #[must_use]
    pub fn route(label: impl Into<String>, href: impl Into<String>) -> Self {
        let href = href.into();
        Self {
            label: label.into(),
            access: NavAccess::Route(href.clone()),
            href,
        }
    }

    /// Creates an always-visible entry.
    #[must_use]
    pub fn always(label: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            href: href.into(),
            access: NavAccess::Always,
        }
    }
}

/// The administrative menu, in display order.
///
/// Entries are filtered per session by the authorization service; the
/// list itself is static.
#[must_use]
pub fn default_navigation() -> Vec<NavEntry> {
    vec![
        NavEntry::route("Dashboard", "/dashboard"),
        NavEntry::route("Members", "/members"),
        NavEntry::route("Donors", "/donors"),
        NavEntry::route("Donations", "/donations"),
        NavEntry::route("Finance", "/finance/dashboard"),
        NavEntry::route("Programs", "/programs"),
        NavEntry::route("Events", "/events"),
        NavEntry::route("Staff", "/hr/staff"),
        NavEntry::route("Assets", "/assets"),
        NavEntry::route("Governance", "/governance/minutes"),
        NavEntry::route("Reports", "/reports"),
        NavEntry::route("Organizations", "/hq/organizations"),
        NavEntry::route("Settings", "/settings/roles"),
        NavEntry::always("Logout", "/logout"),
    ]
}

#[cfg(test)]
mod tests {
    use super::{NavAccess, default_navigation};

    #[test]
    fn logout_entry_is_always_visible() {
        let entries = default_navigation();
        let logout = entries.iter().find(|entry| entry.href == "/logout");
        assert_eq!(logout.map(|entry| &entry.access), Some(&NavAccess::Always));
    }

    #[test]
    fn route_entries_gate_on_their_own_href() {
        let entries = default_navigation();
        for entry in entries {
            if let NavAccess::Route(route) = &entry.access {
                assert_eq!(route, &entry.href);
            }
        }
    }
}
