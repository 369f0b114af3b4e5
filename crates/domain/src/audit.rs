//! Audit actions emitted by application use-cases.

use serde::{Deserialize, Serialize};

/// Stable audit actions recorded for security-relevant mutations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    /// Emitted when a role is created.
    SecurityRoleCreated,
    /// Emitted when a role's permission grants are replaced.
    SecurityRolePermissionsChanged,
    /// Emitted when a role is assigned to a subject.
    SecurityRoleAssigned,
}

impl AuditAction {
    /// Returns a stable storage value for this action.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SecurityRoleCreated => "security.role.created",
            Self::SecurityRolePermissionsChanged => "security.role.permissions_changed",
            Self::SecurityRoleAssigned => "security.role.assigned",
        }
    }
}
