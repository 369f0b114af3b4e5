//! Role types.

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// Stable integer identifier for a role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RoleId(i64);

impl RoleId {
    /// Creates a role identifier from a raw database value.
    #[must_use]
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    /// Returns the raw identifier value.
    #[must_use]
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl Display for RoleId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// A named bundle of permissions assigned to principals.
///
/// Grants live in the `role_permissions` join; the record itself is just
/// the identity of the bundle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleRecord {
    /// Stable role identifier.
    pub id: RoleId,
    /// Unique role name in tenant scope.
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::{RoleId, RoleRecord};

    #[test]
    fn role_id_displays_raw_value() {
        assert_eq!(RoleId::new(42).to_string(), "42");
    }

    #[test]
    fn role_record_equality_covers_both_fields() {
        let left = RoleRecord {
            id: RoleId::new(1),
            name: "Administrator".to_owned(),
        };
        let right = RoleRecord {
            id: RoleId::new(1),
            name: "Treasurer".to_owned(),
        };
        assert_ne!(left, right);
    }
}
