//! Permission catalog types.
//!
//! Permissions are immutable reference data seeded by migration. Each
//! record ties a human-readable action label to the API path and method
//! it unlocks; clients only ever read the catalog.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use vestry_core::AppError;

/// Stable integer identifier for a permission catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PermissionId(i64);

impl PermissionId {
    /// Creates a permission identifier from a raw database value.
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

impl Display for PermissionId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// HTTP verb attached to a permission's API path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    /// Read access.
    Get,
    /// Create access.
    Post,
    /// Replace access.
    Put,
    /// Partial update access.
    Patch,
    /// Delete access.
    Delete,
}

impl HttpMethod {
    /// Returns a stable storage value for this method.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

impl FromStr for HttpMethod {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "GET" => Ok(Self::Get),
            "POST" => Ok(Self::Post),
            "PUT" => Ok(Self::Put),
            "PATCH" => Ok(Self::Patch),
            "DELETE" => Ok(Self::Delete),
            _ => Err(AppError::Validation(format!(
                "unknown HTTP method '{value}'"
            ))),
        }
    }
}

/// One entry of the permission catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionRecord {
    /// Stable catalog identifier.
    pub id: PermissionId,
    /// Unique human-readable action label, e.g. "View Finance Dashboard".
    pub name: String,
    /// API route the permission unlocks.
    pub path: String,
    /// HTTP verb paired with the path.
    pub method: HttpMethod,
    /// Free-form description for administrative screens.
    pub description: String,
}

/// Well-known permission names checked by the server itself.
///
/// All other catalog entries are plain data consumed through the route
/// permission map.
pub mod names {
    /// Grants read access to roles and the permission catalog.
    pub const VIEW_ROLES: &str = "View Roles";
    /// Grants role creation, permission assignment, and subject role changes.
    pub const MANAGE_ROLES: &str = "Manage Roles";
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::HttpMethod;

    #[test]
    fn method_roundtrip_storage_value() {
        let method = HttpMethod::Patch;
        let restored = HttpMethod::from_str(method.as_str());
        assert!(restored.is_ok());
        assert_eq!(restored.unwrap_or(HttpMethod::Get), method);
    }

    #[test]
    fn unknown_method_is_rejected() {
        assert!(HttpMethod::from_str("FETCH").is_err());
    }
}
