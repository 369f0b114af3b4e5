use serde::{Deserialize, Serialize};
use ts_rs::TS;
use vestry_domain::{OrganizationSummary, Principal};

use super::security::PermissionResponse;

/// Incoming payload for the three login flows.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/login-request.ts"
)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Principal projection returned to clients.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/principal-response.ts"
)]
pub struct PrincipalResponse {
    pub kind: String,
    pub subject: String,
    pub display_name: String,
    pub email: String,
    pub tenant_id: String,
    pub roles: Vec<String>,
    pub role_id: Option<i64>,
    pub permissions: Vec<PermissionResponse>,
}

impl From<&Principal> for PrincipalResponse {
    fn from(principal: &Principal) -> Self {
        let kind = match principal {
            Principal::User { .. } => "user",
            Principal::Organization { .. } => "organization",
            Principal::Headquarters { .. } => "headquarters",
        };

        Self {
            kind: kind.to_owned(),
            subject: principal.subject(),
            display_name: principal.display_name().to_owned(),
            email: principal.email().to_owned(),
            tenant_id: principal.tenant_id().to_string(),
            roles: principal.role_names().to_vec(),
            role_id: principal.role_id().map(|role_id| role_id.as_i64()),
            permissions: principal
                .permissions()
                .iter()
                .map(PermissionResponse::from)
                .collect(),
        }
    }
}

/// Organization summary projection.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/organization-summary-response.ts"
)]
pub struct OrganizationSummaryResponse {
    pub tenant_id: String,
    pub name: String,
    pub email: Option<String>,
}

impl From<&OrganizationSummary> for OrganizationSummaryResponse {
    fn from(summary: &OrganizationSummary) -> Self {
        Self {
            tenant_id: summary.tenant_id.to_string(),
            name: summary.name.clone(),
            email: summary.email.clone(),
        }
    }
}

/// Successful login response: the access token and the resolved principal.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/login-response.ts"
)]
pub struct LoginResponse {
    pub access_token: String,
    pub principal: PrincipalResponse,
    pub organization: Option<OrganizationSummaryResponse>,
}

/// Current identity response.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/me-response.ts"
)]
pub struct MeResponse {
    pub principal: PrincipalResponse,
    pub organization: Option<OrganizationSummaryResponse>,
    pub accessible_routes: Vec<String>,
}
