//! HTTP role catalog client.
//!
//! Backs the role-permission resolver with the REST surface, for hosts
//! embedding the session core outside the server process. Both calls are
//! bearer-authenticated with the session's own access token.

use async_trait::async_trait;
use serde::Deserialize;
use vestry_application::RoleCatalog;
use vestry_core::{AppError, AppResult};
use vestry_domain::{PermissionRecord, RoleId, RoleRecord};

/// Role catalog over the `/api/roles` and `/api/role-permissions` routes.
#[derive(Debug, Clone)]
pub struct HttpRoleCatalog {
    client: reqwest::Client,
    base_url: String,
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct RolePermissionsResponse {
    data: Vec<PermissionRecord>,
}

impl HttpRoleCatalog {
    /// Creates a catalog client for a server base URL and access token.
    #[must_use]
    pub fn new(
        client: reqwest::Client,
        base_url: impl Into<String>,
        access_token: impl Into<String>,
    ) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }

        Self {
            client,
            base_url,
            access_token: access_token.into(),
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> AppResult<T> {
        let response = self
            .client
            .get(format!("{}{path}", self.base_url))
            .bearer_auth(&self.access_token)
            .send()
            .await
            .map_err(|error| AppError::Internal(format!("request to '{path}' failed: {error}")))?;

        let status = response.status();
        if status.as_u16() == 401 {
            return Err(AppError::Unauthorized(
                "access token was rejected".to_owned(),
            ));
        }
        if !status.is_success() {
            return Err(AppError::Internal(format!(
                "request to '{path}' returned status {status}"
            )));
        }

        response
            .json::<T>()
            .await
            .map_err(|error| AppError::Internal(format!("invalid response from '{path}': {error}")))
    }
}

#[async_trait]
impl RoleCatalog for HttpRoleCatalog {
    async fn list_roles(&self) -> AppResult<Vec<RoleRecord>> {
        self.get_json("/api/roles").await
    }

    async fn list_role_permissions(&self, role_id: RoleId) -> AppResult<Vec<PermissionRecord>> {
        let response: RolePermissionsResponse = self
            .get_json(&format!("/api/role-permissions/role/{role_id}"))
            .await?;
        Ok(response.data)
    }
}
