use axum::Json;
use axum::extract::{Extension, State};
use axum::http::{HeaderMap, StatusCode};
use vestry_application::{AuthEvent, hash_access_token};
use vestry_domain::Session;

use crate::dto::{MeResponse, OrganizationSummaryResponse, PrincipalResponse};
use crate::error::ApiResult;
use crate::middleware::bearer_token;
use crate::state::AppState;

use super::extract_request_context;

/// POST /auth/logout - Revoke the presented access token.
///
/// Idempotent: an absent, expired, or already-revoked token still yields
/// 204 so clients can always clear local state.
pub async fn logout_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<StatusCode> {
    let Some(token) = bearer_token(&headers) else {
        return Ok(StatusCode::NO_CONTENT);
    };

    let token_hash = hash_access_token(token);
    let subject = state
        .session_repository
        .find(&token_hash)
        .await?
        .map(|record| record.principal.subject());

    state.session_repository.delete(&token_hash).await?;

    let (ip_address, user_agent) = extract_request_context(&headers);
    state
        .auth_event_service
        .record_event(AuthEvent {
            subject,
            event_type: "logout".to_owned(),
            outcome: "success".to_owned(),
            ip_address,
            user_agent,
        })
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// GET /auth/me - Current principal and the routes it may access.
pub async fn me_handler(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> ApiResult<Json<MeResponse>> {
    let accessible_routes = state.authorization_service.accessible_routes(&session);

    let principal = session
        .principal
        .as_ref()
        .map(PrincipalResponse::from)
        .ok_or_else(|| {
            vestry_core::AppError::Unauthorized("authentication required".to_owned())
        })?;

    Ok(Json(MeResponse {
        principal,
        organization: session
            .organization
            .as_ref()
            .map(OrganizationSummaryResponse::from),
        accessible_routes,
    }))
}
