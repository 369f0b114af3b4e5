use axum::Json;
use axum::extract::State;
use axum::http::HeaderMap;
use chrono::Utc;
use vestry_application::{
    LoginContext, LoginOutcome, SessionRecord, generate_access_token,
};
use vestry_core::AppError;
use vestry_domain::Principal;

use crate::dto::{LoginRequest, LoginResponse, OrganizationSummaryResponse, PrincipalResponse};
use crate::error::ApiResult;
use crate::state::AppState;

use super::extract_request_context;

/// POST /auth/login - Authenticate a user account.
pub async fn login_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let context = login_context(&headers);
    let outcome = state
        .login_service
        .login_user(&payload.email, &payload.password, context)
        .await?;

    establish_session(&state, outcome).await
}

/// POST /auth/org/login - Authenticate an organization account.
pub async fn org_login_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let context = login_context(&headers);
    let outcome = state
        .login_service
        .login_organization(&payload.email, &payload.password, context)
        .await?;

    establish_session(&state, outcome).await
}

/// POST /auth/hq/login - Authenticate a headquarters account.
pub async fn hq_login_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let context = login_context(&headers);
    let outcome = state
        .login_service
        .login_headquarters(&payload.email, &payload.password, context)
        .await?;

    establish_session(&state, outcome).await
}

fn login_context(headers: &HeaderMap) -> LoginContext {
    let (ip_address, user_agent) = extract_request_context(headers);
    LoginContext {
        ip_address,
        user_agent,
    }
}

/// Resolves the principal's grants, issues a token, and stores the
/// session record. Permission resolution happens before the token leaves
/// the server, so every authenticated request sees a resolved principal.
async fn establish_session(
    state: &AppState,
    outcome: LoginOutcome,
) -> ApiResult<Json<LoginResponse>> {
    let (principal, organization) = match outcome {
        LoginOutcome::Authenticated {
            principal,
            organization,
        } => (principal, organization),
        LoginOutcome::Failed => {
            // Generic message for every failure case.
            return Err(AppError::Unauthorized("invalid email or password".to_owned()).into());
        }
    };

    let principal = resolve_grants(state, principal).await;

    let (access_token, token_hash) = generate_access_token()?;
    let record = SessionRecord {
        principal: principal.clone(),
        organization: organization.clone(),
        expires_at: Utc::now() + state.session_ttl,
    };
    state.session_repository.save(&token_hash, &record).await?;

    Ok(Json(LoginResponse {
        access_token,
        principal: PrincipalResponse::from(&principal),
        organization: organization
            .as_ref()
            .map(OrganizationSummaryResponse::from),
    }))
}

async fn resolve_grants(state: &AppState, principal: Principal) -> Principal {
    match principal.primary_role_name() {
        Some(role_name) => {
            let (role_id, permissions) = state.resolver.resolve_grants(role_name).await;
            principal.with_resolved_permissions(role_id, permissions)
        }
        None => principal,
    }
}
