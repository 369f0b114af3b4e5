use axum::extract::{Request, State};
use axum::http::header;
use axum::middleware::Next;
use axum::response::Response;
use vestry_application::hash_access_token;
use vestry_core::AppError;
use vestry_domain::Session;

use crate::error::ApiResult;
use crate::state::AppState;

/// Extracts the raw bearer token from the Authorization header.
pub fn bearer_token(request_headers: &axum::http::HeaderMap) -> Option<&str> {
    request_headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> ApiResult<Response> {
    let token = bearer_token(request.headers())
        .map(str::to_owned)
        .ok_or_else(|| AppError::Unauthorized("authentication required".to_owned()))?;

    let record = state
        .session_repository
        .find(&hash_access_token(&token))
        .await?
        .ok_or_else(|| AppError::Unauthorized("session expired or revoked".to_owned()))?;

    let session = Session::authenticated(token, record.principal.clone(), record.organization);

    request.extensions_mut().insert(record.principal);
    request.extensions_mut().insert(session);
    Ok(next.run(request).await)
}
