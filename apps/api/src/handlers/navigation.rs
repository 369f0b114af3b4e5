use axum::Json;
use axum::extract::{Extension, State};
use vestry_domain::{Session, default_navigation};

use crate::dto::NavEntryResponse;
use crate::error::ApiResult;
use crate::state::AppState;

/// GET /api/navigation - Menu entries visible to the caller.
pub async fn navigation_handler(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> ApiResult<Json<Vec<NavEntryResponse>>> {
    let entries = state
        .authorization_service
        .visible_entries(&session, &default_navigation())
        .into_iter()
        .map(NavEntryResponse::from)
        .collect();

    Ok(Json(entries))
}
