use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use chrono::Utc;

use flint_shared::errors::{AppError, AppResult};
use flint_shared::types::auth::AuthUser;
use flint_shared::types::ApiResponse;

use crate::services::match_service::{self, MatchSummary};
use crate::services::users;
use crate::AppState;

/// GET /matches
pub async fn list_matches(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
) -> AppResult<Json<ApiResponse<Vec<MatchSummary>>>> {
    let mut conn = state.db.get().map_err(|e| AppError::internal(e.to_string()))?;

    users::touch_last_active(&mut conn, user.id)?;

    let matches = match_service::list_matches(&mut conn, user.id, Utc::now())?;

    Ok(Json(ApiResponse::ok(matches)))
}
