use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use chrono::Utc;

use flint_shared::errors::{AppError, AppResult};
use flint_shared::types::auth::AuthUser;
use flint_shared::types::ApiResponse;

use crate::services::liked_me::{self, LikedMeSummary};
use crate::services::users;
use crate::AppState;

/// GET /likes/received - who liked me, premium sees identities
pub async fn received_likes(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
) -> AppResult<Json<ApiResponse<LikedMeSummary>>> {
    let mut conn = state.db.get().map_err(|e| AppError::internal(e.to_string()))?;
    let now = Utc::now();

    users::touch_last_active(&mut conn, user.id)?;
    let me = users::fetch_user(&mut conn, user.id)?;

    let summary = liked_me::pending_likes(&mut conn, &me, now)?;

    Ok(Json(ApiResponse::ok(summary)))
}
