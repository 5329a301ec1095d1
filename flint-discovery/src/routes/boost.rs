use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use chrono::Utc;

use flint_shared::errors::{AppError, AppResult};
use flint_shared::types::auth::AuthUser;
use flint_shared::types::ApiResponse;

use crate::models::Boost;
use crate::services::{boost_service, users};
use crate::AppState;

/// POST /boost
pub async fn activate_boost(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
) -> AppResult<Json<ApiResponse<Boost>>> {
    let mut conn = state.db.get().map_err(|e| AppError::internal(e.to_string()))?;
    let now = Utc::now();

    users::touch_last_active(&mut conn, user.id)?;
    let actor = users::fetch_user(&mut conn, user.id)?;

    let boost = boost_service::activate_boost(
        &mut conn,
        &actor,
        state.config.enforce_boost_cooldown,
        now,
    )?;

    Ok(Json(ApiResponse::ok(boost)))
}
