use axum::extract::{Query, State};
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use std::sync::Arc;

use flint_shared::errors::{AppError, AppResult};
use flint_shared::types::auth::AuthUser;
use flint_shared::types::ApiResponse;

use crate::ranking::RankedCandidate;
use crate::services::{candidate_filter, users};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct DiscoverParams {
    #[serde(default)]
    expand_distance: bool,
}

/// GET /discover?expand_distance=true
pub async fn discover(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    Query(params): Query<DiscoverParams>,
) -> AppResult<Json<ApiResponse<Vec<RankedCandidate>>>> {
    let mut conn = state.db.get().map_err(|e| AppError::internal(e.to_string()))?;

    users::touch_last_active(&mut conn, user.id)?;

    let ranked = candidate_filter::discover(&mut conn, user.id, params.expand_distance, Utc::now())?;

    tracing::debug!(
        viewer_id = %user.id,
        results = ranked.len(),
        expand_distance = params.expand_distance,
        "discovery batch served"
    );

    Ok(Json(ApiResponse::ok(ranked)))
}
