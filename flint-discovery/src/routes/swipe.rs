use std::str::FromStr;
use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use flint_shared::errors::{AppError, AppResult, ErrorCode};
use flint_shared::types::auth::AuthUser;
use flint_shared::types::ApiResponse;

use crate::events::publisher;
use crate::models::SwipeDecision;
use crate::services::quota::SwipeAllowance;
use crate::services::rewind_service::RewoundSwipe;
use crate::services::{quota, rewind_service, swipe_service, users};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct SwipeRequest {
    pub target_id: Uuid,
    pub decision: String,
}

#[derive(Debug, Serialize)]
pub struct SwipeResponse {
    pub matched: bool,
}

/// POST /swipe
pub async fn record_swipe(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    Json(req): Json<SwipeRequest>,
) -> AppResult<Json<ApiResponse<SwipeResponse>>> {
    // Closed decision set; anything else is rejected at the boundary.
    let decision = SwipeDecision::from_str(&req.decision)
        .map_err(|_| AppError::new(ErrorCode::InvalidDecision, format!("invalid decision: {}", req.decision)))?;

    let mut conn = state.db.get().map_err(|e| AppError::internal(e.to_string()))?;
    let now = Utc::now();

    users::touch_last_active(&mut conn, user.id)?;
    let actor = users::fetch_user(&mut conn, user.id)?;

    let outcome = swipe_service::record_swipe(&mut conn, &actor, req.target_id, decision, now)?;

    if decision == SwipeDecision::SuperLike {
        publisher::publish_super_liked(&state.rabbitmq, actor.id, req.target_id).await;
    }

    if let Some(ref m) = outcome.new_match {
        publisher::publish_match_created(&state.rabbitmq, m.id, m.user_a_id, m.user_b_id).await;
    }

    Ok(Json(ApiResponse::ok(SwipeResponse { matched: outcome.matched })))
}

/// POST /swipe/rewind
pub async fn rewind_swipe(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
) -> AppResult<Json<ApiResponse<RewoundSwipe>>> {
    let mut conn = state.db.get().map_err(|e| AppError::internal(e.to_string()))?;
    let now = Utc::now();

    users::touch_last_active(&mut conn, user.id)?;
    let actor = users::fetch_user(&mut conn, user.id)?;

    let rewound = rewind_service::rewind(&mut conn, &actor, now)?;

    Ok(Json(ApiResponse::ok(rewound)))
}

/// GET /swipe/limit - read-only view of the daily allowance
pub async fn swipe_limit(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
) -> AppResult<Json<ApiResponse<SwipeAllowance>>> {
    let mut conn = state.db.get().map_err(|e| AppError::internal(e.to_string()))?;
    let now = Utc::now();

    users::touch_last_active(&mut conn, user.id)?;
    let actor = users::fetch_user(&mut conn, user.id)?;

    let allowance = quota::daily_allowance(&mut conn, &actor, now)?;

    Ok(Json(ApiResponse::ok(allowance)))
}
