use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::Serialize;
use uuid::Uuid;

use flint_shared::errors::{AppError, AppResult, ErrorCode};

use crate::models::{Swipe, User};
use crate::schema::{matches, swipes};
use crate::services::swipe_service::canonical_pair;

#[derive(Debug, Serialize)]
pub struct RewoundSwipe {
    pub target_id: Uuid,
    pub decision: String,
}

/// Undo the actor's most recent swipe and any match it produced.
///
/// This is the one place a Match is hard-deleted rather than deactivated:
/// the match should never have existed. Notifications already delivered for
/// it are not retracted.
pub fn rewind(conn: &mut PgConnection, actor: &User, now: DateTime<Utc>) -> AppResult<RewoundSwipe> {
    if !actor.is_premium_at(now) {
        return Err(AppError::new(
            ErrorCode::PremiumRequired,
            "rewind requires a premium subscription",
        ));
    }

    let last_swipe: Swipe = swipes::table
        .filter(swipes::actor_id.eq(actor.id))
        .order(swipes::created_at.desc())
        .first(conn)
        .optional()?
        .ok_or_else(|| AppError::new(ErrorCode::NoSwipeToRewind, "no swipe to rewind"))?;

    conn.transaction::<_, AppError, _>(|conn| {
        diesel::delete(swipes::table.find(last_swipe.id)).execute(conn)?;

        let (user_a_id, user_b_id) = canonical_pair(actor.id, last_swipe.target_id);
        let deleted = diesel::delete(
            matches::table
                .filter(matches::user_a_id.eq(user_a_id))
                .filter(matches::user_b_id.eq(user_b_id)),
        )
        .execute(conn)?;

        if deleted > 0 {
            tracing::info!(
                actor_id = %actor.id,
                target_id = %last_swipe.target_id,
                "rewind removed a match"
            );
        }

        Ok(())
    })?;

    Ok(RewoundSwipe {
        target_id: last_swipe.target_id,
        decision: last_swipe.decision,
    })
}
