use std::str::FromStr;

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde_json::json;
use uuid::Uuid;

use flint_shared::errors::{AppError, AppResult, ErrorCode};

use crate::models::{Match, NewMatch, NewSwipe, Swipe, SwipeDecision, User};
use crate::schema::{matches, swipes, users};
use crate::services::quota;

#[derive(Debug)]
pub struct SwipeOutcome {
    pub matched: bool,
    /// Present only when this swipe created the match; pre-existing matches
    /// stay None so match notifications fire exactly once.
    pub new_match: Option<Match>,
}

/// Canonical two-user key: the smaller id always sits in the first slot, so
/// an unordered pair has exactly one representation. Uuid ordering is a
/// deterministic comparator, not arithmetic.
pub fn canonical_pair(a: Uuid, b: Uuid) -> (Uuid, Uuid) {
    if a < b { (a, b) } else { (b, a) }
}

/// Record an actor's decision on a target and detect a reciprocal match.
///
/// The swipe upsert, reciprocity check, and match upsert run inside one
/// transaction; the unique index on the canonical match pair makes racing
/// reciprocal swipes converge on a single Match row.
pub fn record_swipe(
    conn: &mut PgConnection,
    actor: &User,
    target_id: Uuid,
    decision: SwipeDecision,
    now: DateTime<Utc>,
) -> AppResult<SwipeOutcome> {
    if actor.id == target_id {
        return Err(AppError::new(ErrorCode::SelfSwipe, "cannot swipe on yourself"));
    }

    let target_exists: bool = diesel::select(diesel::dsl::exists(
        users::table.filter(users::id.eq(target_id)),
    ))
    .get_result(conn)?;
    if !target_exists {
        return Err(AppError::new(ErrorCode::TargetNotFound, "target user not found"));
    }

    // PASS is never rate-limited.
    if decision.is_positive() {
        let allowance = quota::daily_allowance(conn, actor, now)?;
        if !allowance.allowed {
            return Err(AppError::with_details(
                ErrorCode::SwipeQuotaExceeded,
                "daily like limit reached",
                json!({ "remaining": 0, "limit": allowance.limit }),
            ));
        }
    }

    conn.transaction::<_, AppError, _>(|conn| {
        let new_swipe = NewSwipe {
            actor_id: actor.id,
            target_id,
            decision: decision.to_string(),
        };

        // One swipe per (actor, target): a repeat decision overwrites.
        diesel::insert_into(swipes::table)
            .values(&new_swipe)
            .on_conflict((swipes::actor_id, swipes::target_id))
            .do_update()
            .set(swipes::decision.eq(decision.to_string()))
            .execute(conn)?;

        if !decision.is_positive() {
            return Ok(SwipeOutcome { matched: false, new_match: None });
        }

        let reciprocal: Option<Swipe> = swipes::table
            .filter(swipes::actor_id.eq(target_id))
            .filter(swipes::target_id.eq(actor.id))
            .first(conn)
            .optional()?;

        let reciprocated = reciprocal
            .map(|s| {
                SwipeDecision::from_str(&s.decision)
                    .map(|d| d.is_positive())
                    .unwrap_or(false)
            })
            .unwrap_or(false);

        if !reciprocated {
            return Ok(SwipeOutcome { matched: false, new_match: None });
        }

        let (user_a_id, user_b_id) = canonical_pair(actor.id, target_id);
        let new_match: Option<Match> = diesel::insert_into(matches::table)
            .values(&NewMatch { user_a_id, user_b_id })
            .on_conflict((matches::user_a_id, matches::user_b_id))
            .do_nothing()
            .get_result(conn)
            .optional()?;

        if let Some(ref m) = new_match {
            tracing::info!(
                match_id = %m.id,
                user_a = %m.user_a_id,
                user_b = %m.user_b_id,
                "match created"
            );
        }

        Ok(SwipeOutcome { matched: true, new_match })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_pair_is_order_independent() {
        let a = Uuid::from_u128(7);
        let b = Uuid::from_u128(3);
        assert_eq!(canonical_pair(a, b), canonical_pair(b, a));
        assert_eq!(canonical_pair(a, b), (b, a));
    }

    #[test]
    fn canonical_pair_keeps_smaller_id_first() {
        let lo = Uuid::from_u128(1);
        let hi = Uuid::from_u128(u128::MAX);
        assert_eq!(canonical_pair(hi, lo), (lo, hi));
    }
}
