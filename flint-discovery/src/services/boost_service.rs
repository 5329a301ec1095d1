use chrono::{DateTime, Duration, Utc};
use diesel::prelude::*;
use serde_json::json;

use flint_shared::errors::{AppError, AppResult, ErrorCode};

use crate::models::{Boost, NewBoost, User};
use crate::schema::boosts;

pub const BOOST_DURATION_MINS: i32 = 30;
pub const BOOST_COOLDOWN_DAYS: i64 = 30;

/// Rolling-window cooldown check against the most recent boost's start time.
pub fn in_cooldown(last_started: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    now - last_started < Duration::days(BOOST_COOLDOWN_DAYS)
}

/// Grant a 30-minute visibility boost, entitlement- and cooldown-gated.
///
/// Expiry is lazy: nothing deactivates a boost, all reads filter on
/// `expires_at`. With `enforce_cooldown` unset the 30-day window is computed
/// but only logged, which is the shipped product behavior.
pub fn activate_boost(
    conn: &mut PgConnection,
    actor: &User,
    enforce_cooldown: bool,
    now: DateTime<Utc>,
) -> AppResult<Boost> {
    if !actor.is_premium_at(now) {
        return Err(AppError::new(
            ErrorCode::PremiumRequired,
            "boost requires a premium subscription",
        ));
    }

    let active: Option<Boost> = boosts::table
        .filter(boosts::user_id.eq(actor.id))
        .filter(boosts::is_active.eq(true))
        .filter(boosts::expires_at.gt(now))
        .first(conn)
        .optional()?;

    if let Some(active) = active {
        return Err(AppError::with_details(
            ErrorCode::BoostAlreadyActive,
            "a boost is already active",
            json!({ "expires_at": active.expires_at }),
        ));
    }

    let last: Option<Boost> = boosts::table
        .filter(boosts::user_id.eq(actor.id))
        .order(boosts::started_at.desc())
        .first(conn)
        .optional()?;

    if let Some(last) = last {
        if in_cooldown(last.started_at, now) {
            if enforce_cooldown {
                return Err(AppError::with_details(
                    ErrorCode::BoostCooldownActive,
                    "one boost per 30-day window",
                    json!({ "next_available_at": last.started_at + Duration::days(BOOST_COOLDOWN_DAYS) }),
                ));
            }
            tracing::warn!(
                user_id = %actor.id,
                last_started_at = %last.started_at,
                "boost cooldown window active, advisory only"
            );
        }
    }

    let boost = diesel::insert_into(boosts::table)
        .values(&NewBoost {
            user_id: actor.id,
            duration_mins: BOOST_DURATION_MINS,
            expires_at: now + Duration::minutes(BOOST_DURATION_MINS as i64),
        })
        .get_result::<Boost>(conn)?;

    tracing::info!(
        user_id = %actor.id,
        boost_id = %boost.id,
        expires_at = %boost.expires_at,
        "boost activated"
    );

    Ok(boost)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn cooldown_holds_inside_the_window() {
        assert!(in_cooldown(now() - Duration::days(1), now()));
        assert!(in_cooldown(now() - Duration::days(29), now()));
    }

    #[test]
    fn cooldown_clears_after_thirty_days() {
        assert!(!in_cooldown(now() - Duration::days(30), now()));
        assert!(!in_cooldown(now() - Duration::days(90), now()));
    }
}
