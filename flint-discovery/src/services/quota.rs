use chrono::{DateTime, Local, NaiveTime, Utc};
use diesel::prelude::*;
use serde::Serialize;

use flint_shared::errors::AppResult;

use crate::models::User;
use crate::schema::swipes;

pub const FREE_DAILY_LIKES: i64 = 20;

/// Sentinel remaining count reported to premium accounts.
const PREMIUM_REMAINING: i64 = 9999;

#[derive(Debug, Serialize)]
pub struct SwipeAllowance {
    pub allowed: bool,
    pub remaining: i64,
    pub limit: i64,
    pub is_premium: bool,
}

/// Quota arithmetic over the day's positive-swipe count. Premium accounts
/// are exempt and report limit -1.
pub fn allowance(likes_today: i64, is_premium: bool) -> SwipeAllowance {
    if is_premium {
        return SwipeAllowance {
            allowed: true,
            remaining: PREMIUM_REMAINING,
            limit: -1,
            is_premium: true,
        };
    }

    let remaining = (FREE_DAILY_LIKES - likes_today).max(0);
    SwipeAllowance {
        allowed: remaining > 0,
        remaining,
        limit: FREE_DAILY_LIKES,
        is_premium: false,
    }
}

/// Current allowance for a user: LIKE/SUPER_LIKE swipes since the start of
/// the current calendar day (server clock). PASS is never counted. The reset
/// is implicit in the timestamp filter; there is no scheduled sweep.
pub fn daily_allowance(
    conn: &mut PgConnection,
    user: &User,
    now: DateTime<Utc>,
) -> AppResult<SwipeAllowance> {
    if user.is_premium_at(now) {
        return Ok(allowance(0, true));
    }

    let likes_today: i64 = swipes::table
        .filter(swipes::actor_id.eq(user.id))
        .filter(swipes::decision.eq_any(["LIKE", "SUPER_LIKE"]))
        .filter(swipes::created_at.ge(start_of_today()))
        .count()
        .get_result(conn)?;

    Ok(allowance(likes_today, false))
}

fn start_of_today() -> DateTime<Utc> {
    let now = Local::now();
    now.date_naive()
        .and_time(NaiveTime::MIN)
        .and_local_timezone(Local)
        .earliest()
        .unwrap_or(now)
        .with_timezone(&Utc)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn free_tier_blocks_at_the_limit() {
        let a = allowance(FREE_DAILY_LIKES, false);
        assert!(!a.allowed);
        assert_eq!(a.remaining, 0);
        assert_eq!(a.limit, FREE_DAILY_LIKES);
    }

    #[test]
    fn free_tier_allows_below_the_limit() {
        let a = allowance(FREE_DAILY_LIKES - 1, false);
        assert!(a.allowed);
        assert_eq!(a.remaining, 1);
    }

    #[test]
    fn remaining_never_goes_negative() {
        let a = allowance(FREE_DAILY_LIKES + 50, false);
        assert!(!a.allowed);
        assert_eq!(a.remaining, 0);
    }

    #[test]
    fn premium_is_exempt_at_any_volume() {
        let a = allowance(1000, true);
        assert!(a.allowed);
        assert_eq!(a.limit, -1);
        assert!(a.remaining > 0);
    }
}
