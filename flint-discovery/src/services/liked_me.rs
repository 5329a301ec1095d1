use std::collections::HashMap;

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::Serialize;
use uuid::Uuid;

use flint_shared::errors::AppResult;

use crate::models::{Swipe, User};
use crate::ranking::score::age_in_years;
use crate::schema::{swipes, users};
use crate::services::photos::photo_summaries;

#[derive(Debug, Serialize)]
pub struct PendingLike {
    pub id: String,
    pub display_name: String,
    pub age: i32,
    pub photo_url: Option<String>,
    pub liked_at: DateTime<Utc>,
    pub is_super_like: bool,
}

#[derive(Debug, Serialize)]
pub struct LikedMeSummary {
    pub count: usize,
    pub users: Vec<PendingLike>,
    pub is_premium: bool,
}

/// Inbound LIKE/SUPER_LIKE swipes the user has not answered yet.
///
/// Premium callers see who; free callers only see that someone did, with
/// identity fields obfuscated.
pub fn pending_likes(
    conn: &mut PgConnection,
    user: &User,
    now: DateTime<Utc>,
) -> AppResult<LikedMeSummary> {
    let answered: Vec<Uuid> = swipes::table
        .filter(swipes::actor_id.eq(user.id))
        .select(swipes::target_id)
        .load(conn)?;

    let pending: Vec<Swipe> = swipes::table
        .filter(swipes::target_id.eq(user.id))
        .filter(swipes::decision.eq_any(["LIKE", "SUPER_LIKE"]))
        .filter(swipes::actor_id.ne_all(answered))
        .order(swipes::created_at.desc())
        .load(conn)?;

    let is_premium = user.is_premium_at(now);

    if !is_premium {
        let users = pending
            .iter()
            .map(|swipe| PendingLike {
                id: "HIDDEN".to_string(),
                display_name: "Someone".to_string(),
                age: 0,
                photo_url: None,
                liked_at: swipe.created_at,
                is_super_like: swipe.decision == "SUPER_LIKE",
            })
            .collect::<Vec<_>>();
        return Ok(LikedMeSummary { count: pending.len(), users, is_premium });
    }

    let actor_ids: Vec<Uuid> = pending.iter().map(|s| s.actor_id).collect();
    let actors: HashMap<Uuid, User> = users::table
        .filter(users::id.eq_any(&actor_ids))
        .load::<User>(conn)?
        .into_iter()
        .map(|u| (u.id, u))
        .collect();
    let photo_map = photo_summaries(conn, &actor_ids)?;

    let today = now.date_naive();
    let users = pending
        .iter()
        .filter_map(|swipe| {
            let actor = actors.get(&swipe.actor_id)?;
            Some(PendingLike {
                id: actor.id.to_string(),
                display_name: actor.display_name.clone(),
                age: age_in_years(actor.date_of_birth, today),
                photo_url: photo_map
                    .get(&actor.id)
                    .and_then(|p| p.primary_url.clone()),
                liked_at: swipe.created_at,
                is_super_like: swipe.decision == "SUPER_LIKE",
            })
        })
        .collect::<Vec<_>>();

    Ok(LikedMeSummary { count: users.len(), users, is_premium })
}
