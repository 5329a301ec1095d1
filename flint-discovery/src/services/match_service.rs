use std::collections::HashMap;

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::Serialize;
use uuid::Uuid;

use flint_shared::errors::AppResult;

use crate::models::{Match, User};
use crate::ranking::score::age_in_years;
use crate::schema::{matches, users};
use crate::services::photos::photo_summaries;

#[derive(Debug, Serialize)]
pub struct MatchSummary {
    pub match_id: Uuid,
    pub matched_at: DateTime<Utc>,
    pub user: MatchedUser,
}

#[derive(Debug, Serialize)]
pub struct MatchedUser {
    pub id: Uuid,
    pub display_name: String,
    pub age: i32,
    pub is_verified: bool,
    pub photo_url: Option<String>,
}

/// Active matches for a user, newest first, with the counterpart's summary.
pub fn list_matches(
    conn: &mut PgConnection,
    user_id: Uuid,
    now: DateTime<Utc>,
) -> AppResult<Vec<MatchSummary>> {
    let rows: Vec<Match> = matches::table
        .filter(matches::is_active.eq(true))
        .filter(
            matches::user_a_id
                .eq(user_id)
                .or(matches::user_b_id.eq(user_id)),
        )
        .order(matches::created_at.desc())
        .load(conn)?;

    let other_ids: Vec<Uuid> = rows
        .iter()
        .map(|m| {
            if m.user_a_id == user_id {
                m.user_b_id
            } else {
                m.user_a_id
            }
        })
        .collect();

    if other_ids.is_empty() {
        return Ok(vec![]);
    }

    let counterparts: HashMap<Uuid, User> = users::table
        .filter(users::id.eq_any(&other_ids))
        .load::<User>(conn)?
        .into_iter()
        .map(|u| (u.id, u))
        .collect();

    let mut photo_map = photo_summaries(conn, &other_ids)?;

    let today = now.date_naive();
    let summaries = rows
        .into_iter()
        .filter_map(|m| {
            let other_id = if m.user_a_id == user_id {
                m.user_b_id
            } else {
                m.user_a_id
            };
            // A counterpart hard-deleted from the store just drops out.
            let other = counterparts.get(&other_id)?;
            let photo = photo_map.remove(&other_id).unwrap_or_default();
            Some(MatchSummary {
                match_id: m.id,
                matched_at: m.created_at,
                user: MatchedUser {
                    id: other.id,
                    display_name: other.display_name.clone(),
                    age: age_in_years(other.date_of_birth, today),
                    is_verified: other.is_verified,
                    photo_url: photo.primary_url,
                },
            })
        })
        .collect();

    Ok(summaries)
}
