use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Duration, Months, NaiveDate, Utc};
use diesel::dsl::exists;
use diesel::prelude::*;
use uuid::Uuid;

use flint_shared::errors::{AppError, AppResult, ErrorCode};

use crate::models::User;
use crate::ranking::{self, CandidateProfile, RankedCandidate, ViewerProfile};
use crate::schema::{blocks, boosts, photos, reports, swipes, users};
use crate::services::photos::{photo_summaries, PhotoSummary};

/// Cap on the raw batch handed to the scoring pass; bounds per-request cost.
const RAW_BATCH_SIZE: i64 = 100;
const RECENCY_WINDOW_DAYS: i64 = 30;
pub const SHOW_ME_EVERYONE: &str = "EVERYONE";

/// Inclusive birth-date window for an age-range preference anchored on
/// `today`. A user is eligible when their birth date falls between the two
/// bounds; the day-level boundary behavior this implies is accepted.
pub fn birth_date_window(today: NaiveDate, age_min: i32, age_max: i32) -> (NaiveDate, NaiveDate) {
    let latest = today - Months::new((age_min.max(0) as u32) * 12);
    let earliest = today - Months::new((age_max.max(0) as u32 + 1) * 12);
    (earliest, latest)
}

/// Run the full discovery pipeline for one viewer: exclusion set, eligibility
/// query, raw batch, then scoring and ordering.
pub fn discover(
    conn: &mut PgConnection,
    viewer_id: Uuid,
    expand_distance: bool,
    now: DateTime<Utc>,
) -> AppResult<Vec<RankedCandidate>> {
    let viewer = users::table
        .find(viewer_id)
        .first::<User>(conn)
        .optional()?
        .ok_or_else(|| AppError::new(ErrorCode::UserNotFound, "viewer not found"))?;

    let candidates = raw_candidate_batch(conn, &viewer, now)?;
    let (viewer_profile, profiles) = assemble_profiles(conn, &viewer, candidates, now)?;

    Ok(ranking::rank_candidates(
        &viewer_profile,
        profiles,
        expand_distance,
        now,
    ))
}

/// The bounded, arbitrarily-ordered candidate batch for a viewer. Ordered by
/// recency of activity since the scoring pass re-sorts anyway.
fn raw_candidate_batch(
    conn: &mut PgConnection,
    viewer: &User,
    now: DateTime<Utc>,
) -> AppResult<Vec<User>> {
    let excluded = exclusion_set(conn, viewer.id)?;
    let excluded: Vec<Uuid> = excluded.into_iter().collect();

    let (earliest_birth, latest_birth) =
        birth_date_window(now.date_naive(), viewer.age_min, viewer.age_max);
    let active_since = now - Duration::days(RECENCY_WINDOW_DAYS);

    let mut query = users::table
        .filter(users::id.ne_all(excluded))
        .filter(users::is_active.eq(true))
        .filter(users::deleted_at.is_null())
        .filter(users::date_of_birth.between(earliest_birth, latest_birth))
        .filter(users::last_active.gt(active_since))
        .filter(exists(
            photos::table.filter(photos::user_id.eq(users::id)),
        ))
        .into_boxed();

    if viewer.show_me != SHOW_ME_EVERYONE {
        query = query.filter(users::gender.eq(viewer.show_me.clone()));
    }

    let batch = query
        .order(users::last_active.desc())
        .limit(RAW_BATCH_SIZE)
        .load::<User>(conn)?;

    Ok(batch)
}

/// Everyone never shown to this viewer, unioned by id: the viewer, everyone
/// already swiped on (any decision), blocks in either direction, and
/// everyone the viewer reported.
fn exclusion_set(conn: &mut PgConnection, viewer_id: Uuid) -> AppResult<HashSet<Uuid>> {
    let mut excluded: HashSet<Uuid> = HashSet::new();
    excluded.insert(viewer_id);

    let swiped: Vec<Uuid> = swipes::table
        .filter(swipes::actor_id.eq(viewer_id))
        .select(swipes::target_id)
        .load(conn)?;
    excluded.extend(swiped);

    let blocked: Vec<Uuid> = blocks::table
        .filter(blocks::blocker_id.eq(viewer_id))
        .select(blocks::blocked_id)
        .load(conn)?;
    excluded.extend(blocked);

    let blocked_by: Vec<Uuid> = blocks::table
        .filter(blocks::blocked_id.eq(viewer_id))
        .select(blocks::blocker_id)
        .load(conn)?;
    excluded.extend(blocked_by);

    let reported: Vec<Uuid> = reports::table
        .filter(reports::reporter_id.eq(viewer_id))
        .select(reports::reported_id)
        .load(conn)?;
    excluded.extend(reported);

    Ok(excluded)
}

/// Enrich the raw batch with photo stats and active-boost flags, producing
/// the scoring inputs.
fn assemble_profiles(
    conn: &mut PgConnection,
    viewer: &User,
    candidates: Vec<User>,
    now: DateTime<Utc>,
) -> AppResult<(ViewerProfile, Vec<CandidateProfile>)> {
    let ids: Vec<Uuid> = candidates.iter().map(|u| u.id).collect();

    let mut photo_map: HashMap<Uuid, PhotoSummary> = photo_summaries(conn, &ids)?;

    let boosted: HashSet<Uuid> = if ids.is_empty() {
        HashSet::new()
    } else {
        boosts::table
            .filter(boosts::user_id.eq_any(&ids))
            .filter(boosts::is_active.eq(true))
            .filter(boosts::expires_at.gt(now))
            .select(boosts::user_id)
            .load::<Uuid>(conn)?
            .into_iter()
            .collect()
    };

    let viewer_profile = ViewerProfile {
        latitude: viewer.latitude,
        longitude: viewer.longitude,
        max_distance: viewer.max_distance,
        interests: viewer.interest_names(),
    };

    let profiles = candidates
        .into_iter()
        .map(|user| {
            let photo = photo_map.remove(&user.id).unwrap_or_default();
            CandidateProfile {
                id: user.id,
                is_boosted: boosted.contains(&user.id),
                interests: user.interest_names(),
                prompt_answer_count: user.prompt_answer_count(),
                photo_count: photo.count,
                photo_url: photo.primary_url,
                display_name: user.display_name,
                bio: user.bio,
                job_title: user.job_title,
                company: user.company,
                location: user.location,
                date_of_birth: user.date_of_birth,
                latitude: user.latitude,
                longitude: user.longitude,
                is_verified: user.is_verified,
                last_active: user.last_active,
            }
        })
        .collect();

    Ok((viewer_profile, profiles))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_bounds_are_inclusive_day_boundaries() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();
        let (earliest, latest) = birth_date_window(today, 25, 35);

        assert_eq!(latest, NaiveDate::from_ymd_opt(2000, 6, 15).unwrap());
        assert_eq!(earliest, NaiveDate::from_ymd_opt(1989, 6, 15).unwrap());

        // One day inside either bound is eligible, one day outside is not.
        let inside_young = NaiveDate::from_ymd_opt(2000, 6, 14).unwrap();
        let outside_young = NaiveDate::from_ymd_opt(2000, 6, 16).unwrap();
        let inside_old = NaiveDate::from_ymd_opt(1989, 6, 16).unwrap();
        let outside_old = NaiveDate::from_ymd_opt(1989, 6, 14).unwrap();

        assert!((earliest..=latest).contains(&inside_young));
        assert!(!(earliest..=latest).contains(&outside_young));
        assert!((earliest..=latest).contains(&inside_old));
        assert!(!(earliest..=latest).contains(&outside_old));
    }

    #[test]
    fn window_clamps_leap_day_anchors() {
        let today = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        let (earliest, latest) = birth_date_window(today, 20, 30);
        // 2004 is a leap year, 1993 is not; the non-leap anchor clamps.
        assert_eq!(latest, NaiveDate::from_ymd_opt(2004, 2, 29).unwrap());
        assert_eq!(earliest, NaiveDate::from_ymd_opt(1993, 2, 28).unwrap());
    }
}
