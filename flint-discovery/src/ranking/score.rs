use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::geo;

// -- Composite score weights --
// Shared interests are deliberately uncapped while every other term is
// bounded; the asymmetry matches product behavior.
const VERIFIED_BONUS: i32 = 20;
const SHARED_INTEREST_WEIGHT: i32 = 6;
const HALFWAY_PENALTY: i32 = 5;
const BEYOND_LIMIT_PENALTY: i32 = 10;
const ACTIVITY_DECAY_PER_DAY: i64 = 3;
const MAX_RESULTS: usize = 20;

/// The viewing user's scoring inputs.
#[derive(Debug, Clone)]
pub struct ViewerProfile {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub max_distance: Option<i32>,
    pub interests: Vec<String>,
}

/// One raw candidate as assembled by the candidate filter.
#[derive(Debug, Clone)]
pub struct CandidateProfile {
    pub id: Uuid,
    pub display_name: String,
    pub bio: Option<String>,
    pub job_title: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    pub date_of_birth: NaiveDate,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub interests: Vec<String>,
    pub prompt_answer_count: usize,
    pub photo_count: usize,
    pub photo_url: Option<String>,
    pub is_verified: bool,
    pub is_boosted: bool,
    pub last_active: DateTime<Utc>,
}

/// A scored, ordered discovery result.
#[derive(Debug, Clone, Serialize)]
pub struct RankedCandidate {
    pub id: Uuid,
    pub display_name: String,
    pub age: i32,
    pub bio: Option<String>,
    pub job_title: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    pub photo_url: Option<String>,
    pub interests: Vec<String>,
    pub is_verified: bool,
    pub is_boosted: bool,
    pub distance_miles: Option<f64>,
    pub shared_interests: i32,
    pub completeness: i32,
    pub activity_score: i32,
    pub match_score: i32,
    pub last_active: DateTime<Utc>,
}

/// Whole years elapsed since `date_of_birth` as of `today`.
pub fn age_in_years(date_of_birth: NaiveDate, today: NaiveDate) -> i32 {
    let mut age = today.year() - date_of_birth.year();
    if (today.month(), today.day()) < (date_of_birth.month(), date_of_birth.day()) {
        age -= 1;
    }
    age
}

/// Profile completeness on a 0-100 scale.
///
/// Photos 10 each (max 3), bio over 10 chars 20, job title or company 15,
/// interests 3 each (max 5), prompt answers a third of 10 each (max 3),
/// location string 10. Capped at 100 by construction.
pub fn profile_completeness(candidate: &CandidateProfile) -> i32 {
    let mut score = 0.0;

    score += (candidate.photo_count.min(3) * 10) as f64;

    if candidate.bio.as_deref().map_or(0, str::len) > 10 {
        score += 20.0;
    }

    if candidate.job_title.is_some() || candidate.company.is_some() {
        score += 15.0;
    }

    score += (candidate.interests.len().min(5) * 3) as f64;

    score += candidate.prompt_answer_count.min(3) as f64 * (10.0 / 3.0);

    if candidate.location.as_deref().is_some_and(|l| !l.is_empty()) {
        score += 10.0;
    }

    score.round() as i32
}

/// Linear activity decay: 100 at zero days inactive, zero at ~33 days.
pub fn activity_score(last_active: DateTime<Utc>, now: DateTime<Utc>) -> i32 {
    let days_inactive = (now - last_active).num_days().max(0);
    (100 - ACTIVITY_DECAY_PER_DAY * days_inactive).max(0) as i32
}

/// Case-insensitive interest-name intersection count.
pub fn shared_interest_count(viewer: &[String], candidate: &[String]) -> i32 {
    let viewer_set: std::collections::HashSet<String> =
        viewer.iter().map(|i| i.to_lowercase()).collect();
    candidate
        .iter()
        .filter(|i| viewer_set.contains(&i.to_lowercase()))
        .count() as i32
}

fn distance_to_viewer(viewer: &ViewerProfile, candidate: &CandidateProfile) -> Option<f64> {
    match (
        viewer.latitude,
        viewer.longitude,
        candidate.latitude,
        candidate.longitude,
    ) {
        // A malformed stored coordinate nulls the distance instead of
        // failing the whole batch.
        (Some(vlat), Some(vlon), Some(clat), Some(clon)) => {
            geo::distance_miles(vlat, vlon, clat, clon).ok()
        }
        _ => None,
    }
}

fn distance_penalty(distance: Option<f64>, max_distance: Option<i32>) -> i32 {
    match (distance, max_distance) {
        (Some(d), Some(max)) => {
            let max = max as f64;
            if d > max {
                BEYOND_LIMIT_PENALTY
            } else if d > max / 2.0 {
                HALFWAY_PENALTY
            } else {
                0
            }
        }
        _ => 0,
    }
}

fn annotate(
    viewer: &ViewerProfile,
    candidate: CandidateProfile,
    now: DateTime<Utc>,
) -> RankedCandidate {
    let distance = distance_to_viewer(viewer, &candidate);
    let completeness = profile_completeness(&candidate);
    let shared = shared_interest_count(&viewer.interests, &candidate.interests);
    let activity = activity_score(candidate.last_active, now);

    let mut score = 0;
    if candidate.is_verified {
        score += VERIFIED_BONUS;
    }
    score += completeness / 5;
    score += shared * SHARED_INTEREST_WEIGHT;
    score += activity / 5;
    score -= distance_penalty(distance, viewer.max_distance);

    RankedCandidate {
        id: candidate.id,
        display_name: candidate.display_name,
        age: age_in_years(candidate.date_of_birth, now.date_naive()),
        bio: candidate.bio,
        job_title: candidate.job_title,
        company: candidate.company,
        location: candidate.location,
        photo_url: candidate.photo_url,
        interests: candidate.interests,
        is_verified: candidate.is_verified,
        is_boosted: candidate.is_boosted,
        distance_miles: distance,
        shared_interests: shared,
        completeness,
        activity_score: activity,
        match_score: score,
        last_active: candidate.last_active,
    }
}

fn ranking_order(a: &RankedCandidate, b: &RankedCandidate) -> std::cmp::Ordering {
    use std::cmp::Ordering;

    // Boost is a lexicographic override, not a score addend.
    b.is_boosted
        .cmp(&a.is_boosted)
        .then_with(|| b.match_score.cmp(&a.match_score))
        .then_with(|| b.is_verified.cmp(&a.is_verified))
        .then_with(|| match (a.distance_miles, b.distance_miles) {
            (Some(da), Some(db)) => da.partial_cmp(&db).unwrap_or(Ordering::Equal),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        })
        .then_with(|| b.last_active.cmp(&a.last_active))
}

/// Score, order, and truncate a candidate batch for one viewer.
///
/// The viewer's distance ceiling (doubled under `expand_distance`) is applied
/// after sorting; candidates without a computable distance are never excluded
/// by it.
pub fn rank_candidates(
    viewer: &ViewerProfile,
    candidates: Vec<CandidateProfile>,
    expand_distance: bool,
    now: DateTime<Utc>,
) -> Vec<RankedCandidate> {
    let mut ranked: Vec<RankedCandidate> = candidates
        .into_iter()
        .map(|c| annotate(viewer, c, now))
        .collect();

    ranked.sort_by(ranking_order);

    let ceiling = viewer
        .max_distance
        .map(|d| if expand_distance { (d * 2) as f64 } else { d as f64 });

    if let Some(ceiling) = ceiling {
        ranked.retain(|c| c.distance_miles.map_or(true, |d| d <= ceiling));
    }

    ranked.truncate(MAX_RESULTS);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap()
    }

    fn viewer() -> ViewerProfile {
        ViewerProfile {
            latitude: Some(40.7128),
            longitude: Some(-74.0060),
            max_distance: Some(10),
            interests: vec!["Hiking".into(), "Jazz".into(), "Cooking".into()],
        }
    }

    fn candidate(name: &str) -> CandidateProfile {
        CandidateProfile {
            id: Uuid::new_v4(),
            display_name: name.to_string(),
            bio: None,
            job_title: None,
            company: None,
            location: None,
            date_of_birth: NaiveDate::from_ymd_opt(1995, 3, 20).unwrap(),
            latitude: None,
            longitude: None,
            interests: vec![],
            prompt_answer_count: 0,
            photo_count: 1,
            photo_url: None,
            is_verified: false,
            is_boosted: false,
            last_active: now(),
        }
    }

    // Offsets in degrees latitude: 1 degree is about 69 miles.
    fn candidate_at_miles(name: &str, miles: f64) -> CandidateProfile {
        let mut c = candidate(name);
        c.latitude = Some(40.7128 + miles / 69.0);
        c.longitude = Some(-74.0060);
        c
    }

    #[test]
    fn age_floors_whole_years() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();
        let dob = NaiveDate::from_ymd_opt(1995, 6, 16).unwrap();
        assert_eq!(age_in_years(dob, today), 29); // birthday tomorrow
        let dob = NaiveDate::from_ymd_opt(1995, 6, 15).unwrap();
        assert_eq!(age_in_years(dob, today), 30); // birthday today
    }

    #[test]
    fn completeness_terms_cap_individually() {
        let mut c = candidate("c");
        c.photo_count = 7;
        assert_eq!(profile_completeness(&c), 30);

        c.interests = (0..9).map(|i| format!("interest-{i}")).collect();
        assert_eq!(profile_completeness(&c), 45);

        c.prompt_answer_count = 5;
        assert_eq!(profile_completeness(&c), 55);
    }

    #[test]
    fn completeness_bio_needs_more_than_ten_chars() {
        let mut c = candidate("c");
        c.photo_count = 0;
        c.bio = Some("ten chars!".into()); // exactly 10
        assert_eq!(profile_completeness(&c), 0);
        c.bio = Some("eleven char".into());
        assert_eq!(profile_completeness(&c), 20);
    }

    #[test]
    fn completeness_full_profile_is_100() {
        let mut c = candidate("c");
        c.photo_count = 3;
        c.bio = Some("a bio that is long enough".into());
        c.job_title = Some("Engineer".into());
        c.interests = (0..5).map(|i| format!("interest-{i}")).collect();
        c.prompt_answer_count = 3;
        c.location = Some("Brooklyn".into());
        assert_eq!(profile_completeness(&c), 100);
    }

    #[test]
    fn completeness_empty_location_does_not_count() {
        let mut c = candidate("c");
        c.photo_count = 0;
        c.location = Some(String::new());
        assert_eq!(profile_completeness(&c), 0);
    }

    #[test]
    fn activity_decays_linearly_to_zero() {
        assert_eq!(activity_score(now(), now()), 100);
        assert_eq!(activity_score(now() - Duration::days(10), now()), 70);
        assert_eq!(activity_score(now() - Duration::days(34), now()), 0);
        assert_eq!(activity_score(now() - Duration::days(400), now()), 0);
    }

    #[test]
    fn shared_interests_match_case_insensitively() {
        let mine = vec!["Hiking".to_string(), "JAZZ".to_string()];
        let theirs = vec!["hiking".to_string(), "jazz".to_string(), "chess".to_string()];
        assert_eq!(shared_interest_count(&mine, &theirs), 2);
    }

    #[test]
    fn shared_interest_term_is_uncapped() {
        let interests: Vec<String> = (0..10).map(|i| format!("interest-{i}")).collect();
        let mut v = viewer();
        v.interests = interests.clone();
        v.max_distance = None;
        let mut c = candidate("c");
        c.interests = interests;

        let ranked = rank_candidates(&v, vec![c], false, now());
        // 10 shared x 6, plus interests completeness (15 -> 3) and activity (100 -> 20).
        assert_eq!(ranked[0].shared_interests, 10);
        assert!(ranked[0].match_score >= 60);
    }

    #[test]
    fn distance_penalty_beyond_limit_and_beyond_half() {
        let v = viewer(); // max_distance 10
        let near = rank_candidates(&v, vec![candidate_at_miles("near", 2.0)], true, now());
        let mid = rank_candidates(&v, vec![candidate_at_miles("mid", 7.0)], true, now());
        let far = rank_candidates(&v, vec![candidate_at_miles("far", 15.0)], true, now());

        let base = near[0].match_score;
        assert_eq!(mid[0].match_score, base - 5);
        assert_eq!(far[0].match_score, base - 10);
    }

    #[test]
    fn boost_overrides_higher_score() {
        let mut strong = candidate("strong");
        strong.is_verified = true;
        strong.photo_count = 3;
        strong.bio = Some("a bio that is long enough".into());

        let mut weak = candidate("weak");
        weak.is_boosted = true;
        weak.last_active = now() - Duration::days(20);

        let ranked = rank_candidates(&viewer(), vec![strong, weak], false, now());
        assert_eq!(ranked[0].display_name, "weak");
        assert!(ranked[0].match_score < ranked[1].match_score);
    }

    #[test]
    fn verified_breaks_score_ties() {
        // A full profile (completeness 100 -> +20) ties the verified bonus.
        let mut a = candidate("unverified");
        a.photo_count = 3;
        a.bio = Some("a bio that is long enough".into());
        a.job_title = Some("Engineer".into());
        a.interests = (0..5).map(|i| format!("interest-{i}")).collect();
        a.prompt_answer_count = 3;
        a.location = Some("Brooklyn".into());

        let mut b = candidate("verified");
        b.is_verified = true;
        b.photo_count = 0;

        let ranked = rank_candidates(&viewer(), vec![a, b], false, now());
        assert_eq!(ranked[0].match_score, ranked[1].match_score);
        assert_eq!(ranked[0].display_name, "verified");
    }

    #[test]
    fn known_distance_sorts_before_unknown() {
        let with_coords = candidate_at_miles("near", 3.0);
        let without_coords = candidate("unknown");

        let ranked = rank_candidates(&viewer(), vec![without_coords, with_coords], false, now());
        assert_eq!(ranked[0].display_name, "near");
    }

    #[test]
    fn recency_is_the_final_tiebreak() {
        let mut stale = candidate("stale");
        stale.last_active = now() - Duration::hours(12);
        let fresh = candidate("fresh");

        // Same completeness, no coords, no boost: scores differ only via
        // activity, and under 1 day of decay they do not.
        let ranked = rank_candidates(&viewer(), vec![stale, fresh], false, now());
        assert_eq!(ranked[0].match_score, ranked[1].match_score);
        assert_eq!(ranked[0].display_name, "fresh");
    }

    #[test]
    fn ceiling_filter_drops_far_candidates_after_sort() {
        let ranked = rank_candidates(
            &viewer(),
            vec![candidate_at_miles("near", 5.0), candidate_at_miles("far", 15.0)],
            false,
            now(),
        );
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].display_name, "near");
    }

    #[test]
    fn expand_distance_doubles_the_ceiling() {
        let ranked = rank_candidates(
            &viewer(),
            vec![candidate_at_miles("far", 15.0)],
            true,
            now(),
        );
        assert_eq!(ranked.len(), 1);
    }

    #[test]
    fn unknown_distance_is_never_filtered() {
        let ranked = rank_candidates(&viewer(), vec![candidate("unknown")], false, now());
        assert_eq!(ranked.len(), 1);
    }

    #[test]
    fn boosted_far_candidate_outranks_then_ceiling_drops_the_other() {
        // Viewer with a 10 mile limit; C at 15 miles unboosted, D at 5 miles
        // boosted with shared interests. D ranks first on the boost override
        // and C is dropped by the ceiling.
        let mut v = viewer();
        v.interests = vec!["hiking".into(), "jazz".into(), "cooking".into()];

        let c = candidate_at_miles("C", 15.0);
        let mut d = candidate_at_miles("D", 5.0);
        d.is_boosted = true;
        d.interests = vec!["Hiking".into(), "Jazz".into(), "Cooking".into()];

        let ranked = rank_candidates(&v, vec![c, d], false, now());
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].display_name, "D");
        assert_eq!(ranked[0].shared_interests, 3);
    }

    #[test]
    fn results_truncate_to_twenty() {
        let batch: Vec<CandidateProfile> =
            (0..50).map(|i| candidate(&format!("c{i}"))).collect();
        let ranked = rank_candidates(&viewer(), batch, false, now());
        assert_eq!(ranked.len(), 20);
    }
}
