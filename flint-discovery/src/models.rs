use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::schema::{boosts, matches, photos, swipes, users};

// --- SwipeDecision ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SwipeDecision {
    Like,
    Pass,
    SuperLike,
}

impl SwipeDecision {
    /// LIKE and SUPER_LIKE count toward quotas and can complete a match;
    /// PASS does neither.
    pub fn is_positive(&self) -> bool {
        !matches!(self, SwipeDecision::Pass)
    }
}

impl std::fmt::Display for SwipeDecision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SwipeDecision::Like => write!(f, "LIKE"),
            SwipeDecision::Pass => write!(f, "PASS"),
            SwipeDecision::SuperLike => write!(f, "SUPER_LIKE"),
        }
    }
}

impl std::str::FromStr for SwipeDecision {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "LIKE" => Ok(SwipeDecision::Like),
            "PASS" => Ok(SwipeDecision::Pass),
            "SUPER_LIKE" => Ok(SwipeDecision::SuperLike),
            _ => Err(format!("unknown decision: {s}")),
        }
    }
}

// --- User ---

#[derive(Debug, Queryable, Identifiable, Serialize, Clone)]
#[diesel(table_name = users)]
pub struct User {
    pub id: Uuid,
    pub display_name: String,
    pub bio: Option<String>,
    pub date_of_birth: NaiveDate,
    pub gender: String,
    pub show_me: String,
    pub age_min: i32,
    pub age_max: i32,
    pub location: Option<String>,
    pub job_title: Option<String>,
    pub company: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub max_distance: Option<i32>,
    pub interests: serde_json::Value,
    pub prompt_answers: serde_json::Value,
    pub is_active: bool,
    pub deleted_at: Option<DateTime<Utc>>,
    pub is_verified: bool,
    pub is_premium: bool,
    pub premium_until: Option<DateTime<Utc>>,
    pub last_active: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Premium entitlement at `now`: the flag plus an unexpired expiry when
    /// one is set (expiry clearing is the billing webhook's job).
    pub fn is_premium_at(&self, now: DateTime<Utc>) -> bool {
        self.is_premium && self.premium_until.map_or(true, |until| until > now)
    }

    /// Interest tags from the Jsonb column; anything malformed reads as empty.
    pub fn interest_names(&self) -> Vec<String> {
        self.interests
            .as_array()
            .map(|arr| {
                arr.iter()
                    .filter_map(|v| v.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn prompt_answer_count(&self) -> usize {
        self.prompt_answers.as_array().map_or(0, |arr| arr.len())
    }
}

// --- Photo ---

#[derive(Debug, Queryable, Identifiable, Serialize, Clone)]
#[diesel(table_name = photos)]
pub struct Photo {
    pub id: Uuid,
    pub user_id: Uuid,
    pub url: String,
    pub position: i32,
    pub is_primary: bool,
    pub created_at: DateTime<Utc>,
}

// --- Swipe ---

#[derive(Debug, Queryable, Identifiable, Serialize, Clone)]
#[diesel(table_name = swipes)]
pub struct Swipe {
    pub id: Uuid,
    pub actor_id: Uuid,
    pub target_id: Uuid,
    pub decision: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = swipes)]
pub struct NewSwipe {
    pub actor_id: Uuid,
    pub target_id: Uuid,
    pub decision: String,
}

// --- Match ---

#[derive(Debug, Queryable, Identifiable, Serialize, Clone)]
#[diesel(table_name = matches)]
pub struct Match {
    pub id: Uuid,
    pub user_a_id: Uuid,
    pub user_b_id: Uuid,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = matches)]
pub struct NewMatch {
    pub user_a_id: Uuid,
    pub user_b_id: Uuid,
}

// --- Boost ---

#[derive(Debug, Queryable, Identifiable, Serialize, Clone)]
#[diesel(table_name = boosts)]
pub struct Boost {
    pub id: Uuid,
    pub user_id: Uuid,
    pub duration_mins: i32,
    pub started_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub is_active: bool,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = boosts)]
pub struct NewBoost {
    pub user_id: Uuid,
    pub duration_mins: i32,
    pub expires_at: DateTime<Utc>,
}

// Blocks and reports are exclusion inputs only; the candidate filter reads
// their id columns directly off the schema tables.

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn decision_round_trips_through_wire_format() {
        for (s, d) in [
            ("LIKE", SwipeDecision::Like),
            ("PASS", SwipeDecision::Pass),
            ("SUPER_LIKE", SwipeDecision::SuperLike),
        ] {
            assert_eq!(SwipeDecision::from_str(s).unwrap(), d);
            assert_eq!(d.to_string(), s);
        }
    }

    #[test]
    fn decision_rejects_anything_else() {
        assert!(SwipeDecision::from_str("like").is_err());
        assert!(SwipeDecision::from_str("SUPERLIKE").is_err());
        assert!(SwipeDecision::from_str("").is_err());
    }

    #[test]
    fn pass_is_not_positive() {
        assert!(SwipeDecision::Like.is_positive());
        assert!(SwipeDecision::SuperLike.is_positive());
        assert!(!SwipeDecision::Pass.is_positive());
    }
}
