use std::collections::HashMap;

use diesel::prelude::*;
use uuid::Uuid;

use flint_shared::errors::AppResult;

use crate::models::Photo;
use crate::schema::photos;

#[derive(Debug, Default, Clone)]
pub struct PhotoSummary {
    pub count: usize,
    pub primary_url: Option<String>,
}

/// Batch photo lookup for a set of users: total count plus the primary
/// (or first-by-position) photo url.
pub fn photo_summaries(
    conn: &mut PgConnection,
    user_ids: &[Uuid],
) -> AppResult<HashMap<Uuid, PhotoSummary>> {
    if user_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows: Vec<Photo> = photos::table
        .filter(photos::user_id.eq_any(user_ids))
        .order((
            photos::user_id,
            photos::is_primary.desc(),
            photos::position.asc(),
        ))
        .load(conn)?;

    let mut summaries: HashMap<Uuid, PhotoSummary> = HashMap::new();
    for photo in rows {
        let entry = summaries.entry(photo.user_id).or_default();
        if entry.primary_url.is_none() {
            entry.primary_url = Some(photo.url);
        }
        entry.count += 1;
    }

    Ok(summaries)
}
