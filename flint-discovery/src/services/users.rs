use chrono::Utc;
use diesel::prelude::*;
use uuid::Uuid;

use flint_shared::errors::{AppError, AppResult, ErrorCode};

use crate::models::User;
use crate::schema::users;

pub fn fetch_user(conn: &mut PgConnection, user_id: Uuid) -> AppResult<User> {
    users::table
        .find(user_id)
        .first::<User>(conn)
        .optional()?
        .ok_or_else(|| AppError::new(ErrorCode::UserNotFound, "user not found"))
}

/// Every authenticated engine operation counts as activity.
pub fn touch_last_active(conn: &mut PgConnection, user_id: Uuid) -> AppResult<()> {
    diesel::update(users::table.find(user_id))
        .set(users::last_active.eq(Utc::now()))
        .execute(conn)?;
    Ok(())
}
