use diesel::{Connection, SqliteConnection};

use super::preferences;
use crate::errors::{AppError, AppResult};
use crate::models::user::{NewUser, User, UserQuery};
use crate::principal::Principal;

/// Creates a user with a disabled notification preference per category.
pub fn create_user(conn: &mut SqliteConnection, principal: &Principal, new_user: &NewUser) -> AppResult<User> {
    conn.transaction(|conn| {
        let user = User::create(conn, new_user, principal)?;
        let seeded = preferences::seed_for_new_user(conn, user.id)?;
        crate::log_user_action!(principal.user_id, "create_user", { "user_id": user.id, "role": &user.role, "seeded": seeded });
        Ok(user)
    })
}

pub fn get_user(conn: &mut SqliteConnection, user_id: i32) -> AppResult<User> {
    User::get(conn, UserQuery::Id(user_id)).ok_or_else(|| AppError::resource_not_found("User"))
}
