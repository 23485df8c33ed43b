use super::{category::NewsCategory, user::User};
use crate::schema::*;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

/// Size of one multi-row insert when seeding preference rows.
pub const SEED_BATCH_SIZE: usize = 100;

#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Identifiable, Associations, PartialEq)]
#[diesel(belongs_to(User))]
#[diesel(belongs_to(NewsCategory, foreign_key = category_id))]
#[diesel(table_name = notification_preferences)]
pub struct NotificationPreference {
    pub id: i32,
    pub user_id: i32,
    pub category_id: i32,
    pub is_enabled: bool,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = notification_preferences)]
pub struct NewNotificationPreference {
    pub user_id: i32,
    pub category_id: i32,
    pub is_enabled: bool,
}

impl NewNotificationPreference {
    /// Insert or overwrite the (user, category) row.
    pub fn upsert(&self, conn: &mut SqliteConnection) -> QueryResult<NotificationPreference> {
        use crate::schema::notification_preferences::dsl::*;
        diesel::insert_into(notification_preferences)
            .values(self)
            .on_conflict((user_id, category_id))
            .do_update()
            .set(is_enabled.eq(self.is_enabled))
            .get_result(conn)
    }

    /// Inserts rows in chunks of `SEED_BATCH_SIZE`, skipping pairs that
    /// already exist. Returns the number of rows inserted.
    pub fn insert_batched(conn: &mut SqliteConnection, rows: &[NewNotificationPreference]) -> QueryResult<usize> {
        use crate::schema::notification_preferences::dsl::*;
        let mut inserted = 0;
        for chunk in rows.chunks(SEED_BATCH_SIZE) {
            inserted += diesel::insert_or_ignore_into(notification_preferences)
                .values(chunk)
                .execute(conn)?;
        }
        Ok(inserted)
    }
}

impl NotificationPreference {
    pub fn get_for_user(conn: &mut SqliteConnection, for_user: i32) -> QueryResult<Vec<NotificationPreference>> {
        use crate::schema::notification_preferences::dsl::*;
        notification_preferences
            .filter(user_id.eq(for_user))
            .order(id.asc())
            .load::<NotificationPreference>(conn)
    }

    pub fn get_enabled_for_users(
        conn: &mut SqliteConnection,
        for_users: &[i32],
    ) -> QueryResult<Vec<NotificationPreference>> {
        use crate::schema::notification_preferences::dsl::*;
        notification_preferences
            .filter(user_id.eq_any(for_users))
            .filter(is_enabled.eq(true))
            .order(id.asc())
            .load::<NotificationPreference>(conn)
    }

    pub fn user_ids_with_enabled(conn: &mut SqliteConnection) -> QueryResult<Vec<i32>> {
        use crate::schema::notification_preferences::dsl::*;
        notification_preferences
            .filter(is_enabled.eq(true))
            .select(user_id)
            .distinct()
            .order(user_id.asc())
            .load::<i32>(conn)
    }
}
