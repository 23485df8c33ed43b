use super::user::User;
use crate::schema::*;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Identifiable, Associations, PartialEq)]
#[diesel(belongs_to(User))]
#[diesel(table_name = notifications)]
pub struct Notification {
    pub id: i32,
    pub user_id: i32,
    pub article_id: Option<i32>,
    pub message: String,
    pub created_at: i64,
    pub is_read: bool,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = notifications)]
#[diesel(treat_none_as_default_value = false)]
pub struct NewNotification {
    pub user_id: i32,
    pub article_id: Option<i32>,
    pub message: String,
    pub created_at: i64,
    pub is_read: bool,
}

impl NewNotification {
    pub fn insert_all(conn: &mut SqliteConnection, rows: &[NewNotification]) -> QueryResult<usize> {
        use crate::schema::notifications::dsl::*;
        if rows.is_empty() {
            return Ok(0);
        }
        diesel::insert_into(notifications).values(rows).execute(conn)
    }
}

impl Notification {
    /// Newest first.
    pub fn get_for_user(conn: &mut SqliteConnection, for_user: i32) -> QueryResult<Vec<Notification>> {
        use crate::schema::notifications::dsl::*;
        notifications
            .filter(user_id.eq(for_user))
            .order((created_at.desc(), id.desc()))
            .load::<Notification>(conn)
    }

    pub fn mark_read(conn: &mut SqliteConnection, for_user: i32, notification_id: i32) -> QueryResult<usize> {
        use crate::schema::notifications::dsl::*;
        diesel::update(
            notifications
                .filter(id.eq(notification_id))
                .filter(user_id.eq(for_user))
                .filter(is_read.eq(false)),
        )
        .set(is_read.eq(true))
        .execute(conn)
    }

    pub fn exists_for_user_and_article(
        conn: &mut SqliteConnection,
        for_user: i32,
        for_article: i32,
    ) -> QueryResult<bool> {
        use crate::schema::notifications::dsl::*;
        diesel::select(diesel::dsl::exists(
            notifications
                .filter(user_id.eq(for_user))
                .filter(article_id.eq(for_article)),
        ))
        .get_result(conn)
    }
}
