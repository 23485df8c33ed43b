use super::{category::NewsCategory, user::User};
use crate::schema::*;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

/// A user's ranking keyword, scoped to one category.
#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Identifiable, Associations, PartialEq)]
#[diesel(belongs_to(User))]
#[diesel(belongs_to(NewsCategory, foreign_key = category_id))]
#[diesel(table_name = user_news_keywords)]
pub struct UserNewsKeyword {
    pub id: i32,
    pub user_id: i32,
    pub category_id: i32,
    pub keyword: String,
    pub is_enabled: bool,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = user_news_keywords)]
pub struct NewUserNewsKeyword<'a> {
    pub user_id: i32,
    pub category_id: i32,
    pub keyword: &'a str,
    pub is_enabled: bool,
}

impl<'a> NewUserNewsKeyword<'a> {
    pub fn insert(&self, conn: &mut SqliteConnection) -> QueryResult<UserNewsKeyword> {
        use crate::schema::user_news_keywords::dsl::*;
        diesel::insert_into(user_news_keywords)
            .values(self)
            .get_result(conn)
    }
}

impl UserNewsKeyword {
    pub fn get_by_id(conn: &mut SqliteConnection, keyword_id: i32) -> QueryResult<Option<UserNewsKeyword>> {
        use crate::schema::user_news_keywords::dsl::user_news_keywords;
        user_news_keywords
            .find(keyword_id)
            .first::<UserNewsKeyword>(conn)
            .optional()
    }

    pub fn get_for_user(conn: &mut SqliteConnection, for_user: i32) -> QueryResult<Vec<UserNewsKeyword>> {
        use crate::schema::user_news_keywords::dsl::*;
        user_news_keywords
            .filter(user_id.eq(for_user))
            .order(id.asc())
            .load::<UserNewsKeyword>(conn)
    }

    /// Enabled keywords for any of the given users, in insertion order.
    pub fn get_enabled_for_users(
        conn: &mut SqliteConnection,
        for_users: &[i32],
    ) -> QueryResult<Vec<UserNewsKeyword>> {
        use crate::schema::user_news_keywords::dsl::*;
        user_news_keywords
            .filter(user_id.eq_any(for_users))
            .filter(is_enabled.eq(true))
            .order(id.asc())
            .load::<UserNewsKeyword>(conn)
    }

    pub fn exists(
        conn: &mut SqliteConnection,
        for_user: i32,
        for_category: i32,
        text: &str,
    ) -> QueryResult<bool> {
        use crate::schema::user_news_keywords::dsl::*;
        let lowered = text.to_lowercase();
        let existing: Vec<String> = user_news_keywords
            .filter(user_id.eq(for_user))
            .filter(category_id.eq(for_category))
            .select(keyword)
            .load(conn)?;
        Ok(existing.iter().any(|k| k.to_lowercase() == lowered))
    }

    /// Returns 0 when the keyword already had that state.
    pub fn set_enabled(conn: &mut SqliteConnection, keyword_id: i32, enabled: bool) -> QueryResult<usize> {
        use crate::schema::user_news_keywords::dsl::*;
        diesel::update(
            user_news_keywords
                .filter(id.eq(keyword_id))
                .filter(is_enabled.ne(enabled)),
        )
        .set(is_enabled.eq(enabled))
        .execute(conn)
    }

    pub fn delete(conn: &mut SqliteConnection, keyword_id: i32) -> QueryResult<usize> {
        use crate::schema::user_news_keywords::dsl::*;
        diesel::delete(user_news_keywords.filter(id.eq(keyword_id))).execute(conn)
    }
}
