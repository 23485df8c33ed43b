use crate::schema::*;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Identifiable, PartialEq)]
#[diesel(table_name = news_categories)]
pub struct NewsCategory {
    pub id: i32,
    pub name: String,
    pub is_hidden: bool,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = news_categories)]
pub struct NewCategory<'a> {
    pub name: &'a str,
    pub is_hidden: bool,
}

impl<'a> NewCategory<'a> {
    pub fn insert(&self, conn: &mut SqliteConnection) -> QueryResult<NewsCategory> {
        use crate::schema::news_categories::dsl::*;
        diesel::insert_into(news_categories)
            .values(self)
            .get_result(conn)
            .map_err(|e| {
                log::warn!("Error inserting category {}: {e:?}", self.name);
                e
            })
    }
}

impl NewsCategory {
    pub fn get_by_id(conn: &mut SqliteConnection, category_id: i32) -> QueryResult<Option<NewsCategory>> {
        use crate::schema::news_categories::dsl::news_categories;
        news_categories
            .find(category_id)
            .first::<NewsCategory>(conn)
            .optional()
    }

    /// Names are unique ignoring case (the column is `COLLATE NOCASE`).
    pub fn get_by_name(conn: &mut SqliteConnection, category_name: &str) -> QueryResult<Option<NewsCategory>> {
        use crate::schema::news_categories::dsl::*;
        news_categories
            .filter(name.eq(category_name))
            .first::<NewsCategory>(conn)
            .optional()
    }

    pub fn get_all(conn: &mut SqliteConnection) -> QueryResult<Vec<NewsCategory>> {
        use crate::schema::news_categories::dsl::*;
        news_categories.order(name.asc()).load::<NewsCategory>(conn)
    }

    pub fn get_all_ids(conn: &mut SqliteConnection) -> QueryResult<Vec<i32>> {
        use crate::schema::news_categories::dsl::*;
        news_categories.select(id).load::<i32>(conn)
    }

    /// Flips the hidden flag; returns 0 when it already had that value.
    pub fn set_hidden(conn: &mut SqliteConnection, category_id: i32, hidden: bool) -> QueryResult<usize> {
        use crate::schema::news_categories::dsl::*;
        diesel::update(
            news_categories
                .filter(id.eq(category_id))
                .filter(is_hidden.ne(hidden)),
        )
        .set(is_hidden.eq(hidden))
        .execute(conn)
    }
}
