use super::category::NewsCategory;
use crate::schema::*;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Identifiable, Associations, PartialEq)]
#[diesel(belongs_to(NewsCategory, foreign_key = category_id))]
#[diesel(table_name = articles)]
pub struct Article {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub content: String,
    pub url: String,
    /// Unix seconds, UTC
    pub published_at: i64,
    pub category_id: i32,
    pub is_hidden: bool,
}

#[derive(Debug, Default, Serialize, Deserialize, Insertable)]
#[diesel(table_name = articles)]
pub struct NewArticle<'a> {
    pub title: &'a str,
    pub description: &'a str,
    pub content: &'a str,
    pub url: &'a str,
    pub published_at: i64,
    pub category_id: i32,
    pub is_hidden: bool,
}

impl<'a> NewArticle<'a> {
    pub fn insert(&self, conn: &mut SqliteConnection) -> QueryResult<Article> {
        use crate::schema::articles::dsl::*;
        diesel::insert_into(articles)
            .values(self)
            .get_result(conn)
            .map_err(|e| {
                log::warn!("Error inserting article: {e:?}");
                e
            })
    }
}

impl Article {
    pub fn get_by_id(conn: &mut SqliteConnection, article_id: i32) -> QueryResult<Option<Article>> {
        use crate::schema::articles::dsl::articles;
        articles.find(article_id).first::<Article>(conn).optional()
    }

    pub fn exists(conn: &mut SqliteConnection, article_id: i32) -> QueryResult<bool> {
        use crate::schema::articles::dsl::{articles, id};
        diesel::select(diesel::dsl::exists(articles.filter(id.eq(article_id)))).get_result(conn)
    }

    /// Newest first; ties broken by id so the order is deterministic.
    pub fn get_all(conn: &mut SqliteConnection) -> QueryResult<Vec<Article>> {
        use crate::schema::articles::dsl::*;
        articles
            .order((published_at.desc(), id.asc()))
            .load::<Article>(conn)
    }

    /// Articles stored after the one with `after_id`, in insertion order.
    pub fn inserted_after(conn: &mut SqliteConnection, after_id: i32) -> QueryResult<Vec<Article>> {
        use crate::schema::articles::dsl::*;
        articles
            .filter(id.gt(after_id))
            .order(id.asc())
            .load::<Article>(conn)
    }

    /// Returns 0 when the article already had that flag.
    pub fn set_hidden(conn: &mut SqliteConnection, article_id: i32, hidden: bool) -> QueryResult<usize> {
        use crate::schema::articles::dsl::*;
        diesel::update(articles.filter(id.eq(article_id)).filter(is_hidden.ne(hidden)))
            .set(is_hidden.eq(hidden))
            .execute(conn)
    }
}
