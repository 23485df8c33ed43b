use super::{article::Article, user::User};
use crate::schema::*;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Identifiable, Associations, PartialEq)]
#[diesel(belongs_to(User))]
#[diesel(belongs_to(Article))]
#[diesel(table_name = article_reports)]
pub struct ArticleReport {
    pub id: i32,
    pub user_id: i32,
    pub article_id: i32,
    pub reason: String,
    pub reported_at: i64,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = article_reports)]
pub struct NewReport<'a> {
    pub user_id: i32,
    pub article_id: i32,
    pub reason: &'a str,
    pub reported_at: i64,
}

impl<'a> NewReport<'a> {
    pub fn insert(&self, conn: &mut SqliteConnection) -> QueryResult<usize> {
        use crate::schema::article_reports::dsl::*;
        diesel::insert_into(article_reports).values(self).execute(conn)
    }
}

impl ArticleReport {
    pub fn exists(conn: &mut SqliteConnection, for_user: i32, for_article: i32) -> QueryResult<bool> {
        use crate::schema::article_reports::dsl::*;
        diesel::select(diesel::dsl::exists(
            article_reports
                .filter(user_id.eq(for_user))
                .filter(article_id.eq(for_article)),
        ))
        .get_result(conn)
    }

    pub fn count_for_article(conn: &mut SqliteConnection, for_article: i32) -> QueryResult<i64> {
        use crate::schema::article_reports::dsl::*;
        article_reports
            .filter(article_id.eq(for_article))
            .count()
            .get_result(conn)
    }

    pub fn get_for_article(conn: &mut SqliteConnection, for_article: i32) -> QueryResult<Vec<ArticleReport>> {
        use crate::schema::article_reports::dsl::*;
        article_reports
            .filter(article_id.eq(for_article))
            .order(id.asc())
            .load::<ArticleReport>(conn)
    }

    pub fn get_all(conn: &mut SqliteConnection) -> QueryResult<Vec<ArticleReport>> {
        use crate::schema::article_reports::dsl::*;
        article_reports
            .order(reported_at.desc())
            .load::<ArticleReport>(conn)
    }
}
