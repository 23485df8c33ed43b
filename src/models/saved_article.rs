use super::{article::Article, user::User};
use crate::schema::*;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Identifiable, Associations, PartialEq)]
#[diesel(belongs_to(User))]
#[diesel(belongs_to(Article))]
#[diesel(table_name = saved_articles)]
pub struct SavedArticle {
    pub id: i32,
    pub user_id: i32,
    pub article_id: i32,
    pub saved_at: i64,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = saved_articles)]
pub struct NewSavedArticle {
    pub user_id: i32,
    pub article_id: i32,
    pub saved_at: i64,
}

impl NewSavedArticle {
    pub fn insert(&self, conn: &mut SqliteConnection) -> QueryResult<usize> {
        use crate::schema::saved_articles::dsl::*;
        diesel::insert_into(saved_articles).values(self).execute(conn)
    }
}

impl SavedArticle {
    pub fn is_saved(conn: &mut SqliteConnection, for_user: i32, for_article: i32) -> QueryResult<bool> {
        use crate::schema::saved_articles::dsl::*;
        diesel::select(diesel::dsl::exists(
            saved_articles
                .filter(user_id.eq(for_user))
                .filter(article_id.eq(for_article)),
        ))
        .get_result(conn)
    }

    pub fn delete(conn: &mut SqliteConnection, for_user: i32, for_article: i32) -> QueryResult<usize> {
        use crate::schema::saved_articles::dsl::*;
        diesel::delete(
            saved_articles
                .filter(user_id.eq(for_user))
                .filter(article_id.eq(for_article)),
        )
        .execute(conn)
    }

    pub fn get_for_user(conn: &mut SqliteConnection, for_user: i32) -> QueryResult<Vec<SavedArticle>> {
        use crate::schema::saved_articles::dsl::*;
        saved_articles
            .filter(user_id.eq(for_user))
            .order(id.asc())
            .load::<SavedArticle>(conn)
    }
}
