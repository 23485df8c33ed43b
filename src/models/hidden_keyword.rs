use crate::schema::*;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

/// Admin-defined substring that hides matching articles from everyone.
#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Identifiable, PartialEq)]
#[diesel(table_name = hidden_keywords)]
pub struct HiddenKeyword {
    pub id: i32,
    pub keyword: String,
    pub created_at: i64,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = hidden_keywords)]
pub struct NewHiddenKeyword<'a> {
    pub keyword: &'a str,
    pub created_at: i64,
}

impl<'a> NewHiddenKeyword<'a> {
    pub fn insert(&self, conn: &mut SqliteConnection) -> QueryResult<HiddenKeyword> {
        use crate::schema::hidden_keywords::dsl::*;
        diesel::insert_into(hidden_keywords).values(self).get_result(conn)
    }
}

impl HiddenKeyword {
    pub fn get_all(conn: &mut SqliteConnection) -> QueryResult<Vec<HiddenKeyword>> {
        use crate::schema::hidden_keywords::dsl::*;
        hidden_keywords.order(id.asc()).load::<HiddenKeyword>(conn)
    }

    /// Just the keyword strings, which is all the article filter needs.
    pub fn all_keywords(conn: &mut SqliteConnection) -> QueryResult<Vec<String>> {
        use crate::schema::hidden_keywords::dsl::*;
        hidden_keywords.select(keyword).load::<String>(conn)
    }

    /// Case-insensitive thanks to the column collation.
    pub fn exists(conn: &mut SqliteConnection, text: &str) -> QueryResult<bool> {
        use crate::schema::hidden_keywords::dsl::*;
        diesel::select(diesel::dsl::exists(hidden_keywords.filter(keyword.eq(text)))).get_result(conn)
    }

    pub fn delete(conn: &mut SqliteConnection, keyword_id: i32) -> QueryResult<usize> {
        use crate::schema::hidden_keywords::dsl::*;
        diesel::delete(hidden_keywords.filter(id.eq(keyword_id))).execute(conn)
    }
}
