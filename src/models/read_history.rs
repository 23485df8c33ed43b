use crate::schema::*;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Identifiable, PartialEq)]
#[diesel(table_name = read_histories)]
pub struct ReadHistory {
    pub id: i32,
    pub user_id: i32,
    pub article_id: i32,
    pub read_at: i64,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = read_histories)]
pub struct NewReadHistory {
    pub user_id: i32,
    pub article_id: i32,
    pub read_at: i64,
}

impl NewReadHistory {
    pub fn insert(&self, conn: &mut SqliteConnection) -> QueryResult<usize> {
        use crate::schema::read_histories::dsl::*;
        diesel::insert_into(read_histories).values(self).execute(conn)
    }
}

impl ReadHistory {
    /// Every read, including repeat reads of the same article.
    pub fn get_for_user(conn: &mut SqliteConnection, for_user: i32) -> QueryResult<Vec<ReadHistory>> {
        use crate::schema::read_histories::dsl::*;
        read_histories
            .filter(user_id.eq(for_user))
            .order(id.asc())
            .load::<ReadHistory>(conn)
    }
}
