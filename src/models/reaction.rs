use super::{article::Article, user::User};
use crate::schema::*;
use diesel::{
    backend::Backend,
    deserialize::{self, FromSql, FromSqlRow},
    prelude::*,
    serialize::{self, Output, ToSql},
    sql_types::Integer,
    AsExpression,
};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

#[repr(i32)]
#[derive(Debug, Serialize, Deserialize, AsExpression, Clone, Copy, FromSqlRow, PartialEq, Eq, Hash)]
#[diesel(sql_type = Integer)]
pub enum ReactionKind {
    Like = 1,
    Dislike = 2,
}

impl fmt::Display for ReactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReactionKind::Like => write!(f, "Like"),
            ReactionKind::Dislike => write!(f, "Dislike"),
        }
    }
}

impl FromStr for ReactionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "like" => Ok(ReactionKind::Like),
            "dislike" => Ok(ReactionKind::Dislike),
            other => Err(format!("unknown reaction '{other}'")),
        }
    }
}

impl<DB> FromSql<Integer, DB> for ReactionKind
where
    DB: Backend,
    i32: FromSql<Integer, DB>,
{
    fn from_sql(bytes: DB::RawValue<'_>) -> deserialize::Result<Self> {
        match i32::from_sql(bytes)? {
            1 => Ok(ReactionKind::Like),
            2 => Ok(ReactionKind::Dislike),
            _ => Err("Unrecognized enum variant".into()),
        }
    }
}

impl<DB> ToSql<Integer, DB> for ReactionKind
where
    DB: Backend,
    i32: ToSql<Integer, DB>,
{
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, DB>) -> serialize::Result {
        match self {
            ReactionKind::Like => 1.to_sql(out),
            ReactionKind::Dislike => 2.to_sql(out),
        }
    }
}

/// One active reaction per (user, article).
#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Identifiable, Associations, PartialEq)]
#[diesel(belongs_to(User))]
#[diesel(belongs_to(Article))]
#[diesel(table_name = article_reactions)]
pub struct ArticleReaction {
    pub id: i32,
    pub user_id: i32,
    pub article_id: i32,
    pub reaction: ReactionKind,
    pub reacted_at: i64,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = article_reactions)]
pub struct NewReaction {
    pub user_id: i32,
    pub article_id: i32,
    pub reaction: ReactionKind,
    pub reacted_at: i64,
}

impl NewReaction {
    pub fn insert(&self, conn: &mut SqliteConnection) -> QueryResult<usize> {
        use crate::schema::article_reactions::dsl::*;
        diesel::insert_into(article_reactions).values(self).execute(conn)
    }
}

impl ArticleReaction {
    pub fn get_for_user_and_article(
        conn: &mut SqliteConnection,
        for_user: i32,
        for_article: i32,
    ) -> QueryResult<Option<ArticleReaction>> {
        use crate::schema::article_reactions::dsl::*;
        article_reactions
            .filter(user_id.eq(for_user))
            .filter(article_id.eq(for_article))
            .first::<ArticleReaction>(conn)
            .optional()
    }

    pub fn update_kind(
        conn: &mut SqliteConnection,
        reaction_id: i32,
        kind: ReactionKind,
        at: i64,
    ) -> QueryResult<usize> {
        use crate::schema::article_reactions::dsl::*;
        diesel::update(article_reactions.filter(id.eq(reaction_id)))
            .set((reaction.eq(kind), reacted_at.eq(at)))
            .execute(conn)
    }

    pub fn delete_for_user_and_article(
        conn: &mut SqliteConnection,
        for_user: i32,
        for_article: i32,
    ) -> QueryResult<usize> {
        use crate::schema::article_reactions::dsl::*;
        diesel::delete(
            article_reactions
                .filter(user_id.eq(for_user))
                .filter(article_id.eq(for_article)),
        )
        .execute(conn)
    }

    pub fn get_all(conn: &mut SqliteConnection) -> QueryResult<Vec<ArticleReaction>> {
        use crate::schema::article_reactions::dsl::*;
        article_reactions.order(id.asc()).load::<ArticleReaction>(conn)
    }

    pub fn get_for_user(conn: &mut SqliteConnection, for_user: i32) -> QueryResult<Vec<ArticleReaction>> {
        use crate::schema::article_reactions::dsl::*;
        article_reactions
            .filter(user_id.eq(for_user))
            .order(id.asc())
            .load::<ArticleReaction>(conn)
    }
}
