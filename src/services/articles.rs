use diesel::{Connection, SqliteConnection};
use std::collections::HashMap;

use super::preferences;
use crate::clock::Clock;
use crate::errors::{AppError, AppResult};
use crate::models::{
    article::Article,
    category::NewsCategory,
    hidden_keyword::HiddenKeyword,
    reaction::{ArticleReaction, NewReaction, ReactionKind},
    read_history::{NewReadHistory, ReadHistory},
    saved_article::{NewSavedArticle, SavedArticle},
};
use crate::principal::Principal;
use crate::recommendation::{self, ArticleFilter, Catalog, UserSignals};

/// Loads everything the recommendation engine needs for one user.
pub fn load_catalog(conn: &mut SqliteConnection, user_id: i32) -> AppResult<Catalog> {
    let articles = Article::get_all(conn)?;
    let hidden_category_ids = NewsCategory::get_all(conn)?
        .into_iter()
        .filter(|c| c.is_hidden)
        .map(|c| c.id)
        .collect();
    let hidden_keywords = HiddenKeyword::all_keywords(conn)?;

    let mut reaction_counts: HashMap<(i32, ReactionKind), usize> = HashMap::new();
    for r in ArticleReaction::get_all(conn)? {
        *reaction_counts.entry((r.article_id, r.reaction)).or_insert(0) += 1;
    }

    let signals = UserSignals {
        liked: ArticleReaction::get_for_user(conn, user_id)?
            .into_iter()
            .filter(|r| r.reaction == ReactionKind::Like)
            .map(|r| r.article_id)
            .collect(),
        saved: SavedArticle::get_for_user(conn, user_id)?
            .into_iter()
            .map(|s| s.article_id)
            .collect(),
        read: ReadHistory::get_for_user(conn, user_id)?
            .into_iter()
            .map(|h| h.article_id)
            .collect(),
    };

    let preferences = preferences::preferences_for_users(conn, &[user_id])?
        .remove(&user_id)
        .unwrap_or_default();
    let keywords_by_category = preferences::keywords_by_category(conn, user_id)?;

    Ok(Catalog {
        articles,
        hidden_category_ids,
        hidden_keywords,
        reaction_counts,
        signals,
        preferences,
        keywords_by_category,
    })
}

/// The caller's ordered article listing for `filter`.
pub fn get_articles(
    conn: &mut SqliteConnection,
    clock: &dyn Clock,
    principal: &Principal,
    filter: &ArticleFilter,
) -> AppResult<Vec<Article>> {
    let catalog = load_catalog(conn, principal.user_id)?;
    let articles = recommendation::recommend(&catalog, filter, clock.today());
    log::debug!(
        "User {} got {} articles (category: {:?}, search: {:?})",
        principal.user_id,
        articles.len(),
        filter.category,
        filter.search_text()
    );
    Ok(articles)
}

/// Hidden articles only exist for admins.
fn visible_article(conn: &mut SqliteConnection, principal: &Principal, article_id: i32) -> AppResult<Article> {
    match Article::get_by_id(conn, article_id)? {
        Some(article) if !article.is_hidden || principal.is_admin() => Ok(article),
        _ => Err(AppError::resource_not_found("Article")),
    }
}

/// Returns the article and records the read. Reads by the system
/// principal are not recorded.
pub fn get_article_by_id(
    conn: &mut SqliteConnection,
    clock: &dyn Clock,
    principal: &Principal,
    article_id: i32,
) -> AppResult<Article> {
    let article = visible_article(conn, principal, article_id)?;
    if principal.is_system() {
        return Ok(article);
    }
    NewReadHistory {
        user_id: principal.user_id,
        article_id,
        read_at: clock.timestamp(),
    }
    .insert(conn)?;
    Ok(article)
}

pub fn hide_article(conn: &mut SqliteConnection, principal: &Principal, article_id: i32) -> AppResult<usize> {
    set_article_hidden(conn, principal, article_id, true)
}

pub fn unhide_article(conn: &mut SqliteConnection, principal: &Principal, article_id: i32) -> AppResult<usize> {
    set_article_hidden(conn, principal, article_id, false)
}

fn set_article_hidden(
    conn: &mut SqliteConnection,
    principal: &Principal,
    article_id: i32,
    hidden: bool,
) -> AppResult<usize> {
    principal.require_admin()?;
    if !Article::exists(conn, article_id)? {
        return Err(AppError::resource_not_found("Article"));
    }
    let changed = Article::set_hidden(conn, article_id, hidden)?;
    if changed > 0 {
        crate::log_user_action!(principal.user_id, "set_article_hidden", { "article_id": article_id, "hidden": hidden });
    }
    Ok(changed)
}

pub fn save_article(
    conn: &mut SqliteConnection,
    clock: &dyn Clock,
    principal: &Principal,
    article_id: i32,
) -> AppResult<usize> {
    principal.require_user()?;
    visible_article(conn, principal, article_id)?;
    if SavedArticle::is_saved(conn, principal.user_id, article_id)? {
        return Ok(0);
    }
    Ok(NewSavedArticle {
        user_id: principal.user_id,
        article_id,
        saved_at: clock.timestamp(),
    }
    .insert(conn)?)
}

pub fn unsave_article(conn: &mut SqliteConnection, principal: &Principal, article_id: i32) -> AppResult<usize> {
    if !Article::exists(conn, article_id)? {
        return Err(AppError::resource_not_found("Article"));
    }
    Ok(SavedArticle::delete(conn, principal.user_id, article_id)?)
}

/// Reacting twice with the same kind changes nothing; a different kind
/// replaces the earlier reaction.
pub fn react(
    conn: &mut SqliteConnection,
    clock: &dyn Clock,
    principal: &Principal,
    article_id: i32,
    kind: ReactionKind,
) -> AppResult<usize> {
    principal.require_user()?;
    visible_article(conn, principal, article_id)?;
    let now = clock.timestamp();

    conn.transaction(|conn| {
        match ArticleReaction::get_for_user_and_article(conn, principal.user_id, article_id)? {
            Some(existing) if existing.reaction == kind => Ok(0),
            Some(existing) => Ok(ArticleReaction::update_kind(conn, existing.id, kind, now)?),
            None => Ok(NewReaction {
                user_id: principal.user_id,
                article_id,
                reaction: kind,
                reacted_at: now,
            }
            .insert(conn)?),
        }
    })
}

pub fn remove_reaction(conn: &mut SqliteConnection, principal: &Principal, article_id: i32) -> AppResult<usize> {
    if !Article::exists(conn, article_id)? {
        return Err(AppError::resource_not_found("Article"));
    }
    Ok(ArticleReaction::delete_for_user_and_article(
        conn,
        principal.user_id,
        article_id,
    )?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::recommendation::CategoryScope;
    use crate::test_helpers::{get_test_db_connection, insert_article, insert_category, insert_user};

    // 2024-03-02 12:00:00 UTC
    const NOON: i64 = 1_709_380_800;

    fn clock() -> FixedClock {
        FixedClock::at_timestamp(NOON).unwrap()
    }

    #[test]
    fn test_react_transitions() {
        let mut conn = get_test_db_connection();
        let user = insert_user(&mut conn, "a@news.test", false);
        let cat = insert_category(&mut conn, "Tech");
        let article = insert_article(&mut conn, cat.id, "Rust 2.0", NOON);
        let me = Principal::user(user.id);

        assert_eq!(react(&mut conn, &clock(), &me, article.id, ReactionKind::Like).unwrap(), 1);
        assert_eq!(react(&mut conn, &clock(), &me, article.id, ReactionKind::Like).unwrap(), 0);
        assert_eq!(react(&mut conn, &clock(), &me, article.id, ReactionKind::Dislike).unwrap(), 1);

        let stored = ArticleReaction::get_for_user_and_article(&mut conn, user.id, article.id)
            .unwrap()
            .unwrap();
        assert_eq!(stored.reaction, ReactionKind::Dislike);

        assert_eq!(remove_reaction(&mut conn, &me, article.id).unwrap(), 1);
        assert_eq!(remove_reaction(&mut conn, &me, article.id).unwrap(), 0);
    }

    #[test]
    fn test_unknown_article_is_not_found() {
        let mut conn = get_test_db_connection();
        let me = Principal::user(1);
        let admin = Principal::system();

        for result in [
            react(&mut conn, &clock(), &me, 42, ReactionKind::Like),
            save_article(&mut conn, &clock(), &me, 42),
            unsave_article(&mut conn, &me, 42),
            hide_article(&mut conn, &admin, 42),
            remove_reaction(&mut conn, &me, 42),
        ] {
            assert!(matches!(result, Err(AppError::ResourceNotFound { .. })));
        }
    }

    #[test]
    fn test_save_twice_is_noop() {
        let mut conn = get_test_db_connection();
        let user = insert_user(&mut conn, "a@news.test", false);
        let cat = insert_category(&mut conn, "Tech");
        let article = insert_article(&mut conn, cat.id, "Rust 2.0", NOON);
        let me = Principal::user(user.id);

        assert_eq!(save_article(&mut conn, &clock(), &me, article.id).unwrap(), 1);
        assert_eq!(save_article(&mut conn, &clock(), &me, article.id).unwrap(), 0);
        assert_eq!(unsave_article(&mut conn, &me, article.id).unwrap(), 1);
        assert_eq!(unsave_article(&mut conn, &me, article.id).unwrap(), 0);
    }

    #[test]
    fn test_hide_is_admin_only_and_idempotent() {
        let mut conn = get_test_db_connection();
        let cat = insert_category(&mut conn, "Tech");
        let article = insert_article(&mut conn, cat.id, "Rust 2.0", NOON);
        let admin = Principal::system();

        assert_eq!(
            hide_article(&mut conn, &Principal::user(3), article.id).unwrap_err(),
            AppError::Forbidden
        );
        assert_eq!(hide_article(&mut conn, &admin, article.id).unwrap(), 1);
        assert_eq!(hide_article(&mut conn, &admin, article.id).unwrap(), 0);
        assert_eq!(unhide_article(&mut conn, &admin, article.id).unwrap(), 1);
        assert_eq!(unhide_article(&mut conn, &admin, article.id).unwrap(), 0);
    }

    #[test]
    fn test_get_article_by_id_records_reads_and_hides_hidden() {
        let mut conn = get_test_db_connection();
        let user = insert_user(&mut conn, "a@news.test", false);
        let cat = insert_category(&mut conn, "Tech");
        let article = insert_article(&mut conn, cat.id, "Rust 2.0", NOON);
        let me = Principal::user(user.id);

        get_article_by_id(&mut conn, &clock(), &me, article.id).unwrap();
        get_article_by_id(&mut conn, &clock(), &me, article.id).unwrap();
        assert_eq!(ReadHistory::get_for_user(&mut conn, user.id).unwrap().len(), 2);

        hide_article(&mut conn, &Principal::system(), article.id).unwrap();
        assert!(matches!(
            get_article_by_id(&mut conn, &clock(), &me, article.id),
            Err(AppError::ResourceNotFound { .. })
        ));
        assert!(get_article_by_id(&mut conn, &clock(), &Principal::system(), article.id).is_ok());
        assert!(ReadHistory::get_for_user(&mut conn, Principal::system().user_id)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_system_principal_cannot_save_or_react() {
        let mut conn = get_test_db_connection();
        let cat = insert_category(&mut conn, "Tech");
        let article = insert_article(&mut conn, cat.id, "Rust 2.0", NOON);
        let system = Principal::system();

        assert_eq!(
            save_article(&mut conn, &clock(), &system, article.id).unwrap_err(),
            AppError::Forbidden
        );
        assert_eq!(
            react(&mut conn, &clock(), &system, article.id, ReactionKind::Like).unwrap_err(),
            AppError::Forbidden
        );
        assert!(SavedArticle::get_for_user(&mut conn, system.user_id).unwrap().is_empty());
        assert!(ArticleReaction::get_all(&mut conn).unwrap().is_empty());
    }

    #[test]
    fn test_get_articles_uses_stored_signals() {
        let mut conn = get_test_db_connection();
        let user = insert_user(&mut conn, "a@news.test", false);
        let tech = insert_category(&mut conn, "Tech");
        let sports = insert_category(&mut conn, "Sports");
        let rust = insert_article(&mut conn, tech.id, "Rust 2.0", NOON);
        let go = insert_article(&mut conn, tech.id, "Go generics", NOON - 60);
        insert_article(&mut conn, sports.id, "Cup final", NOON - 120);
        let me = Principal::user(user.id);

        // nothing read, liked, saved or enabled yet
        let feed = get_articles(&mut conn, &clock(), &me, &ArticleFilter::default()).unwrap();
        assert!(feed.is_empty());

        react(&mut conn, &clock(), &me, go.id, ReactionKind::Like).unwrap();
        let feed = get_articles(&mut conn, &clock(), &me, &ArticleFilter::default()).unwrap();
        let ids: Vec<i32> = feed.iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![rust.id, go.id]);

        let filter = ArticleFilter {
            category: CategoryScope::Id(tech.id),
            ..Default::default()
        };
        let feed = get_articles(&mut conn, &clock(), &me, &filter).unwrap();
        let ids: Vec<i32> = feed.iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![go.id, rust.id]);
    }
}
