use diesel::SqliteConnection;
use std::collections::HashSet;

use super::preferences;
use crate::clock::Clock;
use crate::errors::AppResult;
use crate::models::{
    article::Article,
    category::NewsCategory,
    hidden_keyword::HiddenKeyword,
    notification::{NewNotification, Notification},
    notification_preference::NotificationPreference,
    user::User,
};
use crate::principal::Principal;
use crate::recommendation::{
    filter::{apply_visibility, lowercase_all},
    ranking::keyword_match_count,
};

/// Creates one notification per (subscribed user, matching article). An
/// article matches when it is visible, its category is enabled for the user
/// and, if the user keeps keywords for that category, one of them appears.
/// Users are never notified twice about the same article.
pub fn notify_for_articles(
    conn: &mut SqliteConnection,
    clock: &dyn Clock,
    articles: &[Article],
) -> AppResult<usize> {
    if articles.is_empty() {
        return Ok(0);
    }

    let hidden_category_ids: HashSet<i32> = NewsCategory::get_all(conn)?
        .into_iter()
        .filter(|c| c.is_hidden)
        .map(|c| c.id)
        .collect();
    let hidden_keywords = HiddenKeyword::all_keywords(conn)?;
    let visible = apply_visibility(articles.to_vec(), &hidden_category_ids, &hidden_keywords);
    if visible.is_empty() {
        return Ok(0);
    }

    let user_ids = NotificationPreference::user_ids_with_enabled(conn)?;
    let by_user = preferences::preferences_for_users(conn, &user_ids)?;
    let now = clock.timestamp();

    let mut rows = Vec::new();
    for user_id in user_ids {
        let Some(prefs) = by_user.get(&user_id) else {
            continue;
        };
        for pref in prefs {
            let keywords = lowercase_all(&pref.keywords);
            for article in visible.iter().filter(|a| a.category_id == pref.category_id) {
                if !keywords.is_empty() && keyword_match_count(article, &keywords) == 0 {
                    continue;
                }
                if Notification::exists_for_user_and_article(conn, user_id, article.id)? {
                    continue;
                }
                rows.push(NewNotification {
                    user_id,
                    article_id: Some(article.id),
                    message: format!("New article: {}", article.title),
                    created_at: now,
                    is_read: false,
                });
            }
        }
    }

    let created = NewNotification::insert_all(conn, &rows)?;
    log::info!(
        "Created {} notifications for {} articles",
        created,
        visible.len()
    );
    Ok(created)
}

/// Alerts every admin.
pub fn notify_admins(
    conn: &mut SqliteConnection,
    clock: &dyn Clock,
    message: &str,
    article_id: Option<i32>,
) -> AppResult<usize> {
    let now = clock.timestamp();
    let rows: Vec<NewNotification> = User::get_all_admin(conn)?
        .into_iter()
        .map(|admin| NewNotification {
            user_id: admin.id,
            article_id,
            message: message.to_string(),
            created_at: now,
            is_read: false,
        })
        .collect();
    if rows.is_empty() {
        log::warn!("No admins to notify: {message}");
    }
    Ok(NewNotification::insert_all(conn, &rows)?)
}

pub fn notifications_for(
    conn: &mut SqliteConnection,
    principal: &Principal,
    user_id: i32,
) -> AppResult<Vec<Notification>> {
    principal.require_self_or_admin(user_id)?;
    Ok(Notification::get_for_user(conn, user_id)?)
}

/// 0 when the notification was already read or belongs to someone else.
pub fn mark_notification_read(
    conn: &mut SqliteConnection,
    principal: &Principal,
    notification_id: i32,
) -> AppResult<usize> {
    Ok(Notification::mark_read(conn, principal.user_id, notification_id)?)
}
