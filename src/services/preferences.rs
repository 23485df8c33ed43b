use diesel::SqliteConnection;
use std::collections::HashMap;

use crate::errors::{AppError, AppResult};
use crate::models::{
    category::NewsCategory,
    notification_preference::{NewNotificationPreference, NotificationPreference},
    user::User,
    user_keyword::UserNewsKeyword,
};
use crate::principal::Principal;
use crate::recommendation::CategoryPreference;

/// Enabled categories per user, each with that user's enabled keywords for
/// the category. Users without enabled preferences are simply absent.
pub fn preferences_for_users(
    conn: &mut SqliteConnection,
    user_ids: &[i32],
) -> AppResult<HashMap<i32, Vec<CategoryPreference>>> {
    if user_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let prefs = NotificationPreference::get_enabled_for_users(conn, user_ids)?;
    let mut keywords = keywords_by_user_and_category(conn, user_ids)?;

    let mut by_user: HashMap<i32, Vec<CategoryPreference>> = HashMap::new();
    for pref in prefs {
        let category_keywords = keywords
            .remove(&(pref.user_id, pref.category_id))
            .unwrap_or_default();
        by_user.entry(pref.user_id).or_default().push(CategoryPreference {
            category_id: pref.category_id,
            keywords: category_keywords,
        });
    }
    Ok(by_user)
}

/// One user's enabled keywords grouped by category.
pub fn keywords_by_category(conn: &mut SqliteConnection, user_id: i32) -> AppResult<HashMap<i32, Vec<String>>> {
    Ok(keywords_by_user_and_category(conn, &[user_id])?
        .into_iter()
        .map(|((_, category_id), words)| (category_id, words))
        .collect())
}

fn keywords_by_user_and_category(
    conn: &mut SqliteConnection,
    user_ids: &[i32],
) -> AppResult<HashMap<(i32, i32), Vec<String>>> {
    let mut grouped: HashMap<(i32, i32), Vec<String>> = HashMap::new();
    for kw in UserNewsKeyword::get_enabled_for_users(conn, user_ids)? {
        grouped
            .entry((kw.user_id, kw.category_id))
            .or_default()
            .push(kw.keyword);
    }
    Ok(grouped)
}

pub fn get_preferences(
    conn: &mut SqliteConnection,
    principal: &Principal,
    user_id: i32,
) -> AppResult<Vec<NotificationPreference>> {
    principal.require_self_or_admin(user_id)?;
    Ok(NotificationPreference::get_for_user(conn, user_id)?)
}

pub fn set_preference(
    conn: &mut SqliteConnection,
    principal: &Principal,
    user_id: i32,
    category_id: i32,
    enabled: bool,
) -> AppResult<NotificationPreference> {
    principal.require_self_or_admin(user_id)?;
    if NewsCategory::get_by_id(conn, category_id)?.is_none() {
        return Err(AppError::resource_not_found("Category"));
    }

    let pref = NewNotificationPreference {
        user_id,
        category_id,
        is_enabled: enabled,
    }
    .upsert(conn)?;
    log::info!(
        "User {} set notifications for category {} to {}",
        user_id,
        category_id,
        enabled
    );
    Ok(pref)
}

/// Gives every existing user a disabled preference row for a new category.
pub fn seed_for_category(conn: &mut SqliteConnection, category_id: i32) -> AppResult<usize> {
    let rows: Vec<NewNotificationPreference> = User::get_all_ids(conn)?
        .into_iter()
        .map(|user_id| NewNotificationPreference {
            user_id,
            category_id,
            is_enabled: false,
        })
        .collect();
    let inserted = NewNotificationPreference::insert_batched(conn, &rows)?;
    log::info!("Seeded {} preference rows for category {}", inserted, category_id);
    Ok(inserted)
}

/// Gives a new user a disabled preference row for every category.
pub fn seed_for_new_user(conn: &mut SqliteConnection, user_id: i32) -> AppResult<usize> {
    let rows: Vec<NewNotificationPreference> = NewsCategory::get_all_ids(conn)?
        .into_iter()
        .map(|category_id| NewNotificationPreference {
            user_id,
            category_id,
            is_enabled: false,
        })
        .collect();
    Ok(NewNotificationPreference::insert_batched(conn, &rows)?)
}
