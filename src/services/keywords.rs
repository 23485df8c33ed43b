use diesel::SqliteConnection;

use crate::clock::Clock;
use crate::errors::{AppError, AppResult};
use crate::models::{
    category::NewsCategory,
    hidden_keyword::{HiddenKeyword, NewHiddenKeyword},
    user_keyword::{NewUserNewsKeyword, UserNewsKeyword},
};
use crate::principal::Principal;
use crate::security::validation;

fn checked_keyword(text: &str) -> AppResult<String> {
    validation::validate_keyword(text).map_err(|e| AppError::invalid_input("keyword", &e))
}

pub fn add_hidden_keyword(
    conn: &mut SqliteConnection,
    clock: &dyn Clock,
    principal: &Principal,
    text: &str,
) -> AppResult<HiddenKeyword> {
    principal.require_admin()?;
    let keyword = checked_keyword(text)?;
    if HiddenKeyword::exists(conn, &keyword)? {
        return Err(AppError::duplicate_resource("Hidden keyword"));
    }
    let created = NewHiddenKeyword {
        keyword: &keyword,
        created_at: clock.timestamp(),
    }
    .insert(conn)?;
    crate::log_user_action!(principal.user_id, "add_hidden_keyword", { "keyword": &created.keyword });
    Ok(created)
}

pub fn remove_hidden_keyword(conn: &mut SqliteConnection, principal: &Principal, keyword_id: i32) -> AppResult<usize> {
    principal.require_admin()?;
    match HiddenKeyword::delete(conn, keyword_id)? {
        0 => Err(AppError::resource_not_found("Hidden keyword")),
        n => Ok(n),
    }
}

pub fn list_hidden_keywords(conn: &mut SqliteConnection, principal: &Principal) -> AppResult<Vec<HiddenKeyword>> {
    principal.require_admin()?;
    Ok(HiddenKeyword::get_all(conn)?)
}

pub fn add_user_keyword(
    conn: &mut SqliteConnection,
    principal: &Principal,
    category_id: i32,
    text: &str,
) -> AppResult<UserNewsKeyword> {
    principal.require_user()?;
    let keyword = checked_keyword(text)?;
    if NewsCategory::get_by_id(conn, category_id)?.is_none() {
        return Err(AppError::resource_not_found("Category"));
    }
    if UserNewsKeyword::exists(conn, principal.user_id, category_id, &keyword)? {
        return Err(AppError::duplicate_resource("Keyword"));
    }
    Ok(NewUserNewsKeyword {
        user_id: principal.user_id,
        category_id,
        keyword: &keyword,
        is_enabled: true,
    }
    .insert(conn)?)
}

fn owned_keyword(conn: &mut SqliteConnection, principal: &Principal, keyword_id: i32) -> AppResult<UserNewsKeyword> {
    let keyword = UserNewsKeyword::get_by_id(conn, keyword_id)?
        .ok_or_else(|| AppError::resource_not_found("Keyword"))?;
    principal.require_self_or_admin(keyword.user_id)?;
    Ok(keyword)
}

/// Returns 0 when the keyword already had that state.
pub fn set_user_keyword_enabled(
    conn: &mut SqliteConnection,
    principal: &Principal,
    keyword_id: i32,
    enabled: bool,
) -> AppResult<usize> {
    owned_keyword(conn, principal, keyword_id)?;
    Ok(UserNewsKeyword::set_enabled(conn, keyword_id, enabled)?)
}

pub fn delete_user_keyword(conn: &mut SqliteConnection, principal: &Principal, keyword_id: i32) -> AppResult<usize> {
    owned_keyword(conn, principal, keyword_id)?;
    Ok(UserNewsKeyword::delete(conn, keyword_id)?)
}

pub fn list_user_keywords(
    conn: &mut SqliteConnection,
    principal: &Principal,
    user_id: i32,
) -> AppResult<Vec<UserNewsKeyword>> {
    principal.require_self_or_admin(user_id)?;
    Ok(UserNewsKeyword::get_for_user(conn, user_id)?)
}
