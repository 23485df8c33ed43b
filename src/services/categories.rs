use diesel::{Connection, SqliteConnection};

use super::preferences;
use crate::errors::{AppError, AppResult};
use crate::models::category::{NewCategory, NewsCategory};
use crate::principal::Principal;
use crate::security::validation;

/// Creates a category and seeds a disabled preference row for every user.
pub fn create_category(
    conn: &mut SqliteConnection,
    principal: &Principal,
    name: &str,
) -> AppResult<NewsCategory> {
    principal.require_admin()?;
    let name = validation::validate_category_name(name).map_err(|e| AppError::invalid_input("name", &e))?;

    conn.transaction(|conn| {
        if NewsCategory::get_by_name(conn, &name)?.is_some() {
            return Err(AppError::duplicate_resource("Category"));
        }
        let category = NewCategory {
            name: &name,
            is_hidden: false,
        }
        .insert(conn)?;
        preferences::seed_for_category(conn, category.id)?;
        crate::log_user_action!(principal.user_id, "create_category", { "category_id": category.id, "name": &category.name });
        Ok(category)
    })
}

/// Returns 0 when the category already had that flag.
pub fn set_category_hidden(
    conn: &mut SqliteConnection,
    principal: &Principal,
    category_id: i32,
    hidden: bool,
) -> AppResult<usize> {
    principal.require_admin()?;
    if NewsCategory::get_by_id(conn, category_id)?.is_none() {
        return Err(AppError::resource_not_found("Category"));
    }
    let changed = NewsCategory::set_hidden(conn, category_id, hidden)?;
    if changed > 0 {
        crate::log_user_action!(principal.user_id, "set_category_hidden", { "category_id": category_id, "hidden": hidden });
    }
    Ok(changed)
}

/// Admins see every category, everyone else only the visible ones.
pub fn list_categories(conn: &mut SqliteConnection, principal: &Principal) -> AppResult<Vec<NewsCategory>> {
    let all = NewsCategory::get_all(conn)?;
    if principal.is_admin() {
        return Ok(all);
    }
    Ok(all.into_iter().filter(|c| !c.is_hidden).collect())
}
