use diesel::prelude::*;
use diesel::r2d2::{self, ConnectionManager};
use diesel::sqlite::SqliteConnection;
use diesel_migrations::MigrationHarness;
use tempfile::TempDir;

use crate::models::{
    article::{Article, NewArticle},
    category::{NewCategory, NewsCategory},
    user::{NewUser, User},
};
use crate::principal::Principal;
use crate::{DbPool, MIGRATIONS};

/// Create a test database with a temporary file
pub fn create_test_db() -> (TempDir, DbPool) {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
    let db_path = temp_dir.path().join("test.db");

    let manager = ConnectionManager::<SqliteConnection>::new(db_path.to_string_lossy());
    let pool = r2d2::Pool::builder()
        .max_size(1)
        .build(manager)
        .expect("Failed to create pool");

    // Run migrations
    let mut conn = pool.get().expect("Failed to get connection");
    conn.run_pending_migrations(MIGRATIONS)
        .expect("Failed to run migrations");

    (temp_dir, pool)
}

/// Create an in-memory test database connection
pub fn get_test_db_connection() -> SqliteConnection {
    let mut conn = SqliteConnection::establish(":memory:")
        .unwrap_or_else(|_| panic!("Error connecting to in-memory SQLite database"));

    conn.run_pending_migrations(MIGRATIONS)
        .expect("Failed to run migrations");
    conn
}

pub fn insert_user(conn: &mut SqliteConnection, email: &str, is_admin: bool) -> User {
    let new_user = NewUser {
        email: email.to_string(),
        is_admin,
    };
    User::create(conn, &new_user, &Principal::system()).expect("Failed to create user")
}

pub fn insert_category(conn: &mut SqliteConnection, name: &str) -> NewsCategory {
    NewCategory {
        name,
        is_hidden: false,
    }
    .insert(conn)
    .expect("Failed to create category")
}

pub fn insert_article(conn: &mut SqliteConnection, category_id: i32, title: &str, published_at: i64) -> Article {
    let url = format!("https://news.test/{}", title.replace(' ', "-"));
    NewArticle {
        title,
        url: &url,
        published_at,
        category_id,
        ..Default::default()
    }
    .insert(conn)
    .expect("Failed to create article")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_test_db() {
        let (_temp_dir, pool) = create_test_db();
        let mut conn = pool.get().expect("Failed to get connection");

        let result = diesel::sql_query("SELECT 1").execute(&mut conn);
        assert_eq!(result, Ok(1));
    }

    #[test]
    fn test_helpers_insert_rows() {
        let mut conn = get_test_db_connection();
        let user = insert_user(&mut conn, "reader@news.test", false);
        let cat = insert_category(&mut conn, "Science");
        let article = insert_article(&mut conn, cat.id, "Comet sighted", 10);

        assert_eq!(user.role, "user");
        assert_eq!(article.category_id, cat.id);
        assert_eq!(article.url, "https://news.test/Comet-sighted");
    }
}
