pub mod clock;
pub mod config;
pub mod errors;
pub mod models;
pub mod observability;
pub mod principal;
pub mod recommendation;
pub mod schema;
pub mod security;
pub mod services;
pub mod tasks;
#[cfg(test)]
pub mod test_helpers;

use diesel::r2d2::{self, ConnectionManager};
use diesel::sqlite::SqliteConnection;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};

use crate::errors::{AppError, AppResult};

pub type DbPool = r2d2::Pool<ConnectionManager<SqliteConnection>>;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("src/migrations");

pub fn initialize_db_pool(db_path: &str) -> AppResult<DbPool> {
    let manager = ConnectionManager::<SqliteConnection>::new(db_path);
    Ok(r2d2::Pool::builder().build(manager)?)
}

/// Applies pending migrations, returning how many ran.
pub fn run_migrations(conn: &mut SqliteConnection) -> AppResult<usize> {
    let applied = conn.run_pending_migrations(MIGRATIONS).map_err(|e| {
        log::error!("Failed to run migrations: {e}");
        AppError::DatabaseError
    })?;
    Ok(applied.len())
}
