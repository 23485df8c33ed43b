use diesel::SqliteConnection;
use std::sync::Arc;
use std::time::Duration;

use crate::{
    clock::Clock,
    errors::AppResult,
    models::{
        article::Article,
        setting::{Setting, NOTIFIER_LAST_ARTICLE_KEY},
    },
    services::notifications,
    DbPool,
};

/// Notifies users about articles stored since the previous pass. The
/// mark is the last article id handled, so articles sharing a publish
/// second or ingested late with an older date are still picked up.
/// Articles dated in the future wait for a later pass and hold the mark
/// back; notifications already sent are not repeated.
pub fn run_once(conn: &mut SqliteConnection, clock: &dyn Clock) -> AppResult<usize> {
    let last_seen = Setting::get_parsed::<i32>(conn, NOTIFIER_LAST_ARTICLE_KEY)?.unwrap_or(0);
    let now = clock.timestamp();

    let stored = Article::inserted_after(conn, last_seen)?;
    let mark = stored
        .iter()
        .take_while(|a| a.published_at <= now)
        .map(|a| a.id)
        .last();
    let due: Vec<Article> = stored.into_iter().filter(|a| a.published_at <= now).collect();
    if due.is_empty() {
        log::debug!("No articles due since article {last_seen}");
        return Ok(0);
    }

    let created = notifications::notify_for_articles(conn, clock, &due)?;
    if let Some(mark) = mark {
        Setting::set(conn, NOTIFIER_LAST_ARTICLE_KEY, &mark.to_string())?;
    }
    log::info!(
        "Notifier pass: {} due articles, {} notifications",
        due.len(),
        created
    );
    Ok(created)
}

pub async fn start(pool: DbPool, clock: Arc<dyn Clock>, interval: Duration) {
    loop {
        match pool.get() {
            Ok(mut conn) => {
                if let Err(e) = run_once(&mut conn, clock.as_ref()) {
                    log::error!("Notifier pass failed: {e}");
                }
            }
            Err(e) => log::error!("Error getting DB connection: {e:?}"),
        }
        tokio::time::sleep(interval).await;
    }
}
