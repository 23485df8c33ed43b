use diesel::{Connection, SqliteConnection};

use super::notifications;
use crate::clock::Clock;
use crate::errors::{AppError, AppResult};
use crate::models::{
    article::Article,
    report::{ArticleReport, NewReport},
    setting::{Setting, REPORT_THRESHOLD_KEY},
};
use crate::principal::Principal;

const MAX_REASON_LEN: usize = 500;

/// The stored setting wins over the configured default.
pub fn effective_report_threshold(conn: &mut SqliteConnection, default_threshold: i64) -> AppResult<i64> {
    match Setting::get_parsed::<i64>(conn, REPORT_THRESHOLD_KEY)? {
        Some(threshold) if threshold > 0 => Ok(threshold),
        Some(threshold) => {
            log::warn!("Ignoring non-positive report threshold {threshold}");
            Ok(default_threshold)
        }
        None => Ok(default_threshold),
    }
}

/// Records a report. Once an article collects `threshold` reports it is
/// hidden and every admin gets an alert. A repeat report by the same user
/// changes nothing.
pub fn report_article(
    conn: &mut SqliteConnection,
    clock: &dyn Clock,
    principal: &Principal,
    article_id: i32,
    reason: &str,
    default_threshold: i64,
) -> AppResult<usize> {
    principal.require_user()?;
    let reason = reason.trim();
    if reason.chars().count() > MAX_REASON_LEN {
        return Err(AppError::invalid_input(
            "reason",
            &format!("Reason must be at most {MAX_REASON_LEN} characters"),
        ));
    }
    let threshold = effective_report_threshold(conn, default_threshold)?;

    conn.transaction(|conn| {
        let article = Article::get_by_id(conn, article_id)?
            .ok_or_else(|| AppError::resource_not_found("Article"))?;
        if ArticleReport::exists(conn, principal.user_id, article_id)? {
            return Ok(0);
        }

        let inserted = NewReport {
            user_id: principal.user_id,
            article_id,
            reason,
            reported_at: clock.timestamp(),
        }
        .insert(conn)?;

        let count = ArticleReport::count_for_article(conn, article_id)?;
        if count >= threshold && !article.is_hidden {
            Article::set_hidden(conn, article_id, true)?;
            log::warn!(
                "Article {} hidden after {} reports (threshold {})",
                article_id,
                count,
                threshold
            );
            let message = format!(
                "Article \"{}\" was hidden after {} reports",
                article.title, count
            );
            notifications::notify_admins(conn, clock, &message, Some(article_id))?;
        }
        Ok(inserted)
    })
}

pub fn list_reports(conn: &mut SqliteConnection, principal: &Principal) -> AppResult<Vec<ArticleReport>> {
    principal.require_admin()?;
    Ok(ArticleReport::get_all(conn)?)
}

pub fn reports_for_article(
    conn: &mut SqliteConnection,
    principal: &Principal,
    article_id: i32,
) -> AppResult<Vec<ArticleReport>> {
    principal.require_admin()?;
    if !Article::exists(conn, article_id)? {
        return Err(AppError::resource_not_found("Article"));
    }
    Ok(ArticleReport::get_for_article(conn, article_id)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::models::notification::Notification;
    use crate::test_helpers::{get_test_db_connection, insert_article, insert_category, insert_user};

    const NOW: i64 = 1_709_380_800;

    fn clock() -> FixedClock {
        FixedClock::at_timestamp(NOW).unwrap()
    }

    #[test]
    fn test_threshold_hides_and_alerts_admins() {
        let mut conn = get_test_db_connection();
        let admin = insert_user(&mut conn, "admin@news.test", true);
        let a = insert_user(&mut conn, "a@news.test", false);
        let b = insert_user(&mut conn, "b@news.test", false);
        let cat = insert_category(&mut conn, "Tech");
        let article = insert_article(&mut conn, cat.id, "Clickbait", NOW);

        assert_eq!(report_article(&mut conn, &clock(), &Principal::user(a.id), article.id, "spam", 2).unwrap(), 1);
        // same user again
        assert_eq!(report_article(&mut conn, &clock(), &Principal::user(a.id), article.id, "spam", 2).unwrap(), 0);
        assert!(!Article::get_by_id(&mut conn, article.id).unwrap().unwrap().is_hidden);

        assert_eq!(report_article(&mut conn, &clock(), &Principal::user(b.id), article.id, "", 2).unwrap(), 1);
        assert!(Article::get_by_id(&mut conn, article.id).unwrap().unwrap().is_hidden);

        let alerts = Notification::get_for_user(&mut conn, admin.id).unwrap();
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].article_id, Some(article.id));
    }

    #[test]
    fn test_setting_overrides_threshold() {
        let mut conn = get_test_db_connection();
        assert_eq!(effective_report_threshold(&mut conn, 3).unwrap(), 3);
        Setting::set(&mut conn, REPORT_THRESHOLD_KEY, "1").unwrap();
        assert_eq!(effective_report_threshold(&mut conn, 3).unwrap(), 1);
        Setting::set(&mut conn, REPORT_THRESHOLD_KEY, "0").unwrap();
        assert_eq!(effective_report_threshold(&mut conn, 3).unwrap(), 3);
    }

    #[test]
    fn test_report_unknown_article() {
        let mut conn = get_test_db_connection();
        assert!(matches!(
            report_article(&mut conn, &clock(), &Principal::user(1), 99, "spam", 3),
            Err(AppError::ResourceNotFound { .. })
        ));
    }

    #[test]
    fn test_system_principal_cannot_report() {
        let mut conn = get_test_db_connection();
        let cat = insert_category(&mut conn, "Tech");
        let article = insert_article(&mut conn, cat.id, "Clickbait", NOW);

        assert_eq!(
            report_article(&mut conn, &clock(), &Principal::system(), article.id, "spam", 1).unwrap_err(),
            AppError::Forbidden
        );
        assert!(ArticleReport::get_all(&mut conn).unwrap().is_empty());
        assert!(!Article::get_by_id(&mut conn, article.id).unwrap().unwrap().is_hidden);
    }

    #[test]
    fn test_listing_reports_is_admin_only() {
        let mut conn = get_test_db_connection();
        let user = insert_user(&mut conn, "a@news.test", false);
        let cat = insert_category(&mut conn, "Tech");
        let article = insert_article(&mut conn, cat.id, "Clickbait", NOW);
        report_article(&mut conn, &clock(), &Principal::user(user.id), article.id, "spam", 3).unwrap();

        assert_eq!(
            list_reports(&mut conn, &Principal::user(user.id)).unwrap_err(),
            AppError::Forbidden
        );
        assert_eq!(list_reports(&mut conn, &Principal::system()).unwrap().len(), 1);
        let for_article = reports_for_article(&mut conn, &Principal::system(), article.id).unwrap();
        assert_eq!(for_article[0].reason, "spam");
    }
}
