use crate::schema::*;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

pub const REPORT_THRESHOLD_KEY: &str = "report_hide_threshold";
pub const NOTIFIER_LAST_ARTICLE_KEY: &str = "notifier_last_article_id";

#[derive(Debug, Serialize, Deserialize, Queryable, Identifiable)]
#[diesel(table_name = settings)]
pub struct Setting {
    pub id: i32,
    pub key: String,
    pub value: String,
    pub updated_at: i64,
}

#[derive(Debug, Insertable, AsChangeset)]
#[diesel(table_name = settings)]
struct UpsertSetting<'a> {
    key: &'a str,
    value: &'a str,
    updated_at: i64,
}

#[derive(Error, Debug, PartialEq)]
pub enum Error {
    #[error("Setting '{key}' not found")]
    SettingNotFound { key: String },
    #[error("Setting '{key}' has invalid value '{value}'")]
    InvalidValue { key: String, value: String },
    #[error("Database error")]
    DatabaseError,
}

impl Setting {
    pub fn get(conn: &mut SqliteConnection, query_key: &str) -> Result<Setting, Error> {
        use crate::schema::settings::dsl::*;

        settings
            .filter(key.eq(query_key))
            .first::<Setting>(conn)
            .optional()
            .map_err(|e| {
                log::warn!("Error getting setting {query_key}: {e:?}");
                Error::DatabaseError
            })?
            .ok_or_else(|| Error::SettingNotFound {
                key: query_key.to_string(),
            })
    }

    /// Reads and parses a setting, `Ok(None)` when it was never set.
    pub fn get_parsed<T: FromStr>(
        conn: &mut SqliteConnection,
        query_key: &str,
    ) -> Result<Option<T>, Error> {
        match Setting::get(conn, query_key) {
            Ok(setting) => setting
                .value
                .parse::<T>()
                .map(Some)
                .map_err(|_| Error::InvalidValue {
                    key: setting.key,
                    value: setting.value,
                }),
            Err(Error::SettingNotFound { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub fn set(conn: &mut SqliteConnection, set_key: &str, set_value: &str) -> Result<Setting, Error> {
        use crate::schema::settings::dsl::*;

        let row = UpsertSetting {
            key: set_key,
            value: set_value,
            updated_at: chrono::Utc::now().timestamp(),
        };

        diesel::insert_into(settings)
            .values(&row)
            .on_conflict(key)
            .do_update()
            .set(&row)
            .get_result(conn)
            .map_err(|e| {
                log::warn!("Error saving setting {set_key}: {e:?}");
                Error::DatabaseError
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::get_test_db_connection;

    #[test]
    fn test_missing_setting() {
        let mut conn = get_test_db_connection();
        let res = Setting::get(&mut conn, "nope");
        assert_eq!(
            res.unwrap_err(),
            Error::SettingNotFound {
                key: "nope".to_string()
            }
        );
        assert_eq!(Setting::get_parsed::<i64>(&mut conn, "nope"), Ok(None));
    }

    #[test]
    fn test_set_overwrites() {
        let mut conn = get_test_db_connection();
        Setting::set(&mut conn, REPORT_THRESHOLD_KEY, "4").unwrap();
        Setting::set(&mut conn, REPORT_THRESHOLD_KEY, "7").unwrap();

        let value = Setting::get_parsed::<i64>(&mut conn, REPORT_THRESHOLD_KEY).unwrap();
        assert_eq!(value, Some(7));
    }

    #[test]
    fn test_unparseable_value() {
        let mut conn = get_test_db_connection();
        Setting::set(&mut conn, REPORT_THRESHOLD_KEY, "lots").unwrap();
        let res = Setting::get_parsed::<i64>(&mut conn, REPORT_THRESHOLD_KEY);
        assert!(matches!(res, Err(Error::InvalidValue { .. })));
    }
}
