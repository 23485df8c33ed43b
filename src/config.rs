use std::env;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_REPORT_THRESHOLD: i64 = 3;
pub const DEFAULT_NOTIFY_INTERVAL_SECS: u64 = 60 * 15;

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("{var} must be a positive integer, got '{value}'")]
    InvalidNumber { var: &'static str, value: String },
    #[error("Failed to get current directory")]
    NoCurrentDir,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub db_path: String,
    /// Number of distinct user reports that auto-hides an article.
    pub report_threshold: i64,
    pub notify_interval: Duration,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let db_path = match env::var("ND_DATABASE_URL") {
            Ok(path) => {
                log::info!("Using database path from ND_DATABASE_URL: {}", path);
                path
            }
            Err(_) => {
                let mut path = env::current_dir().map_err(|_| ConfigError::NoCurrentDir)?;
                path.push("newsdesk.db");
                let res = path.to_string_lossy().to_string();
                log::info!("Using default database path: {}", res);
                res
            }
        };

        let report_threshold = match env::var("ND_REPORT_THRESHOLD") {
            Ok(value) => {
                log::info!("Using report threshold from ND_REPORT_THRESHOLD: {}", value);
                parse_positive("ND_REPORT_THRESHOLD", &value)? as i64
            }
            Err(_) => DEFAULT_REPORT_THRESHOLD,
        };

        let notify_interval = match env::var("ND_NOTIFY_INTERVAL_SECS") {
            Ok(value) => {
                log::info!("Using notify interval from ND_NOTIFY_INTERVAL_SECS: {}", value);
                Duration::from_secs(parse_positive("ND_NOTIFY_INTERVAL_SECS", &value)?)
            }
            Err(_) => Duration::from_secs(DEFAULT_NOTIFY_INTERVAL_SECS),
        };

        Ok(Self {
            db_path,
            report_threshold,
            notify_interval,
        })
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: "newsdesk.db".to_string(),
            report_threshold: DEFAULT_REPORT_THRESHOLD,
            notify_interval: Duration::from_secs(DEFAULT_NOTIFY_INTERVAL_SECS),
        }
    }
}

fn parse_positive(var: &'static str, value: &str) -> Result<u64, ConfigError> {
    match value.trim().parse::<u64>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(ConfigError::InvalidNumber {
            var,
            value: value.to_string(),
        }),
    }
}
