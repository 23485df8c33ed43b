use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize structured logging and tracing
pub fn init_logging() {
    let config = ObservabilityConfig::from_env();

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    if config.log_format == "json" {
        // JSON structured logging for production
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_current_span(false)
                    .with_span_list(false),
            )
            .init();
    } else {
        // Pretty logging for development
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .pretty()
                    .with_target(true)
                    .with_thread_ids(false),
            )
            .init();
    }

    info!(
        service = "newsdesk",
        version = env!("CARGO_PKG_VERSION"),
        log_level = %config.log_level,
        log_format = %config.log_format,
        "Logging initialized"
    );
}

/// Structured logging macro for audited user actions
#[macro_export]
macro_rules! log_user_action {
    ($user_id:expr, $action:expr, $($details:tt)+) => {
        tracing::info!(
            user_id = $user_id,
            action = $action,
            details = %serde_json::json!($($details)+),
            "User action performed"
        );
    };
}

struct ObservabilityConfig {
    log_level: String,
    log_format: String,
}

impl ObservabilityConfig {
    fn from_env() -> Self {
        Self {
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            log_format: std::env::var("LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_log_user_action_accepts_object_details() {
        let article_id = 7;
        crate::log_user_action!(1, "set_article_hidden", { "article_id": article_id, "hidden": true });
        crate::log_user_action!(1, "add_hidden_keyword", { "keyword": &"leak".to_string() });
        crate::log_user_action!(0, "create_user", "plain");
    }
}
