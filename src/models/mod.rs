pub mod article;
pub mod category;
pub mod hidden_keyword;
pub mod notification;
pub mod notification_preference;
pub mod reaction;
pub mod read_history;
pub mod report;
pub mod saved_article;
pub mod setting;
pub mod user;
pub mod user_keyword;
