//! Database-backed operations. Each takes an explicit connection and, where
//! authorization matters, the acting [`Principal`](crate::principal::Principal).

pub mod articles;
pub mod categories;
pub mod keywords;
pub mod notifications;
pub mod preferences;
pub mod reports;
pub mod users;
