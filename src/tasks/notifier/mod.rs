//! Periodic pass that turns newly published articles into user notifications.

mod runner;

pub use runner::{run_once, start};
