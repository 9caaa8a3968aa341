//! API data transfer objects shared by HTTP handlers and their consumers.

pub mod api;
pub mod character;
pub mod cron;
pub mod leaderboard;
