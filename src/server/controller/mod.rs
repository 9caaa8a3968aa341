//! HTTP controller endpoints for the maplerank web API.
//!
//! Axum handlers for the cron refresh trigger, character search and the leaderboard. Handlers
//! validate inputs, build services over the shared [`AppState`](crate::server::model::app::AppState)
//! and document themselves for OpenAPI with utoipa.

pub mod character;
pub mod cron;
pub mod leaderboard;
pub mod util;
