//! MapleStory character dashboard backend.
//!
//! Hosts the combat-power refresh pipeline that keeps a Google Sheets backed leaderboard current
//! using the Nexon OpenAPI, plus the small JSON API used by the dashboard front-end.

pub mod model;
pub mod server;
