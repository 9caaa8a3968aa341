//! Test fixtures for the refresh pipeline and its HTTP collaborators.
//!
//! - `factory` - Records and API payloads with default test values
//! - `game_api` - Scripted in-memory [`GameApi`](maplerank::server::nexon::GameApi)
//! - `store` - In-memory [`TableStore`](maplerank::server::sheets::TableStore)
//! - `nexon` / `sheets` - mockito endpoints for the real HTTP clients
//! - `token` - mockito OAuth endpoint and signing key for service-account credentials

pub mod factory;
pub mod game_api;
pub mod nexon;
pub mod sheets;
pub mod store;
pub mod token;
