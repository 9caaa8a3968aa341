//! Nexon OpenAPI (MapleStory) collaborator.
//!
//! The refresh pipeline only depends on the [`GameApi`] trait; [`client::NexonClient`] is the
//! reqwest implementation used in production.

pub mod client;
pub mod model;

use async_trait::async_trait;

use crate::server::error::nexon::NexonError;

pub use client::NexonClient;
pub use model::{CharacterBasic, CharacterStat, StatEntry};

/// Name of the `final_stat` entry carrying combat power.
pub const COMBAT_POWER_STAT_NAME: &str = "전투력";

/// Read access to the game's character endpoints.
#[async_trait]
pub trait GameApi: Send + Sync {
    /// Full stat sheet for a character.
    async fn get_character_stats(&self, ocid: &str) -> Result<CharacterStat, NexonError>;

    /// Name, level, world, class and avatar for a character.
    async fn get_character_basic_info(&self, ocid: &str) -> Result<CharacterBasic, NexonError>;

    /// Resolves a character name to its OCID.
    async fn get_ocid(&self, character_name: &str) -> Result<String, NexonError>;
}
