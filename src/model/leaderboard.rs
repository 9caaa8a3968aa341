use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A single ranked character
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntryDto {
    /// 1-based position across the whole leaderboard
    pub rank: usize,
    pub ocid: String,
    /// Numeric string as reported by the game API
    pub combat_power: String,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub character_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub character_level: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub character_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub world_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub character_class: Option<String>,
}

/// A page of the combat power leaderboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardDto {
    pub entries: Vec<LeaderboardEntryDto>,
    /// Number of ranked characters
    pub total_count: usize,
    pub offset: usize,
    /// Effective page size after clamping
    pub limit: usize,
}
