//! Combat-power pipeline records.
//!
//! These are the typed forms of the rows kept in the `CombatPower` and `CharacterInfo` tables,
//! plus the per-batch counters returned by the refresh pipeline.

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Outcome of the most recent combat-power fetch for a character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum RecordStatus {
    /// The stat endpoint returned a combat-power value.
    Success,
    /// The Nexon API affirmatively reported the character as unresolvable.
    NotFound,
    /// The fetch failed with a transient error after all retries.
    Error,
}

impl RecordStatus {
    /// Cell representation used in the `status` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::NotFound => "not_found",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for RecordStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "success" => Ok(Self::Success),
            "not_found" => Ok(Self::NotFound),
            "error" => Ok(Self::Error),
            other => Err(format!("unknown record status {:?}", other)),
        }
    }
}

/// Last known combat power for a single OCID.
///
/// `not_found_count` counts consecutive `NotFound` outcomes and is reset by any `Success`;
/// once it reaches the removal threshold the OCID is purged from every table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatPowerRecord {
    pub ocid: String,
    /// Numeric string exactly as reported by the stat endpoint.
    pub combat_power: String,
    pub updated_at: DateTime<Utc>,
    pub status: RecordStatus,
    pub not_found_count: u32,
}

/// Cached, mostly static character metadata used by the leaderboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterInfoRecord {
    pub ocid: String,
    pub character_name: String,
    pub character_level: u32,
    pub character_image: String,
    pub world_name: String,
    pub character_class: String,
    pub cached_at: DateTime<Utc>,
}

/// Aggregate outcome counters for one or more processed batches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BatchStats {
    pub success: usize,
    pub failed: usize,
    pub not_found: usize,
    pub skipped: usize,
}

impl BatchStats {
    /// Counts a single fetched record by its final status.
    pub fn record(&mut self, status: RecordStatus) {
        match status {
            RecordStatus::Success => self.success += 1,
            RecordStatus::NotFound => self.not_found += 1,
            RecordStatus::Error => self.failed += 1,
        }
    }

    /// Adds another batch's counters to this one.
    pub fn merge(&mut self, other: &BatchStats) {
        self.success += other.success;
        self.failed += other.failed;
        self.not_found += other.not_found;
        self.skipped += other.skipped;
    }
}

impl From<BatchStats> for crate::model::cron::RefreshStatsDto {
    fn from(stats: BatchStats) -> Self {
        Self {
            success: stats.success,
            failed: stats.failed,
            not_found: stats.not_found,
            skipped: stats.skipped,
        }
    }
}
