//! Combat power leaderboard assembled from the spreadsheet tables.

use std::{
    cmp::Ordering,
    collections::{HashMap, HashSet},
};

use crate::{
    model::leaderboard::{LeaderboardDto, LeaderboardEntryDto},
    server::{
        error::Error,
        model::combat_power::{CharacterInfoRecord, CombatPowerRecord, RecordStatus},
        sheets::TableStore,
    },
};

pub const DEFAULT_LEADERBOARD_LIMIT: usize = 100;
pub const MAX_LEADERBOARD_LIMIT: usize = 500;

pub struct LeaderboardService<'a> {
    store: &'a dyn TableStore,
}

impl<'a> LeaderboardService<'a> {
    pub fn new(store: &'a dyn TableStore) -> Self {
        Self { store }
    }

    /// Reads both tables concurrently and returns one ranked page.
    ///
    /// # Arguments
    /// - `offset` - Number of ranked entries to skip
    /// - `limit` - Page size; defaults to 100 and is clamped to `1..=500`
    pub async fn get_leaderboard(
        &self,
        offset: usize,
        limit: Option<usize>,
    ) -> Result<LeaderboardDto, Error> {
        let (combat_power_table, character_info_table) = tokio::try_join!(
            self.store.get_combat_power_table(),
            self.store.get_all_character_info_data(),
        )?;

        let records = combat_power_table.parse_records::<CombatPowerRecord>();
        let character_info = character_info_table.record_map::<CharacterInfoRecord>();

        Ok(build_leaderboard(records, &character_info, offset, limit))
    }
}

/// Ranks successful records by combat power and slices out one page.
///
/// Records are ordered by numeric combat power, highest first, with ties broken by OCID. An OCID
/// appearing twice only keeps its first row. Ranks are 1-based positions in the full ordering.
pub fn build_leaderboard(
    records: Vec<CombatPowerRecord>,
    character_info: &HashMap<String, CharacterInfoRecord>,
    offset: usize,
    limit: Option<usize>,
) -> LeaderboardDto {
    let limit = limit
        .unwrap_or(DEFAULT_LEADERBOARD_LIMIT)
        .clamp(1, MAX_LEADERBOARD_LIMIT);

    let mut seen = HashSet::new();
    let mut ranked: Vec<CombatPowerRecord> = records
        .into_iter()
        .filter(|record| record.status == RecordStatus::Success)
        .filter(|record| seen.insert(record.ocid.clone()))
        .collect();

    ranked.sort_by(|a, b| {
        compare_combat_power(&b.combat_power, &a.combat_power).then_with(|| a.ocid.cmp(&b.ocid))
    });

    let total_count = ranked.len();
    let entries = ranked
        .into_iter()
        .enumerate()
        .skip(offset)
        .take(limit)
        .map(|(position, record)| {
            let info = character_info.get(&record.ocid);

            LeaderboardEntryDto {
                rank: position + 1,
                character_name: info.map(|info| info.character_name.clone()),
                character_level: info.map(|info| info.character_level),
                character_image: info.map(|info| info.character_image.clone()),
                world_name: info.map(|info| info.world_name.clone()),
                character_class: info.map(|info| info.character_class.clone()),
                ocid: record.ocid,
                combat_power: record.combat_power,
                updated_at: record.updated_at,
            }
        })
        .collect();

    LeaderboardDto {
        entries,
        total_count,
        offset,
        limit,
    }
}

/// Compares two non-negative decimal strings numerically, without overflow.
///
/// Non-numeric values sort below every number.
fn compare_combat_power(a: &str, b: &str) -> Ordering {
    fn normalize(value: &str) -> Option<&str> {
        let value = value.trim();
        if value.is_empty() || !value.bytes().all(|byte| byte.is_ascii_digit()) {
            return None;
        }
        let trimmed = value.trim_start_matches('0');
        Some(if trimmed.is_empty() { "0" } else { trimmed })
    }

    match (normalize(a), normalize(b)) {
        (Some(a), Some(b)) => a.len().cmp(&b.len()).then_with(|| a.cmp(b)),
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests;
