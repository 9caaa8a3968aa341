//! Google Sheets as a key-addressed table store.
//!
//! Three logical tables live in the spreadsheet, each keyed by `ocid`:
//! - `Sheet1` - the identifier list, one OCID per row in column A
//! - `CombatPower` - one [`CombatPowerRecord`] per row
//! - `CharacterInfo` - one [`CharacterInfoRecord`] per row
//!
//! Update-versus-insert and row-deletion decisions are made by pure functions on
//! [`SheetTable`] so that callers holding a snapshot can skip the read they would otherwise need.

pub mod auth;
pub mod cache;
pub mod client;
pub mod record;
pub mod table;

#[cfg(test)]
mod tests;

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use serde::Serialize;
use utoipa::ToSchema;

use crate::server::{
    error::sheets::SheetsError,
    model::combat_power::{CharacterInfoRecord, CombatPowerRecord},
};

pub use cache::OcidCache;
pub use client::SheetsClient;
pub use record::SheetRecord;
pub use table::SheetTable;

/// Identifier list sheet.
pub const OCID_SHEET: &str = "Sheet1";
/// Combat power sheet.
pub const COMBAT_POWER_SHEET: &str = "CombatPower";
/// Character metadata cache sheet.
pub const CHARACTER_INFO_SHEET: &str = "CharacterInfo";

/// A window into the identifier list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OcidPage {
    pub ocids: Vec<String>,
    /// Length of the full list, not of this page.
    pub total_count: usize,
    pub has_more: bool,
}

impl OcidPage {
    /// Cuts `[offset, offset + limit)` out of the full list; `None` takes everything after
    /// `offset`.
    pub fn from_list(all: Vec<String>, offset: usize, limit: Option<usize>) -> Self {
        let total_count = all.len();
        let start = offset.min(total_count);
        let end = match limit {
            Some(limit) => start.saturating_add(limit).min(total_count),
            None => total_count,
        };

        Self {
            ocids: all[start..end].to_vec(),
            total_count,
            has_more: end < total_count,
        }
    }
}

/// Rows touched by an upsert.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct UpsertCounts {
    pub updated: usize,
    pub inserted: usize,
}

/// Rows deleted per table by [`TableStore::remove_ocids`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RemovalCounts {
    pub sheet1: usize,
    pub combat_power: usize,
    pub character_info: usize,
}

/// Storage operations the refresh pipeline and API handlers rely on.
#[async_trait]
pub trait TableStore: Send + Sync {
    /// Reads the identifier list and returns the requested window of it.
    async fn get_all_ocids(
        &self,
        offset: usize,
        limit: Option<usize>,
    ) -> Result<OcidPage, SheetsError>;

    /// Raw `CombatPower` table including its header row.
    async fn get_combat_power_table(&self) -> Result<SheetTable, SheetsError>;

    /// Parsed `CombatPower` rows keyed by OCID.
    async fn get_existing_combat_power_records(
        &self,
    ) -> Result<HashMap<String, CombatPowerRecord>, SheetsError> {
        let table = self.get_combat_power_table().await?;

        Ok(table.record_map::<CombatPowerRecord>())
    }

    /// Raw `CharacterInfo` table including its header row.
    async fn get_all_character_info_data(&self) -> Result<SheetTable, SheetsError>;

    /// Updates rows whose OCID already exists and appends the rest.
    ///
    /// `existing` replaces the read of the current table when the caller already holds it.
    async fn upsert_combat_power_records(
        &self,
        records: &[CombatPowerRecord],
        existing: Option<&SheetTable>,
    ) -> Result<UpsertCounts, SheetsError>;

    /// Same as [`TableStore::upsert_combat_power_records`] for the `CharacterInfo` table.
    async fn upsert_character_info_cache(
        &self,
        records: &[CharacterInfoRecord],
        existing: Option<&SheetTable>,
    ) -> Result<UpsertCounts, SheetsError>;

    /// Deletes every row keyed by one of `ocids` from all three tables. Tables missing from the
    /// spreadsheet are skipped.
    async fn remove_ocids(&self, ocids: &[String]) -> Result<RemovalCounts, SheetsError>;

    /// Appends `ocid` to the identifier list unless `cache` (reloaded when stale) already knows
    /// it. Returns whether a row was appended.
    async fn add_ocid_if_absent(&self, ocid: &str, cache: &OcidCache)
        -> Result<bool, SheetsError>;
}

/// Extracts the identifier list from a read of `Sheet1` column A.
///
/// Blank cells are dropped and duplicates collapse to their first occurrence.
pub fn ocid_list(table: &SheetTable) -> Vec<String> {
    let key_column = table.key_column();
    let mut seen = HashSet::new();

    table
        .data_rows()
        .filter_map(|(_, row)| row.get(key_column).map(|cell| cell.trim()))
        .filter(|ocid| !ocid.is_empty())
        .filter(|ocid| seen.insert(ocid.to_string()))
        .map(str::to_string)
        .collect()
}
