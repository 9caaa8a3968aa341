//! Row mapping for the record types stored in the spreadsheet.

use chrono::{DateTime, SecondsFormat, Utc};

use super::{CHARACTER_INFO_SHEET, COMBAT_POWER_SHEET};
use crate::server::model::combat_power::{CharacterInfoRecord, CombatPowerRecord, RecordStatus};

/// Header cell naming the key column of every table.
pub const KEY_COLUMN: &str = "ocid";

/// A record persisted as one spreadsheet row, columns in [`SheetRecord::HEADER`] order.
pub trait SheetRecord: Sized {
    /// Sheet (tab) the record lives in.
    const SHEET: &'static str;
    /// Header row, key column first.
    const HEADER: &'static [&'static str];

    fn key(&self) -> &str;

    fn to_row(&self) -> Vec<String>;

    /// Parses a data row. The Sheets API drops trailing empty cells, so short rows are valid.
    fn from_row(row: &[String]) -> Result<Self, String>;
}

impl SheetRecord for CombatPowerRecord {
    const SHEET: &'static str = COMBAT_POWER_SHEET;
    const HEADER: &'static [&'static str] = &[
        "ocid",
        "combat_power",
        "updated_at",
        "status",
        "not_found_count",
    ];

    fn key(&self) -> &str {
        &self.ocid
    }

    fn to_row(&self) -> Vec<String> {
        vec![
            self.ocid.clone(),
            self.combat_power.clone(),
            format_timestamp(&self.updated_at),
            self.status.to_string(),
            self.not_found_count.to_string(),
        ]
    }

    fn from_row(row: &[String]) -> Result<Self, String> {
        let combat_power = match cell(row, 1) {
            "" => "0".to_string(),
            value => value.to_string(),
        };

        Ok(Self {
            ocid: required(row, 0, "ocid")?.to_string(),
            combat_power,
            updated_at: parse_timestamp(required(row, 2, "updated_at")?)?,
            status: required(row, 3, "status")?.parse::<RecordStatus>()?,
            not_found_count: parse_number(row, 4, "not_found_count")?,
        })
    }
}

impl SheetRecord for CharacterInfoRecord {
    const SHEET: &'static str = CHARACTER_INFO_SHEET;
    const HEADER: &'static [&'static str] = &[
        "ocid",
        "character_name",
        "character_level",
        "character_image",
        "world_name",
        "character_class",
        "cached_at",
    ];

    fn key(&self) -> &str {
        &self.ocid
    }

    fn to_row(&self) -> Vec<String> {
        vec![
            self.ocid.clone(),
            self.character_name.clone(),
            self.character_level.to_string(),
            self.character_image.clone(),
            self.world_name.clone(),
            self.character_class.clone(),
            format_timestamp(&self.cached_at),
        ]
    }

    fn from_row(row: &[String]) -> Result<Self, String> {
        Ok(Self {
            ocid: required(row, 0, "ocid")?.to_string(),
            character_name: cell(row, 1).to_string(),
            character_level: parse_number(row, 2, "character_level")?,
            character_image: cell(row, 3).to_string(),
            world_name: cell(row, 4).to_string(),
            character_class: cell(row, 5).to_string(),
            cached_at: parse_timestamp(required(row, 6, "cached_at")?)?,
        })
    }
}

/// Millisecond-precision UTC timestamp with a `Z` suffix.
pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(value)
        .map(|timestamp| timestamp.with_timezone(&Utc))
        .map_err(|e| format!("invalid timestamp {:?}: {}", value, e))
}

fn cell(row: &[String], index: usize) -> &str {
    row.get(index).map(|value| value.trim()).unwrap_or("")
}

fn required<'a>(row: &'a [String], index: usize, column: &str) -> Result<&'a str, String> {
    match cell(row, index) {
        "" => Err(format!("missing {}", column)),
        value => Ok(value),
    }
}

// Empty cells read as zero
fn parse_number(row: &[String], index: usize, column: &str) -> Result<u32, String> {
    match cell(row, index) {
        "" => Ok(0),
        value => value
            .parse::<u32>()
            .map_err(|e| format!("invalid {} {:?}: {}", column, value, e)),
    }
}
