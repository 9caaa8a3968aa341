
use chrono::{TimeZone, Utc};

use crate::server::model::combat_power::{CombatPowerRecord, RecordStatus};

use super::*;

fn row(cells: &[&str]) -> Vec<String> {
    cells.iter().map(|cell| cell.to_string()).collect()
}

fn combat_power_record(ocid: &str, combat_power: &str) -> CombatPowerRecord {
    CombatPowerRecord {
        ocid: ocid.to_string(),
        combat_power: combat_power.to_string(),
        updated_at: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
        status: RecordStatus::Success,
        not_found_count: 0,
    }
}
