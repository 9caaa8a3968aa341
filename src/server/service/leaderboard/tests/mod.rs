
use std::collections::HashMap;

use chrono::{TimeZone, Utc};

use super::*;

fn record(ocid: &str, combat_power: &str, status: RecordStatus) -> CombatPowerRecord {
    CombatPowerRecord {
        ocid: ocid.to_string(),
        combat_power: combat_power.to_string(),
        updated_at: Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap(),
        status,
        not_found_count: 0,
    }
}

fn info(ocid: &str, name: &str) -> CharacterInfoRecord {
    CharacterInfoRecord {
        ocid: ocid.to_string(),
        character_name: name.to_string(),
        character_level: 280,
        character_image: format!("https://img/{}.png", ocid),
        world_name: "Scania".to_string(),
        character_class: "Hero".to_string(),
        cached_at: Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap(),
    }
}
