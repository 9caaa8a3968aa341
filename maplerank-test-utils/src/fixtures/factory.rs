use chrono::{DateTime, Duration, Utc};
use maplerank::server::{
    model::combat_power::{CharacterInfoRecord, CombatPowerRecord, RecordStatus},
    nexon::{CharacterBasic, CharacterStat, StatEntry, COMBAT_POWER_STAT_NAME},
};

/// Create a successful combat power record updated `age` ago.
pub fn success_record(ocid: &str, combat_power: &str, age: Duration) -> CombatPowerRecord {
    CombatPowerRecord {
        ocid: ocid.to_string(),
        combat_power: combat_power.to_string(),
        updated_at: Utc::now() - age,
        status: RecordStatus::Success,
        not_found_count: 0,
    }
}

/// Create a not-found record with the given consecutive count, updated two days ago.
pub fn not_found_record(ocid: &str, not_found_count: u32) -> CombatPowerRecord {
    CombatPowerRecord {
        ocid: ocid.to_string(),
        combat_power: "0".to_string(),
        updated_at: Utc::now() - Duration::days(2),
        status: RecordStatus::NotFound,
        not_found_count,
    }
}

/// Create an error record carrying a previous value.
pub fn error_record(ocid: &str, combat_power: &str, not_found_count: u32) -> CombatPowerRecord {
    CombatPowerRecord {
        ocid: ocid.to_string(),
        combat_power: combat_power.to_string(),
        updated_at: Utc::now() - Duration::hours(1),
        status: RecordStatus::Error,
        not_found_count,
    }
}

/// Create cached character metadata.
pub fn character_info(ocid: &str, name: &str, cached_at: DateTime<Utc>) -> CharacterInfoRecord {
    CharacterInfoRecord {
        ocid: ocid.to_string(),
        character_name: name.to_string(),
        character_level: 285,
        character_image: format!("https://open.api.nexon.com/static/maplestory/character/{}", ocid),
        world_name: "Scania".to_string(),
        character_class: "Hero".to_string(),
        cached_at,
    }
}

/// Create a stat payload carrying the combat power entry among other stats.
pub fn stat_with_combat_power(combat_power: &str) -> CharacterStat {
    CharacterStat {
        date: None,
        character_class: Some("Hero".to_string()),
        final_stat: Some(vec![
            StatEntry {
                stat_name: "STR".to_string(),
                stat_value: Some("5000".to_string()),
            },
            StatEntry {
                stat_name: COMBAT_POWER_STAT_NAME.to_string(),
                stat_value: Some(combat_power.to_string()),
            },
        ]),
    }
}

/// Create a stat payload without a combat power entry.
pub fn stat_without_combat_power() -> CharacterStat {
    CharacterStat {
        date: None,
        character_class: Some("Hero".to_string()),
        final_stat: Some(vec![StatEntry {
            stat_name: "STR".to_string(),
            stat_value: Some("5000".to_string()),
        }]),
    }
}

/// Create a basic info payload.
pub fn character_basic(name: &str) -> CharacterBasic {
    CharacterBasic {
        character_name: name.to_string(),
        world_name: "Scania".to_string(),
        character_class: "Hero".to_string(),
        character_level: 285,
        character_image: "https://open.api.nexon.com/static/maplestory/character/look".to_string(),
    }
}
