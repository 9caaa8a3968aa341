use serde::{Deserialize, Serialize};

use super::COMBAT_POWER_STAT_NAME;

/// Response of `GET /character/stat`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterStat {
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub character_class: Option<String>,
    #[serde(default)]
    pub final_stat: Option<Vec<StatEntry>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatEntry {
    pub stat_name: String,
    #[serde(default)]
    pub stat_value: Option<String>,
}

impl CharacterStat {
    /// Combat power value, if the payload carries one.
    pub fn combat_power(&self) -> Option<&str> {
        self.final_stat
            .as_deref()?
            .iter()
            .find(|entry| entry.stat_name == COMBAT_POWER_STAT_NAME)
            .and_then(|entry| entry.stat_value.as_deref())
            .filter(|value| !value.trim().is_empty())
    }
}

/// Response of `GET /character/basic`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterBasic {
    pub character_name: String,
    pub world_name: String,
    pub character_class: String,
    pub character_level: u32,
    #[serde(default)]
    pub character_image: String,
}

/// Response of `GET /id`.
#[derive(Debug, Clone, Deserialize)]
pub(super) struct CharacterId {
    pub ocid: String,
}
