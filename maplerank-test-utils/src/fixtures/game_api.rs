//! Scripted in-memory game API.

use std::{
    collections::{HashMap, VecDeque},
    sync::Mutex,
    time::Duration,
};

use async_trait::async_trait;
use maplerank::server::{
    error::nexon::NexonError,
    nexon::{CharacterBasic, CharacterStat, GameApi},
};
use reqwest::StatusCode;

use crate::fixtures::factory;

/// One scripted answer of the stat endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatResponse {
    /// Payload carrying this combat power
    CombatPower(String),
    /// Payload without a combat power entry
    NoCombatPower,
    /// HTTP 404
    NotFound,
    /// HTTP 500, retried by the batch processor
    ServerError,
}

impl StatResponse {
    pub fn combat_power(value: &str) -> Self {
        Self::CombatPower(value.to_string())
    }

    fn into_result(self) -> Result<CharacterStat, NexonError> {
        match self {
            Self::CombatPower(value) => Ok(factory::stat_with_combat_power(&value)),
            Self::NoCombatPower => Ok(factory::stat_without_combat_power()),
            Self::NotFound => Err(status_error(StatusCode::NOT_FOUND)),
            Self::ServerError => Err(status_error(StatusCode::INTERNAL_SERVER_ERROR)),
        }
    }
}

fn status_error(status: StatusCode) -> NexonError {
    NexonError::Status {
        status,
        body: String::new(),
    }
}

/// [`GameApi`] answering from per-OCID scripts.
///
/// Stat responses are consumed in order; the last one repeats once the script is exhausted.
/// OCIDs without a script answer 404. Basic info is only returned for OCIDs registered with
/// [`FakeGameApi::with_basic_info`]; others answer 404.
#[derive(Default)]
pub struct FakeGameApi {
    stats: Mutex<HashMap<String, VecDeque<StatResponse>>>,
    basic_info: HashMap<String, CharacterBasic>,
    basic_info_failure: bool,
    ocids: HashMap<String, String>,
    delay: Option<Duration>,
    stat_calls: Mutex<HashMap<String, usize>>,
    basic_info_calls: Mutex<HashMap<String, usize>>,
}

impl FakeGameApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the stat responses for `ocid`.
    pub fn with_stats(self, ocid: &str, responses: Vec<StatResponse>) -> Self {
        lock(&self.stats).insert(ocid.to_string(), responses.into());
        self
    }

    /// Shortcut for an OCID that always reports `combat_power`.
    pub fn with_combat_power(self, ocid: &str, combat_power: &str) -> Self {
        self.with_stats(ocid, vec![StatResponse::combat_power(combat_power)])
    }

    pub fn with_basic_info(mut self, ocid: &str, basic: CharacterBasic) -> Self {
        self.basic_info.insert(ocid.to_string(), basic);
        self
    }

    /// Make every basic-info call fail with a 500.
    pub fn with_basic_info_failure(mut self) -> Self {
        self.basic_info_failure = true;
        self
    }

    /// Register a character name for [`GameApi::get_ocid`].
    pub fn with_ocid(mut self, character_name: &str, ocid: &str) -> Self {
        self.ocids
            .insert(character_name.to_string(), ocid.to_string());
        self
    }

    /// Delay every stat call by `delay` (tokio time, so paused clocks advance instantly).
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of stat calls made for `ocid`, retries included.
    pub fn stat_calls(&self, ocid: &str) -> usize {
        lock(&self.stat_calls).get(ocid).copied().unwrap_or(0)
    }

    /// Total stat calls across every OCID.
    pub fn total_stat_calls(&self) -> usize {
        lock(&self.stat_calls).values().sum()
    }

    pub fn basic_info_calls(&self, ocid: &str) -> usize {
        lock(&self.basic_info_calls).get(ocid).copied().unwrap_or(0)
    }

    fn next_stat(&self, ocid: &str) -> StatResponse {
        let mut stats = lock(&self.stats);

        match stats.get_mut(ocid) {
            Some(script) if script.len() > 1 => script.pop_front().unwrap_or(StatResponse::NotFound),
            Some(script) => script.front().cloned().unwrap_or(StatResponse::NotFound),
            None => StatResponse::NotFound,
        }
    }
}

#[async_trait]
impl GameApi for FakeGameApi {
    async fn get_character_stats(&self, ocid: &str) -> Result<CharacterStat, NexonError> {
        *lock(&self.stat_calls).entry(ocid.to_string()).or_default() += 1;

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        self.next_stat(ocid).into_result()
    }

    async fn get_character_basic_info(&self, ocid: &str) -> Result<CharacterBasic, NexonError> {
        *lock(&self.basic_info_calls)
            .entry(ocid.to_string())
            .or_default() += 1;

        if self.basic_info_failure {
            return Err(status_error(StatusCode::INTERNAL_SERVER_ERROR));
        }

        self.basic_info
            .get(ocid)
            .cloned()
            .ok_or_else(|| status_error(StatusCode::NOT_FOUND))
    }

    async fn get_ocid(&self, character_name: &str) -> Result<String, NexonError> {
        self.ocids
            .get(character_name)
            .cloned()
            .ok_or_else(|| status_error(StatusCode::NOT_FOUND))
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
